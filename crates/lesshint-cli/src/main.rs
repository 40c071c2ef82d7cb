// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! khan-lesshint: lint Less stylesheets.

mod cli;
mod commands;
mod output;

use std::process;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    output::init();
    output::init_tracing(cli.verbose, cli.quiet);

    let status = match &cli.command {
        Some(Commands::Css(args)) => commands::css::cmd_css(args),
        Some(Commands::Explain { code }) => commands::explain::cmd_explain(code),
        None => commands::lint::cmd_lint(&cli.lint),
    };
    process::exit(status);
}
