// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Less style checker: property order, nesting depth, overqualified
/// selectors and inline colors.
#[derive(Parser, Debug)]
#[command(name = "khan-lesshint")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub lint: LintArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a Less file and print the CSS
    Css(CssArgs),

    /// Explain a lint code or rule id
    Explain {
        /// `E03` or `overqualified`
        code: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct LintArgs {
    /// Files or directories to lint (directories are searched for *.less)
    pub paths: Vec<PathBuf>,

    /// Output format: text, json or pretty
    #[arg(long)]
    pub reporter: Option<String>,

    /// Directory name whose files never provide color variables (repeatable)
    #[arg(long = "ignore", value_name = "DIR")]
    pub ignore: Vec<String>,

    /// Config file (default: ./.lesshintrc when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only run matching rules: a code, a rule id or `*` (repeatable)
    #[arg(long = "rule", value_name = "PATTERN")]
    pub rules: Vec<String>,

    /// Skip matching rules (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub excludes: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CssArgs {
    pub file: PathBuf,

    /// Also write a source map here
    #[arg(long, value_name = "OUT")]
    pub source_map: Option<PathBuf>,
}
