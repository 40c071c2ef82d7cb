// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `khan-lesshint explain <code>`.

use colored::Colorize;

use lesshint_diagnostics::codes::CodeRegistry;

use super::{EXIT_FAULT, EXIT_OK};
use crate::output;

pub fn cmd_explain(code: &str) -> i32 {
    let registry = CodeRegistry::default();

    let Some(info) = registry.find(code) else {
        eprintln!("{}: unknown lint code `{}`", output::error_label(), code);
        eprintln!();
        eprintln!("Known codes:");
        for info in registry.all() {
            eprintln!("  {}  {:<14} {}", output::code(info.code), info.id, info.title);
        }
        return EXIT_FAULT;
    };

    println!("{}[{}]: {}", "error".red().bold(), output::code(info.code), info.title.bold());
    println!();
    println!("  {}  {}", output::section_header("Rule:"), info.id);
    println!("  {}  {}", output::section_header("Category:"), info.category);
    println!();
    for line in info.explanation.lines() {
        println!("  {}", line.trim());
    }
    println!();
    println!(
        "  Select it with `{}` or skip it with `{}`.",
        output::command(&format!("--rule {}", info.id)),
        output::command(&format!("--exclude {}", info.id)),
    );
    EXIT_OK
}
