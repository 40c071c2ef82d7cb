// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `khan-lesshint css`: print the compiled CSS the overqualified check sees.

use std::fs;

use lesshint_parser::{parse_file, FsLoader};

use super::{EXIT_FAULT, EXIT_OK, EXIT_VIOLATIONS};
use crate::cli::CssArgs;
use crate::output;

pub fn cmd_css(args: &CssArgs) -> i32 {
    let name = args.file.display().to_string();
    let source = match fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: reading {}: {}", output::error_label(), output::file_path(&name), e);
            return EXIT_FAULT;
        }
    };

    let parsed = match parse_file(&args.file, &source, &FsLoader) {
        Ok(parsed) => parsed,
        Err(failure) => {
            let file = failure.path().map(|p| p.display().to_string()).unwrap_or(name);
            eprintln!(
                "{}: {}:{}: {}",
                output::error_label(),
                output::file_path(&file),
                failure.location(),
                failure.error
            );
            return EXIT_VIOLATIONS;
        }
    };

    let compiled = match lesshint_compile::compile(&parsed.root, &parsed.sources) {
        Ok(compiled) => compiled,
        Err(e) => {
            let origin = e.origin();
            let file = parsed
                .sources
                .path(origin.file)
                .map(|p| p.display().to_string())
                .unwrap_or(name);
            let location = parsed
                .sources
                .get(origin.file)
                .map(|f| f.location(origin.index).to_string())
                .unwrap_or_default();
            eprintln!("{}: {}:{}: {}", output::error_label(), output::file_path(&file), location, e);
            return EXIT_VIOLATIONS;
        }
    };

    print!("{}", compiled.css);

    if let Some(out) = &args.source_map {
        let css_name = args.file.with_extension("css");
        let file_name = css_name.file_name().map(|n| n.to_string_lossy().into_owned());
        let json = compiled.source_map.to_json(file_name.as_deref());
        if let Err(e) = fs::write(out, json) {
            eprintln!("{}: writing {}: {}", output::error_label(), output::file_path(&out.display().to_string()), e);
            return EXIT_FAULT;
        }
        tracing::debug!(path = %out.display(), "wrote source map");
    }
    EXIT_OK
}
