//! `bp2bst info` — parse and evaluate a file, printing module names, types,
//! and defaults chains without emitting any elements. A lightweight
//! introspection command in the spirit of the teacher's `Check` subcommand.

use crate::colors::{bold, cyan, gray, red};
use crate::error::CliError;
use bp2bst::diagnostics::Diagnostic;
use bp2bst::eval::{as_string_list, Evaluator};
use bp2bst::parser::Parser;
use std::path::Path;

pub fn run(path: &Path) -> Result<(), CliError> {
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    let file_name = path.display().to_string();

    let file = match Parser::parse_file(&source, &file_name) {
        Ok(file) => file,
        Err(err) => {
            let diagnostic = Diagnostic::from_parse_error(&err, &source);
            eprint!("{} {}", red("✗"), diagnostic.render());
            return Err(CliError::AlreadyReported);
        }
    };

    let mut evaluator = Evaluator::new();
    evaluator.register_file(&file);

    println!("{} {} module(s)", bold("Android.bp"), file.modules().count());
    for module in file.modules() {
        let name = module.name().unwrap_or("<unnamed>");
        println!("- {} {}", cyan(&module.module_type), name);
        if let Some(defaults_expr) = module.property("defaults") {
            match evaluator.evaluate(defaults_expr) {
                Ok(evaluated) => {
                    let names = as_string_list(&evaluated);
                    if !names.is_empty() {
                        println!("  {} {}", gray("defaults:"), names.join(", "));
                    }
                }
                Err(err) => println!("  {} {}", gray("defaults:"), err),
            }
        }
    }

    Ok(())
}
