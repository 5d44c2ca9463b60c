//! `bp2bst parse` — parse a single file and print its AST, or a rendered
//! diagnostic on failure. Mirrors the teacher's `Emit`-to-JSON subcommand.

use crate::colors::red;
use crate::error::CliError;
use bp2bst::diagnostics::Diagnostic;
use bp2bst::parser::Parser;
use std::path::Path;

pub fn run(path: &Path) -> Result<(), CliError> {
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    let file_name = path.display().to_string();

    match Parser::parse_file(&source, &file_name) {
        Ok(file) => {
            let json = serde_json::to_string_pretty(&file).expect("AST is always serializable");
            println!("{json}");
            Ok(())
        }
        Err(err) => {
            let diagnostic = Diagnostic::from_parse_error(&err, &source);
            eprint!("{} {}", red("✗"), diagnostic.render());
            Err(CliError::AlreadyReported)
        }
    }
}
