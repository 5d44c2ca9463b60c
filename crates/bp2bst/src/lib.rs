//! bp2bst — translates Android Blueprint (`Android.bp`) module descriptions
//! into BuildStream (`.bst`) element descriptors.
//!
//! The pipeline is: bytes -> tokens -> AST ([`ast::File`]) -> evaluated AST
//! -> resolved AST (per module, via [`defaults::DefaultsRegistry`]) ->
//! element descriptors ([`element::Element`]) -> YAML text, alongside a
//! [`ConversionResult`] diagnostics record. See `SPEC_FULL.md` for the full
//! design.

pub mod ast;
pub mod defaults;
pub mod diagnostics;
pub mod dispatch;
pub mod element;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod tokens;

use ast::Module;
use dispatch::Outcome;
use element::Element;
use eval::{EvalError, Evaluator};
use parser::{ParseError, Parser};
use thiserror::Error;

/// The crate-level error aggregate. Only a file-level parse failure reaches
/// a caller as `Err`; per-module failures are folded into
/// [`ConversionResult::errors`] instead (see §7 of the spec).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BpError {
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// One emitted `.bst` file: a name plus the element descriptor ready for
/// YAML rendering via [`element::serialize`].
#[derive(Debug, Clone, PartialEq)]
pub struct ElementFile {
    pub filename: String,
    pub content: Element,
}

/// The outcome of converting one Blueprint file.
#[derive(Debug, Clone, Default)]
pub struct ConversionResult {
    pub elements: Vec<ElementFile>,
    pub skipped: Vec<String>,
    pub unsupported: Vec<String>,
    pub errors: Vec<String>,
}

const DEFAULT_TARGET_ARCH: &str = "x86_64";

fn module_label(module: &Module) -> String {
    match module.name() {
        Some(name) => format!("{} '{}'", module.module_type, name),
        None => format!("{} <unnamed>", module.module_type),
    }
}

/// Convert a single Blueprint file's source text into a [`ConversionResult`].
///
/// `target_arch` selects the architecture overlay (defaults to `"x86_64"`
/// when empty); `source_dir`, if given, is copied verbatim into emitted
/// `sources[].path` entries.
pub fn convert(source: &str, file_name: &str, target_arch: &str, source_dir: Option<&str>) -> Result<ConversionResult, BpError> {
    let target_arch = if target_arch.is_empty() { DEFAULT_TARGET_ARCH } else { target_arch };
    let file = Parser::parse_file(source, file_name)?;

    let mut evaluator = Evaluator::new();
    evaluator.register_file(&file);

    let mut result = ConversionResult::default();
    let mut evaluated_modules: Vec<Module> = Vec::new();
    for module in file.modules() {
        match evaluator.evaluate_module(module) {
            Ok(evaluated) => evaluated_modules.push(evaluated),
            Err(EvalError::UndefinedVariable { name }) => {
                result.errors.push(format!(
                    "{}: undefined variable '{name}'",
                    module_label(module)
                ));
            }
        }
    }

    let registry = defaults::DefaultsRegistry::build(evaluated_modules.iter());

    for module in &evaluated_modules {
        let resolved = registry.resolve(module);
        match dispatch::convert_module(&resolved, target_arch, source_dir) {
            Outcome::Element { filename, element } => result.elements.push(ElementFile { filename, content: element }),
            Outcome::Skipped(label) => result.skipped.push(label),
            Outcome::Unsupported(label) => result.unsupported.push(label),
            Outcome::Error(message) => result.errors.push(message),
        }
    }

    Ok(result)
}
