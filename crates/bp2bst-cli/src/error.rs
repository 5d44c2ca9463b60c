//! CLI-surface errors, kept separate from the library's `BpError` — the
//! teacher keeps compiler errors and its own CLI-level error chain distinct,
//! and this crate follows the same split.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("no such file or directory: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Conversion(#[from] bp2bst::BpError),
    #[error("no elements were generated from {0}")]
    NoElements(PathBuf),
    /// A failure whose diagnostic was already rendered to stderr by the
    /// caller (see `parse::run`/`info::run`); carries no message of its own
    /// so `main` doesn't print the same failure twice.
    #[error("")]
    AlreadyReported,
}
