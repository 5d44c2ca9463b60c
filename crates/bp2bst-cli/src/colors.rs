//! ANSI color helpers. The core library never prints anything — the CLI is
//! the only place in the crate that writes to the terminal.

pub fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
pub fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
pub fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
pub fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
pub fn gray(s: &str) -> String {
    format!("\x1b[90m{s}\x1b[0m")
}
pub fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

pub fn status_label(label: &str) -> String {
    format!("\x1b[1;32m{label:>12}\x1b[0m")
}
