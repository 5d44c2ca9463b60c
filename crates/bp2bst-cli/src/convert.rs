//! `bp2bst convert` — walks a path for `Android.bp` files and writes the
//! resulting `.bst` element files, or prints them under `--dry-run`.

use crate::colors::{bold, gray, green, red, status_label};
use crate::error::CliError;
use bp2bst::element;
use std::path::{Path, PathBuf};

pub struct ConvertOptions {
    pub target_arch: String,
    pub output_dir: PathBuf,
    pub aosp_root: PathBuf,
    pub prefix: String,
    pub dry_run: bool,
    pub verbose: bool,
}

/// Recursively collects every `Android.bp` file under `root` (or, if `root`
/// is itself a file, just that file). Filesystem traversal is the CLI's own
/// concern — the core library never touches a filesystem.
fn discover_bp_files(root: &Path) -> Result<Vec<PathBuf>, CliError> {
    if !root.exists() {
        return Err(CliError::NotFound(root.to_path_buf()));
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|source| CliError::Read { path: dir.clone(), source })?;
        for entry in entries {
            let entry = entry.map_err(|source| CliError::Read { path: dir.clone(), source })?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.file_name().and_then(|n| n.to_str()) == Some("Android.bp") {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

pub fn run(path: &Path, opts: &ConvertOptions) -> Result<(), CliError> {
    let files = discover_bp_files(path)?;
    let mut total_elements = 0usize;

    for file in &files {
        let source = std::fs::read_to_string(file).map_err(|source| CliError::Read { path: file.clone(), source })?;
        let file_name = file.display().to_string();
        let source_dir = file
            .parent()
            .map(|p| p.strip_prefix(&opts.aosp_root).unwrap_or(p).display().to_string());

        let result = bp2bst::convert(&source, &file_name, &opts.target_arch, source_dir.as_deref())?;

        for element_file in &result.elements {
            total_elements += 1;
            let yaml = element::serialize(&element_file.content);
            let out_name = if opts.prefix.is_empty() {
                element_file.filename.clone()
            } else {
                Path::new(&opts.prefix).join(&element_file.filename).display().to_string()
            };
            if opts.dry_run {
                println!("{} {}\n{}", status_label("Would write"), bold(&out_name), yaml);
            } else {
                let out_path = opts.output_dir.join(&out_name);
                if let Some(parent) = out_path.parent() {
                    std::fs::create_dir_all(parent).map_err(|source| CliError::Write { path: parent.to_path_buf(), source })?;
                }
                std::fs::write(&out_path, yaml).map_err(|source| CliError::Write { path: out_path.clone(), source })?;
                println!("{} {}", status_label("Converted"), bold(&out_path.display().to_string()));
            }
        }

        if opts.verbose {
            for s in &result.skipped {
                println!("{} {}", gray("skipped:"), s);
            }
            for u in &result.unsupported {
                println!("{} {}", gray("unsupported:"), u);
            }
        }
        for e in &result.errors {
            eprintln!("{} {}", red("error:"), e);
        }
    }

    if total_elements == 0 {
        return Err(CliError::NoElements(path.to_path_buf()));
    }

    println!("{} {} element(s) from {} file(s)", green("✓"), total_elements, files.len());
    Ok(())
}
