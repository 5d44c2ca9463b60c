//! bp2bst CLI — command-line interface for converting Android Blueprint
//! (`Android.bp`) files into BuildStream (`.bst`) element files.

mod colors;
mod config;
mod convert;
mod error;
mod info;
mod parse;

use clap::{Parser as ClapParser, Subcommand};
use colors::red;
use config::BpConfig;
use convert::ConvertOptions;
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(
    name = "bp2bst",
    version,
    about = "Translate Android Blueprint (Android.bp) files into BuildStream elements",
    help_template = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}

Examples:
  bp2bst convert external/bzip2              Convert every Android.bp under a tree
  bp2bst convert Android.bp --dry-run         Preview generated elements
  bp2bst parse Android.bp                     Print the parsed AST as JSON
  bp2bst info Android.bp                      List modules and defaults chains
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one `Android.bp` file, or every one found under a directory
    Convert {
        /// File or directory to convert
        path: PathBuf,
        /// Architecture overlay to apply (default: x86_64)
        #[arg(long)]
        target_arch: Option<String>,
        /// Directory to write `.bst` files into (default: ".")
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// AOSP tree root, used to make `sources[].path` relative
        #[arg(long)]
        aosp_root: Option<PathBuf>,
        /// Filename prefix for emitted `.bst` files
        #[arg(long)]
        prefix: Option<String>,
        /// Print generated elements instead of writing files
        #[arg(long)]
        dry_run: bool,
        /// Print skipped/unsupported module detail
        #[arg(short, long)]
        verbose: bool,
        /// Path to a bp2bst.toml config file (default: ./bp2bst.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Parse a single file and print its AST as JSON
    Parse {
        /// Path to the source file
        path: PathBuf,
    },
    /// Parse and evaluate a file, listing modules and defaults chains
    Info {
        /// Path to the source file
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match cli.command {
        Commands::Convert {
            path,
            target_arch,
            output_dir,
            aosp_root,
            prefix,
            dry_run,
            verbose,
            config,
        } => {
            let config_dir = config
                .as_ref()
                .and_then(|p| p.parent())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_config = BpConfig::load_from_dir(&config_dir).convert;

            let opts = ConvertOptions {
                target_arch: target_arch
                    .or(file_config.target_arch)
                    .unwrap_or_else(|| "x86_64".to_string()),
                output_dir: output_dir
                    .or(file_config.output_dir.map(PathBuf::from))
                    .unwrap_or_else(|| PathBuf::from(".")),
                aosp_root: aosp_root
                    .or(file_config.aosp_root.map(PathBuf::from))
                    .unwrap_or_else(|| PathBuf::from(".")),
                prefix: prefix.or(file_config.prefix).unwrap_or_default(),
                dry_run,
                verbose,
            };
            convert::run(&path, &opts)
        }
        Commands::Parse { path } => parse::run(&path),
        Commands::Info { path } => info::run(&path),
    };

    if let Err(err) = exit_code {
        // `parse`/`info` already render their own source-level diagnostic
        // before returning `AlreadyReported`; don't print it a second time.
        if !matches!(err, error::CliError::AlreadyReported) {
            eprintln!("{} {err}", red("error:"));
        }
        std::process::exit(1);
    }
}
