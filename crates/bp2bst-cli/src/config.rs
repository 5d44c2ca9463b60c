//! `bp2bst.toml` configuration — the batch-conversion equivalent of the
//! teacher's `lumen.toml` project manifest, loaded with the `toml` crate.
//!
//! Precedence (lowest to highest): built-in defaults < config file < CLI
//! flags. The CLI layer applies that last step; this module only produces
//! the config-file layer.

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BpConfig {
    #[serde(default, rename = "convert")]
    pub convert: ConvertConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConvertConfig {
    #[serde(rename = "target-arch")]
    pub target_arch: Option<String>,
    #[serde(rename = "output-dir")]
    pub output_dir: Option<String>,
    #[serde(rename = "aosp-root")]
    pub aosp_root: Option<String>,
    pub prefix: Option<String>,
}

impl BpConfig {
    /// Loads `bp2bst.toml` from `dir` if present; a missing file yields the
    /// all-defaults config rather than an error — the manifest is optional.
    pub fn load_from_dir(dir: &Path) -> Self {
        let path = dir.join("bp2bst.toml");
        match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }
}
