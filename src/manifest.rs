//! Project manifest (qm.yaml) parsing.
//!
//! The manifest pins down every path the tools touch: the lint root and its
//! exclusion patterns, the locale directory and reference file, the
//! screenshot directories and the gallery output. All of it is optional; a
//! missing manifest means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QmError, Result};

/// Manifest filename looked up in the working directory.
pub const MANIFEST_FILENAME: &str = "qm.yaml";

/// Project manifest loaded from qm.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Line-style checker settings.
    pub lint: LintConfig,

    /// Locale normalizer settings.
    pub locale: LocaleConfig,

    /// Directories scanned for generated screenshots.
    #[serde(default = "default_screenshots")]
    pub screenshots: Vec<PathBuf>,

    /// Output path for the generated gallery page.
    #[serde(default = "default_gallery")]
    pub gallery: PathBuf,
}

/// Settings for `qm lint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Root directory to scan.
    pub root: PathBuf,

    /// Extra glob patterns to exclude, on top of the built-in set.
    pub excludes: Vec<String>,
}

/// Settings for `qm locale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Directory holding the locale JSON files.
    pub dir: PathBuf,

    /// Filename of the reference language file within `dir`.
    pub reference: String,
}

fn default_screenshots() -> Vec<PathBuf> {
    vec![
        PathBuf::from("build/screenshots"),
        PathBuf::from("test-files/screenshots"),
    ]
}

fn default_gallery() -> PathBuf {
    PathBuf::from("gallery.html")
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            lint: LintConfig::default(),
            locale: LocaleConfig::default(),
            screenshots: default_screenshots(),
            gallery: default_gallery(),
        }
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            excludes: vec![],
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("lang"),
            reference: "en_us.json".to_string(),
        }
    }
}

impl Manifest {
    /// Load the manifest from `dir`, falling back to defaults when the file
    /// does not exist.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILENAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load manifest from a qm.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| QmError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| QmError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check qm.yaml syntax".to_string()),
        })
    }
}

/// Check whether a path matches any of the given exclude patterns.
pub fn is_excluded(path: &Path, patterns: &[&str]) -> bool {
    let path_str = path.to_string_lossy();
    patterns.iter().any(|p| matches_pattern(&path_str, p))
}

/// Simple glob pattern matching: `*.ext` suffixes, `dir/*` prefixes and
/// `**/dir/*` anywhere-in-path forms.
pub fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("**/") {
        if let Some(dir) = suffix.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", dir))
                || path.contains(&format!("/{}/", dir));
        }
        return path.ends_with(suffix) || path.contains(suffix);
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(prefix) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", prefix))
            || path.contains(&format!("/{}/", prefix));
    }

    path == pattern || path.ends_with(&format!("/{}", pattern))
}
