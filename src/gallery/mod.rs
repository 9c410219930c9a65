//! Screenshot gallery generation.
//!
//! Collects generated screenshots from the configured directories and emits
//! one static HTML page with a derived breadcrumb caption per image. Image
//! paths are emitted as collected, so the page should be written at the root
//! the screenshot directories are relative to.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{QmError, Result};

/// Extensions treated as screenshots.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// One collected screenshot with its caption segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub path: PathBuf,
    pub label: Vec<String>,
}

/// Scan the given directories (non-recursively) for screenshots.
///
/// Directories that do not exist are silently skipped; entries within each
/// directory are sorted so the page is deterministic.
pub fn collect_screenshots(dirs: &[PathBuf]) -> Result<Vec<Screenshot>> {
    let mut shots = Vec::new();

    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }

        let entries = fs::read_dir(dir).map_err(|e| QmError::Io {
            path: dir.clone(),
            message: format!("Failed to list screenshots: {}", e),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_image(p))
            .collect();
        paths.sort();

        for path in paths {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            shots.push(Screenshot {
                label: derive_label(stem),
                path: path.clone(),
            });
        }
    }

    Ok(shots)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

/// Break a filename stem into human-readable caption segments.
///
/// Dot-separated segments become breadcrumb steps; within a segment,
/// underscores become spaces and the first letter is upper-cased.
pub fn derive_label(stem: &str) -> Vec<String> {
    stem.split('.').map(humanize).collect()
}

fn humanize(segment: &str) -> String {
    let spaced = segment.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Render the gallery page.
pub fn render_gallery(shots: &[Screenshot]) -> String {
    let mut body = String::new();

    for shot in shots {
        let src = escape_html(&shot.path.to_string_lossy().replace('\\', "/"));
        let caption = shot
            .label
            .iter()
            .map(|s| escape_html(s))
            .collect::<Vec<_>>()
            .join(" &rsaquo; ");

        body.push_str(&format!(
            "    <figure>\n      <img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n      <figcaption>{}</figcaption>\n    </figure>\n",
            src, caption, caption
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Screenshot gallery</title>
  <style>
    body {{ font-family: sans-serif; margin: 2rem auto; max-width: 72rem; padding: 0 1rem; background: #1c1c1c; color: #ddd; }}
    h1 {{ font-weight: normal; }}
    main {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); gap: 1rem; }}
    figure {{ margin: 0; background: #272727; border-radius: 4px; padding: 0.5rem; }}
    img {{ width: 100%; image-rendering: pixelated; border-radius: 2px; }}
    figcaption {{ padding-top: 0.5rem; font-size: 0.85rem; color: #aaa; }}
  </style>
</head>
<body>
  <h1>Screenshots ({count})</h1>
  <main>
{body}  </main>
</body>
</html>
"#,
        count = shots.len(),
        body = body
    )
}

/// Render and write the gallery to `path`.
pub fn write_gallery(path: &Path, shots: &[Screenshot]) -> Result<()> {
    fs::write(path, render_gallery(shots)).map_err(|e| QmError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write gallery: {}", e),
    })
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
