//! Line-style checking for source trees.
//!
//! Scans files for mixed line endings, trailing whitespace, blank first
//! lines and incorrect trailing-newline counts. Violations are recorded and
//! reported without stopping the scan; the CLI maps a non-empty report to a
//! non-zero exit code, which makes this the one tool meant for CI.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{QmError, Result};
use crate::manifest::is_excluded;

/// Glob patterns always excluded from the scan: binary asset formats and
/// generated subtrees. Manifest excludes are added on top.
pub const BUILTIN_EXCLUDES: &[&str] = &[
    "*.png",
    "*.jpg",
    "*.gif",
    "*.nbt",
    "*.dfpwm",
    "*.gz",
    "*.zip",
    "*.jar",
    "*.lock",
    "*.woff",
    "*.woff2",
    "**/generated/*",
    "**/target/*",
    "**/.git/*",
];

/// A single style rule a file can violate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// A line contains a carriage return (mixed line endings).
    CarriageReturn,
    /// A line has a space or tab before its terminator.
    TrailingWhitespace,
    /// The first line of the file is blank.
    BlankFirstLine,
    /// The file does not end with exactly one newline; holds the observed
    /// count of consecutive trailing newlines.
    TrailingNewlines(usize),
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::CarriageReturn => write!(f, "contains a carriage return (mixed line endings)"),
            Rule::TrailingWhitespace => write!(f, "trailing whitespace"),
            Rule::BlankFirstLine => write!(f, "first line is blank"),
            Rule::TrailingNewlines(n) => {
                write!(f, "ends with {} trailing newlines, expected exactly 1", n)
            }
        }
    }
}

/// A recorded violation. `line` is 1-based and absent for whole-file rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub line: Option<usize>,
    pub rule: Rule,
}

/// All violations found in one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub violations: Vec<Violation>,
}

/// Result of scanning a tree.
#[derive(Debug, Default)]
pub struct LintReport {
    /// Number of files scanned (after exclusions).
    pub scanned: usize,
    /// Files with at least one violation.
    pub files: Vec<FileReport>,
}

impl LintReport {
    /// True when no file violated any rule.
    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }

    /// Total violation count across all files.
    pub fn total(&self) -> usize {
        self.files.iter().map(|f| f.violations.len()).sum()
    }
}

/// Check one file's content against every rule.
///
/// Each rule reports at most once per file: the first offending line for the
/// per-line rules, plus the whole-file first-line and trailing-newline rules.
pub fn check_bytes(content: &[u8]) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut lines: Vec<&[u8]> = content.split(|&b| b == b'\n').collect();
    // The element after the final newline is not a line unless the file
    // fails to end with a newline.
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    if lines.first().is_some_and(|l| l.is_empty()) {
        violations.push(Violation {
            line: Some(1),
            rule: Rule::BlankFirstLine,
        });
    }

    if let Some(idx) = lines.iter().position(|l| l.contains(&b'\r')) {
        violations.push(Violation {
            line: Some(idx + 1),
            rule: Rule::CarriageReturn,
        });
    }

    if let Some(idx) = lines.iter().position(|l| has_trailing_whitespace(l)) {
        violations.push(Violation {
            line: Some(idx + 1),
            rule: Rule::TrailingWhitespace,
        });
    }

    let trailing = content.iter().rev().take_while(|&&b| b == b'\n').count();
    if trailing != 1 {
        violations.push(Violation {
            line: None,
            rule: Rule::TrailingNewlines(trailing),
        });
    }

    violations
}

/// True when the line ends in a space or tab, looking through a CR
/// terminator so CRLF files are judged on the byte before the `\r`.
fn has_trailing_whitespace(line: &[u8]) -> bool {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    matches!(line.last(), Some(b' ') | Some(b'\t'))
}

/// Check a single file on disk.
pub fn check_file(path: &Path) -> Result<Vec<Violation>> {
    let content = fs::read(path).map_err(|e| QmError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })?;

    Ok(check_bytes(&content))
}

/// Scan every file under `root`, honouring the built-in and extra excludes.
///
/// Directories, extension-less files and excluded paths are skipped. The
/// walk order is sorted so reports are deterministic.
pub fn lint_tree(root: &Path, extra_excludes: &[String]) -> Result<LintReport> {
    let mut patterns: Vec<&str> = BUILTIN_EXCLUDES.to_vec();
    patterns.extend(extra_excludes.iter().map(String::as_str));

    let mut report = LintReport::default();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if path.is_dir() {
            continue;
        }

        if path.extension().is_none() {
            continue;
        }

        if is_excluded(path, &patterns) {
            continue;
        }

        report.scanned += 1;

        let violations = check_file(path)?;
        if !violations.is_empty() {
            report.files.push(FileReport {
                path: path.to_path_buf(),
                violations,
            });
        }
    }

    Ok(report)
}
