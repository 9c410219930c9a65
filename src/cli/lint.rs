//! Lint command implementation.
//!
//! Scans the source tree and reports every style violation; the binary maps
//! a dirty report to exit code 1 so this can gate CI.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::Result;
use crate::lint::lint_tree;
use crate::manifest::Manifest;
use crate::output::{display_path, plural, Printer};

/// Check source files for line-ending and whitespace style violations
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Root directory to scan (default: from qm.yaml, else ".")
    pub root: Option<PathBuf>,

    /// Extra glob patterns to exclude
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub excludes: Vec<String>,
}

/// Returns true when the tree is clean; the caller maps false to exit 1.
pub fn run(args: LintArgs, printer: &Printer) -> Result<bool> {
    let manifest = Manifest::discover(Path::new("."))?;

    let root = args.root.unwrap_or(manifest.lint.root);
    let mut excludes = manifest.lint.excludes;
    excludes.extend(args.excludes);

    printer.status("Checking", &display_path(&root));
    let report = lint_tree(&root, &excludes)?;

    for file in &report.files {
        for violation in &file.violations {
            let location = match violation.line {
                Some(line) => format!("{}:{}", display_path(&file.path), line),
                None => display_path(&file.path),
            };
            printer.warning("Style", &format!("{}: {}", location, violation.rule));
        }
    }

    if report.is_clean() {
        printer.info(
            "Finished",
            &format!(
                "{}, no style violations",
                plural(report.scanned, "file", "files")
            ),
        );
        Ok(true)
    } else {
        printer.error(
            "Failed",
            &format!(
                "{} in {}",
                plural(report.total(), "violation", "violations"),
                plural(report.files.len(), "file", "files")
            ),
        );
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn clean_tree_returns_true() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("ok.txt"), "fine\n").unwrap();

        let args = LintArgs {
            root: Some(dir.path().to_path_buf()),
            excludes: vec![],
        };
        assert!(run(args, &Printer::new()).unwrap());
    }

    #[test]
    fn violating_tree_returns_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.txt"), "oops \n\n").unwrap();

        let args = LintArgs {
            root: Some(dir.path().to_path_buf()),
            excludes: vec![],
        };
        assert!(!run(args, &Printer::new()).unwrap());
    }

    #[test]
    fn cli_excludes_suppress_violations() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.gen"), "oops \n\n").unwrap();

        let args = LintArgs {
            root: Some(dir.path().to_path_buf()),
            excludes: vec!["*.gen".to_string()],
        };
        assert!(run(args, &Printer::new()).unwrap());
    }
}
