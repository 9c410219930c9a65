//! Locale command implementation.
//!
//! Normalizes every locale file in the directory against the reference
//! file, rewriting each in place and reporting missing and empty keys.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::{QmError, Result};
use crate::locale::{load_object, reconcile, write_canonical};
use crate::manifest::Manifest;
use crate::output::{display_path, plural, Printer};

/// Normalize locale files against the reference language file
#[derive(Args, Debug)]
pub struct LocaleArgs {
    /// Directory holding the locale files (default: from qm.yaml)
    pub dir: Option<PathBuf>,

    /// Reference filename within the directory
    #[arg(long)]
    pub reference: Option<String>,
}

pub fn run(args: LocaleArgs, printer: &Printer) -> Result<()> {
    let manifest = Manifest::discover(Path::new("."))?;

    let dir = args.dir.unwrap_or(manifest.locale.dir);
    let reference_name = args.reference.unwrap_or(manifest.locale.reference);
    let reference_path = dir.join(&reference_name);

    printer.status("Loading", &display_path(&reference_path));
    let reference = load_object(&reference_path)?;

    let mut targets = locale_files(&dir, &reference_name)?;
    targets.sort();

    if targets.is_empty() {
        printer.info("Finished", "no locale files to normalize");
        return Ok(());
    }

    for path in &targets {
        let target = load_object(path)?;
        let (output, report) = reconcile(&reference, &target);
        write_canonical(path, &output)?;

        let name = display_path(path);
        for key in &report.empty {
            printer.warning("Warning", &format!("{}: empty value for {}", name, key));
        }
        printer.info(
            "Normalized",
            &format!(
                "{}: {} missing ({:.0}% complete)",
                name,
                report.missing.len(),
                report.completion()
            ),
        );
    }

    printer.status(
        "Finished",
        &plural(targets.len(), "locale file", "locale files"),
    );
    Ok(())
}

/// Every JSON file in the directory apart from the reference itself.
fn locale_files(dir: &Path, reference_name: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| QmError::Io {
        path: dir.to_path_buf(),
        message: format!("Failed to list locale directory: {}", e),
    })?;

    Ok(entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension().and_then(|e| e.to_str()) == Some("json")
                && p.file_name().and_then(|n| n.to_str()) != Some(reference_name)
        })
        .collect())
}
