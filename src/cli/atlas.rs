//! Atlas command implementation.
//!
//! Splits each given composite image into its declared fragments, then
//! offers one prompt to delete the now-redundant sources. Anything other
//! than an affirmative answer keeps them.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::atlas::{split_atlas, LAYOUT};
use crate::error::{QmError, Result};
use crate::output::{display_path, plural, Printer};
use crate::prompt;

/// Split fixed-layout texture atlases into individual images
#[derive(Args, Debug)]
pub struct AtlasArgs {
    /// Atlas images to split; the filename stem names the family
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub fn run(args: AtlasArgs, printer: &Printer) -> Result<()> {
    LAYOUT.validate()?;

    let jobs = resolve_families(&args.files)?;
    let produced = split_files(&jobs, printer)?;

    printer.info(
        "Finished",
        &format!(
            "{} from {}",
            plural(produced, "fragment", "fragments"),
            plural(jobs.len(), "atlas", "atlases")
        ),
    );

    printer.info("Sources", "the original composite files were transformed:");
    for (file, _) in &jobs {
        printer.detail(&display_path(file));
    }

    if prompt::confirm(&format!(
        "Delete {}?",
        plural(jobs.len(), "source file", "source files")
    ))? {
        for (file, _) in &jobs {
            fs::remove_file(file).map_err(|e| QmError::Io {
                path: file.clone(),
                message: format!("Failed to delete source: {}", e),
            })?;
        }
        printer.status("Deleted", &plural(jobs.len(), "source file", "source files"));
    } else {
        printer.info("Kept", "source files left in place");
    }

    Ok(())
}

/// Map each input file to its declared family.
///
/// Resolved up front so an unknown input fails before any output is
/// written.
fn resolve_families(files: &[PathBuf]) -> Result<Vec<(PathBuf, String)>> {
    let mut jobs = Vec::with_capacity(files.len());

    for file in files {
        let family = file
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| QmError::Layout {
                message: format!("Cannot derive a family name from {}", file.display()),
                help: None,
            })?;

        if !LAYOUT.is_family(&family) {
            return Err(QmError::Layout {
                message: format!("Unknown atlas family '{}' ({})", family, file.display()),
                help: Some(format!("Known families: {}", LAYOUT.families.join(", "))),
            });
        }

        jobs.push((file.clone(), family));
    }

    Ok(jobs)
}

/// Split every atlas and write its fragments beside it. Returns the number
/// of fragments written.
fn split_files(jobs: &[(PathBuf, String)], printer: &Printer) -> Result<usize> {
    let mut produced = 0;

    for (file, family) in jobs {
        printer.status("Splitting", &display_path(file));

        let img = image::open(file)
            .map_err(|e| QmError::Io {
                path: file.clone(),
                message: format!("Failed to load atlas image: {}", e),
            })?
            .to_rgba8();

        let dir = file.parent().unwrap_or(Path::new("."));
        for (name, fragment) in split_atlas(&img, family)? {
            let out_path = dir.join(format!("{}.png", name));
            fragment.save(&out_path).map_err(|e| QmError::Io {
                path: out_path.clone(),
                message: format!("Failed to write fragment: {}", e),
            })?;
            printer.detail(&display_path(&out_path));
            produced += 1;
        }
    }

    Ok(produced)
}
