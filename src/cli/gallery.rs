//! Gallery command implementation.
//!
//! Collects screenshots from the configured directories, writes the static
//! gallery page and optionally opens it in the default viewer.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::{QmError, Result};
use crate::gallery::{collect_screenshots, write_gallery};
use crate::manifest::Manifest;
use crate::output::{display_path, plural, Printer};

/// Build a static HTML gallery from generated screenshots
#[derive(Args, Debug)]
pub struct GalleryArgs {
    /// Screenshot directories to scan (default: from qm.yaml)
    pub dirs: Vec<PathBuf>,

    /// Output path for the gallery page
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Open the generated page in the default viewer
    #[arg(long)]
    pub open: bool,
}

pub fn run(args: GalleryArgs, printer: &Printer) -> Result<()> {
    let manifest = Manifest::discover(Path::new("."))?;

    let dirs = if args.dirs.is_empty() {
        manifest.screenshots
    } else {
        args.dirs
    };
    let output = args.output.unwrap_or(manifest.gallery);

    let shots = collect_screenshots(&dirs)?;
    write_gallery(&output, &shots)?;

    printer.info(
        "Generated",
        &format!(
            "{} with {}",
            display_path(&output),
            plural(shots.len(), "screenshot", "screenshots")
        ),
    );

    if args.open {
        printer.status("Opening", &display_path(&output));
        open::that(&output).map_err(|e| QmError::Io {
            path: output.clone(),
            message: format!("Failed to open viewer: {}", e),
        })?;
    }

    Ok(())
}
