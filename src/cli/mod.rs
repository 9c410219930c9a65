pub mod atlas;
pub mod completions;
pub mod gallery;
pub mod lint;
pub mod locale;
pub mod structure;

use clap::{Parser, Subcommand};

/// qm - Game-content maintenance toolkit
#[derive(Parser, Debug)]
#[command(name = "qm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check source files for line-ending and whitespace style violations
    Lint(lint::LintArgs),

    /// Split fixed-layout texture atlases into individual images
    Atlas(atlas::AtlasArgs),

    /// Normalize locale files against the reference language file
    Locale(locale::LocaleArgs),

    /// Upgrade a structure file to the current palette schema
    Structure(structure::StructureArgs),

    /// Build a static HTML gallery from generated screenshots
    Gallery(gallery::GalleryArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
