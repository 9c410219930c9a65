//! qm - Maintenance toolkit for a game-content project
//!
//! Five standalone tools behind one binary: a source-style linter, a texture
//! atlas splitter, a localization normalizer, a structure-file converter and
//! a screenshot-gallery generator. Each is a single linear pass over its
//! inputs; none share state or run concurrently.

pub mod atlas;
pub mod cli;
pub mod error;
pub mod gallery;
pub mod lint;
pub mod locale;
pub mod manifest;
pub mod nbt;
pub mod output;
pub mod prompt;
pub mod structure;

pub use atlas::{split_atlas, AtlasLayout, Fragment, Paste, Rect, Transform};
pub use error::{QmError, Result};
pub use gallery::{collect_screenshots, derive_label, render_gallery, Screenshot};
pub use lint::{check_bytes, lint_tree, Rule, Violation};
pub use locale::{reconcile, write_canonical, ReconcileReport};
pub use manifest::{Manifest, MANIFEST_FILENAME};
pub use nbt::{Compound, Document, Tag};
pub use output::{display_path, plural, Printer};
pub use structure::{upgrade_document, UpgradeSummary, TARGET_DATA_VERSION};
