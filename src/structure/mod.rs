//! Structure-file schema conversion.
//!
//! Rewrites the block palette of a structure document into the flattened
//! string schema: each palette compound (`Name` plus optional `Properties`)
//! becomes the canonical string `name` or `name{k:v,...}` with attribute
//! pairs in their original order. The new palette has the same length and
//! ordering as the old one, so block indices are untouched; the size and
//! entity sections pass through unchanged.

use std::path::Path;

use crate::error::{QmError, Result};
use crate::nbt::{self, Compound, Document, Tag};

/// Schema version stamped on converted documents.
pub const TARGET_DATA_VERSION: i32 = 3465;

/// What a conversion touched, for reporting.
#[derive(Debug)]
pub struct UpgradeSummary {
    pub palette_len: usize,
    pub blocks: usize,
}

/// Convert a structure file in place.
///
/// The output is only written after the whole new tree is built, so a
/// conversion error leaves the file untouched.
pub fn convert_file(path: &Path) -> Result<UpgradeSummary> {
    let mut doc = nbt::read_file(path)?;
    let summary = upgrade_document(&mut doc)?;
    nbt::write_file(path, &doc)?;
    Ok(summary)
}

/// Rewrite the palette, check block indices and stamp the target version.
pub fn upgrade_document(doc: &mut Document) -> Result<UpgradeSummary> {
    let palette = expect_list(&doc.root, "palette")?;

    let mut states = Vec::with_capacity(palette.len());
    for (index, entry) in palette.iter().enumerate() {
        let entry = entry.as_compound().ok_or_else(|| QmError::Convert {
            message: format!("Palette entry {} is not a compound", index),
            help: None,
        })?;
        states.push(canonical_state(entry, index)?);
    }

    let blocks = expect_list(&doc.root, "blocks")?;
    let block_count = blocks.len();
    for (index, block) in blocks.iter().enumerate() {
        let block = block.as_compound().ok_or_else(|| QmError::Convert {
            message: format!("Block {} is not a compound", index),
            help: None,
        })?;
        let state = block
            .get("state")
            .and_then(Tag::as_int)
            .ok_or_else(|| QmError::Convert {
                message: format!("Block {} has no integer state index", index),
                help: None,
            })?;
        if state < 0 || state as usize >= states.len() {
            return Err(QmError::Convert {
                message: format!(
                    "Block {} references palette index {}, but the palette has {} states",
                    index,
                    state,
                    states.len()
                ),
                help: None,
            });
        }
    }

    doc.root.insert(
        "palette",
        Tag::List(states.iter().cloned().map(Tag::String).collect()),
    );
    doc.root.insert("DataVersion", Tag::Int(TARGET_DATA_VERSION));

    Ok(UpgradeSummary {
        palette_len: states.len(),
        blocks: block_count,
    })
}

/// Canonical string form of one palette state.
fn canonical_state(entry: &Compound, index: usize) -> Result<String> {
    let name = entry
        .get("Name")
        .and_then(Tag::as_string)
        .ok_or_else(|| QmError::Convert {
            message: format!("Palette entry {} has no Name string", index),
            help: None,
        })?;

    let props = match entry.get("Properties") {
        None => return Ok(name.to_string()),
        Some(Tag::Compound(props)) => props,
        Some(_) => {
            return Err(QmError::Convert {
                message: format!("Palette entry {} has non-compound Properties", index),
                help: None,
            })
        }
    };

    if props.is_empty() {
        return Ok(name.to_string());
    }

    let mut pairs = Vec::with_capacity(props.len());
    for (key, value) in props.iter() {
        let value = value.as_string().ok_or_else(|| QmError::Convert {
            message: format!(
                "Palette entry {} has non-string property {:?}",
                index, key
            ),
            help: None,
        })?;
        pairs.push(format!("{}:{}", key, value));
    }

    Ok(format!("{}{{{}}}", name, pairs.join(",")))
}

fn expect_list<'a>(root: &'a Compound, field: &str) -> Result<&'a [Tag]> {
    root.get(field)
        .ok_or_else(|| QmError::Convert {
            message: format!("Document has no {} list", field),
            help: None,
        })?
        .as_list()
        .ok_or_else(|| QmError::Convert {
            message: format!("Document field {} is not a list", field),
            help: None,
        })
}
