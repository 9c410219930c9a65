//! Structure command implementation.
//!
//! Converts one structure file in place to the flattened palette schema.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::structure::convert_file;

/// Upgrade a structure file to the current palette schema
#[derive(Args, Debug)]
pub struct StructureArgs {
    /// Structure file to convert in place
    pub file: PathBuf,
}

pub fn run(args: StructureArgs, printer: &Printer) -> Result<()> {
    printer.status("Converting", &display_path(&args.file));

    let summary = convert_file(&args.file)?;

    printer.info(
        "Finished",
        &format!(
            "{} with {}",
            plural(summary.palette_len, "palette state", "palette states"),
            plural(summary.blocks, "block", "blocks")
        ),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt::{self, Compound, Document, Tag};
    use crate::structure::TARGET_DATA_VERSION;
    use tempfile::tempdir;

    #[test]
    fn converts_file_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("printer.nbt");

        let mut state = Compound::new();
        state.insert("Name", Tag::String("minecraft:dirt".to_string()));
        let mut block = Compound::new();
        block.insert(
            "pos",
            Tag::List(vec![Tag::Int(0), Tag::Int(0), Tag::Int(0)]),
        );
        block.insert("state", Tag::Int(0));

        let mut root = Compound::new();
        root.insert("palette", Tag::List(vec![Tag::Compound(state)]));
        root.insert("blocks", Tag::List(vec![Tag::Compound(block)]));
        nbt::write_file(
            &path,
            &Document {
                root_name: String::new(),
                root,
                compressed: true,
            },
        )
        .unwrap();

        let args = StructureArgs { file: path.clone() };
        run(args, &Printer::new()).unwrap();

        let doc = nbt::read_file(&path).unwrap();
        assert_eq!(
            doc.root.get("DataVersion"),
            Some(&Tag::Int(TARGET_DATA_VERSION))
        );
    }

    #[test]
    fn missing_file_propagates() {
        let dir = tempdir().unwrap();
        let args = StructureArgs {
            file: dir.path().join("absent.nbt"),
        };
        assert!(run(args, &Printer::new()).is_err());
    }
}
