//! Structure document writer.
//!
//! Encodes the in-memory tree back to bytes and writes it in one shot,
//! re-applying gzip framing when the source had it. A crash mid-write can
//! truncate the file; callers only write after the full tree is built.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{QmError, Result};

use super::{Compound, Document, Tag, TAG_COMPOUND, TAG_END};

/// Write a document to disk, gzip-framed if the source was.
pub fn write_file(path: &Path, doc: &Document) -> Result<()> {
    let payload = encode(doc)?;

    let bytes = if doc.compressed {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&payload)?;
        encoder.finish()?
    } else {
        payload
    };

    fs::write(path, bytes).map_err(|e| QmError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write structure file: {}", e),
    })?;

    Ok(())
}

/// Encode a document to its uncompressed byte form.
pub fn encode(doc: &Document) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.push(TAG_COMPOUND);
    write_string(&mut buf, &doc.root_name)?;
    write_compound(&mut buf, &doc.root)?;
    Ok(buf)
}

fn write_string(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    let len = s.len();
    if len > i16::MAX as usize {
        return Err(QmError::Convert {
            message: format!("String too long to encode ({} bytes)", len),
            help: None,
        });
    }
    buf.extend_from_slice(&(len as i16).to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

fn write_length(buf: &mut Vec<u8>, len: usize) -> Result<()> {
    if len > i32::MAX as usize {
        return Err(QmError::Convert {
            message: format!("Collection too long to encode ({} entries)", len),
            help: None,
        });
    }
    buf.extend_from_slice(&(len as i32).to_be_bytes());
    Ok(())
}

fn write_compound(buf: &mut Vec<u8>, compound: &Compound) -> Result<()> {
    for (name, tag) in compound.iter() {
        buf.push(tag.type_id());
        write_string(buf, name)?;
        write_payload(buf, tag)?;
    }
    buf.push(TAG_END);
    Ok(())
}

fn write_payload(buf: &mut Vec<u8>, tag: &Tag) -> Result<()> {
    match tag {
        Tag::Byte(v) => buf.push(*v as u8),
        Tag::Short(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Tag::Int(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Tag::Long(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Tag::Float(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Tag::Double(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Tag::ByteArray(items) => {
            write_length(buf, items.len())?;
            buf.extend(items.iter().map(|&b| b as u8));
        }
        Tag::String(s) => write_string(buf, s)?,
        Tag::List(items) => {
            let elem_id = items.first().map_or(TAG_END, Tag::type_id);
            if let Some(odd) = items.iter().find(|t| t.type_id() != elem_id) {
                return Err(QmError::Convert {
                    message: format!(
                        "List has mixed element types ({} and {})",
                        elem_id,
                        odd.type_id()
                    ),
                    help: None,
                });
            }
            buf.push(elem_id);
            write_length(buf, items.len())?;
            for item in items {
                write_payload(buf, item)?;
            }
        }
        Tag::Compound(c) => write_compound(buf, c)?,
        Tag::IntArray(items) => {
            write_length(buf, items.len())?;
            for v in items {
                buf.extend_from_slice(&v.to_be_bytes());
            }
        }
        Tag::LongArray(items) => {
            write_length(buf, items.len())?;
            for v in items {
                buf.extend_from_slice(&v.to_be_bytes());
            }
        }
    }
    Ok(())
}
