//! Structure document reader.
//!
//! Parses a gzip-framed or raw binary document into the in-memory tree.
//! Any malformed input aborts the parse with a diagnostic; there is no
//! resynchronization.

use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{QmError, Result};

use super::{
    Compound, Document, Tag, TAG_BYTE, TAG_BYTE_ARRAY, TAG_COMPOUND, TAG_DOUBLE, TAG_END,
    TAG_FLOAT, TAG_INT, TAG_INT_ARRAY, TAG_LIST, TAG_LONG, TAG_LONG_ARRAY, TAG_SHORT, TAG_STRING,
};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read and parse a structure file, transparently un-gzipping it.
pub fn read_file(path: &Path) -> Result<Document> {
    let raw = fs::read(path).map_err(|e| QmError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read structure file: {}", e),
    })?;

    let compressed = raw.starts_with(&GZIP_MAGIC);
    let data = if compressed {
        let mut decoder = GzDecoder::new(raw.as_slice());
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).map_err(|e| QmError::Parse {
            message: format!("Failed to decompress {}: {}", path.display(), e),
            help: None,
        })?;
        out
    } else {
        raw
    };

    let (root_name, root) = parse(&data)?;
    Ok(Document {
        root_name,
        root,
        compressed,
    })
}

/// Parse an uncompressed document: a named compound root.
pub fn parse(data: &[u8]) -> Result<(String, Compound)> {
    let mut reader = Reader { data, pos: 0 };

    let id = reader.u8()?;
    if id != TAG_COMPOUND {
        return Err(QmError::Parse {
            message: format!("Expected a compound root, found tag id {}", id),
            help: Some("Structure files start with a named compound".to_string()),
        });
    }

    let root_name = reader.string()?;
    let root = reader.compound()?;
    Ok((root_name, root))
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.data.len());
        match end {
            Some(end) => {
                let slice = &self.data[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(QmError::Parse {
                message: format!("Unexpected end of data at offset {}", self.pos),
                help: None,
            }),
        }
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    fn i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.take(2)?.try_into().unwrap()))
    }

    fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn f32(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn string(&mut self) -> Result<String> {
        let len = self.i16()?;
        if len < 0 {
            return Err(QmError::Parse {
                message: format!("Negative string length at offset {}", self.pos),
                help: None,
            });
        }
        let bytes = self.take(len as usize)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| QmError::Parse {
            message: format!("Invalid UTF-8 in string at offset {}", self.pos),
            help: None,
        })
    }

    fn length(&mut self) -> Result<usize> {
        let len = self.i32()?;
        if len < 0 {
            return Err(QmError::Parse {
                message: format!("Negative length at offset {}", self.pos),
                help: None,
            });
        }
        Ok(len as usize)
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::new();
        loop {
            let id = self.u8()?;
            if id == TAG_END {
                return Ok(compound);
            }
            let name = self.string()?;
            let tag = self.payload(id)?;
            compound.insert(name, tag);
        }
    }

    fn payload(&mut self, id: u8) -> Result<Tag> {
        match id {
            TAG_BYTE => Ok(Tag::Byte(self.i8()?)),
            TAG_SHORT => Ok(Tag::Short(self.i16()?)),
            TAG_INT => Ok(Tag::Int(self.i32()?)),
            TAG_LONG => Ok(Tag::Long(self.i64()?)),
            TAG_FLOAT => Ok(Tag::Float(self.f32()?)),
            TAG_DOUBLE => Ok(Tag::Double(self.f64()?)),
            TAG_BYTE_ARRAY => {
                let len = self.length()?;
                let bytes = self.take(len)?;
                Ok(Tag::ByteArray(bytes.iter().map(|&b| b as i8).collect()))
            }
            TAG_STRING => Ok(Tag::String(self.string()?)),
            TAG_LIST => {
                let elem_id = self.u8()?;
                let len = self.length()?;
                if elem_id == TAG_END && len > 0 {
                    return Err(QmError::Parse {
                        message: "Non-empty list with end-tag element type".to_string(),
                        help: None,
                    });
                }
                let mut items = Vec::with_capacity(len.min(1 << 16));
                for _ in 0..len {
                    items.push(self.payload(elem_id)?);
                }
                Ok(Tag::List(items))
            }
            TAG_COMPOUND => Ok(Tag::Compound(self.compound()?)),
            TAG_INT_ARRAY => {
                let len = self.length()?;
                let mut items = Vec::with_capacity(len.min(1 << 16));
                for _ in 0..len {
                    items.push(self.i32()?);
                }
                Ok(Tag::IntArray(items))
            }
            TAG_LONG_ARRAY => {
                let len = self.length()?;
                let mut items = Vec::with_capacity(len.min(1 << 16));
                for _ in 0..len {
                    items.push(self.i64()?);
                }
                Ok(Tag::LongArray(items))
            }
            other => Err(QmError::Parse {
                message: format!("Unknown tag id {} at offset {}", other, self.pos),
                help: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_compound_root() {
        // TAG_INT root
        let data = [TAG_INT, 0, 0, 0, 0, 0, 42];
        assert!(parse(&data).is_err());
    }

    #[test]
    fn rejects_truncated_document() {
        // Compound root with a declared string entry, cut short.
        let data = [TAG_COMPOUND, 0, 0, TAG_STRING, 0, 4, b'n', b'a'];
        assert!(parse(&data).is_err());
    }

    #[test]
    fn rejects_unknown_tag_id() {
        let data = [TAG_COMPOUND, 0, 0, 99, 0, 1, b'x'];
        assert!(parse(&data).is_err());
    }

    #[test]
    fn parses_minimal_document() {
        // Root compound "" { answer: Int(42) }
        let data = [
            TAG_COMPOUND,
            0,
            0, // root name ""
            TAG_INT,
            0,
            6,
            b'a',
            b'n',
            b's',
            b'w',
            b'e',
            b'r',
            0,
            0,
            0,
            42,
            TAG_END,
        ];

        let (name, root) = parse(&data).unwrap();
        assert_eq!(name, "");
        assert_eq!(root.get("answer"), Some(&Tag::Int(42)));
    }

    #[test]
    fn rejects_nonempty_list_of_end_tags() {
        let data = [
            TAG_COMPOUND,
            0,
            0,
            TAG_LIST,
            0,
            1,
            b'l',
            TAG_END, // element type
            0,
            0,
            0,
            3, // length 3
            TAG_END,
        ];
        assert!(parse(&data).is_err());
    }

    #[test]
    fn empty_list_parses() {
        let data = [
            TAG_COMPOUND,
            0,
            0,
            TAG_LIST,
            0,
            1,
            b'l',
            TAG_END,
            0,
            0,
            0,
            0,
            TAG_END,
        ];

        let (_, root) = parse(&data).unwrap();
        assert_eq!(root.get("l"), Some(&Tag::List(vec![])));
    }
}
