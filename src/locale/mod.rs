//! Locale file normalization.
//!
//! Reconciles translation files against the reference language file: output
//! keys are exactly the reference keys present and non-empty in the target,
//! in the reference's order. Files are rewritten in canonical form (4-space
//! indent, literal non-ASCII, trailing newline), so a clean file round-trips
//! byte-identically.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{QmError, Result};

/// Outcome of reconciling one target file against the reference.
#[derive(Debug)]
pub struct ReconcileReport {
    /// Number of keys in the reference.
    pub reference_total: usize,
    /// Keys copied to the output.
    pub kept: usize,
    /// Reference keys absent from the target.
    pub missing: Vec<String>,
    /// Reference keys present in the target with an empty string value.
    pub empty: Vec<String>,
}

impl ReconcileReport {
    /// Completion as a percentage of the reference key set.
    pub fn completion(&self) -> f64 {
        if self.reference_total == 0 {
            return 100.0;
        }
        self.kept as f64 * 100.0 / self.reference_total as f64
    }
}

/// Build the normalized mapping for one target file.
///
/// Keys are emitted in reference iteration order; keys missing from the
/// target or carrying an empty string value are omitted and recorded in the
/// report. Values are copied verbatim.
pub fn reconcile(
    reference: &Map<String, Value>,
    target: &Map<String, Value>,
) -> (Map<String, Value>, ReconcileReport) {
    let mut output = Map::new();
    let mut missing = Vec::new();
    let mut empty = Vec::new();

    for (key, _) in reference {
        match target.get(key) {
            None => missing.push(key.clone()),
            Some(Value::String(s)) if s.is_empty() => empty.push(key.clone()),
            Some(value) => {
                output.insert(key.clone(), value.clone());
            }
        }
    }

    let report = ReconcileReport {
        reference_total: reference.len(),
        kept: output.len(),
        missing,
        empty,
    };

    (output, report)
}

/// Load a JSON file that must hold a single object.
pub fn load_object(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path).map_err(|e| QmError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read locale file: {}", e),
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| QmError::Parse {
        message: format!("Invalid JSON in {}: {}", path.display(), e),
        help: None,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(QmError::Parse {
            message: format!(
                "Expected a JSON object in {}, found {}",
                path.display(),
                json_kind(&other)
            ),
            help: Some("Locale files map translation keys to strings".to_string()),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Write a mapping in canonical form: 4-space indent, non-ASCII characters
/// kept literal, newline-terminated.
pub fn write_canonical(path: &Path, map: &Map<String, Value>) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);

    map.serialize(&mut ser).map_err(|e| QmError::Parse {
        message: format!("Failed to serialize {}: {}", path.display(), e),
        help: None,
    })?;
    buf.push(b'\n');

    fs::write(path, buf).map_err(|e| QmError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write locale file: {}", e),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn object(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn output_is_reference_ordered_subsequence() {
        let reference = object(&[("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")]);
        // Target deliberately out of order, with one extra key.
        let target = object(&[("d", "vier"), ("zz", "extra"), ("b", "zwei")]);

        let (output, report) = reconcile(&reference, &target);

        let keys: Vec<&String> = output.keys().collect();
        assert_eq!(keys, vec!["b", "d"]);
        assert_eq!(report.missing, vec!["a", "c"]);
        assert!(report.empty.is_empty());
        assert_eq!(report.kept, 2);
    }

    #[test]
    fn missing_and_empty_accounting() {
        // Reference order a, b, c; target has b and an empty c.
        let reference = object(&[("a", ""), ("b", ""), ("c", "")]);
        let target = object(&[("b", "B"), ("c", "")]);

        let (output, report) = reconcile(&reference, &target);

        assert_eq!(output.len(), 1);
        assert_eq!(output.get("b"), Some(&Value::String("B".to_string())));
        assert_eq!(report.missing, vec!["a"]);
        assert_eq!(report.empty, vec!["c"]);
        // |R| == kept + missing + empty
        assert_eq!(
            report.reference_total,
            report.kept + report.missing.len() + report.empty.len()
        );
    }

    #[test]
    fn completion_percentage() {
        let reference = object(&[("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")]);
        let target = object(&[("a", "x"), ("b", "y"), ("c", "z")]);

        let (_, report) = reconcile(&reference, &target);
        assert_eq!(report.completion(), 75.0);

        let empty_ref = Map::new();
        let (_, report) = reconcile(&empty_ref, &target);
        assert_eq!(report.completion(), 100.0);
    }

    #[test]
    fn non_string_values_are_copied_verbatim() {
        let mut reference = Map::new();
        reference.insert("count".to_string(), Value::String("n".to_string()));
        let mut target = Map::new();
        target.insert("count".to_string(), Value::from(3));

        let (output, report) = reconcile(&reference, &target);
        assert_eq!(output.get("count"), Some(&Value::from(3)));
        assert_eq!(report.kept, 1);
    }

    #[test]
    fn canonical_formatting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("de_de.json");

        let map = object(&[("gui.title", "Übersicht"), ("gui.close", "Schließen")]);
        write_canonical(&path, &map).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n    \"gui.title\": \"Übersicht\",\n    \"gui.close\": \"Schließen\"\n}\n"
        );
    }

    #[test]
    fn empty_object_still_newline_terminated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");

        write_canonical(&path, &Map::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn normalization_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fr_fr.json");

        let reference = object(&[("a", "A"), ("b", "B"), ("c", "C")]);
        let target = object(&[("c", "trois"), ("a", "un")]);

        let (output, _) = reconcile(&reference, &target);
        write_canonical(&path, &output).unwrap();
        let first = fs::read(&path).unwrap();

        // Re-run on the freshly written output.
        let reread = load_object(&path).unwrap();
        let (output, report) = reconcile(&reference, &reread);
        write_canonical(&path, &output).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(report.kept, 2);
    }

    #[test]
    fn load_object_rejects_non_objects() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.json");
        fs::write(&path, "[1, 2, 3]\n").unwrap();

        assert!(load_object(&path).is_err());
    }
}
