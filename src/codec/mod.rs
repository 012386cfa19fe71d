//! Backup codec
//!
//! Converts between a [`Snapshot`] and its textual form, and decides whether
//! a decrypted document is acceptable to restore from.
//!
//! # Format
//!
//! Pretty-printed JSON with a fixed key order:
//!
//! ```text
//! {
//!   "formatVersion": "1.1.0",
//!   "createdAt": 1735787045,
//!   "itemCount": 2,
//!   "items": [ { "filename": ..., "content": ..., "timestamp": ... } ],
//!   "metadata": { "platform": ..., "encryptionAlgorithmId": ..., "producerTag": ... }
//! }
//! ```
//!
//! `itemCount` is advisory. The serializer always writes `items.len()`, and
//! readers use the length of `items` as ground truth.

mod candidate;
pub mod version;

pub use candidate::SnapshotCandidate;
pub use version::{compare_versions, is_newer};

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::error::{PorterError, PorterResult};
use crate::models::{CredentialBundle, Snapshot, SnapshotMetadata, ValidationResult};

/// Format version written by this codec and the newest it fully understands
pub const CURRENT_FORMAT_VERSION: &str = "1.1.0";

/// Borrowed wire form so serialization never clones item content
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireSnapshot<'a> {
    format_version: &'a str,
    created_at: i64,
    item_count: usize,
    items: &'a [CredentialBundle],
    metadata: &'a SnapshotMetadata,
}

/// Serialize a snapshot, writing `itemCount` from the actual item count
pub fn serialize(snapshot: &Snapshot) -> PorterResult<String> {
    if snapshot.item_count != snapshot.items.len() {
        tracing::debug!(
            declared = snapshot.item_count,
            actual = snapshot.items.len(),
            "Correcting itemCount during serialization"
        );
    }

    let wire = WireSnapshot {
        format_version: &snapshot.format_version,
        created_at: snapshot.created_at,
        item_count: snapshot.items.len(),
        items: &snapshot.items,
        metadata: &snapshot.metadata,
    };

    serde_json::to_string_pretty(&wire)
        .map_err(|e| PorterError::Json(format!("Failed to serialize snapshot: {}", e)))
}

/// Parse snapshot text into a candidate for validation
///
/// Fails with [`PorterError::MalformedArtifact`] when the text is not JSON or
/// its top level is not an object. Missing fields are left for
/// [`validate`] to report.
pub fn deserialize(text: &str) -> PorterResult<SnapshotCandidate> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| PorterError::MalformedArtifact(format!("not valid JSON: {}", e)))?;

    match value {
        Value::Object(document) => Ok(SnapshotCandidate::new(document)),
        other => Err(PorterError::MalformedArtifact(format!(
            "expected a JSON object, found {}",
            json_type_name(&other)
        ))),
    }
}

/// Check a candidate against the format rules
///
/// Each violated rule adds exactly one entry.
pub fn validate(candidate: &SnapshotCandidate) -> ValidationResult {
    let mut result = ValidationResult::new();

    match candidate.format_version() {
        None => result.error("Missing formatVersion"),
        Some(version) if is_newer(version, CURRENT_FORMAT_VERSION) => result.warn(format!(
            "formatVersion {} is newer than supported {}; compatibility is uncertain",
            version, CURRENT_FORMAT_VERSION
        )),
        Some(_) => {}
    }

    if candidate.created_at().is_none() {
        result.error("Missing or invalid createdAt");
    }

    if candidate.metadata().is_none() {
        result.error("Missing metadata");
    } else if candidate.producer_tag().is_none() {
        result.error("Missing metadata.producerTag");
    }

    if let Some(raw) = candidate.raw_items() {
        if !raw.is_array() {
            result.warn(format!(
                "items is {} rather than a sequence; treating as empty",
                json_type_name(raw)
            ));
        }
    }

    let items = candidate.item_values();

    if let Some(declared) = candidate.declared_item_count() {
        if declared != items.len() as f64 {
            result.warn(format!(
                "itemCount {} does not match {} item(s) present",
                declared,
                items.len()
            ));
        }
    }

    let mut seen = HashSet::new();
    for (index, value) in items.iter().enumerate() {
        match candidate::parse_bundle(value) {
            Ok(bundle) => {
                if !seen.insert(bundle.filename.clone()) {
                    result.warn(format!(
                        "Duplicate filename {}; the later item overwrites the earlier",
                        bundle.filename
                    ));
                }
            }
            Err(reason) => result.error(format!("items[{}] is not a valid backup item: {}", index, reason)),
        }
    }

    result
}

/// Deserialize, validate and build a snapshot in one step
///
/// Returns the validation result alongside the snapshot so callers can
/// surface warnings. Fails with [`PorterError::IncompatibleArtifact`] when
/// validation reports errors.
pub fn decode(text: &str) -> PorterResult<(Snapshot, ValidationResult)> {
    let candidate = deserialize(text)?;
    let validation = validate(&candidate);

    if !validation.is_valid() {
        return Err(PorterError::IncompatibleArtifact(validation.errors));
    }

    Ok((candidate.into_snapshot()?, validation))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> SnapshotMetadata {
        SnapshotMetadata {
            platform: "linux".into(),
            encryption_algorithm_id: "argon2id-aes256gcm".into(),
            producer_tag: "account-porter".into(),
        }
    }

    fn sample_snapshot(n: usize) -> Snapshot {
        let items = (0..n)
            .map(|i| {
                CredentialBundle::new(
                    format!("user{}@example.com.json", i),
                    json!({"token": format!("t{}", i), "nested": {"b": 2, "a": 1}}),
                    1_700_000_000 + i as i64,
                )
            })
            .collect();
        Snapshot::new(CURRENT_FORMAT_VERSION, 1_700_000_100, items, metadata())
    }

    fn candidate_from(value: Value) -> SnapshotCandidate {
        deserialize(&value.to_string()).unwrap()
    }

    fn valid_document() -> Value {
        json!({
            "formatVersion": "1.1.0",
            "createdAt": 1_700_000_000,
            "itemCount": 1,
            "items": [{"filename": "a.json", "content": {}, "timestamp": 1}],
            "metadata": {"platform": "linux", "encryptionAlgorithmId": "x", "producerTag": "p"}
        })
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let snapshot = sample_snapshot(3);
        let text = serialize(&snapshot).unwrap();
        let (decoded, validation) = decode(&text).unwrap();

        assert!(validation.errors.is_empty());
        assert!(validation.warnings.is_empty());
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_serialize_corrects_item_count() {
        for declared in [0, 2, 99] {
            let mut snapshot = sample_snapshot(2);
            snapshot.item_count = declared;

            let text = serialize(&snapshot).unwrap();
            let raw: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(raw["itemCount"], 2);

            let (decoded, _) = decode(&text).unwrap();
            assert_eq!(decoded.item_count, 2);
        }
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let snapshot = sample_snapshot(2);
        assert_eq!(serialize(&snapshot).unwrap(), serialize(&snapshot).unwrap());

        let text = serialize(&snapshot).unwrap();
        let format_pos = text.find("formatVersion").unwrap();
        let created_pos = text.find("createdAt").unwrap();
        let items_pos = text.find("\"items\"").unwrap();
        let metadata_pos = text.find("\"metadata\"").unwrap();
        assert!(format_pos < created_pos && created_pos < items_pos && items_pos < metadata_pos);
    }

    #[test]
    fn test_deserialize_rejects_non_json() {
        let err = deserialize("definitely not json").unwrap_err();
        assert!(matches!(err, PorterError::MalformedArtifact(_)));

        let err = deserialize("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, PorterError::MalformedArtifact(_)));
    }

    #[test]
    fn test_valid_document_passes() {
        let result = validate(&candidate_from(valid_document()));
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_format_version_is_single_error() {
        let mut doc = valid_document();
        doc.as_object_mut().unwrap().remove("formatVersion");

        let result = validate(&candidate_from(doc));
        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("formatVersion"));
    }

    #[test]
    fn test_empty_format_version_is_error() {
        let mut doc = valid_document();
        doc["formatVersion"] = json!("");

        let result = validate(&candidate_from(doc));
        assert_eq!(result.errors, vec!["Missing formatVersion".to_string()]);
    }

    #[test]
    fn test_missing_created_at_is_error() {
        let mut doc = valid_document();
        doc.as_object_mut().unwrap().remove("createdAt");

        let result = validate(&candidate_from(doc));
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("createdAt"));
    }

    #[test]
    fn test_metadata_rules() {
        let mut doc = valid_document();
        doc.as_object_mut().unwrap().remove("metadata");
        let result = validate(&candidate_from(doc));
        assert_eq!(result.errors, vec!["Missing metadata".to_string()]);

        let mut doc = valid_document();
        doc["metadata"].as_object_mut().unwrap().remove("producerTag");
        let result = validate(&candidate_from(doc));
        assert_eq!(result.errors, vec!["Missing metadata.producerTag".to_string()]);
    }

    #[test]
    fn test_items_not_a_sequence_is_warning() {
        let mut doc = valid_document();
        doc["items"] = json!("oops");
        doc.as_object_mut().unwrap().remove("itemCount");

        let result = validate(&candidate_from(doc.clone()));
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("items"));

        let (snapshot, _) = decode(&doc.to_string()).unwrap();
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.item_count, 0);
    }

    #[test]
    fn test_item_count_mismatch_is_warning() {
        let mut doc = valid_document();
        doc["itemCount"] = json!(5);

        let result = validate(&candidate_from(doc.clone()));
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("itemCount"));

        let (snapshot, _) = decode(&doc.to_string()).unwrap();
        assert_eq!(snapshot.item_count, 1);
    }

    #[test]
    fn test_negative_or_fractional_item_count_is_warning() {
        for declared in [json!(-1), json!(2.5)] {
            let mut doc = valid_document();
            doc["itemCount"] = declared.clone();

            let result = validate(&candidate_from(doc.clone()));
            assert!(result.is_valid());
            assert_eq!(result.warnings.len(), 1, "itemCount {declared}");
            assert!(result.warnings[0].contains(&declared.to_string()));

            let (snapshot, _) = decode(&doc.to_string()).unwrap();
            assert_eq!(snapshot.item_count, 1);
        }
    }

    #[test]
    fn test_newer_version_is_warning_not_error() {
        let mut doc = valid_document();
        doc["formatVersion"] = json!("2.0.0");

        let result = validate(&candidate_from(doc));
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("2.0.0"));
    }

    #[test]
    fn test_older_version_has_no_warning() {
        let mut doc = valid_document();
        doc["formatVersion"] = json!("1.0.0");

        let result = validate(&candidate_from(doc));
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_invalid_item_is_error() {
        let mut doc = valid_document();
        doc["items"] = json!([
            {"filename": "a.json", "content": {}, "timestamp": 1},
            {"content": {}, "timestamp": 2}
        ]);
        doc["itemCount"] = json!(2);

        let result = validate(&candidate_from(doc.clone()));
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("items[1]"));

        let err = decode(&doc.to_string()).unwrap_err();
        assert!(matches!(err, PorterError::IncompatibleArtifact(_)));
    }

    #[test]
    fn test_duplicate_filenames_warn() {
        let mut doc = valid_document();
        doc["items"] = json!([
            {"filename": "a.json", "content": {"v": 1}, "timestamp": 1},
            {"filename": "a.json", "content": {"v": 2}, "timestamp": 2}
        ]);
        doc["itemCount"] = json!(2);

        let result = validate(&candidate_from(doc));
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("a.json"));
    }

    #[test]
    fn test_every_rule_reports_once() {
        let result = validate(&candidate_from(json!({})));
        assert_eq!(
            result.errors,
            vec![
                "Missing formatVersion".to_string(),
                "Missing or invalid createdAt".to_string(),
                "Missing metadata".to_string(),
            ]
        );
        assert!(result.warnings.is_empty());
    }
}
