//! Loosely-typed view of a deserialized snapshot
//!
//! Keeps the raw JSON object so validation can report on missing or
//! mistyped fields instead of failing the parse. Field lookups accept the
//! names used by older artifacts (`version`, `exportTime`, `backupCount`,
//! `backups`, `antigravityAgent`, `encryptionType`).

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::error::{PorterError, PorterResult};
use crate::models::{CredentialBundle, Snapshot, SnapshotMetadata};

const FORMAT_VERSION_KEYS: &[&str] = &["formatVersion", "version"];
const CREATED_AT_KEYS: &[&str] = &["createdAt", "exportTime"];
const ITEM_COUNT_KEYS: &[&str] = &["itemCount", "backupCount"];
const ITEMS_KEYS: &[&str] = &["items", "backups"];
const PRODUCER_TAG_KEYS: &[&str] = &["producerTag", "antigravityAgent"];
const ALGORITHM_KEYS: &[&str] = &["encryptionAlgorithmId", "encryptionType"];

/// A parsed but not yet validated snapshot document
#[derive(Debug, Clone)]
pub struct SnapshotCandidate {
    document: Map<String, Value>,
}

impl SnapshotCandidate {
    pub(crate) fn new(document: Map<String, Value>) -> Self {
        Self { document }
    }

    /// First present, non-null value among `keys`
    fn field<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|key| map.get(*key))
            .find(|value| !value.is_null())
    }

    /// Non-empty format version string
    pub fn format_version(&self) -> Option<&str> {
        Self::field(&self.document, FORMAT_VERSION_KEYS)
            .and_then(Value::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Creation time as epoch seconds; accepts integers and RFC 3339 strings
    pub fn created_at(&self) -> Option<i64> {
        match Self::field(&self.document, CREATED_AT_KEYS)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    DateTime::parse_from_rfc3339(s)
                        .ok()
                        .map(|dt| dt.timestamp())
                })
            }
            _ => None,
        }
    }

    /// The advisory item count, if present and numeric
    ///
    /// Negative and fractional counts are kept so they can be reported.
    pub fn declared_item_count(&self) -> Option<f64> {
        Self::field(&self.document, ITEM_COUNT_KEYS).and_then(Value::as_f64)
    }

    /// Raw items value, whatever its type
    pub fn raw_items(&self) -> Option<&Value> {
        Self::field(&self.document, ITEMS_KEYS)
    }

    /// Items as a slice; anything that is not a sequence reads as empty
    pub fn item_values(&self) -> &[Value] {
        match self.raw_items() {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }

    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.document.get("metadata").and_then(Value::as_object)
    }

    pub fn producer_tag(&self) -> Option<&str> {
        self.metadata()
            .and_then(|m| Self::field(m, PRODUCER_TAG_KEYS))
            .and_then(Value::as_str)
            .filter(|tag| !tag.trim().is_empty())
    }

    fn metadata_string(&self, keys: &[&str]) -> String {
        self.metadata()
            .and_then(|m| Self::field(m, keys))
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string()
    }

    /// Build the typed snapshot
    ///
    /// Call only after validation succeeded. `item_count` is normalized to
    /// the number of items actually present.
    pub fn into_snapshot(self) -> PorterResult<Snapshot> {
        let format_version = self
            .format_version()
            .ok_or_else(|| PorterError::MalformedArtifact("missing formatVersion".into()))?
            .to_string();

        let created_at = self
            .created_at()
            .ok_or_else(|| PorterError::MalformedArtifact("missing createdAt".into()))?;

        let producer_tag = self
            .producer_tag()
            .ok_or_else(|| PorterError::MalformedArtifact("missing metadata.producerTag".into()))?
            .to_string();

        let items = self
            .item_values()
            .iter()
            .enumerate()
            .map(|(index, value)| {
                parse_bundle(value).map_err(|reason| {
                    PorterError::MalformedArtifact(format!("items[{}]: {}", index, reason))
                })
            })
            .collect::<PorterResult<Vec<_>>>()?;

        let metadata = SnapshotMetadata {
            platform: self.metadata_string(&["platform"]),
            encryption_algorithm_id: self.metadata_string(ALGORITHM_KEYS),
            producer_tag,
        };

        Ok(Snapshot::new(format_version, created_at, items, metadata))
    }
}

/// Parse one element of `items` into a bundle
pub(crate) fn parse_bundle(value: &Value) -> Result<CredentialBundle, String> {
    let object = value
        .as_object()
        .ok_or_else(|| "not an object".to_string())?;

    let filename = object
        .get("filename")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing filename".to_string())?;

    let content = object
        .get("content")
        .cloned()
        .ok_or_else(|| format!("{}: missing content", filename))?;

    let timestamp = object
        .get("timestamp")
        .and_then(Value::as_i64)
        .ok_or_else(|| format!("{}: missing or invalid timestamp", filename))?;

    let bundle = CredentialBundle::new(filename, content, timestamp);
    bundle.validate().map_err(|e| e.to_string())?;
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(value: Value) -> SnapshotCandidate {
        match value {
            Value::Object(map) => SnapshotCandidate::new(map),
            _ => panic!("test document must be an object"),
        }
    }

    #[test]
    fn test_legacy_field_names() {
        let c = candidate(json!({
            "version": "1.0.0",
            "exportTime": "2025-01-02T03:04:05.000Z",
            "backupCount": 1,
            "backups": [{"filename": "a.json", "content": {"k": 1}, "timestamp": 9}],
            "metadata": {"platform": "Win32", "antigravityAgent": "encrypted_config", "encryptionType": "XOR-Base64"}
        }));

        assert_eq!(c.format_version(), Some("1.0.0"));
        assert_eq!(c.created_at(), Some(1_735_787_045));
        assert_eq!(c.declared_item_count(), Some(1.0));
        assert_eq!(c.producer_tag(), Some("encrypted_config"));

        let snapshot = c.into_snapshot().unwrap();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.metadata.encryption_algorithm_id, "XOR-Base64");
        assert_eq!(snapshot.metadata.platform, "Win32");
    }

    #[test]
    fn test_current_names_win_over_legacy() {
        let c = candidate(json!({"formatVersion": "1.1.0", "version": "0.9"}));
        assert_eq!(c.format_version(), Some("1.1.0"));
    }

    #[test]
    fn test_non_sequence_items_read_as_empty() {
        let c = candidate(json!({"items": {"a": 1}}));
        assert!(c.raw_items().is_some());
        assert!(c.item_values().is_empty());
    }

    #[test]
    fn test_parse_bundle_errors() {
        assert_eq!(parse_bundle(&json!(3)).unwrap_err(), "not an object");
        assert_eq!(
            parse_bundle(&json!({"content": {}, "timestamp": 1})).unwrap_err(),
            "missing filename"
        );
        assert_eq!(
            parse_bundle(&json!({"filename": "  ", "content": {}, "timestamp": 1})).unwrap_err(),
            "Backup item filename cannot be empty"
        );
        assert!(parse_bundle(&json!({"filename": "a.json", "timestamp": 1}))
            .unwrap_err()
            .contains("missing content"));
        assert!(parse_bundle(&json!({"filename": "a.json", "content": {}}))
            .unwrap_err()
            .contains("timestamp"));
    }
}
