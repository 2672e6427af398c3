use crate::core::data::{DEFAULT_CATEGORY, DEFAULT_CHAIN, MetadataField, MetadataValue, SequenceRecord};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::trace;

/// Chain namespaces recognised as an existing prefix on metadata keys.
pub const KNOWN_CHAINS: [&str; 3] = ["heavy", "light", DEFAULT_CHAIN];

/// A record as it appears in JSON input, before namespacing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub sequence: String,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

fn flatten_value(name: String, value: &Value, out: &mut Vec<(String, MetadataValue)>) {
    match value {
        Value::Null => trace!(field = %name, "skipped null metadata value"),
        Value::Bool(flag) => out.push((name, MetadataValue::Text(flag.to_string()))),
        Value::Number(number) => match number.as_f64() {
            Some(number) => out.push((name, MetadataValue::Number(number))),
            None => out.push((name, MetadataValue::Text(number.to_string()))),
        },
        Value::String(text) => out.push((name, MetadataValue::Text(text.clone()))),
        Value::Array(items) => {
            let joined = items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            out.push((name, MetadataValue::Text(joined)));
        }
        Value::Object(children) => {
            for (key, child) in children {
                flatten_value(format!("{name}.{key}"), child, out);
            }
        }
    }
}

/// Qualifies a flattened key as `<chain>.<Category>.<name>`.
///
/// Keys that already start with a known chain keep it; everything else is prefixed
/// with the record's own chain. Keys without a category land in `General`.
#[must_use]
pub fn qualify_field_name(key: &str, chain: &str) -> String {
    let (prefix, rest) = match key.split_once('.') {
        Some((first, rest)) if first == chain || KNOWN_CHAINS.contains(&first) => (first, rest),
        _ => (chain, key),
    };
    if rest.contains('.') {
        format!("{prefix}.{rest}")
    } else {
        format!("{prefix}.{DEFAULT_CATEGORY}.{rest}")
    }
}

/// Converts one raw record into a namespaced [`SequenceRecord`].
#[must_use]
pub fn normalize_record(raw: RawRecord) -> SequenceRecord {
    let chain = raw
        .chain
        .filter(|chain| !chain.is_empty())
        .unwrap_or_else(|| DEFAULT_CHAIN.to_string());

    let mut flattened = Vec::with_capacity(raw.metadata.len());
    for (key, value) in &raw.metadata {
        flatten_value(key.clone(), value, &mut flattened);
    }

    let metadata = flattened
        .into_iter()
        .map(|(key, value)| MetadataField {
            name: qualify_field_name(&key, &chain),
            value,
        })
        .collect();

    SequenceRecord {
        id: Arc::from(raw.id),
        sequence: Arc::from(raw.sequence.into_bytes()),
        chain: Arc::from(chain),
        visible: raw.visible.unwrap_or(true),
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn qualify_adds_chain_and_category() {
        assert_eq!(qualify_field_name("species", "heavy"), "heavy.General.species");
        assert_eq!(qualify_field_name("CDRs.H1", "heavy"), "heavy.CDRs.H1");
        assert_eq!(qualify_field_name("light.CDRs.L1", "heavy"), "light.CDRs.L1");
        assert_eq!(qualify_field_name("light.species", "heavy"), "light.General.species");
    }

    #[test]
    fn nested_objects_flatten_into_categories() {
        let record = normalize_record(raw(json!({
            "id": "mab1",
            "sequence": "EVQL",
            "chain": "heavy",
            "species": "human",
            "CDRs": {"H1": "GFTF", "H3": "ARDY"},
            "length": 121,
            "note": null,
            "germline": true,
        })));

        let names: Vec<_> = record.metadata.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "heavy.General.species",
                "heavy.CDRs.H1",
                "heavy.CDRs.H3",
                "heavy.General.length",
                "heavy.General.germline",
            ]
        );
        assert_eq!(record.chain.as_ref(), "heavy");
        assert_eq!(
            record.field("heavy.General.length"),
            Some(&MetadataValue::Number(121.0))
        );
        assert_eq!(
            record.field("heavy.General.germline"),
            Some(&MetadataValue::Text("true".to_string()))
        );
    }

    #[test]
    fn records_without_chain_use_combined() {
        let record = normalize_record(raw(json!({
            "id": "x",
            "sequence": "AC",
            "visible": false,
            "tags": ["a", 1],
        })));
        assert_eq!(record.chain.as_ref(), "combined");
        assert!(!record.visible);
        assert_eq!(
            record.field("combined.General.tags"),
            Some(&MetadataValue::Text("a, 1".to_string()))
        );
    }
}
