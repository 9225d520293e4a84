//! The metadata boundary.
//!
//! Entity metadata arrives as loosely typed key/value records (frontmatter,
//! JSON, host APIs). Classification into the closed [`MetaValue`] variant
//! happens here, once, at the boundary; the resolver consumes the variants
//! exhaustively and never sniffs runtime types.

use indexmap::IndexMap;

/// Closed classification of one metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    /// Direct reference to another entity by id (e.g. a `[[wiki link]]`).
    EntityRef(String),
    /// Free text embedding a markdown-style link; holds the extracted target
    /// path (empty when the text had no usable target).
    TextLink(String),
    /// Plain text that names no entity.
    PlainString(String),
    /// Ordered collection of nested values.
    List(Vec<MetaValue>),
    /// Anything the classifier cannot place. Encountering this aborts type
    /// resolution for the whole record.
    Other,
    /// Null / absent / empty value; skipped during resolution.
    Empty,
}

impl MetaValue {
    /// Classify a string value. `[[path]]` and `[[path|alias]]` become
    /// [`MetaValue::EntityRef`]; text containing a markdown link becomes
    /// [`MetaValue::TextLink`].
    pub fn classify_str(s: &str) -> MetaValue {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return MetaValue::Empty;
        }
        if let Some(path) = wiki_link_path(trimmed) {
            return MetaValue::EntityRef(path);
        }
        if trimmed.contains("](") {
            return MetaValue::TextLink(markdown_link_path(trimmed));
        }
        MetaValue::PlainString(s.to_string())
    }

    /// Classify a loosely typed JSON value. Objects with a string `path`
    /// field are entity references (the shape metadata APIs use for resolved
    /// links); numbers, booleans, and path-less objects are [`MetaValue::Other`].
    pub fn classify_json(value: &serde_json::Value) -> MetaValue {
        use serde_json::Value;
        match value {
            Value::Null => MetaValue::Empty,
            Value::String(s) => Self::classify_str(s),
            Value::Array(items) => {
                MetaValue::List(items.iter().map(Self::classify_json).collect())
            }
            Value::Object(map) => match map.get("path").and_then(Value::as_str) {
                Some(path) => MetaValue::EntityRef(path.to_string()),
                None => MetaValue::Other,
            },
            Value::Bool(_) | Value::Number(_) => MetaValue::Other,
        }
    }

    /// Whether this value names `target_id` by the entity-reference or
    /// text-link rule. Lists recurse; plain strings and `Other` never match.
    pub fn references(&self, target_id: &str) -> bool {
        match self {
            MetaValue::EntityRef(path) | MetaValue::TextLink(path) => path == target_id,
            MetaValue::List(items) => items.iter().any(|v| v.references(target_id)),
            _ => false,
        }
    }
}

/// Extract the path of a `[[path]]` or `[[path|alias]]` wiki link.
fn wiki_link_path(s: &str) -> Option<String> {
    let inner = s.strip_prefix("[[")?.strip_suffix("]]")?;
    let path = inner.split('|').next().unwrap_or(inner).trim();
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}

/// Extract the first markdown link target (`[label](target)`), or empty.
fn markdown_link_path(s: &str) -> String {
    if let Some(idx) = s.find("](") {
        let rest = &s[idx + 2..];
        if let Some(end) = rest.find(')') {
            return rest[..end].trim().to_string();
        }
    }
    String::new()
}

/// Ordered key → value record of one entity. Key order is semantic: the
/// resolver scans it front to back and the first match wins.
pub type MetadataRecord = IndexMap<String, MetaValue>;

/// Per-entity metadata lookup, owned by the host's index.
pub trait MetadataSource {
    /// The ordered record for an entity, or `None` if the entity is unknown
    /// (resolution then fails closed).
    fn record(&self, id: &str) -> Option<&MetadataRecord>;
}

/// In-memory metadata index. Backs the demo binary's JSON snapshots and
/// serves as a test double.
#[derive(Debug, Clone, Default)]
pub struct StaticIndex {
    records: IndexMap<String, MetadataRecord>,
}

impl StaticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, record: MetadataRecord) {
        self.records.insert(id.into(), record);
    }

    /// Build an index from a JSON object of objects
    /// (`{ "entity id": { "key": value, … }, … }`), classifying every value.
    /// Anything that is not an object of objects is ignored.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut index = Self::new();
        let Some(entities) = value.as_object() else {
            return index;
        };
        for (id, fields) in entities {
            let mut record = MetadataRecord::new();
            if let Some(map) = fields.as_object() {
                for (key, v) in map {
                    record.insert(key.clone(), MetaValue::classify_json(v));
                }
            }
            index.insert(id.clone(), record);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl MetadataSource for StaticIndex {
    fn record(&self, id: &str) -> Option<&MetadataRecord> {
        self.records.get(id)
    }
}
