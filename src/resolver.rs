//! Edge type resolution.
//!
//! An edge's semantic type is the first metadata key on the source entity
//! whose value references the target entity.

use crate::metadata::{MetaValue, MetadataSource};

/// Resolve the semantic type of the edge `source_id → target_id`.
///
/// Scans the source entity's record in its native key order:
/// - empty values are skipped;
/// - an entity reference or text link matches when its path equals
///   `target_id`;
/// - a collection matches when any element, recursively, matches by those
///   two rules;
/// - plain strings never match but the scan continues;
/// - an unclassifiable value aborts the whole scan with `None` — no partial
///   or fallback match is attempted.
///
/// Returns the first matching key name, `None` when nothing matches or the
/// record is unavailable. Pure read; resolution has no side effects.
pub fn resolve_relation_type(
    metadata: &dyn MetadataSource,
    source_id: &str,
    target_id: &str,
) -> Option<String> {
    let record = metadata.record(source_id)?;
    for (key, value) in record {
        match value {
            MetaValue::Empty => continue,
            MetaValue::EntityRef(path) | MetaValue::TextLink(path) => {
                if path == target_id {
                    return Some(key.clone());
                }
            }
            MetaValue::List(items) => {
                if items.iter().any(|v| v.references(target_id)) {
                    return Some(key.clone());
                }
            }
            MetaValue::PlainString(_) => {}
            MetaValue::Other => return None,
        }
    }
    None
}
