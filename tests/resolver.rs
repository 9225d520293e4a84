use relgraph::metadata::{MetaValue, MetadataRecord, StaticIndex};
use relgraph::resolver::resolve_relation_type;

fn index_with(id: &str, fields: Vec<(&str, MetaValue)>) -> StaticIndex {
    let mut record = MetadataRecord::new();
    for (key, value) in fields {
        record.insert(key.to_string(), value);
    }
    let mut index = StaticIndex::new();
    index.insert(id, record);
    index
}

#[test]
fn wiki_link_value_resolves_to_its_key() {
    let index = index_with(
        "Rust",
        vec![("supports", MetaValue::classify_str("[[WebAssembly]]"))],
    );
    assert_eq!(
        resolve_relation_type(&index, "Rust", "WebAssembly"),
        Some("supports".to_string())
    );
    assert_eq!(resolve_relation_type(&index, "Rust", "Python"), None);
}

#[test]
fn list_values_match_any_element() {
    let index = index_with(
        "Paper",
        vec![(
            "derived_from",
            MetaValue::List(vec![
                MetaValue::classify_str("[[Earlier Paper]]"),
                MetaValue::classify_str("[[Survey]]"),
            ]),
        )],
    );
    assert_eq!(
        resolve_relation_type(&index, "Paper", "Survey"),
        Some("derived_from".to_string())
    );
}

#[test]
fn markdown_link_value_resolves() {
    let index = index_with(
        "A",
        vec![("see", MetaValue::classify_str("details in [B](B)"))],
    );
    assert_eq!(
        resolve_relation_type(&index, "A", "B"),
        Some("see".to_string())
    );
}

#[test]
fn first_matching_key_wins() {
    let index = index_with(
        "A",
        vec![
            ("alpha", MetaValue::classify_str("[[B]]")),
            ("beta", MetaValue::classify_str("[[B]]")),
        ],
    );
    assert_eq!(
        resolve_relation_type(&index, "A", "B"),
        Some("alpha".to_string())
    );
}

#[test]
fn unclassifiable_value_aborts_the_scan() {
    let index = index_with(
        "A",
        vec![
            ("rating", MetaValue::Other),
            ("links_to", MetaValue::classify_str("[[B]]")),
        ],
    );
    assert_eq!(resolve_relation_type(&index, "A", "B"), None);
}

#[test]
fn empty_values_are_skipped() {
    let index = index_with(
        "A",
        vec![
            ("draft", MetaValue::Empty),
            ("links_to", MetaValue::classify_str("[[B]]")),
        ],
    );
    assert_eq!(
        resolve_relation_type(&index, "A", "B"),
        Some("links_to".to_string())
    );
}

#[test]
fn plain_strings_do_not_abort() {
    let index = index_with(
        "A",
        vec![
            ("note", MetaValue::classify_str("just text")),
            ("links_to", MetaValue::classify_str("[[B]]")),
        ],
    );
    assert_eq!(
        resolve_relation_type(&index, "A", "B"),
        Some("links_to".to_string())
    );
}

#[test]
fn unknown_source_resolves_to_none() {
    let index = StaticIndex::new();
    assert_eq!(resolve_relation_type(&index, "A", "B"), None);
}

#[test]
fn string_classification() {
    assert_eq!(
        MetaValue::classify_str("[[Target]]"),
        MetaValue::EntityRef("Target".to_string())
    );
    assert_eq!(
        MetaValue::classify_str("[[Target|an alias]]"),
        MetaValue::EntityRef("Target".to_string())
    );
    assert_eq!(
        MetaValue::classify_str("read [docs](guide)"),
        MetaValue::TextLink("guide".to_string())
    );
    assert_eq!(
        MetaValue::classify_str("no links here"),
        MetaValue::PlainString("no links here".to_string())
    );
    assert_eq!(MetaValue::classify_str("   "), MetaValue::Empty);
}

#[test]
fn json_classification() {
    use serde_json::json;
    assert_eq!(MetaValue::classify_json(&json!(null)), MetaValue::Empty);
    assert_eq!(
        MetaValue::classify_json(&json!({"path": "Target"})),
        MetaValue::EntityRef("Target".to_string())
    );
    assert_eq!(MetaValue::classify_json(&json!(42)), MetaValue::Other);
    assert_eq!(MetaValue::classify_json(&json!(true)), MetaValue::Other);
    assert_eq!(
        MetaValue::classify_json(&json!({"other": 1})),
        MetaValue::Other
    );
    assert_eq!(
        MetaValue::classify_json(&json!(["[[A]]", "[[B]]"])),
        MetaValue::List(vec![
            MetaValue::EntityRef("A".to_string()),
            MetaValue::EntityRef("B".to_string()),
        ])
    );
}

#[test]
fn from_json_preserves_key_order() {
    let value = serde_json::json!({
        "A": { "first": "[[B]]", "second": "[[B]]" }
    });
    let index = StaticIndex::from_json(&value);
    assert_eq!(
        resolve_relation_type(&index, "A", "B"),
        Some("first".to_string())
    );
}
