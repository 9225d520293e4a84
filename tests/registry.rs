use relgraph::metadata::{MetaValue, MetadataRecord, StaticIndex};
use relgraph::model::{EdgeKey, GraphLink, NodeSnapshot, PairStatus, Viewport};
use relgraph::registry::AnnotationRegistry;
use relgraph::style::{RelationStyle, StyleRegistry};
use relgraph::surface::{Measurer, RecordingSurface, Surface};

struct FixedMeasurer;

impl Measurer for FixedMeasurer {
    fn measure(&self, _text: &str) -> (f32, f32) {
        (50.0, 14.0)
    }
}

fn node(id: &str, x: f32, y: f32) -> NodeSnapshot {
    NodeSnapshot {
        id: id.to_string(),
        x,
        y,
        weight: 0.0,
        label_alpha: None,
    }
}

fn link(source: &str, target: &str) -> GraphLink {
    GraphLink {
        source: node(source, 0.0, 0.0),
        target: node(target, 100.0, 0.0),
        host_line: None,
    }
}

/// Index where A→B resolves to "supports" and B→A to "supported_by".
fn metadata() -> StaticIndex {
    let mut index = StaticIndex::new();
    let mut a = MetadataRecord::new();
    a.insert("supports".to_string(), MetaValue::classify_str("[[B]]"));
    index.insert("A", a);
    let mut b = MetadataRecord::new();
    b.insert("supported_by".to_string(), MetaValue::classify_str("[[A]]"));
    index.insert("B", b);
    index
}

fn styles() -> StyleRegistry {
    let mut registry = StyleRegistry::new("unused");
    registry.insert(
        "supports",
        RelationStyle {
            color: "#ff0000".to_string(),
            ..RelationStyle::default()
        },
    );
    registry.insert(
        "supported_by",
        RelationStyle {
            color: "#0000ff".to_string(),
            ..RelationStyle::default()
        },
    );
    registry
}

#[test]
fn upsert_creates_label_stroke_and_legend_row() {
    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    registry.upsert(
        &mut surface,
        &FixedMeasurer,
        &metadata(),
        &styles(),
        &link("A", "B"),
        true,
    );

    let record = registry.get(&EdgeKey::new("A", "B")).expect("record");
    assert_eq!(record.relation_type.as_deref(), Some("supports"));
    assert_eq!(record.display_label, "supports");
    assert_eq!(record.color, 0xff0000);
    assert!(record.text_handle.is_some());
    assert!(record.stroke_handle.is_some());
    assert_eq!(registry.legend().rows().len(), 1);
    // label + stroke + legend text + legend line
    assert_eq!(surface.len(), 4);
}

#[test]
fn upsert_is_idempotent() {
    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    let edge = link("A", "B");
    for _ in 0..3 {
        registry.upsert(
            &mut surface,
            &FixedMeasurer,
            &metadata(),
            &styles(),
            &edge,
            true,
        );
    }
    assert_eq!(registry.len(), 1);
    assert_eq!(surface.len(), 4);
    assert_eq!(registry.legend().row("supports").unwrap().use_count, 1);
}

#[test]
fn unresolved_edges_are_tracked_without_drawables() {
    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    registry.upsert(
        &mut surface,
        &FixedMeasurer,
        &StaticIndex::new(),
        &styles(),
        &link("A", "B"),
        true,
    );

    let record = registry.get(&EdgeKey::new("A", "B")).expect("record");
    assert_eq!(record.relation_type, None);
    assert!(record.text_handle.is_none());
    assert!(record.stroke_handle.is_none());
    assert!(surface.is_empty());
    assert!(registry.legend().rows().is_empty());
}

#[test]
fn colors_disabled_skips_strokes_and_legend() {
    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    registry.upsert(
        &mut surface,
        &FixedMeasurer,
        &metadata(),
        &styles(),
        &link("A", "B"),
        false,
    );

    let record = registry.get(&EdgeKey::new("A", "B")).expect("record");
    assert!(record.text_handle.is_some());
    assert!(record.stroke_handle.is_none());
    assert!(registry.legend().rows().is_empty());
    assert_eq!(surface.len(), 1);
}

#[test]
fn reciprocal_edges_pad_their_labels_apart() {
    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    let meta = metadata();
    let sty = styles();
    registry.upsert(&mut surface, &FixedMeasurer, &meta, &sty, &link("A", "B"), true);
    registry.upsert(&mut surface, &FixedMeasurer, &meta, &sty, &link("B", "A"), true);

    let forward = registry.get(&EdgeKey::new("A", "B")).unwrap();
    let backward = registry.get(&EdgeKey::new("B", "A")).unwrap();
    assert_eq!(forward.pair, PairStatus::First);
    assert_eq!(backward.pair, PairStatus::Second);

    let forward_text = surface.text(forward.text_handle.unwrap()).unwrap().0;
    let backward_text = surface.text(backward.text_handle.unwrap()).unwrap().0;
    assert_eq!(forward_text.content, "supports\n\n");
    assert_eq!(backward_text.content, "\n\nsupported_by");
}

#[test]
fn removing_one_half_of_a_pair_resets_the_mate() {
    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    let meta = metadata();
    let sty = styles();
    registry.upsert(&mut surface, &FixedMeasurer, &meta, &sty, &link("A", "B"), true);
    registry.upsert(&mut surface, &FixedMeasurer, &meta, &sty, &link("B", "A"), true);

    registry.remove(&mut surface, &EdgeKey::new("B", "A"));
    assert!(registry.get(&EdgeKey::new("B", "A")).is_none());

    let forward = registry.get(&EdgeKey::new("A", "B")).unwrap();
    assert_eq!(forward.pair, PairStatus::None);
    let text = surface.text(forward.text_handle.unwrap()).unwrap().0;
    assert_eq!(text.content, "supports");
}

#[test]
fn reconcile_drops_edges_absent_from_the_host_list() {
    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    let meta = metadata();
    let sty = styles();
    registry.upsert(&mut surface, &FixedMeasurer, &meta, &sty, &link("A", "B"), true);
    registry.upsert(&mut surface, &FixedMeasurer, &meta, &sty, &link("B", "A"), true);

    registry.reconcile(&mut surface, &[link("A", "B")]);
    assert_eq!(registry.len(), 1);
    assert!(registry.contains(&EdgeKey::new("A", "B")));
    assert!(!registry.contains(&EdgeKey::new("B", "A")));
}

#[test]
fn shared_display_labels_share_a_legend_row() {
    let mut index = metadata();
    let mut c = MetadataRecord::new();
    c.insert("supports".to_string(), MetaValue::classify_str("[[B]]"));
    index.insert("C", c);

    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    let sty = styles();
    registry.upsert(&mut surface, &FixedMeasurer, &index, &sty, &link("A", "B"), true);
    registry.upsert(&mut surface, &FixedMeasurer, &index, &sty, &link("C", "B"), true);

    assert_eq!(registry.legend().rows().len(), 1);
    assert_eq!(registry.legend().row("supports").unwrap().use_count, 2);

    registry.remove(&mut surface, &EdgeKey::new("A", "B"));
    assert_eq!(registry.legend().row("supports").unwrap().use_count, 1);
}

#[test]
fn self_edges_get_no_visible_label_or_legend_entry() {
    let mut index = StaticIndex::new();
    let mut a = MetadataRecord::new();
    a.insert("supports".to_string(), MetaValue::classify_str("[[A]]"));
    index.insert("A", a);

    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    registry.upsert(
        &mut surface,
        &FixedMeasurer,
        &index,
        &styles(),
        &link("A", "A"),
        true,
    );

    let record = registry.get(&EdgeKey::new("A", "A")).expect("record");
    let text = surface.text(record.text_handle.unwrap()).unwrap().0;
    assert_eq!(text.content, "");
    assert!(registry.legend().rows().is_empty());
}

#[test]
fn self_edges_draw_no_stroke_path() {
    let mut index = StaticIndex::new();
    let mut a = MetadataRecord::new();
    a.insert("supports".to_string(), MetaValue::classify_str("[[A]]"));
    index.insert("A", a);

    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    let edge = link("A", "A");
    registry.upsert(&mut surface, &FixedMeasurer, &index, &styles(), &edge, true);
    registry.update_stroke(&mut surface, &Viewport::default(), &edge);

    let record = registry.get(&EdgeKey::new("A", "A")).unwrap();
    let path = surface.stroke(record.stroke_handle.unwrap()).unwrap();
    assert!(path.cmds.is_empty());
}

#[test]
fn destroy_all_clears_registry_and_surface() {
    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    let meta = metadata();
    let sty = styles();
    registry.upsert(&mut surface, &FixedMeasurer, &meta, &sty, &link("A", "B"), true);
    registry.upsert(&mut surface, &FixedMeasurer, &meta, &sty, &link("B", "A"), true);

    registry.destroy_all(&mut surface);
    assert!(registry.is_empty());
    assert!(surface.is_empty());
    assert!(registry.legend().rows().is_empty());
}

#[test]
fn torn_down_handles_are_never_touched_again() {
    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    let edge = link("A", "B");
    registry.upsert(
        &mut surface,
        &FixedMeasurer,
        &metadata(),
        &styles(),
        &edge,
        true,
    );

    // Host tears everything down behind the registry's back.
    let handles: Vec<_> = surface.handles().collect();
    for handle in handles {
        surface.remove(handle);
    }
    registry.update_label(&mut surface, &Viewport::default(), &edge, true);
    registry.update_stroke(&mut surface, &Viewport::default(), &edge);
    registry.remove(&mut surface, &EdgeKey::new("A", "B"));
    assert!(surface.is_empty());
    assert!(registry.is_empty());
}

#[test]
fn label_updates_follow_host_label_alpha() {
    let mut surface = RecordingSurface::new();
    let mut registry = AnnotationRegistry::new(true);
    let mut edge = link("A", "B");
    edge.source.label_alpha = Some(0.3);
    edge.target.label_alpha = Some(0.7);
    registry.upsert(
        &mut surface,
        &FixedMeasurer,
        &metadata(),
        &styles(),
        &edge,
        true,
    );
    registry.update_label(&mut surface, &Viewport::default(), &edge, true);

    let record = registry.get(&EdgeKey::new("A", "B")).unwrap();
    let state = surface.text(record.text_handle.unwrap()).unwrap().1;
    assert_eq!(state.alpha, 0.7);
    assert_eq!(state.x, 50.0);
    assert_eq!(state.y, 0.0);
}
