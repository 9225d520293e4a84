//! The annotation registry.
//!
//! One [`AnnotationRecord`] per tracked directed edge, keyed by the ordered
//! `(source, target)` pair. The registry owns the surface handles of every
//! label and stroke it created, plus the legend, and is the only writer of
//! those drawables.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::geometry::{label_position, label_scale, stroke_endpoints, stroke_path, stroke_width};
use crate::legend::Legend;
use crate::metadata::MetadataSource;
use crate::model::{EdgeKey, GraphLink, PairStatus, Viewport};
use crate::resolver::resolve_relation_type;
use crate::style::{DEFAULT_COLOR, LinePattern, LineShape, StyleRegistry, parse_hex_color};
use crate::surface::{HandleId, Measurer, StrokePath, Surface, TextSpec, TextUpdate};

/// Font size of edge labels before per-frame scaling.
pub const LABEL_FONT_SIZE: f32 = 36.0;
/// Label opacity when neither endpoint exposes a host label alpha.
pub const DEFAULT_LABEL_ALPHA: f32 = 0.9;
/// Opacity of styled strokes.
pub const STROKE_ALPHA: f32 = 0.8;

/// Everything the registry tracks for one directed edge.
#[derive(Debug, Clone)]
pub struct AnnotationRecord {
    /// Latest snapshot of the host link; refreshed every frame.
    pub link: GraphLink,
    pub pair: PairStatus,
    /// Label drawable, present when the edge resolved to a relation type.
    pub text_handle: Option<HandleId>,
    /// Stroke drawable, present when colored strokes are enabled.
    pub stroke_handle: Option<HandleId>,
    pub relation_type: Option<String>,
    pub display_label: String,
    /// Packed `0xRRGGBB` stroke color.
    pub color: u32,
    pub shape: LineShape,
    pub pattern: LinePattern,
    /// Whether this record holds a legend reference for its display label.
    legend_counted: bool,
}

/// Label content for a record: self-edges render no text, and the two halves
/// of a reciprocal pair are padded apart so they stack at the shared midpoint.
fn label_text(label: &str, self_edge: bool, pair: PairStatus) -> String {
    if self_edge {
        return String::new();
    }
    match pair {
        PairStatus::None => label.to_string(),
        PairStatus::First => format!("{label}\n\n"),
        PairStatus::Second => format!("\n\n{label}"),
    }
}

#[derive(Debug)]
pub struct AnnotationRegistry {
    records: IndexMap<EdgeKey, AnnotationRecord>,
    legend: Legend,
    text_color: u32,
}

impl AnnotationRegistry {
    pub fn new(show_legend: bool) -> Self {
        Self {
            records: IndexMap::new(),
            legend: Legend::new(show_legend, DEFAULT_COLOR),
            text_color: DEFAULT_COLOR,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, key: &EdgeKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn get(&self, key: &EdgeKey) -> Option<&AnnotationRecord> {
        self.records.get(key)
    }

    pub fn records(&self) -> impl Iterator<Item = (&EdgeKey, &AnnotationRecord)> {
        self.records.iter()
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn set_legend_visible(&mut self, surface: &mut dyn Surface, visible: bool) {
        self.legend.set_visible(surface, visible);
    }

    pub fn set_text_color(&mut self, surface: &mut dyn Surface, color: u32) {
        self.text_color = color;
        self.legend.set_text_color(surface, color);
    }

    /// Admit an edge into the registry. Idempotent: a key that is already
    /// tracked is left untouched.
    ///
    /// Resolution runs once, here; an edge whose type cannot be resolved is
    /// still recorded (so it is not re-resolved every reconcile) but gets no
    /// drawables. When the reciprocal key is already tracked, this record
    /// becomes [`PairStatus::Second`] and the mate is promoted to `First`,
    /// with both label texts rebuilt.
    pub fn upsert(
        &mut self,
        surface: &mut dyn Surface,
        measurer: &dyn Measurer,
        metadata: &dyn MetadataSource,
        styles: &StyleRegistry,
        link: &GraphLink,
        show_colors: bool,
    ) {
        let key = link.key();
        if self.records.contains_key(&key) {
            return;
        }

        let relation_type =
            resolve_relation_type(metadata, &link.source.id, &link.target.id);
        let self_edge = link.is_self_edge();

        let reverse = key.reversed();
        let pair = if !self_edge && self.records.contains_key(&reverse) {
            PairStatus::Second
        } else {
            PairStatus::None
        };

        let mut record = AnnotationRecord {
            link: link.clone(),
            pair,
            text_handle: None,
            stroke_handle: None,
            relation_type: relation_type.clone(),
            display_label: String::new(),
            color: DEFAULT_COLOR,
            shape: LineShape::Straight,
            pattern: LinePattern::Solid,
            legend_counted: false,
        };

        if let Some(relation_type) = &relation_type {
            let style = styles.get(relation_type);
            record.display_label = styles.display_label(relation_type);
            record.color = parse_hex_color(&style.color).unwrap_or(DEFAULT_COLOR);
            record.shape = style.shape;
            record.pattern = style.pattern;

            record.text_handle = Some(surface.add_text(TextSpec {
                content: label_text(&record.display_label, self_edge, pair),
                font_size: LABEL_FONT_SIZE,
                fill: self.text_color,
                centered: true,
                z_index: 2,
            }));

            if show_colors {
                record.stroke_handle = Some(surface.add_stroke());
                if !self_edge {
                    self.legend
                        .acquire(surface, measurer, &record.display_label, record.color);
                    record.legend_counted = true;
                }
            }
        }

        self.records.insert(key, record);

        if pair == PairStatus::Second {
            if let Some(mate) = self.records.get_mut(&reverse) {
                mate.pair = PairStatus::First;
                let content = label_text(&mate.display_label, false, PairStatus::First);
                if let Some(handle) = mate.text_handle {
                    if surface.contains(handle) {
                        surface.set_text_content(handle, &content);
                    }
                }
            }
        }
    }

    /// Forget an edge, destroying its drawables and releasing its legend
    /// reference. A surviving reciprocal mate reverts to an unpaired label.
    pub fn remove(&mut self, surface: &mut dyn Surface, key: &EdgeKey) {
        let Some(record) = self.records.shift_remove(key) else {
            return;
        };
        if let Some(handle) = record.text_handle {
            if surface.contains(handle) {
                surface.remove(handle);
            }
        }
        if let Some(handle) = record.stroke_handle {
            if surface.contains(handle) {
                surface.remove(handle);
            }
        }
        if record.legend_counted {
            self.legend.release(surface, &record.display_label);
        }

        let reverse = key.reversed();
        if let Some(mate) = self.records.get_mut(&reverse) {
            if mate.pair != PairStatus::None {
                mate.pair = PairStatus::None;
                let content = label_text(&mate.display_label, false, PairStatus::None);
                if let Some(handle) = mate.text_handle {
                    if surface.contains(handle) {
                        surface.set_text_content(handle, &content);
                    }
                }
            }
        }
    }

    /// Drop every record whose key is absent from the host's current edge
    /// list. The list is the sole authority on edge existence.
    pub fn reconcile(&mut self, surface: &mut dyn Surface, links: &[GraphLink]) {
        let live: HashSet<EdgeKey> = links.iter().map(GraphLink::key).collect();
        let stale: Vec<EdgeKey> = self
            .records
            .keys()
            .filter(|key| !live.contains(key))
            .cloned()
            .collect();
        for key in stale {
            self.remove(surface, &key);
        }
    }

    /// Remove every record and its drawables.
    pub fn destroy_all(&mut self, surface: &mut dyn Surface) {
        let keys: Vec<EdgeKey> = self.records.keys().cloned().collect();
        for key in keys {
            self.remove(surface, &key);
        }
    }

    /// Per-frame label refresh: position at the screen midpoint, scale against
    /// node growth, and follow the host's own label fade when it exposes one.
    pub fn update_label(
        &mut self,
        surface: &mut dyn Surface,
        view: &Viewport,
        link: &GraphLink,
        show_labels: bool,
    ) {
        let key = link.key();
        let text_color = self.text_color;
        let Some(record) = self.records.get_mut(&key) else {
            return;
        };
        record.link = link.clone();
        let Some(handle) = record.text_handle else {
            return;
        };
        if !surface.contains(handle) {
            return;
        }

        let pos = label_position(link.source.pos(), link.target.pos(), view);
        let alpha = if show_labels {
            match (link.source.label_alpha, link.target.label_alpha) {
                (Some(a), Some(b)) => a.max(b),
                _ => DEFAULT_LABEL_ALPHA,
            }
        } else {
            0.0
        };
        surface.set_text(
            handle,
            TextUpdate {
                x: pos.x,
                y: pos.y,
                scale: label_scale(view.node_scale),
                alpha,
                fill: text_color,
            },
        );
    }

    /// Per-frame stroke refresh: recompute the offset endpoints and path for
    /// the current viewport, then fade out the host's own line so only the
    /// styled stroke shows. Self-edges draw no stroke.
    pub fn update_stroke(&self, surface: &mut dyn Surface, view: &Viewport, link: &GraphLink) {
        let key = link.key();
        let Some(record) = self.records.get(&key) else {
            return;
        };

        if !link.is_self_edge() {
            if let Some(handle) = record.stroke_handle {
                if surface.contains(handle) {
                    let ends = stroke_endpoints(
                        link.source.pos(),
                        link.source.weight,
                        link.target.pos(),
                        link.target.weight,
                        view,
                    );
                    let cmds =
                        stroke_path(record.shape, record.pattern, ends.start, ends.end);
                    if !cmds.is_empty() {
                        surface.set_stroke(
                            handle,
                            StrokePath {
                                width: stroke_width(view.node_scale),
                                color: record.color,
                                alpha: STROKE_ALPHA,
                                cmds,
                            },
                        );
                    }
                }
            }
        }

        if record.relation_type.is_some() && record.stroke_handle.is_some() {
            if let Some(host_line) = link.host_line {
                if surface.contains(host_line) {
                    surface.set_alpha(host_line, 0.0);
                }
            }
        }
    }
}
