use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::surface::HandleId;

// ────────────────────────────────────────────────────────────────────────────
// Host graph snapshots
// ────────────────────────────────────────────────────────────────────────────

/// Read-only snapshot of one graph node as exposed by the host layout engine.
///
/// Positions and weights are owned and mutated by the host's physics
/// simulation every frame; the engine only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Stable entity identifier.
    pub id: String,
    pub x: f32,
    pub y: f32,
    /// Degree-like scalar; heavier nodes push stroke endpoints further out.
    #[serde(default)]
    pub weight: f32,
    /// Opacity of the host's own node label, when the host exposes one.
    #[serde(default)]
    pub label_alpha: Option<f32>,
}

impl NodeSnapshot {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A directed edge supplied by the host graph, refreshed every frame.
/// Self-edges (`source.id == target.id`) are permitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: NodeSnapshot,
    pub target: NodeSnapshot,
    /// Handle of the host's own default edge line, when exposed. The overlay
    /// fades it out so only the styled stroke remains visible.
    #[serde(default)]
    pub host_line: Option<HandleId>,
}

impl GraphLink {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(&self.source.id, &self.target.id)
    }

    pub fn is_self_edge(&self) -> bool {
        self.source.id == self.target.id
    }
}

/// Ordered `(source, target)` pair identifying a tracked edge.
/// `(a, b)` and `(b, a)` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source: String,
    pub target: String,
}

impl EdgeKey {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    /// The key of the reciprocal edge.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }
}

/// Merge state for reciprocal edges sharing the same endpoint pair.
///
/// When both `(a, b)` and `(b, a)` are tracked, exactly one record is `First`
/// and the other `Second`; their label texts are padded so the two labels
/// render stacked instead of overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PairStatus {
    #[default]
    None,
    First,
    Second,
}

// ────────────────────────────────────────────────────────────────────────────
// Per-frame view state
// ────────────────────────────────────────────────────────────────────────────

/// Pan/zoom state of the host renderer for one frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub pan_x: f32,
    pub pan_y: f32,
    /// Zoom scale applied to world coordinates.
    pub scale: f32,
    /// Node-scale factor; labels shrink and strokes thin as it grows.
    pub node_scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            scale: 1.0,
            node_scale: 1.0,
        }
    }
}

/// Everything the engine reads from the host in one frame: the current
/// viewport and the authoritative edge list. Edge existence is determined
/// solely by membership in `links`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameView {
    #[serde(default)]
    pub viewport: Viewport,
    pub links: Vec<GraphLink>,
}
