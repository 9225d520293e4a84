//! The host rendering boundary.
//!
//! The engine never draws pixels. It creates opaque text and stroke handles
//! on a [`Surface`] owned by the host and mutates them through the narrow
//! methods here. The host may tear drawables down between frames, so every
//! mutation is expected to be preceded by a [`Surface::contains`] check;
//! stale handles must never be double-released or written to.
//!
//! [`RecordingSurface`] is an in-memory implementation used by the demo
//! binary and the test suite.

use indexmap::IndexMap;

use crate::geometry::Vec2;

/// Opaque identifier of one drawable primitive on the host surface.
pub type HandleId = u64;

/// Initial attributes of a text primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpec {
    pub content: String,
    pub font_size: f32,
    /// Packed `0xRRGGBB` fill color.
    pub fill: u32,
    /// Anchor at the center of the text instead of the top-left corner.
    pub centered: bool,
    /// Stacking order; labels draw above strokes.
    pub z_index: i32,
}

/// Per-frame mutable text attributes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextUpdate {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub alpha: f32,
    pub fill: u32,
}

/// One path command of a retained stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
}

/// A complete stroke for one frame; setting it replaces whatever the handle
/// drew before (the "clear prior stroke" semantics of immediate-mode hosts).
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePath {
    pub width: f32,
    pub color: u32,
    pub alpha: f32,
    pub cmds: Vec<PathCmd>,
}

impl Default for StrokePath {
    fn default() -> Self {
        Self {
            width: 0.0,
            color: 0,
            alpha: 1.0,
            cmds: Vec::new(),
        }
    }
}

/// Drawable-object API of the host's rendering surface.
pub trait Surface {
    fn add_text(&mut self, spec: TextSpec) -> HandleId;
    fn add_stroke(&mut self) -> HandleId;
    /// Whether the handle is still in the live drawable set.
    fn contains(&self, handle: HandleId) -> bool;
    /// Remove and destroy a drawable. Unknown handles are ignored.
    fn remove(&mut self, handle: HandleId);
    fn set_text(&mut self, handle: HandleId, update: TextUpdate);
    fn set_text_content(&mut self, handle: HandleId, content: &str);
    fn set_stroke(&mut self, handle: HandleId, path: StrokePath);
    /// Set only the opacity of a text or stroke drawable.
    fn set_alpha(&mut self, handle: HandleId, alpha: f32);
}

/// Text metrics provider. Only the host knows how wide a rendered string is;
/// the legend needs widths to place sample lines after row labels.
pub trait Measurer {
    /// Size of the rendered text `(width, height)` in screen units.
    fn measure(&self, text: &str) -> (f32, f32);
}

/// Rough text metrics for hosts without a text engine (CLI, tests).
#[derive(Debug, Clone, Copy)]
pub struct HeuristicMeasurer {
    pub font_size: f32,
}

impl Default for HeuristicMeasurer {
    fn default() -> Self {
        Self { font_size: 14.0 }
    }
}

impl Measurer for HeuristicMeasurer {
    fn measure(&self, text: &str) -> (f32, f32) {
        let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = text.lines().count().max(1);
        (
            longest as f32 * self.font_size * 0.6,
            lines as f32 * self.font_size * 1.2,
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RecordingSurface
// ────────────────────────────────────────────────────────────────────────────

/// One retained drawable on a [`RecordingSurface`].
#[derive(Debug, Clone)]
pub enum Drawable {
    Text { spec: TextSpec, state: TextUpdate },
    Stroke { path: StrokePath },
}

/// In-memory [`Surface`] that retains all drawables, preserving insertion
/// order. Backs the demo binary and lets tests observe exactly what the
/// engine drew.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_handle: HandleId,
    drawables: IndexMap<HandleId, Drawable>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = HandleId> + '_ {
        self.drawables.keys().copied()
    }

    pub fn text(&self, handle: HandleId) -> Option<(&TextSpec, &TextUpdate)> {
        match self.drawables.get(&handle) {
            Some(Drawable::Text { spec, state }) => Some((spec, state)),
            _ => None,
        }
    }

    pub fn stroke(&self, handle: HandleId) -> Option<&StrokePath> {
        match self.drawables.get(&handle) {
            Some(Drawable::Stroke { path }) => Some(path),
            _ => None,
        }
    }

    /// Current opacity of any drawable.
    pub fn alpha(&self, handle: HandleId) -> Option<f32> {
        match self.drawables.get(&handle)? {
            Drawable::Text { state, .. } => Some(state.alpha),
            Drawable::Stroke { path } => Some(path.alpha),
        }
    }

    fn allocate(&mut self, drawable: Drawable) -> HandleId {
        self.next_handle += 1;
        self.drawables.insert(self.next_handle, drawable);
        self.next_handle
    }
}

impl Surface for RecordingSurface {
    fn add_text(&mut self, spec: TextSpec) -> HandleId {
        self.allocate(Drawable::Text {
            spec,
            state: TextUpdate {
                scale: 1.0,
                alpha: 1.0,
                ..TextUpdate::default()
            },
        })
    }

    fn add_stroke(&mut self) -> HandleId {
        self.allocate(Drawable::Stroke {
            path: StrokePath::default(),
        })
    }

    fn contains(&self, handle: HandleId) -> bool {
        self.drawables.contains_key(&handle)
    }

    fn remove(&mut self, handle: HandleId) {
        self.drawables.shift_remove(&handle);
    }

    fn set_text(&mut self, handle: HandleId, update: TextUpdate) {
        if let Some(Drawable::Text { state, .. }) = self.drawables.get_mut(&handle) {
            *state = update;
        }
    }

    fn set_text_content(&mut self, handle: HandleId, content: &str) {
        if let Some(Drawable::Text { spec, .. }) = self.drawables.get_mut(&handle) {
            spec.content = content.to_string();
        }
    }

    fn set_stroke(&mut self, handle: HandleId, path: StrokePath) {
        if let Some(Drawable::Stroke { path: current }) = self.drawables.get_mut(&handle) {
            *current = path;
        }
    }

    fn set_alpha(&mut self, handle: HandleId, alpha: f32) {
        match self.drawables.get_mut(&handle) {
            Some(Drawable::Text { state, .. }) => state.alpha = alpha,
            Some(Drawable::Stroke { path }) => path.alpha = alpha,
            None => {}
        }
    }
}
