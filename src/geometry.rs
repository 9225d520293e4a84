//! Screen-space geometry for link annotations.
//!
//! Pure functions: world→screen transforms, the normal/parallel offset
//! vectors that keep reciprocal strokes from overlapping, and path builders
//! for the straight/curved × solid/dashed stroke variants. All inputs are
//! per-frame snapshots; nothing here touches the surface.

use crate::model::Viewport;
use crate::style::{LinePattern, LineShape};
use crate::surface::PathCmd;

/// Length of one dash segment, in screen units.
pub const DASH_LENGTH: f32 = 8.0;
/// Gap between dash segments, in screen units.
pub const GAP_LENGTH: f32 = 8.0;
/// Curve control point offset as a fraction of the segment length.
pub const CURVE_FRACTION: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// World → screen: `screen = world * scale + pan`.
pub fn to_screen(world: Vec2, view: &Viewport) -> Vec2 {
    Vec2::new(
        world.x * view.scale + view.pan_x,
        world.y * view.scale + view.pan_y,
    )
}

/// Screen-space midpoint of the two endpoints; where the label sits.
pub fn label_position(source: Vec2, target: Vec2, view: &Viewport) -> Vec2 {
    let mid = Vec2::new((source.x + target.x) / 2.0, (source.y + target.y) / 2.0);
    to_screen(mid, view)
}

/// Labels shrink as nodes grow.
pub fn label_scale(node_scale: f32) -> f32 {
    1.0 / (3.0 * node_scale)
}

/// Stroke width thins as nodes grow.
pub fn stroke_width(node_scale: f32) -> f32 {
    3.0 / node_scale.sqrt()
}

/// Unit vector perpendicular to source→target (left-hand `(-dy, dx)`).
/// Zero for degenerate segments.
pub fn unit_normal(source: Vec2, target: Vec2) -> Vec2 {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return Vec2::default();
    }
    Vec2::new(-dy / len, dx / len)
}

/// Unit vector along source→target. Zero for degenerate segments.
pub fn unit_parallel(source: Vec2, target: Vec2) -> Vec2 {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return Vec2::default();
    }
    Vec2::new(dx / len, dy / len)
}

/// Screen endpoints for a link stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeEndpoints {
    pub start: Vec2,
    pub end: Vec2,
}

/// Compute where a stroke starts and ends on screen.
///
/// Both ends are pushed sideways by the same normal offset (`1.5·√scale`) so
/// a reciprocal stroke drawn for the reverse key lands on the other side of
/// the host's own line. Along the line, each end is inset by `8·√scale`
/// scaled with `weight/36 + 1`, so strokes stop short of large nodes.
pub fn stroke_endpoints(
    source: Vec2,
    source_weight: f32,
    target: Vec2,
    target_weight: f32,
    view: &Viewport,
) -> StrokeEndpoints {
    let n = unit_normal(source, target);
    let p = unit_parallel(source, target);
    let s = view.scale.sqrt();
    let (nx, ny) = (n.x * 1.5 * s, n.y * 1.5 * s);
    let (px, py) = (p.x * 8.0 * s, p.y * 8.0 * s);

    let mut start = to_screen(source, view);
    let mut end = to_screen(target, view);
    start.x += nx + (source_weight / 36.0 + 1.0) * px;
    start.y += ny + (source_weight / 36.0 + 1.0) * py;
    end.x += nx - (target_weight / 36.0 + 1.0) * px;
    end.y += ny - (target_weight / 36.0 + 1.0) * py;
    StrokeEndpoints { start, end }
}

/// A single straight segment.
pub fn straight_path(start: Vec2, end: Vec2) -> Vec<PathCmd> {
    vec![PathCmd::MoveTo(start), PathCmd::LineTo(end)]
}

/// Discrete dash segments of [`DASH_LENGTH`] separated by [`GAP_LENGTH`];
/// `floor(distance / (dash + gap))` dashes, final partial dash omitted.
pub fn dashed_path(start: Vec2, end: Vec2) -> Vec<PathCmd> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance <= f32::EPSILON {
        return Vec::new();
    }
    let period = DASH_LENGTH + GAP_LENGTH;
    let count = (distance / period).floor() as usize;
    let mut cmds = Vec::with_capacity(count * 2);
    for i in 0..count {
        let from = (i as f32 * period) / distance;
        let to = (i as f32 * period + DASH_LENGTH) / distance;
        cmds.push(PathCmd::MoveTo(Vec2::new(
            start.x + dx * from,
            start.y + dy * from,
        )));
        cmds.push(PathCmd::LineTo(Vec2::new(
            start.x + dx * to,
            start.y + dy * to,
        )));
    }
    cmds
}

/// Quadratic curve through a control point offset perpendicular to the
/// midpoint by [`CURVE_FRACTION`] of the segment length. The offset sign is
/// fixed by the `(-dy, dx)` convention, so a given source→target order always
/// bows to the same side.
pub fn curved_path(start: Vec2, end: Vec2) -> Vec<PathCmd> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance <= f32::EPSILON {
        return Vec::new();
    }
    let mid = Vec2::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
    let curvature = distance * CURVE_FRACTION;
    let ctrl = Vec2::new(
        mid.x - dy / distance * curvature,
        mid.y + dx / distance * curvature,
    );
    vec![PathCmd::MoveTo(start), PathCmd::QuadTo { ctrl, to: end }]
}

/// Build the stroke path for a shape/pattern combination.
/// Curved+dashed is not drawn as a distinct combination; it degrades to a
/// solid curve.
pub fn stroke_path(
    shape: LineShape,
    pattern: LinePattern,
    start: Vec2,
    end: Vec2,
) -> Vec<PathCmd> {
    match (shape, pattern) {
        (LineShape::Curved, _) => curved_path(start, end),
        (LineShape::Straight, LinePattern::Dashed) => dashed_path(start, end),
        (LineShape::Straight, LinePattern::Solid) => straight_path(start, end),
    }
}
