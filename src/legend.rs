//! Reference-counted legend of relation types currently on screen.
//!
//! Rows are keyed by display label, not type name, so two types sharing a
//! label share one row. Rows stack top to bottom in acquisition order; when a
//! row's count drops to zero it is removed and the rows below it move up.

use crate::surface::{HandleId, Measurer, PathCmd, StrokePath, Surface, TextSpec, TextUpdate};

use crate::geometry::Vec2;

pub const LEGEND_X_OFFSET: f32 = 20.0;
pub const LEGEND_TOP_OFFSET: f32 = 5.0;
pub const LEGEND_ROW_HEIGHT: f32 = 17.0;
pub const LEGEND_LINE_LENGTH: f32 = 40.0;
pub const LEGEND_TEXT_GAP: f32 = 1.0;
pub const LEGEND_FONT_SIZE: f32 = 14.0;
pub const LEGEND_LINE_WIDTH: f32 = 2.0;

/// One legend row: a label and a sample line in the relation's color.
#[derive(Debug, Clone)]
pub struct LegendRow {
    pub label: String,
    pub color: u32,
    pub use_count: usize,
    pub text_handle: HandleId,
    pub line_handle: HandleId,
    /// Where the sample line starts, just after the measured label text.
    pub line_start_x: f32,
}

#[derive(Debug)]
pub struct Legend {
    rows: Vec<LegendRow>,
    visible: bool,
    text_color: u32,
}

impl Legend {
    pub fn new(visible: bool, text_color: u32) -> Self {
        Self {
            rows: Vec::new(),
            visible,
            text_color,
        }
    }

    pub fn rows(&self) -> &[LegendRow] {
        &self.rows
    }

    pub fn row(&self, label: &str) -> Option<&LegendRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Register one more annotation under `label`. Creates the row on first
    /// use, otherwise just bumps the count.
    pub fn acquire(
        &mut self,
        surface: &mut dyn Surface,
        measurer: &dyn Measurer,
        label: &str,
        color: u32,
    ) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.label == label) {
            row.use_count += 1;
            return;
        }
        let text_handle = surface.add_text(TextSpec {
            content: label.to_string(),
            font_size: LEGEND_FONT_SIZE,
            fill: self.text_color,
            centered: false,
            z_index: 1,
        });
        let line_handle = surface.add_stroke();
        let (text_width, _) = measurer.measure(label);
        let row = LegendRow {
            label: label.to_string(),
            color,
            use_count: 1,
            text_handle,
            line_handle,
            line_start_x: LEGEND_X_OFFSET + text_width + LEGEND_TEXT_GAP,
        };
        let index = self.rows.len();
        self.layout_row(surface, &row, index);
        self.rows.push(row);
    }

    /// Drop one annotation from `label`'s row. Removes the row at zero and
    /// reflows the rows below it.
    pub fn release(&mut self, surface: &mut dyn Surface, label: &str) {
        let Some(pos) = self.rows.iter().position(|r| r.label == label) else {
            return;
        };
        let row = &mut self.rows[pos];
        row.use_count = row.use_count.saturating_sub(1);
        if row.use_count > 0 {
            return;
        }
        let row = self.rows.remove(pos);
        if surface.contains(row.text_handle) {
            surface.remove(row.text_handle);
        }
        if surface.contains(row.line_handle) {
            surface.remove(row.line_handle);
        }
        for index in pos..self.rows.len() {
            let row = self.rows[index].clone();
            self.layout_row(surface, &row, index);
        }
    }

    /// Toggle visibility by alpha so rows keep their geometry.
    pub fn set_visible(&mut self, surface: &mut dyn Surface, visible: bool) {
        self.visible = visible;
        let alpha = if visible { 1.0 } else { 0.0 };
        for row in &self.rows {
            if surface.contains(row.text_handle) {
                surface.set_alpha(row.text_handle, alpha);
            }
            if surface.contains(row.line_handle) {
                surface.set_alpha(row.line_handle, alpha);
            }
        }
    }

    pub fn set_text_color(&mut self, surface: &mut dyn Surface, color: u32) {
        self.text_color = color;
        for index in 0..self.rows.len() {
            let row = self.rows[index].clone();
            self.layout_row(surface, &row, index);
        }
    }

    /// Write the row's text position and sample line for its stack index.
    fn layout_row(&self, surface: &mut dyn Surface, row: &LegendRow, index: usize) {
        let y = LEGEND_TOP_OFFSET + index as f32 * LEGEND_ROW_HEIGHT;
        let alpha = if self.visible { 1.0 } else { 0.0 };
        if surface.contains(row.text_handle) {
            surface.set_text(
                row.text_handle,
                TextUpdate {
                    x: LEGEND_X_OFFSET,
                    y,
                    scale: 1.0,
                    alpha,
                    fill: self.text_color,
                },
            );
        }
        if surface.contains(row.line_handle) {
            let line_y = y + LEGEND_ROW_HEIGHT / 2.0;
            surface.set_stroke(
                row.line_handle,
                StrokePath {
                    width: LEGEND_LINE_WIDTH,
                    color: row.color,
                    alpha,
                    cmds: vec![
                        PathCmd::MoveTo(Vec2::new(row.line_start_x, line_y)),
                        PathCmd::LineTo(Vec2::new(
                            row.line_start_x + LEGEND_LINE_LENGTH,
                            line_y,
                        )),
                    ],
                },
            );
        }
    }
}
