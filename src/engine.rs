//! The per-frame overlay engine.
//!
//! The host drives [`OverlayEngine::tick`] from its animation loop. Geometry
//! (label positions, stroke paths) is refreshed every frame; topology
//! (admitting new edges, evicting stale ones) only every
//! [`RECONCILE_INTERVAL`] frames, since edge churn is rare next to node
//! motion.

use crate::metadata::MetadataSource;
use crate::model::FrameView;
use crate::registry::AnnotationRegistry;
use crate::settings::OverlaySettings;
use crate::style::StyleRegistry;
use crate::surface::{Measurer, Surface};

/// Frames between topology reconciliations. Frame 0 reconciles, so a fresh
/// engine annotates on its first tick.
pub const RECONCILE_INTERVAL: u64 = 10;

#[derive(Debug)]
pub struct OverlayEngine {
    registry: AnnotationRegistry,
    styles: StyleRegistry,
    settings: OverlaySettings,
    frame: u64,
    active: bool,
}

impl OverlayEngine {
    pub fn new(styles: StyleRegistry, settings: OverlaySettings) -> Self {
        Self {
            registry: AnnotationRegistry::new(settings.show_legend),
            styles,
            settings,
            frame: 0,
            active: true,
        }
    }

    pub fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleRegistry {
        &mut self.styles
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop ticking. Drawables stay on the surface; the host removes them by
    /// calling [`OverlayEngine::restart`] or tearing the surface down itself.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Drop all annotation state and start annotating from scratch, e.g.
    /// after a style definition changed.
    pub fn restart(&mut self, surface: &mut dyn Surface) {
        self.registry.destroy_all(surface);
        self.frame = 0;
        self.active = true;
    }

    /// Apply new settings. Legend visibility toggles in place; changing
    /// stroke visibility rebuilds all annotations since stroke handles and
    /// legend references only exist while colors are on.
    pub fn apply_settings(&mut self, surface: &mut dyn Surface, settings: OverlaySettings) {
        if settings.show_legend != self.settings.show_legend {
            self.registry
                .set_legend_visible(surface, settings.show_legend);
        }
        let rebuild = settings.show_colors != self.settings.show_colors;
        self.settings = settings;
        if rebuild {
            self.registry.destroy_all(surface);
            self.frame = 0;
        }
    }

    /// Adopt the host theme's text color for labels and legend rows.
    pub fn set_text_color(&mut self, surface: &mut dyn Surface, color: u32) {
        self.registry.set_text_color(surface, color);
    }

    /// Advance one animation frame. Returns whether the engine wants further
    /// ticks; `false` after [`OverlayEngine::stop`], letting the host drop the
    /// callback cooperatively.
    pub fn tick(
        &mut self,
        surface: &mut dyn Surface,
        measurer: &dyn Measurer,
        metadata: &dyn MetadataSource,
        frame: &FrameView,
    ) -> bool {
        if !self.active {
            return false;
        }
        let sync_topology = self.frame % RECONCILE_INTERVAL == 0;
        self.frame = self.frame.wrapping_add(1);

        if sync_topology {
            self.registry.reconcile(surface, &frame.links);
        }

        for link in &frame.links {
            if sync_topology && !self.registry.contains(&link.key()) {
                self.registry.upsert(
                    surface,
                    measurer,
                    metadata,
                    &self.styles,
                    link,
                    self.settings.show_colors,
                );
            }
            self.registry
                .update_label(surface, &frame.viewport, link, self.settings.show_labels);
            if self.settings.show_colors {
                self.registry.update_stroke(surface, &frame.viewport, link);
            }
        }
        self.active
    }
}
