//! Typed relation annotations for force-directed graph views.
//!
//! This crate provides an overlay engine that classifies the edges of a
//! host-owned node-link graph from per-entity key/value metadata and keeps
//! label, stroke, and legend primitives in sync with the host's pan, zoom,
//! and node positions every frame. The host's rendering surface, physics
//! simulation, and metadata index stay external; the engine consumes them
//! through the narrow traits in [`surface`] and [`metadata`].
//!
//! The binary `relgraph` demonstrates usage: it runs the engine over a JSON
//! graph snapshot and prints the resulting annotation state as JSON.

pub mod engine;
pub mod geometry;
pub mod legend;
pub mod metadata;
pub mod model;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod style;
pub mod surface;
