//! Ringboard: an impression-diagram editor.
//!
//! The core of the crate is a pure scene model — image slots arranged on a
//! ring, typed connections between them, a legend and an optional logo —
//! plus an SVG/PNG exporter and a small table editor. Everything here is
//! headless and fully testable.
//!
//! The binary `ringboard` exports a scene (or table) to PNG from the
//! command line.

pub mod color;
pub mod connect;
pub mod crop;
pub mod error;
pub mod export;
pub mod layout;
pub mod loader;
pub mod model;
pub mod registry;
pub mod scene;
pub mod table;
pub mod viewport;

// The interactive editor lives behind the `egui` feature flag so the
// headless export path builds without a windowing stack.
#[cfg(feature = "egui")]
pub mod app;
