//! Egui-based interactive editor (feature = "egui").
//!
//! Split into submodules: `state` owns the application struct, `ui` builds
//! the panels and wires input, `render` paints the diagram canvas.

#![cfg(feature = "egui")]

mod render;
mod state;
mod ui;

pub use state::{CropDialog, CropTarget, EditorApp, Tab};

use crate::error::{EditError, Result};
use crate::scene::Scene;

/// Open a native window and run the editor until it is closed.
pub fn run(scene: Scene) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Ringboard",
        options,
        Box::new(|_cc| Ok(Box::new(EditorApp::new(scene)))),
    )
    .map_err(|e| EditError::Resource(format!("window: {e}")))
}
