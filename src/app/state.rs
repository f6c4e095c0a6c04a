#![cfg(feature = "egui")]

use eframe::egui::{self, TextureHandle};

use crate::connect::Connector;
use crate::crop::{CropRegion, circular_crop};
use crate::loader::{ImageLoader, LoadTarget, LoadTicket};
use crate::model::Bitmap;
use crate::scene::Scene;
use crate::table::Table;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Diagram,
    Table,
}

/// Where a confirmed crop lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropTarget {
    Ticket(LoadTicket),
    TableCell { row: usize, col: usize },
}

/// Pending circular-crop interaction for a freshly picked image.
pub struct CropDialog {
    pub target: CropTarget,
    pub source: Bitmap,
    pub region: CropRegion,
    pub preview: Option<TextureHandle>,
    pub open: bool,
}

impl CropDialog {
    pub fn new(target: CropTarget, source: Bitmap) -> Self {
        let region = CropRegion::centered_default(source.width, source.height);
        Self {
            target,
            source,
            region,
            preview: None,
            open: true,
        }
    }
}

/// Interactive editor application: one scene, one table, plus the transient
/// interaction state (viewport, connection authoring, pending crops).
pub struct EditorApp {
    pub scene: Scene,
    pub table: Table,
    pub viewport: Viewport,
    pub connector: Connector,
    pub loader: ImageLoader,
    pub tab: Tab,
    pub crop_dialog: Option<CropDialog>,
    pub status: Option<String>,
    /// GPU textures for slot images, rebuilt when `textures_dirty` is set.
    pub slot_textures: Vec<Option<TextureHandle>>,
    pub logo_texture: Option<TextureHandle>,
    pub textures_dirty: bool,
}

impl EditorApp {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            table: Table::default(),
            viewport: Viewport::default(),
            connector: Connector::default(),
            loader: ImageLoader::default(),
            tab: Tab::Diagram,
            crop_dialog: None,
            status: None,
            slot_textures: Vec::new(),
            logo_texture: None,
            textures_dirty: true,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    fn pick_and_decode(&mut self) -> Option<Bitmap> {
        let path = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()?;
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) => {
                self.set_status(format!("Could not read {}: {e}", path.display()));
                return None;
            }
        };
        match Bitmap::decode(&bytes) {
            Ok(source) => Some(source),
            Err(e) => {
                self.set_status(format!("Could not decode {}: {e}", path.display()));
                None
            }
        }
    }

    /// Open the native file picker and start a load for `target`. Slot
    /// images go through the crop dialog before they land in the scene.
    pub fn pick_image(&mut self, target: LoadTarget) {
        let Some(source) = self.pick_and_decode() else {
            return;
        };
        let ticket = self.loader.begin(target);
        match target {
            LoadTarget::Slot(_) => {
                self.crop_dialog = Some(CropDialog::new(CropTarget::Ticket(ticket), source));
            }
            // The logo keeps its original shape; no crop step.
            LoadTarget::Logo => {
                self.loader.apply(&mut self.scene, ticket, source);
                self.textures_dirty = true;
            }
        }
    }

    /// Pick an image for a table cell; it goes through the same crop dialog.
    pub fn pick_table_image(&mut self, row: usize, col: usize) {
        if let Some(source) = self.pick_and_decode() {
            self.crop_dialog = Some(CropDialog::new(CropTarget::TableCell { row, col }, source));
        }
    }

    /// Confirm the crop dialog: mask the selected region and deliver the
    /// result to its target.
    pub fn apply_crop(&mut self) {
        let Some(dialog) = self.crop_dialog.take() else {
            return;
        };
        match circular_crop(&dialog.source, dialog.region) {
            Ok(cropped) => match dialog.target {
                CropTarget::Ticket(ticket) => {
                    self.loader.apply(&mut self.scene, ticket, cropped);
                    self.textures_dirty = true;
                }
                CropTarget::TableCell { row, col } => {
                    if let Err(e) = self.table.set_image(row, col, cropped) {
                        self.set_status(format!("Image did not apply: {e}"));
                    }
                }
            },
            Err(e) => self.set_status(format!("Crop failed: {e}")),
        }
    }

    /// Rebuild slot and logo textures from the scene bitmaps.
    pub fn refresh_textures(&mut self, ctx: &egui::Context) {
        if !self.textures_dirty {
            return;
        }
        self.slot_textures = self
            .scene
            .slots()
            .iter()
            .map(|slot| {
                slot.image.as_ref().map(|bmp| {
                    ctx.load_texture(
                        format!("slot-{}", slot.index),
                        bitmap_to_color_image(bmp),
                        egui::TextureOptions::LINEAR,
                    )
                })
            })
            .collect();
        self.logo_texture = self.scene.logo.image.as_ref().map(|bmp| {
            ctx.load_texture("logo", bitmap_to_color_image(bmp), egui::TextureOptions::LINEAR)
        });
        self.textures_dirty = false;
    }
}

pub fn bitmap_to_color_image(bmp: &Bitmap) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied(
        [bmp.width as usize, bmp.height as usize],
        &bmp.rgba,
    )
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        super::ui::update(self, ctx, _frame);
    }
}
