#![cfg(feature = "egui")]

use eframe::egui::{self, Color32, Pos2, Sense, Vec2};

use crate::color;
use crate::connect::ClickOutcome;
use crate::export;
use crate::loader::LoadTarget;
use crate::model::{LegendConfig, Point, CANVAS_HEIGHT, CANVAS_WIDTH, SLOT_COUNT_RANGE};
use crate::registry::{TypePatch, MAX_THICKNESS, MIN_THICKNESS};
use crate::table;

use super::render;
use super::state::{bitmap_to_color_image, EditorApp, Tab};

pub fn update(app: &mut EditorApp, ctx: &egui::Context, _frame: &mut eframe::Frame) {
    app.refresh_textures(ctx);

    egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut app.tab, Tab::Diagram, "Diagram");
            ui.selectable_value(&mut app.tab, Tab::Table, "Impression table");
            ui.separator();
            if let Some(status) = &app.status {
                ui.label(status.clone());
            }
        });
    });

    match app.tab {
        Tab::Diagram => {
            egui::SidePanel::left("controls")
                .min_width(280.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| diagram_controls(app, ui));
                });
            egui::CentralPanel::default().show(ctx, |ui| canvas(app, ui));
        }
        Tab::Table => {
            egui::CentralPanel::default().show(ctx, |ui| {
                egui::ScrollArea::both().show(ui, |ui| table_ui(app, ui));
            });
        }
    }

    crop_dialog(app, ctx);
}

// ── side panel ─────────────────────────────────────────────────────────────

/// Edit a hex color string through the native color button; writes back only
/// on change so hand-typed values survive.
fn hex_color_edit(ui: &mut egui::Ui, value: &mut String) -> bool {
    let (r, g, b) = color::parse_hex(value).unwrap_or((0, 0, 0));
    let mut rgb = [r, g, b];
    let changed = ui.color_edit_button_srgb(&mut rgb).changed();
    if changed {
        *value = color::format_hex(rgb[0], rgb[1], rgb[2]);
    }
    changed
}

fn diagram_controls(app: &mut EditorApp, ui: &mut egui::Ui) {
    ui.heading("Ring");
    let mut count = app.scene.slot_count();
    ui.horizontal(|ui| {
        ui.label("Slots:");
        if ui
            .add(egui::Slider::new(
                &mut count,
                SLOT_COUNT_RANGE.clone(),
            ))
            .changed()
            && app.scene.set_slot_count(count).is_ok()
        {
            app.textures_dirty = true;
        }
    });
    let mut spacing = app.scene.style.spacing;
    ui.horizontal(|ui| {
        ui.label("Spacing:");
        if ui
            .add(egui::Slider::new(&mut spacing, 0.0..=200.0))
            .changed()
        {
            app.scene.set_spacing(spacing);
        }
    });
    ui.horizontal(|ui| {
        ui.label("Border:");
        ui.add(
            egui::Slider::new(&mut app.scene.style.border_thickness, 0.5..=5.0).step_by(0.5),
        );
        hex_color_edit(ui, &mut app.scene.style.border_color);
    });

    ui.separator();
    ui.heading("Connections");
    let mut authoring = app.connector.is_authoring();
    if ui.checkbox(&mut authoring, "Connect mode").changed() {
        app.connector.set_authoring(authoring);
    }
    type_controls(app, ui);
    connection_list(app, ui);

    ui.separator();
    ui.heading("Legend");
    ui.checkbox(&mut app.scene.legend.visible, "Show legend");
    ui.horizontal(|ui| {
        ui.label("Font size:");
        ui.add(egui::Slider::new(&mut app.scene.legend.font_size, 10.0..=30.0));
    });
    ui.horizontal(|ui| {
        ui.label("Position:");
        ui.add(
            egui::DragValue::new(&mut app.scene.legend.position.x)
                .range(0.0..=LegendConfig::MAX_X),
        );
        ui.add(
            egui::DragValue::new(&mut app.scene.legend.position.y)
                .range(0.0..=LegendConfig::MAX_Y),
        );
        if ui.button("Reset").clicked() {
            app.scene.legend.reset();
        }
    });

    ui.separator();
    ui.heading("Logo");
    ui.horizontal(|ui| {
        if ui.button("Pick image…").clicked() {
            app.pick_image(LoadTarget::Logo);
        }
        if app.scene.logo.image.is_some() && ui.button("Remove").clicked() {
            app.scene.set_logo_image(None);
            app.textures_dirty = true;
        }
    });
    if app.scene.logo.image.is_some() {
        ui.horizontal(|ui| {
            ui.label("Position:");
            ui.add(egui::DragValue::new(&mut app.scene.logo.position.x).range(0.0..=CANVAS_WIDTH));
            ui.add(egui::DragValue::new(&mut app.scene.logo.position.y).range(0.0..=CANVAS_HEIGHT));
        });
        let mut scale = app.scene.logo.scale;
        ui.horizontal(|ui| {
            ui.label("Scale:");
            if ui.add(egui::Slider::new(&mut scale, 0.1..=3.0)).changed() {
                app.scene.set_logo_scale(scale);
            }
        });
        let mut opacity = app.scene.logo.opacity;
        ui.horizontal(|ui| {
            ui.label("Opacity:");
            if ui.add(egui::Slider::new(&mut opacity, 0.0..=1.0)).changed() {
                app.scene.set_logo_opacity(opacity);
            }
        });
    }

    ui.separator();
    ui.heading("Scene");
    ui.horizontal(|ui| {
        if ui.button("Export PNG…").clicked() {
            export_diagram(app);
        }
        if ui.button("Save…").clicked() {
            save_scene(app);
        }
        if ui.button("Open…").clicked() {
            open_scene(app);
        }
    });
}

fn type_controls(app: &mut EditorApp, ui: &mut egui::Ui) {
    let type_ids: Vec<u32> = app.scene.registry.iter().map(|t| t.id).collect();
    let mut selected = app.scene.registry.selected_id();
    let mut patches: Vec<(u32, TypePatch)> = Vec::new();
    let mut remove: Option<u32> = None;

    for id in &type_ids {
        let Some(ty) = app.scene.registry.get(*id) else {
            continue;
        };
        let mut name = ty.name.clone();
        let mut color_val = ty.color.clone();
        let mut thickness = ty.thickness;
        ui.horizontal(|ui| {
            ui.radio_value(&mut selected, *id, "");
            let mut patch = TypePatch::default();
            if hex_color_edit(ui, &mut color_val) {
                patch.color = Some(color_val);
            }
            if ui
                .add(egui::TextEdit::singleline(&mut name).desired_width(90.0))
                .changed()
            {
                patch.name = Some(name);
            }
            if ui
                .add(
                    egui::DragValue::new(&mut thickness)
                        .range(MIN_THICKNESS..=MAX_THICKNESS)
                        .speed(0.1),
                )
                .changed()
            {
                patch.thickness = Some(thickness);
            }
            if patch.name.is_some() || patch.color.is_some() || patch.thickness.is_some() {
                patches.push((*id, patch));
            }
            let can_delete = type_ids.len() > 1;
            if ui
                .add_enabled(can_delete, egui::Button::new("🗑"))
                .clicked()
            {
                remove = Some(*id);
            }
        });
    }

    if selected != app.scene.registry.selected_id() {
        app.scene.registry.select(selected);
    }
    for (id, patch) in patches {
        let _ = app.scene.registry.update(id, patch);
    }
    if let Some(id) = remove {
        if let Err(e) = app.scene.registry.remove(id) {
            app.set_status(e.to_string());
        }
    }
    if ui.button("Add type").clicked() {
        let id = app.scene.registry.add(None);
        app.scene.registry.select(id);
    }
}

fn connection_list(app: &mut EditorApp, ui: &mut egui::Ui) {
    if app.scene.connections().is_empty() {
        return;
    }
    ui.collapsing("Edges", |ui| {
        let conns: Vec<_> = app.scene.connections().to_vec();
        let type_ids: Vec<(u32, String)> = app
            .scene
            .registry
            .iter()
            .map(|t| (t.id, t.name.clone()))
            .collect();
        for conn in conns {
            ui.horizontal(|ui| {
                ui.label(format!("{} → {}", conn.from + 1, conn.to + 1));
                let current_name = type_ids
                    .iter()
                    .find(|(id, _)| *id == conn.type_id)
                    .map_or("?", |(_, n)| n.as_str());
                egui::ComboBox::from_id_salt(("edge-type", conn.id))
                    .selected_text(current_name)
                    .show_ui(ui, |ui| {
                        for (id, name) in &type_ids {
                            if ui
                                .selectable_label(*id == conn.type_id, name)
                                .clicked()
                            {
                                let _ = app.scene.update_connection(conn.id, *id);
                            }
                        }
                    });
                if ui.button("🗑").clicked() {
                    app.scene.remove_connection(conn.id);
                }
            });
        }
    });
}

// ── canvas ─────────────────────────────────────────────────────────────────

fn canvas(app: &mut EditorApp, ui: &mut egui::Ui) {
    let avail = ui.available_rect_before_wrap();
    let resp = ui.interact(avail, ui.id().with("canvas"), Sense::click_and_drag());

    if resp.dragged() {
        let d = resp.drag_delta();
        let offset = app.viewport.offset;
        app.viewport
            .on_drag_move(Point::new(offset.x + d.x, offset.y + d.y));
    }

    if let Some(pos) = resp.hover_pos() {
        let scroll_y = ui.input(|i| i.raw_scroll_delta.y);
        if scroll_y.abs() > 0.0 {
            let pointer = Point::new(pos.x - avail.left(), pos.y - avail.top());
            app.viewport.on_wheel(pointer, if scroll_y > 0.0 { 1 } else { -1 });
        }
        app.connector.pointer_moved(render::to_canvas(app, avail, pos));
    } else {
        app.connector.pointer_left();
    }

    if resp.clicked() {
        if let Some(pos) = resp.interact_pointer_pos() {
            if let Some(slot) = render::slot_at(app, avail, pos) {
                match app.connector.click_slot(slot, &mut app.scene) {
                    ClickOutcome::AssignImage(index) => {
                        app.pick_image(LoadTarget::Slot(index));
                    }
                    ClickOutcome::Committed(id) => {
                        app.set_status(format!("Connection {id} created"));
                    }
                    ClickOutcome::AnchorSet(_) | ClickOutcome::AnchorCancelled => {}
                }
            }
        }
    }
    // Right click clears a slot image.
    if resp.secondary_clicked() {
        if let Some(pos) = resp.interact_pointer_pos() {
            if let Some(slot) = render::slot_at(app, avail, pos) {
                app.scene.clear_slot_image(slot);
                app.textures_dirty = true;
            }
        }
    }

    render::draw_scene(app, ui, avail);

    // Floating zoom controls, drawn over the canvas corner.
    egui::Area::new("zoom_controls".into())
        .fixed_pos(Pos2::new(avail.left() + 8.0, avail.top() + 8.0))
        .show(ui.ctx(), |ui| {
            egui::Frame::menu(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    // on_wheel rejects steps past the scale range itself.
                    let center = Point::new(avail.width() / 2.0, avail.height() / 2.0);
                    if ui.small_button("−").clicked() {
                        app.viewport.on_wheel(center, -1);
                    }
                    if ui.small_button("+").clicked() {
                        app.viewport.on_wheel(center, 1);
                    }
                    if ui.small_button("Reset").clicked() {
                        app.viewport.reset();
                    }
                    ui.label(format!("{}%", (app.viewport.scale * 100.0).round() as i32));
                });
            });
        });
}

// ── table tab ──────────────────────────────────────────────────────────────

fn table_ui(app: &mut EditorApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let mut rows = app.table.rows();
        let mut cols = app.table.cols();
        ui.label("Rows:");
        let rows_changed = ui
            .add(egui::DragValue::new(&mut rows).range(table::ROW_RANGE))
            .changed();
        ui.label("Columns:");
        let cols_changed = ui
            .add(egui::DragValue::new(&mut cols).range(table::COL_RANGE))
            .changed();
        if rows_changed || cols_changed {
            let _ = app.table.set_dimensions(rows, cols);
        }
        ui.separator();
        ui.checkbox(&mut app.table.border.visible, "Borders");
        ui.add(egui::Slider::new(&mut app.table.border.width, 1.0..=4.0).step_by(1.0));
        hex_color_edit(ui, &mut app.table.border.color);
        ui.separator();
        if ui.button("Reset").clicked() {
            app.table.reset();
        }
        if ui.button("Export CSV…").clicked() {
            export_table_csv(app);
        }
        if ui.button("Export PNG…").clicked() {
            export_table_png(app);
        }
    });
    ui.separator();

    let cols = app.table.cols();
    let rows = app.table.rows();
    egui::Grid::new("impression-table")
        .num_columns(cols)
        .spacing([6.0, 6.0])
        .show(ui, |ui| {
            for col in 0..cols {
                let mut header = app.table.header(col);
                if col < 3 {
                    ui.strong(header);
                } else if ui
                    .add(egui::TextEdit::singleline(&mut header).desired_width(120.0))
                    .changed()
                {
                    app.table.set_header(col, header);
                }
            }
            ui.end_row();
            for row in 0..rows {
                for col in 0..cols {
                    table_cell_ui(app, ui, row, col);
                }
                ui.end_row();
            }
        });
}

fn table_cell_ui(app: &mut EditorApp, ui: &mut egui::Ui, row: usize, col: usize) {
    let has_image = app
        .table
        .cell(row, col)
        .is_some_and(|c| c.image.is_some());
    ui.horizontal(|ui| {
        if has_image {
            ui.label(table::IMAGE_PLACEHOLDER);
            if ui.small_button("✕").clicked() {
                app.table.clear_image(row, col);
            }
        } else {
            let mut text = app
                .table
                .cell(row, col)
                .map(|c| c.text.clone())
                .unwrap_or_default();
            if ui
                .add(egui::TextEdit::singleline(&mut text).desired_width(120.0))
                .changed()
            {
                let _ = app.table.set_text(row, col, text);
            }
            if ui.small_button("🖼").clicked() {
                app.pick_table_image(row, col);
            }
        }
    });
}

// ── crop dialog ────────────────────────────────────────────────────────────

fn crop_dialog(app: &mut EditorApp, ctx: &egui::Context) {
    let Some(dialog) = app.crop_dialog.as_mut() else {
        return;
    };
    if dialog.preview.is_none() {
        dialog.preview = Some(ctx.load_texture(
            "crop-preview",
            bitmap_to_color_image(&dialog.source),
            egui::TextureOptions::LINEAR,
        ));
    }

    let mut apply = false;
    let mut cancel = false;
    let mut open = dialog.open;
    egui::Window::new("Crop image")
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui| {
            let (w, h) = (dialog.source.width, dialog.source.height);
            let max_size = w.min(h);
            ui.horizontal(|ui| {
                ui.label("Size:");
                ui.add(egui::Slider::new(&mut dialog.region.size, 1..=max_size));
            });
            dialog.region.x = dialog.region.x.min(w.saturating_sub(dialog.region.size));
            dialog.region.y = dialog.region.y.min(h.saturating_sub(dialog.region.size));
            ui.horizontal(|ui| {
                ui.label("Offset:");
                ui.add(
                    egui::DragValue::new(&mut dialog.region.x)
                        .range(0..=w.saturating_sub(dialog.region.size)),
                );
                ui.add(
                    egui::DragValue::new(&mut dialog.region.y)
                        .range(0..=h.saturating_sub(dialog.region.size)),
                );
            });

            if let Some(texture) = &dialog.preview {
                let scale = (320.0 / w as f32).min(320.0 / h as f32).min(1.0);
                let size = Vec2::new(w as f32, h as f32) * scale;
                let resp = ui.add(
                    egui::Image::new(texture)
                        .fit_to_exact_size(size)
                        .sense(Sense::hover()),
                );
                // Outline the selected circle on the preview.
                let top_left = resp.rect.min
                    + Vec2::new(dialog.region.x as f32, dialog.region.y as f32) * scale;
                let r = dialog.region.size as f32 * scale / 2.0;
                ui.painter().circle_stroke(
                    Pos2::new(top_left.x + r, top_left.y + r),
                    r,
                    egui::Stroke::new(2.0, Color32::from_rgb(0, 120, 255)),
                );
            }

            ui.horizontal(|ui| {
                if ui.button("Apply").clicked() {
                    apply = true;
                }
                // Closing without applying drops the pending image.
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

    if apply {
        app.apply_crop();
    } else if cancel || !open {
        app.crop_dialog = None;
    }
}

// ── exports ────────────────────────────────────────────────────────────────

fn export_diagram(app: &mut EditorApp) {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(export::EXPORT_FILENAME)
        .add_filter("PNG", &["png"])
        .save_file()
    else {
        return;
    };
    match export::export_png(&app.scene, &path) {
        Ok(()) => app.set_status(format!("Exported {}", path.display())),
        Err(e) => app.set_status(format!("Export failed: {e}")),
    }
}

fn save_scene(app: &mut EditorApp) {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name("scene.json")
        .add_filter("JSON", &["json"])
        .save_file()
    else {
        return;
    };
    let result = serde_json::to_string_pretty(&app.scene)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
    match result {
        Ok(()) => app.set_status(format!("Saved {}", path.display())),
        Err(e) => app.set_status(format!("Save failed: {e}")),
    }
}

fn open_scene(app: &mut EditorApp) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("JSON", &["json"])
        .pick_file()
    else {
        return;
    };
    let result = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| serde_json::from_str(&json).map_err(|e| e.to_string()));
    match result {
        Ok(scene) => {
            app.scene = scene;
            app.textures_dirty = true;
            app.set_status(format!("Opened {}", path.display()));
        }
        Err(e) => app.set_status(format!("Open failed: {e}")),
    }
}

fn export_table_csv(app: &mut EditorApp) {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(table::CSV_FILENAME)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };
    match std::fs::write(&path, app.table.csv()) {
        Ok(()) => app.set_status(format!("Exported {}", path.display())),
        Err(e) => app.set_status(format!("Export failed: {e}")),
    }
}

fn export_table_png(app: &mut EditorApp) {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(table::IMAGE_FILENAME)
        .add_filter("PNG", &["png"])
        .save_file()
    else {
        return;
    };
    let result = app
        .table
        .printable_png()
        .and_then(|bytes| {
            std::fs::write(&path, bytes)
                .map_err(|e| crate::error::EditError::Resource(e.to_string()))
        });
    match result {
        Ok(()) => app.set_status(format!("Exported {}", path.display())),
        Err(e) => app.set_status(format!("Export failed: {e}")),
    }
}
