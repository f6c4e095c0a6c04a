#![cfg(feature = "egui")]

use eframe::egui::epaint::Shape;
use eframe::egui::{self, Align2, Color32, Pos2, Rect, Stroke, Vec2};

use crate::color;
use crate::model::{CANVAS_HEIGHT, CANVAS_WIDTH, Point, SLOT_RADIUS};

use super::state::EditorApp;

pub fn hex_color(val: &str) -> Color32 {
    match color::parse_hex(val) {
        Some((r, g, b)) => Color32::from_rgb(r, g, b),
        None => Color32::BLACK,
    }
}

/// Screen position of a canvas point, given the canvas widget rect.
pub fn to_screen(app: &EditorApp, rect: Rect, p: Point) -> Pos2 {
    let s = app.viewport.to_screen(p);
    Pos2::new(rect.left() + s.x, rect.top() + s.y)
}

/// Canvas point under a screen position.
pub fn to_canvas(app: &EditorApp, rect: Rect, pos: Pos2) -> Point {
    app.viewport
        .to_canvas(Point::new(pos.x - rect.left(), pos.y - rect.top()))
}

/// Topmost slot whose circle contains `pos`, if any.
pub fn slot_at(app: &EditorApp, rect: Rect, pos: Pos2) -> Option<usize> {
    let canvas = to_canvas(app, rect, pos);
    app.scene
        .slots()
        .iter()
        .rev()
        .find(|slot| app.scene.slot_position(slot.index).distance(canvas) <= SLOT_RADIUS)
        .map(|slot| slot.index)
}

/// Paint the whole diagram: canvas background, connections, the dashed
/// preview edge, slots, legend and logo. Matches the export draw order, with
/// screen-only affordances (preview, anchor highlight) added on top.
pub fn draw_scene(app: &EditorApp, ui: &egui::Ui, rect: Rect) {
    let painter = ui.painter_at(rect);
    let zoom = app.viewport.scale;

    let canvas_rect = Rect::from_min_max(
        to_screen(app, rect, Point::new(0.0, 0.0)),
        to_screen(app, rect, Point::new(CANVAS_WIDTH, CANVAS_HEIGHT)),
    );
    painter.rect_filled(canvas_rect, 0.0, Color32::WHITE);
    painter.rect_stroke(
        canvas_rect,
        0.0,
        Stroke::new(1.0, Color32::from_gray(200)),
        egui::StrokeKind::Outside,
    );

    for conn in app.scene.connections() {
        if !app.scene.is_renderable(conn) {
            continue;
        }
        let Some(ty) = app.scene.registry.get(conn.type_id) else {
            continue;
        };
        let a = to_screen(app, rect, app.scene.slot_position(conn.from));
        let b = to_screen(app, rect, app.scene.slot_position(conn.to));
        painter.line_segment([a, b], Stroke::new(ty.thickness * zoom, hex_color(&ty.color)));
    }

    // Dashed preview from the anchor to the pointer.
    if let (Some(anchor), Some(pointer)) = (app.connector.anchor(), app.connector.preview_pointer())
    {
        if anchor < app.scene.slot_count() {
            let (color, width) = app
                .scene
                .registry
                .selected()
                .map_or((Color32::GRAY, 2.0), |ty| (hex_color(&ty.color), ty.thickness));
            let a = to_screen(app, rect, app.scene.slot_position(anchor));
            let b = to_screen(app, rect, pointer);
            painter.extend(Shape::dashed_line(
                &[a, b],
                Stroke::new(width * zoom, color),
                6.0 * zoom,
                4.0 * zoom,
            ));
        }
    }

    let border = Stroke::new(
        app.scene.style.border_thickness * zoom,
        hex_color(&app.scene.style.border_color),
    );
    for slot in app.scene.slots() {
        let center = to_screen(app, rect, app.scene.slot_position(slot.index));
        let r = SLOT_RADIUS * zoom;
        match app.slot_textures.get(slot.index).and_then(Option::as_ref) {
            Some(texture) => {
                // Crop output carries a circular alpha mask; a plain image
                // quad renders as a disc.
                let img_rect = Rect::from_center_size(center, Vec2::splat(2.0 * r));
                painter.image(
                    texture.id(),
                    img_rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
                painter.circle_stroke(center, r, border);
            }
            None => {
                painter.circle_filled(center, r, Color32::from_gray(240));
                painter.circle_stroke(center, r, border);
                let plus = Stroke::new(2.0 * zoom, Color32::from_gray(102));
                painter.line_segment(
                    [center - Vec2::new(10.0 * zoom, 0.0), center + Vec2::new(10.0 * zoom, 0.0)],
                    plus,
                );
                painter.line_segment(
                    [center - Vec2::new(0.0, 10.0 * zoom), center + Vec2::new(0.0, 10.0 * zoom)],
                    plus,
                );
            }
        }
        if app.connector.anchor() == Some(slot.index) {
            // Dashed ring at radius 35; the painter has no dashed circle, so
            // sample the circumference into a dashed polyline.
            let ring_r = (SLOT_RADIUS + 5.0) * zoom;
            let pts: Vec<Pos2> = (0..=48)
                .map(|i| {
                    let t = i as f32 / 48.0 * std::f32::consts::TAU;
                    Pos2::new(center.x + ring_r * t.cos(), center.y + ring_r * t.sin())
                })
                .collect();
            painter.extend(Shape::dashed_line(
                &pts,
                Stroke::new(3.0 * zoom, hex_color("#007bff")),
                5.0 * zoom,
                4.0 * zoom,
            ));
        }
    }

    if app.scene.legend.visible && !app.scene.registry.is_empty() {
        let fs = app.scene.legend.font_size * zoom;
        let origin = app.scene.legend.position;
        for (row, ty) in app.scene.registry.iter().enumerate() {
            let top_left = to_screen(
                app,
                rect,
                Point::new(origin.x, origin.y + row as f32 * (app.scene.legend.font_size + 10.0)),
            );
            let swatch = Rect::from_min_size(top_left, Vec2::splat(fs));
            painter.rect_filled(swatch, 0.0, hex_color(&ty.color));
            painter.rect_stroke(swatch, 0.0, Stroke::new(1.0, Color32::BLACK), egui::StrokeKind::Inside);
            painter.text(
                Pos2::new(swatch.right() + 8.0 * zoom, swatch.center().y),
                Align2::LEFT_CENTER,
                &ty.name,
                egui::FontId::proportional(fs),
                Color32::BLACK,
            );
        }
    }

    if let (Some(texture), Some(image)) = (&app.logo_texture, &app.scene.logo.image) {
        let center = to_screen(app, rect, app.scene.logo.position);
        let size = Vec2::new(image.width as f32, image.height as f32)
            * (app.scene.logo.scale * zoom);
        painter.image(
            texture.id(),
            Rect::from_center_size(center, size),
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE.gamma_multiply(app.scene.logo.opacity),
        );
    }
}
