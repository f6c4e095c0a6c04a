//! Renderer/exporter: serialize the scene to SVG and rasterize it.
//!
//! Export always captures the logical 800×600 canvas with an identity
//! transform — the viewport never leaks in here, so the artifact is
//! reproducible regardless of the current pan/zoom. UI-only affordances
//! (preview edge, anchor highlight) are not part of the export.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{EditError, Result};
use crate::model::{Bitmap, CANVAS_HEIGHT, CANVAS_WIDTH, SLOT_RADIUS};
use crate::scene::Scene;

/// Suggested filename for diagram exports.
pub const EXPORT_FILENAME: &str = "circular-arrangement.png";

pub fn svg_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn data_url(bitmap: &Bitmap) -> Result<String> {
    let png = bitmap.encode_png()?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
}

/// Serialize the scene as a standalone SVG document.
///
/// Draw order is fixed back-to-front: background, connections, slots,
/// legend, logo. A connection whose type id no longer resolves, or whose
/// endpoints fell off the ring, is skipped.
pub fn scene_svg(scene: &Scene) -> Result<String> {
    let w = CANVAS_WIDTH;
    let h = CANVAS_HEIGHT;
    let mut defs = String::new();
    let mut body = String::new();

    body.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" fill=\"white\"/>\n"
    ));

    // Connections under the slots.
    for conn in scene.connections() {
        if !scene.is_renderable(conn) {
            continue;
        }
        let Some(ty) = scene.registry.get(conn.type_id) else {
            continue;
        };
        let a = scene.slot_position(conn.from);
        let b = scene.slot_position(conn.to);
        body.push_str(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\"/>\n",
            a.x, a.y, b.x, b.y, svg_escape(&ty.color), ty.thickness
        ));
    }

    // Slots: image in a circular clip, or neutral fill with a plus glyph.
    for slot in scene.slots() {
        let pos = scene.slot_position(slot.index);
        let r = SLOT_RADIUS;
        match &slot.image {
            Some(image) => {
                let clip_id = format!("slot-clip-{}", slot.index);
                defs.push_str(&format!(
                    "<clipPath id=\"{clip_id}\"><circle cx=\"{}\" cy=\"{}\" r=\"{r}\"/></clipPath>\n",
                    pos.x, pos.y
                ));
                body.push_str(&format!(
                    "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\" clip-path=\"url(#{clip_id})\" xlink:href=\"{}\"/>\n",
                    pos.x - r,
                    pos.y - r,
                    2.0 * r,
                    2.0 * r,
                    data_url(image)?
                ));
                body.push_str(&format!(
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{r}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
                    pos.x,
                    pos.y,
                    svg_escape(&scene.style.border_color),
                    scene.style.border_thickness
                ));
            }
            None => {
                body.push_str(&format!(
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{r}\" fill=\"#f0f0f0\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
                    pos.x,
                    pos.y,
                    svg_escape(&scene.style.border_color),
                    scene.style.border_thickness
                ));
                for (x1, y1, x2, y2) in [
                    (pos.x - 10.0, pos.y, pos.x + 10.0, pos.y),
                    (pos.x, pos.y - 10.0, pos.x, pos.y + 10.0),
                ] {
                    body.push_str(&format!(
                        "<line x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"#666666\" stroke-width=\"2\"/>\n"
                    ));
                }
            }
        }
    }

    // Legend: one row per type, swatch plus name.
    if scene.legend.visible && !scene.registry.is_empty() {
        let fs = scene.legend.font_size;
        let origin = scene.legend.position;
        for (row, ty) in scene.registry.iter().enumerate() {
            let y = origin.y + row as f32 * (fs + 10.0);
            body.push_str(&format!(
                "<rect x=\"{}\" y=\"{y}\" width=\"{fs}\" height=\"{fs}\" fill=\"{}\" stroke=\"#000000\" stroke-width=\"1\"/>\n",
                origin.x,
                svg_escape(&ty.color)
            ));
            body.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" font-size=\"{fs}\" font-family=\"sans-serif\" fill=\"#000000\">{}</text>\n",
                origin.x + fs + 8.0,
                y + fs * 0.8,
                svg_escape(&ty.name)
            ));
        }
    }

    // Logo overlay on top.
    if let Some(image) = &scene.logo.image {
        let iw = image.width as f32;
        let ih = image.height as f32;
        body.push_str(&format!(
            "<g transform=\"translate({} {}) scale({})\" opacity=\"{}\"><image x=\"{}\" y=\"{}\" width=\"{iw}\" height=\"{ih}\" xlink:href=\"{}\"/></g>\n",
            scene.logo.position.x,
            scene.logo.position.y,
            scene.logo.scale,
            scene.logo.opacity,
            -iw / 2.0,
            -ih / 2.0,
            data_url(image)?
        ));
    }

    Ok(format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n<defs>\n{defs}</defs>\n{body}</svg>\n"
    ))
}

/// Rasterize an SVG document at the given scale.
pub fn rasterize_svg(svg: &str, width: f32, height: f32, scale: f32) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| EditError::Resource(format!("svg parse: {e}")))?;

    let width_px = (width * scale).ceil().max(1.0) as u32;
    let height_px = (height * scale).ceil().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px)
        .ok_or_else(|| EditError::Resource("pixmap allocation failed".to_string()))?;

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

/// Render the full scene to a pixmap at native canvas size.
pub fn render_scene(scene: &Scene) -> Result<tiny_skia::Pixmap> {
    let svg = scene_svg(scene)?;
    rasterize_svg(&svg, CANVAS_WIDTH, CANVAS_HEIGHT, 1.0)
}

/// Render the scene and encode it as PNG bytes.
pub fn scene_png(scene: &Scene) -> Result<Vec<u8>> {
    let pixmap = render_scene(scene)?;
    pixmap
        .encode_png()
        .map_err(|e| EditError::Resource(format!("png encode: {e}")))
}

/// Export the scene to a PNG file.
pub fn export_png(scene: &Scene, path: &std::path::Path) -> Result<()> {
    let bytes = scene_png(scene)?;
    std::fs::write(path, bytes)
        .map_err(|e| EditError::Resource(format!("write {}: {e}", path.display())))
}
