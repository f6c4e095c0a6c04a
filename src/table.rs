//! Impression-table editor model with CSV and printable raster export.
//!
//! A plain 2-D grid: cells hold text or a cropped image, the first three
//! column headers are fixed, later ones are user-editable. No algorithmic
//! content here; the interesting part is the two export surfaces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EditError, Result};
use crate::export;
use crate::model::Bitmap;

pub const ROW_RANGE: std::ops::RangeInclusive<usize> = 1..=20;
pub const COL_RANGE: std::ops::RangeInclusive<usize> = 3..=5;
pub const DEFAULT_ROWS: usize = 5;
pub const DEFAULT_COLS: usize = 3;

/// Suggested filename for CSV exports.
pub const CSV_FILENAME: &str = "table_data.csv";
/// Suggested filename for raster exports.
pub const IMAGE_FILENAME: &str = "table-export.png";

/// Placeholder drawn for image cells in the printable layout (images are
/// not representable there).
pub const IMAGE_PLACEHOLDER: &str = "[image]";

/// Headers for the first columns; later columns get editable names.
const PREDEFINED_HEADERS: [&str; 3] = ["", "First impression", "Current impression"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    pub text: String,
    #[serde(skip)]
    pub image: Option<Bitmap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderStyle {
    pub visible: bool,
    pub color: String,
    /// 1..=4 px.
    pub width: f32,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: "#dee2e6".to_string(),
            width: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    cells: Vec<Vec<TableCell>>,
    /// Custom headers for columns past the predefined ones.
    custom_headers: BTreeMap<usize, String>,
    pub border: BorderStyle,
}

impl Default for Table {
    fn default() -> Self {
        let mut table = Self {
            cells: Vec::new(),
            custom_headers: BTreeMap::new(),
            border: BorderStyle::default(),
        };
        let _ = table.set_dimensions(DEFAULT_ROWS, DEFAULT_COLS);
        table
    }
}

impl Table {
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.cells.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Resize the grid. All cell contents are rebuilt empty (the original
    /// tool does the same on any dimension change).
    pub fn set_dimensions(&mut self, rows: usize, cols: usize) -> Result<()> {
        if !ROW_RANGE.contains(&rows) {
            return Err(EditError::Invariant(format!(
                "row count {rows} outside {}..={}",
                ROW_RANGE.start(),
                ROW_RANGE.end()
            )));
        }
        if !COL_RANGE.contains(&cols) {
            return Err(EditError::Invariant(format!(
                "column count {cols} outside {}..={}",
                COL_RANGE.start(),
                COL_RANGE.end()
            )));
        }
        self.cells = (0..rows)
            .map(|_| (0..cols).map(|_| TableCell::default()).collect())
            .collect();
        Ok(())
    }

    pub fn set_text(&mut self, row: usize, col: usize, text: impl Into<String>) -> Result<()> {
        let cell = self
            .cell_mut(row, col)
            .ok_or_else(|| EditError::Invariant(format!("no cell at ({row}, {col})")))?;
        cell.text = text.into();
        Ok(())
    }

    /// Setting an image clears the cell's text, like the original editor.
    pub fn set_image(&mut self, row: usize, col: usize, image: Bitmap) -> Result<()> {
        let cell = self
            .cell_mut(row, col)
            .ok_or_else(|| EditError::Invariant(format!("no cell at ({row}, {col})")))?;
        cell.image = Some(image);
        cell.text.clear();
        Ok(())
    }

    pub fn clear_image(&mut self, row: usize, col: usize) {
        if let Some(cell) = self.cell_mut(row, col) {
            cell.image = None;
        }
    }

    /// Header label for a column: predefined for the first three, custom or
    /// "Column N" after that.
    pub fn header(&self, col: usize) -> String {
        if let Some(name) = PREDEFINED_HEADERS.get(col) {
            return name.to_string();
        }
        self.custom_headers
            .get(&col)
            .cloned()
            .unwrap_or_else(|| format!("Column {}", col + 1))
    }

    /// Rename a column header; predefined columns are not editable and the
    /// call is ignored for them.
    pub fn set_header(&mut self, col: usize, name: impl Into<String>) {
        if col >= PREDEFINED_HEADERS.len() {
            self.custom_headers.insert(col, name.into());
        }
    }

    /// Back to the out-of-the-box state: 5×3 grid, default borders, no
    /// custom headers.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // ── CSV export ─────────────────────────────────────────────────────

    /// Comma-separated export: UTF-8 with BOM, header row, one line per
    /// table row, every cell double-quote-wrapped with embedded quotes
    /// doubled. Image cells export their (empty) text.
    pub fn csv(&self) -> String {
        let mut out = String::from("\u{feff}");
        let headers: Vec<String> = (0..self.cols()).map(|c| self.header(c)).collect();
        out.push_str(&headers.join(","));
        out.push('\n');
        for row in &self.cells {
            let fields: Vec<String> = row
                .iter()
                .map(|cell| format!("\"{}\"", cell.text.replace('"', "\"\"")))
                .collect();
            out.push_str(&fields.join(","));
            out.push('\n');
        }
        out
    }

    // ── printable raster export ────────────────────────────────────────

    /// SVG of the printable layout: a bordered grid with no editing
    /// affordances; image cells show [`IMAGE_PLACEHOLDER`].
    pub fn printable_svg(&self) -> String {
        const COL_WIDTH: f32 = 160.0;
        const ROW_HEIGHT: f32 = 40.0;
        const FONT_SIZE: f32 = 14.0;
        const PAD: f32 = 8.0;

        let cols = self.cols();
        let width = cols as f32 * COL_WIDTH;
        let height = (self.rows() + 1) as f32 * ROW_HEIGHT;
        let mut body = String::new();
        body.push_str(&format!(
            "<rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" fill=\"white\"/>\n"
        ));

        let mut text_at = |x: f32, y: f32, text: &str, bold: bool| {
            if text.is_empty() {
                return;
            }
            let weight = if bold { " font-weight=\"bold\"" } else { "" };
            body.push_str(&format!(
                "<text x=\"{x}\" y=\"{y}\" font-size=\"{FONT_SIZE}\" font-family=\"sans-serif\" fill=\"#000000\"{weight}>{}</text>\n",
                export::svg_escape(text)
            ));
        };

        for col in 0..cols {
            let x = col as f32 * COL_WIDTH + PAD;
            text_at(x, ROW_HEIGHT / 2.0 + FONT_SIZE * 0.35, &self.header(col), true);
        }
        for (r, row) in self.cells.iter().enumerate() {
            let y = (r + 1) as f32 * ROW_HEIGHT + ROW_HEIGHT / 2.0 + FONT_SIZE * 0.35;
            for (c, cell) in row.iter().enumerate() {
                let shown = if cell.image.is_some() {
                    IMAGE_PLACEHOLDER
                } else {
                    cell.text.as_str()
                };
                text_at(c as f32 * COL_WIDTH + PAD, y, shown, false);
            }
        }

        if self.border.visible {
            let stroke = format!(
                " stroke=\"{}\" stroke-width=\"{}\"",
                export::svg_escape(&self.border.color),
                self.border.width
            );
            for r in 0..=(self.rows() + 1) {
                let y = r as f32 * ROW_HEIGHT;
                body.push_str(&format!(
                    "<line x1=\"0\" y1=\"{y}\" x2=\"{width}\" y2=\"{y}\"{stroke}/>\n"
                ));
            }
            for c in 0..=cols {
                let x = c as f32 * COL_WIDTH;
                body.push_str(&format!(
                    "<line x1=\"{x}\" y1=\"0\" x2=\"{x}\" y2=\"{height}\"{stroke}/>\n"
                ));
            }
        }

        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n{body}</svg>\n"
        )
    }

    /// Rasterize the printable layout at 2× scale and encode as PNG.
    pub fn printable_png(&self) -> Result<Vec<u8>> {
        const COL_WIDTH: f32 = 160.0;
        const ROW_HEIGHT: f32 = 40.0;
        let width = self.cols() as f32 * COL_WIDTH;
        let height = (self.rows() + 1) as f32 * ROW_HEIGHT;
        let pixmap = export::rasterize_svg(&self.printable_svg(), width, height, 2.0)?;
        pixmap
            .encode_png()
            .map_err(|e| EditError::Resource(format!("png encode: {e}")))
    }
}
