//! Table editor workflow: edit, export CSV, export the printable raster.

use ringboard::model::Bitmap;
use ringboard::table::Table;

#[test]
fn edited_table_exports_consistent_csv() {
    let mut table = Table::default();
    table.set_dimensions(2, 4).unwrap();
    table.set_header(3, "Notes");
    table.set_text(0, 0, "Alice").unwrap();
    table.set_text(0, 1, "warm, funny").unwrap();
    table.set_text(1, 3, "said \"hi\"").unwrap();

    let csv = table.csv();
    assert!(csv.starts_with('\u{feff}'));
    let lines: Vec<&str> = csv.trim_start_matches('\u{feff}').lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], ",First impression,Current impression,Notes");
    assert_eq!(lines[1], "\"Alice\",\"warm, funny\",\"\",\"\"");
    assert_eq!(lines[2], "\"\",\"\",\"\",\"said \"\"hi\"\"\"");
}

#[test]
fn printable_export_rasterizes_at_double_scale() {
    let mut table = Table::default();
    table.set_dimensions(4, 3).unwrap();
    table
        .set_image(
            1,
            2,
            Bitmap {
                width: 1,
                height: 1,
                rgba: vec![0, 0, 0, 255],
            },
        )
        .unwrap();
    let png = table.printable_png().unwrap();
    let img = image::load_from_memory(&png).unwrap();
    // 3 columns of 160 px, 5 rows (header + 4) of 40 px, doubled.
    assert_eq!((img.width(), img.height()), (960, 400));
}

#[test]
fn dimension_change_resets_cells_but_not_style() {
    let mut table = Table::default();
    table.border.visible = false;
    table.set_text(0, 0, "kept?").unwrap();
    table.set_dimensions(3, 3).unwrap();
    assert_eq!(table.cell(0, 0).unwrap().text, "");
    assert!(!table.border.visible);
}
