use std::cell::Cell;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
    Rgb,
};

use super::error::{AppError, Result};
use super::sheet::{COLUMN_HEADERS, Page, SHEET_TITLE};

/// Fixed output filename; the only thing the user picks is the month.
pub const PDF_FILE_NAME: &str = "Attendance-Sheet.pdf";

// A4 portrait, zero margin. One generated page per physical page.
const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const BANNER_H: f32 = 22.0;
const TABLE_TOP: f32 = PAGE_H - BANNER_H - 11.0;
const TABLE_BOTTOM: f32 = 4.0;
const COL_X: [f32; 7] = [0.0, 25.0, 75.0, 109.0, 143.0, 177.0, PAGE_W];

/// Transient presentation flag, on only while an export is in flight.
#[derive(Clone, Default)]
pub struct ExportFlag(Rc<Cell<bool>>);

impl ExportFlag {
    pub fn is_on(&self) -> bool {
        self.0.get()
    }
}

/// Keeps the export flag on for the duration of a scope and clears it on
/// drop, so the flag reverts on the failure path too.
struct ExportModeGuard<'a> {
    flag: &'a ExportFlag,
}

impl<'a> ExportModeGuard<'a> {
    fn engage(flag: &'a ExportFlag) -> Self {
        flag.0.set(true);
        Self { flag }
    }
}

impl Drop for ExportModeGuard<'_> {
    fn drop(&mut self) {
        self.flag.0.set(false);
    }
}

/// Write the generated pages as a PDF into the user's download directory.
pub fn export_pdf(pages: &[Page], flag: &ExportFlag) -> Result<PathBuf> {
    export_pdf_to(pages, flag, &default_output_path())
}

pub fn default_output_path() -> PathBuf {
    let mut path = dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push(PDF_FILE_NAME);
    path
}

pub fn export_pdf_to(pages: &[Page], flag: &ExportFlag, path: &Path) -> Result<PathBuf> {
    if pages.is_empty() {
        return Err(AppError::Export("nothing to export".to_string()));
    }

    let _mode = ExportModeGuard::engage(flag);

    let (doc, first_page, first_layer) =
        PdfDocument::new("Attendance Sheet", Mm(PAGE_W), Mm(PAGE_H), "Sheet");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Export(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::Export(e.to_string()))?;

    for (i, page) in pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Sheet");
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        render_page(&layer, page, &font, &font_bold);
    }

    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| AppError::Export(e.to_string()))?;

    Ok(path.to_path_buf())
}

fn rect_points(x: f32, y: f32, w: f32, h: f32) -> Vec<(Point, bool)> {
    vec![
        (Point::new(Mm(x), Mm(y)), false),
        (Point::new(Mm(x + w), Mm(y)), false),
        (Point::new(Mm(x + w), Mm(y + h)), false),
        (Point::new(Mm(x), Mm(y + h)), false),
    ]
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: Color) {
    layer.set_fill_color(color);
    layer.add_polygon(Polygon {
        rings: vec![rect_points(x, y, w, h)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

fn stroke_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y1)), false),
            (Point::new(Mm(x2), Mm(y2)), false),
        ],
        is_closed: false,
    });
}

fn deep_green() -> Color {
    Color::Rgb(Rgb::new(0.04, 0.35, 0.17, None))
}

fn friday_green() -> Color {
    Color::Rgb(Rgb::new(0.84, 0.93, 0.85, None))
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn white() -> Color {
    Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None))
}

fn render_page(
    layer: &PdfLayerReference,
    page: &Page,
    font: &IndirectFontRef,
    font_bold: &IndirectFontRef,
) {
    // Banner: title + month label on a deep green field
    fill_rect(layer, 0.0, PAGE_H - BANNER_H, PAGE_W, BANNER_H, deep_green());
    layer.set_fill_color(white());
    layer.use_text(SHEET_TITLE, 16.0, Mm(14.0), Mm(PAGE_H - 9.5), font_bold);
    layer.use_text(page.month_label(), 11.0, Mm(14.0), Mm(PAGE_H - 17.0), font);

    // Name line
    layer.set_fill_color(black());
    layer.use_text(page.name.as_str(), 12.0, Mm(14.0), Mm(PAGE_H - BANNER_H - 7.0), font_bold);

    let row_count = page.rows.len() as f32;
    let row_h = (TABLE_TOP - TABLE_BOTTOM) / (row_count + 1.0);

    // Friday rows get a tinted background, drawn before the grid
    for (i, row) in page.rows.iter().enumerate() {
        if row.special {
            let top = TABLE_TOP - row_h * (i as f32 + 1.0);
            fill_rect(layer, 0.0, top - row_h, PAGE_W, row_h, friday_green());
        }
    }

    // Header row
    layer.set_fill_color(black());
    let header_baseline = TABLE_TOP - row_h + 2.0;
    for (i, header) in COLUMN_HEADERS.iter().enumerate() {
        layer.use_text(*header, 10.0, Mm(COL_X[i] + 2.5), Mm(header_baseline), font_bold);
    }

    // Day rows
    for (i, row) in page.rows.iter().enumerate() {
        let baseline = TABLE_TOP - row_h * (i as f32 + 2.0) + 2.0;
        layer.use_text(row.date_label(), 9.0, Mm(COL_X[0] + 2.5), Mm(baseline), font);
        layer.use_text(row.weekday, 9.0, Mm(COL_X[1] + 2.5), Mm(baseline), font);
    }

    // Grid
    layer.set_outline_color(black());
    layer.set_outline_thickness(0.6);
    let table_bottom = TABLE_TOP - row_h * (row_count + 1.0);
    for i in 0..=(page.rows.len() + 1) {
        let y = TABLE_TOP - row_h * i as f32;
        stroke_line(layer, 0.0, y, PAGE_W, y);
    }
    for x in COL_X {
        stroke_line(layer, x, table_bottom, x, TABLE_TOP);
    }
}
