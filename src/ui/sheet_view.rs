use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    draw,
    enums::{Align, Color, Font},
    group::{Scroll, ScrollType},
    prelude::*,
    widget::Widget,
};

use crate::app::sheet::{COLUMN_HEADERS, Page, SHEET_TITLE};

// On-screen page metrics, A4 aspect
const PAGE_W: i32 = 560;
const PAGE_H: i32 = 792;
const PAGE_GAP: i32 = 18;
const BANNER_H: i32 = 58;
const NAME_LINE_H: i32 = 26;
// Column boundaries as fractions of the page width
const COL_FRACTIONS: [f64; 7] = [0.0, 0.12, 0.36, 0.52, 0.68, 0.84, 1.0];

fn deep_green() -> Color {
    Color::from_rgb(10, 89, 44)
}

fn friday_green() -> Color {
    Color::from_rgb(214, 237, 218)
}

/// Scrollable on-screen preview of the generated pages. Pure rendering:
/// consumes `Page` values, owns no sheet logic.
pub struct SheetView {
    pub scroll: Scroll,
    canvas: Widget,
    pages: Rc<RefCell<Vec<Page>>>,
}

impl SheetView {
    pub fn new() -> Self {
        let mut scroll = Scroll::default();
        scroll.set_type(ScrollType::Vertical);
        scroll.set_color(Color::from_rgb(225, 225, 225));

        let mut canvas = Widget::default();
        let pages: Rc<RefCell<Vec<Page>>> = Rc::new(RefCell::new(Vec::new()));
        let draw_pages = pages.clone();
        canvas.draw(move |wid| {
            let pages = draw_pages.borrow();
            for (i, page) in pages.iter().enumerate() {
                let left = wid.x() + (wid.w() - PAGE_W) / 2;
                let top = wid.y() + PAGE_GAP + i as i32 * (PAGE_H + PAGE_GAP);
                draw_page(left, top, page);
            }
        });

        scroll.end();

        Self {
            scroll,
            canvas,
            pages,
        }
    }

    /// Replace the displayed pages and scroll back to the top.
    pub fn render(&mut self, pages: &[Page]) {
        *self.pages.borrow_mut() = pages.to_vec();
        let height = PAGE_GAP + pages.len() as i32 * (PAGE_H + PAGE_GAP);
        self.canvas.resize(
            self.scroll.x(),
            self.scroll.y(),
            self.scroll.w() - 18,
            height,
        );
        self.scroll.scroll_to(0, 0);
        self.scroll.redraw();
    }
}

fn draw_page(x: i32, y: i32, page: &Page) {
    // Sheet background
    draw::set_draw_color(Color::White);
    draw::draw_rectf(x, y, PAGE_W, PAGE_H);

    // Banner
    draw::set_draw_color(deep_green());
    draw::draw_rectf(x, y, PAGE_W, BANNER_H);
    draw::set_draw_color(Color::White);
    draw::set_font(Font::HelveticaBold, 20);
    draw::draw_text2(SHEET_TITLE, x, y + 8, PAGE_W, 24, Align::Center);
    draw::set_font(Font::Helvetica, 13);
    draw::draw_text2(&page.month_label(), x, y + 34, PAGE_W, 18, Align::Center);

    // Name line
    draw::set_draw_color(Color::Black);
    draw::set_font(Font::HelveticaBold, 14);
    draw::draw_text2(&page.name, x + 10, y + BANNER_H, PAGE_W - 20, NAME_LINE_H, Align::Left | Align::Inside);

    // Table
    let table_top = y + BANNER_H + NAME_LINE_H;
    let table_h = PAGE_H - BANNER_H - NAME_LINE_H - 8;
    let rows = page.rows.len() as i32;
    let row_h = table_h / (rows + 1);
    let col_x = |i: usize| x + (COL_FRACTIONS[i] * PAGE_W as f64) as i32;

    // Friday rows tinted before the grid is drawn
    for (i, row) in page.rows.iter().enumerate() {
        if row.special {
            let top = table_top + (i as i32 + 1) * row_h;
            draw::set_draw_color(friday_green());
            draw::draw_rectf(x, top, PAGE_W, row_h);
        }
    }

    // Header row
    draw::set_draw_color(Color::Black);
    draw::set_font(Font::HelveticaBold, 12);
    for (i, header) in COLUMN_HEADERS.iter().enumerate() {
        draw::draw_text2(
            header,
            col_x(i) + 4,
            table_top,
            col_x(i + 1) - col_x(i) - 8,
            row_h,
            Align::Left | Align::Inside,
        );
    }

    // Day rows
    draw::set_font(Font::Helvetica, 11);
    for (i, row) in page.rows.iter().enumerate() {
        let top = table_top + (i as i32 + 1) * row_h;
        draw::draw_text2(
            &row.date_label(),
            col_x(0) + 4,
            top,
            col_x(1) - col_x(0) - 8,
            row_h,
            Align::Left | Align::Inside,
        );
        draw::draw_text2(
            row.weekday,
            col_x(1) + 4,
            top,
            col_x(2) - col_x(1) - 8,
            row_h,
            Align::Left | Align::Inside,
        );
    }

    // Grid
    draw::set_draw_color(Color::from_rgb(60, 60, 60));
    let table_bottom = table_top + (rows + 1) * row_h;
    for i in 0..=(rows + 1) {
        let line_y = table_top + i * row_h;
        draw::draw_line(x, line_y, x + PAGE_W, line_y);
    }
    for i in 0..COL_FRACTIONS.len() {
        let line_x = col_x(i).min(x + PAGE_W - 1);
        draw::draw_line(line_x, table_top, line_x, table_bottom);
    }
}
