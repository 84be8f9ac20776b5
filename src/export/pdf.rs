//! A4 report document: heading block, one section per table flowing down
//! the pages, footer with page numbers.
//!
//! Text uses the base-14 Helvetica faces with WinAnsi encoding, so no font
//! file is embedded and Portuguese accents print as-is.

use crate::export::model::{ExportTable, ReportHeading};
use crate::report::html::{BODY_TEXT, HEADER_FILL, HEADER_TEXT, RULE, STRIPE_FILL};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

const PAGE_W: f32 = 595.0;
const PAGE_H: f32 = 842.0;
const MARGIN: f32 = 48.0;
const FOOTER_H: f32 = 24.0;
const ROW_H: f32 = 18.0;
const CELL_PAD: f32 = 5.0;

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 10.0;
const SECTION_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 9.5;

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
    Italic,
}

impl Face {
    fn resource(self) -> Name<'static> {
        match self {
            Face::Regular => Name(b"F1"),
            Face::Bold => Name(b"F2"),
            Face::Italic => Name(b"F3"),
        }
    }

    fn base_font(self) -> Name<'static> {
        match self {
            Face::Regular => Name(b"Helvetica"),
            Face::Bold => Name(b"Helvetica-Bold"),
            Face::Italic => Name(b"Helvetica-Oblique"),
        }
    }
}

const FACES: [Face; 3] = [Face::Regular, Face::Bold, Face::Italic];

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

fn rgb(color: u32) -> (f32, f32, f32) {
    (
        ((color >> 16) & 0xFF) as f32 / 255.0,
        ((color >> 8) & 0xFF) as f32 / 255.0,
        (color & 0xFF) as f32 / 255.0,
    )
}

/// Approximate Helvetica advance width in points. Close enough to
/// right-align numbers and to decide where a cell must be cut.
fn text_width(text: &str, size: f32) -> f32 {
    let units: f32 = text
        .chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | '\'' | '|' => 222.0,
            ' ' | '.' | ',' | ':' | ';' | '/' | '!' | 'f' | 't' | 'I' => 278.0,
            '-' | '(' | ')' | 'r' => 333.0,
            '0'..='9' | 'a'..='z' | '$' | '#' => 556.0,
            'm' | 'M' => 833.0,
            'W' | 'w' => 944.0,
            '%' => 889.0,
            'A'..='Z' => 667.0,
            _ => 556.0,
        })
        .sum();
    units * size / 1000.0
}

/// Cut `text` so it fits `width`, marking the cut with "...".
fn fit(text: &str, width: f32, size: f32) -> String {
    if text_width(text, size) <= width {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        out.push(c);
        if text_width(&out, size) + text_width("...", size) > width {
            out.pop();
            break;
        }
    }
    out.push_str("...");
    out
}

/// Latin-1 subset of WinAnsi. Characters outside it (emoji, arrows) are
/// dropped, along with the blank they leave at the start.
fn win_ansi(text: &str) -> Vec<u8> {
    let bytes: Vec<u8> = text
        .chars()
        .filter_map(|c| match c as u32 {
            v @ (0x20..=0x7E | 0xA0..=0xFF) => Some(v as u8),
            _ => None,
        })
        .collect();
    let start = bytes.iter().position(|b| *b != b' ').unwrap_or(bytes.len());
    bytes[start..].to_vec()
}

/// Column geometry of one table: widths, alignment by role (keys left,
/// measures right).
struct Columns {
    widths: Vec<f32>,
    align: Vec<Align>,
}

impl Columns {
    fn layout(table: &ExportTable) -> Self {
        let mut widths: Vec<f32> = table
            .headers
            .iter()
            .map(|h| text_width(h, BODY_SIZE) * 1.08 + 2.0 * CELL_PAD)
            .collect();
        for row in &table.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = w.max(text_width(cell, BODY_SIZE) + 2.0 * CELL_PAD);
            }
        }

        let available = PAGE_W - 2.0 * MARGIN;
        let total: f32 = widths.iter().sum();
        if total > available {
            let scale = available / total;
            widths.iter_mut().for_each(|w| *w *= scale);
        }

        let align = (0..widths.len())
            .map(|i| if i < table.keys { Align::Left } else { Align::Right })
            .collect();
        Self { widths, align }
    }

    fn total(&self) -> f32 {
        self.widths.iter().sum()
    }
}

fn draw_text(c: &mut Content, x: f32, y: f32, face: Face, size: f32, color: u32, text: &str) {
    let (r, g, b) = rgb(color);
    c.save_state();
    c.set_fill_rgb(r, g, b);
    c.begin_text();
    c.set_font(face.resource(), size);
    c.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
    c.show(Str(&win_ansi(text)));
    c.end_text();
    c.restore_state();
}

fn fill_rect(c: &mut Content, x: f32, y: f32, w: f32, h: f32, color: u32) {
    let (r, g, b) = rgb(color);
    c.save_state();
    c.set_fill_rgb(r, g, b);
    c.rect(x, y, w, h);
    c.fill_nonzero();
    c.restore_state();
}

fn hline(c: &mut Content, x1: f32, x2: f32, y: f32, color: u32, width: f32) {
    let (r, g, b) = rgb(color);
    c.save_state();
    c.set_stroke_rgb(r, g, b);
    c.set_line_width(width);
    c.move_to(x1, y);
    c.line_to(x2, y);
    c.stroke();
    c.restore_state();
}

fn draw_footer(c: &mut Content, title: &str, page: usize, total: usize) {
    let y = MARGIN - 10.0;
    let label = format!("Página {page} de {total}");
    hline(c, MARGIN, PAGE_W - MARGIN, MARGIN + 4.0, RULE, 0.5);
    draw_text(c, MARGIN, y, Face::Regular, 8.0, BODY_TEXT, title);
    let x = PAGE_W - MARGIN - text_width(&label, 8.0);
    draw_text(c, x, y, Face::Regular, 8.0, BODY_TEXT, &label);
}

pub struct ReportPdf {
    title: String,
    done: Vec<Content>,
    current: Content,
    /// Top of the free space on the current page.
    y: f32,
}

impl ReportPdf {
    pub fn new(heading: &ReportHeading) -> Self {
        let mut doc = Self {
            title: heading.title.clone(),
            done: Vec::new(),
            current: Content::new(),
            y: PAGE_H - MARGIN,
        };

        doc.y -= TITLE_SIZE;
        draw_text(
            &mut doc.current,
            MARGIN,
            doc.y,
            Face::Bold,
            TITLE_SIZE,
            BODY_TEXT,
            &heading.title,
        );
        doc.y -= 6.0;

        for line in heading.lines() {
            doc.y -= HEADING_SIZE + 4.0;
            draw_text(
                &mut doc.current,
                MARGIN,
                doc.y,
                Face::Regular,
                HEADING_SIZE,
                BODY_TEXT,
                &line,
            );
        }

        doc.y -= 10.0;
        hline(&mut doc.current, MARGIN, PAGE_W - MARGIN, doc.y, HEADER_FILL, 1.5);
        doc.y -= 8.0;
        doc
    }

    /// Start a new page unless `needed` points still fit above the footer.
    fn reserve(&mut self, needed: f32) -> bool {
        if self.y - needed >= MARGIN + FOOTER_H {
            return false;
        }
        let full = std::mem::replace(&mut self.current, Content::new());
        self.done.push(full);
        self.y = PAGE_H - MARGIN;
        true
    }

    fn section_title(&mut self, title: &str) {
        self.y -= SECTION_SIZE + 10.0;
        draw_text(
            &mut self.current,
            MARGIN,
            self.y,
            Face::Bold,
            SECTION_SIZE,
            BODY_TEXT,
            title,
        );
        self.y -= 6.0;
    }

    fn row(&mut self, cols: &Columns, cells: &[String], face: Face, color: u32) {
        let baseline = self.y - ROW_H + 5.5;
        let mut x = MARGIN;
        for (i, w) in cols.widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let shown = fit(cell, w - 2.0 * CELL_PAD, BODY_SIZE);
            let tx = match cols.align[i] {
                Align::Left => x + CELL_PAD,
                Align::Right => x + w - CELL_PAD - text_width(&shown, BODY_SIZE),
            };
            draw_text(&mut self.current, tx, baseline, face, BODY_SIZE, color, &shown);
            x += w;
        }
        self.y -= ROW_H;
    }

    fn header_row(&mut self, cols: &Columns, headers: &[String]) {
        fill_rect(
            &mut self.current,
            MARGIN,
            self.y - ROW_H,
            cols.total(),
            ROW_H,
            HEADER_FILL,
        );
        self.row(cols, headers, Face::Bold, HEADER_TEXT);
    }

    /// One titled table. Long tables continue on the next page with the
    /// header row repeated; an empty one prints `empty_note` instead.
    pub fn table(&mut self, table: &ExportTable, empty_note: &str) {
        self.reserve(SECTION_SIZE + 16.0 + 2.0 * ROW_H);
        self.section_title(&table.title);

        if table.rows.is_empty() {
            self.y -= BODY_SIZE + 4.0;
            draw_text(
                &mut self.current,
                MARGIN,
                self.y,
                Face::Italic,
                BODY_SIZE,
                BODY_TEXT,
                empty_note,
            );
            self.y -= 4.0;
            return;
        }

        let cols = Columns::layout(table);
        self.header_row(&cols, &table.headers);

        for (i, cells) in table.rows.iter().enumerate() {
            if self.reserve(ROW_H) {
                self.section_title(&format!("{} (cont.)", table.title));
                self.header_row(&cols, &table.headers);
            }
            if i % 2 == 1 {
                fill_rect(
                    &mut self.current,
                    MARGIN,
                    self.y - ROW_H,
                    cols.total(),
                    ROW_H,
                    STRIPE_FILL,
                );
            }
            self.row(&cols, cells, Face::Regular, BODY_TEXT);
            hline(&mut self.current, MARGIN, MARGIN + cols.total(), self.y, RULE, 0.5);
        }
        self.y -= 4.0;
    }

    /// Stamp the footers and serialize the document.
    pub fn finish(self) -> Vec<u8> {
        let mut pages = self.done;
        pages.push(self.current);
        let total = pages.len();
        for (i, content) in pages.iter_mut().enumerate() {
            draw_footer(content, &self.title, i + 1, total);
        }

        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let tree_id = Ref::new(2);
        let font_ids: Vec<Ref> = (0..FACES.len() as i32).map(|i| Ref::new(3 + i)).collect();
        let mut next = 3 + FACES.len() as i32;

        for (face, id) in FACES.iter().zip(&font_ids) {
            pdf.type1_font(*id)
                .base_font(face.base_font())
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        let mut page_ids = Vec::with_capacity(total);
        for content in pages {
            let page_id = Ref::new(next);
            let content_id = Ref::new(next + 1);
            next += 2;

            {
                let mut page = pdf.page(page_id);
                page.parent(tree_id)
                    .media_box(Rect::new(0.0, 0.0, PAGE_W, PAGE_H))
                    .contents(content_id);
                let mut resources = page.resources();
                let mut fonts = resources.fonts();
                for (face, id) in FACES.iter().zip(&font_ids) {
                    fonts.pair(face.resource(), *id);
                }
            }
            pdf.stream(content_id, &content.finish());
            page_ids.push(page_id);
        }

        pdf.pages(tree_id)
            .count(page_ids.len() as i32)
            .kids(page_ids);
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.finish()
    }
}
