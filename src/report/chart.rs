//! Raster charts (PNG) for inline embedding.
//!
//! Shapes are drawn on a plain bitmap. Text needs a registered font (see
//! `register_chart_font`); a label that cannot be drawn is logged and
//! skipped, and the image itself is still produced.

use crate::core::aggregate::Aggregate;
use crate::errors::{AppError, AppResult};
use crate::utils::formatting::number;
use crate::utils::time::format_hours_label;
use log::{debug, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontStyle;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::OnceLock;

const FONT_FAMILY: &str = "sans-serif";

/// Tried in order when no font is configured.
const SYSTEM_FONTS: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT: OnceLock<()> = OnceLock::new();

/// Register the TTF/OTF used for every chart label. Only the first
/// successful registration counts for the process.
pub fn register_chart_font(path: &Path) -> AppResult<()> {
    if FONT.get().is_some() {
        return Ok(());
    }
    let bytes: &'static [u8] = Box::leak(fs::read(path)?.into_boxed_slice());
    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| AppError::Chart(format!("not a usable font: {}", path.display())))?;
    let _ = FONT.set(());
    debug!("chart font: {}", path.display());
    Ok(())
}

/// Configured font, else the first system font found. Returns whether
/// labels can be drawn.
pub fn ensure_chart_font(configured: Option<&Path>) -> bool {
    if FONT.get().is_some() {
        return true;
    }
    if let Some(path) = configured {
        match register_chart_font(path) {
            Ok(()) => return true,
            Err(e) => warn!("chart font '{}' not loaded: {e}", path.display()),
        }
    }
    SYSTEM_FONTS
        .iter()
        .map(Path::new)
        .filter(|p| p.exists())
        .any(|p| register_chart_font(p).is_ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStyle {
    Pie,
    Bar,
}

/// How values are printed on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueLabel {
    Plain,
    /// Value is a minute count, shown as `Xh Ym`.
    HoursMinutes,
}

impl ValueLabel {
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueLabel::Plain => number(value),
            ValueLabel::HoursMinutes => format_hours_label(value),
        }
    }
}

/// matplotlib "tab20", so the e-mail keeps the colors people know.
const TAB20: [RGBColor; 20] = [
    RGBColor(31, 119, 180),
    RGBColor(174, 199, 232),
    RGBColor(255, 127, 14),
    RGBColor(255, 187, 120),
    RGBColor(44, 160, 44),
    RGBColor(152, 223, 138),
    RGBColor(214, 39, 40),
    RGBColor(255, 152, 150),
    RGBColor(148, 103, 189),
    RGBColor(197, 176, 213),
    RGBColor(140, 86, 75),
    RGBColor(196, 156, 148),
    RGBColor(227, 119, 194),
    RGBColor(247, 182, 210),
    RGBColor(127, 127, 127),
    RGBColor(199, 199, 199),
    RGBColor(188, 189, 34),
    RGBColor(219, 219, 141),
    RGBColor(23, 190, 207),
    RGBColor(158, 218, 229),
];

fn color(i: usize) -> RGBColor {
    TAB20[i % TAB20.len()]
}

fn chart_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Chart(e.to_string())
}

fn draw_label<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    at: (i32, i32),
    size: u32,
    h: HPos,
) {
    if FONT.get().is_none() {
        return;
    }
    let style = (FONT_FAMILY, size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(h, VPos::Center));
    if let Err(e) = area.draw(&Text::new(text.to_string(), at, style)) {
        warn!("chart label '{text}' not drawn: {e}");
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}

pub struct ChartRenderer {
    pie_size: (u32, u32),
    bar_size: (u32, u32),
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self {
            pie_size: (600, 600),
            bar_size: (800, 500),
        }
    }

    /// Render `data` as PNG. Groups are drawn in descending value order;
    /// an empty (or all-zero pie) aggregate becomes a captioned placeholder.
    pub fn render(
        &self,
        title: &str,
        style: ChartStyle,
        data: &Aggregate,
        label: ValueLabel,
        empty_caption: &str,
    ) -> AppResult<Vec<u8>> {
        let data = data.clone().sorted_desc();
        let drawable = match style {
            ChartStyle::Pie => data.rows.iter().any(|r| r.value > 0.0),
            ChartStyle::Bar => !data.is_empty(),
        };
        if !drawable {
            return self.placeholder(title, empty_caption);
        }

        let size = match style {
            ChartStyle::Pie => self.pie_size,
            ChartStyle::Bar => self.bar_size,
        };

        let mut buf = vec![255u8; (size.0 * size.1 * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, size).into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;
            draw_label(&root, title, (size.0 as i32 / 2, 20), 20, HPos::Center);

            match style {
                ChartStyle::Pie => draw_pie(&root, size, &data, label)?,
                ChartStyle::Bar => draw_bars(&root, size, &data, label)?,
            }
            root.present().map_err(chart_err)?;
        }

        encode_png(buf, size)
    }

    /// Blank framed image with a caption explaining why there is no chart.
    pub fn placeholder(&self, title: &str, caption: &str) -> AppResult<Vec<u8>> {
        let size = self.bar_size;
        let mut buf = vec![255u8; (size.0 * size.1 * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, size).into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;
            root.draw(&Rectangle::new(
                [(10, 10), (size.0 as i32 - 10, size.1 as i32 - 10)],
                RGBColor(200, 200, 200).stroke_width(2),
            ))
            .map_err(chart_err)?;

            let cx = size.0 as i32 / 2;
            draw_label(&root, title, (cx, 40), 20, HPos::Center);
            draw_label(&root, caption, (cx, size.1 as i32 / 2), 18, HPos::Center);
            root.present().map_err(chart_err)?;
        }
        encode_png(buf, size)
    }
}

fn encode_png(buf: Vec<u8>, (w, h): (u32, u32)) -> AppResult<Vec<u8>> {
    let img = image::RgbImage::from_raw(w, h, buf)
        .ok_or_else(|| AppError::Chart("bitmap buffer does not match image size".into()))?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(chart_err)?;
    Ok(out.into_inner())
}

/// Which pie slices are pulled out: every slice tied for the largest value.
/// A single slice is never pulled out.
pub fn exploded_slices(values: &[f64]) -> Vec<bool> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values
        .iter()
        .map(|&v| values.len() > 1 && v == max)
        .collect()
}

/// Point on a circle; angles are counter-clockwise from 3 o'clock.
fn polar(center: (f64, f64), radius: f64, angle: f64) -> (i32, i32) {
    (
        (center.0 + radius * angle.cos()).round() as i32,
        (center.1 - radius * angle.sin()).round() as i32,
    )
}

fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    (w, h): (u32, u32),
    data: &Aggregate,
    label: ValueLabel,
) -> AppResult<()> {
    let slices: Vec<_> = data.rows.iter().filter(|r| r.value > 0.0).collect();
    let total: f64 = slices.iter().map(|r| r.value).sum();
    let values: Vec<f64> = slices.iter().map(|r| r.value).collect();
    let exploded = exploded_slices(&values);

    let center = (w as f64 / 2.0, h as f64 / 2.0 + 20.0);
    let radius = (w.min(h) as f64) * 0.32;

    // Start at 12 o'clock and go counter-clockwise.
    let mut start = FRAC_PI_2;
    for (i, row) in slices.iter().enumerate() {
        let fraction = row.value / total;
        let sweep = fraction * TAU;
        let mid = start + sweep / 2.0;

        let offset = if exploded[i] { radius * 0.1 } else { 0.0 };
        let c = (
            center.0 + offset * mid.cos(),
            center.1 - offset * mid.sin(),
        );

        let steps = ((fraction * 180.0).ceil() as usize).max(2);
        let mut points = vec![(c.0.round() as i32, c.1.round() as i32)];
        for s in 0..=steps {
            points.push(polar(c, radius, start + sweep * s as f64 / steps as f64));
        }

        root.draw(&Polygon::new(points, color(i).filled()))
            .map_err(chart_err)?;

        let name = truncate(&row.label(), 22);
        let outer = polar(c, radius * 1.18, mid);
        let h_pos = if mid.cos() >= 0.0 { HPos::Left } else { HPos::Right };
        draw_label(root, &name, outer, 14, h_pos);

        let inner = polar(c, radius * 0.62, mid);
        draw_label(
            root,
            &format!("{:.1}%", fraction * 100.0),
            (inner.0, inner.1 - 8),
            13,
            HPos::Center,
        );
        draw_label(
            root,
            &label.format(row.value),
            (inner.0, inner.1 + 8),
            12,
            HPos::Center,
        );

        start += sweep;
    }

    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    (w, h): (u32, u32),
    data: &Aggregate,
    label: ValueLabel,
) -> AppResult<()> {
    let (left, right, top, bottom) = (60, w as i32 - 20, 60, h as i32 - 70);
    let plot_w = (right - left) as f64;
    let plot_h = (bottom - top) as f64;

    let max = data.max().filter(|m| *m > 0.0).unwrap_or(1.0);
    let slot = plot_w / data.len() as f64;
    let bar_w = slot * 0.7;

    root.draw(&PathElement::new(
        vec![(left, top), (left, bottom), (right, bottom)],
        BLACK.stroke_width(1),
    ))
    .map_err(chart_err)?;

    for (i, row) in data.rows.iter().enumerate() {
        let value = row.value.max(0.0);
        let x0 = left as f64 + slot * i as f64 + (slot - bar_w) / 2.0;
        let x1 = x0 + bar_w;
        let y_top = bottom as f64 - value / max * plot_h;

        root.draw(&Rectangle::new(
            [(x0.round() as i32, y_top.round() as i32), (x1.round() as i32, bottom)],
            color(i).filled(),
        ))
        .map_err(chart_err)?;

        let cx = ((x0 + x1) / 2.0).round() as i32;
        draw_label(
            root,
            &label.format(row.value),
            (cx, y_top.round() as i32 - 10),
            13,
            HPos::Center,
        );

        let max_chars = ((slot / 8.0) as usize).max(4);
        draw_label(
            root,
            &truncate(&row.label(), max_chars),
            (cx, bottom + 18),
            13,
            HPos::Center,
        );
    }

    Ok(())
}
