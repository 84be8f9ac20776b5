// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::excel_date::parse_to_excel_date;
use crate::export::model::ExportTable;
use crate::export::notify_export_success;
use crate::report::html::{HEADER_FILL, HEADER_TEXT, PLAIN_FILL, STRIPE_FILL};
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const SHEET_NAME_MAX: usize = 31;

/// One worksheet per table, styled header, banded rows, auto column width.
pub(crate) fn export_xlsx(tables: &[ExportTable], path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();

    if tables.is_empty() {
        let worksheet = workbook.add_worksheet();
        worksheet
            .write(0, 0, "No data available")
            .map_err(to_export_error)?;
        workbook.save(path).map_err(to_export_error)?;
        notify_export_success("XLSX (empty dataset)", path);
        return Ok(());
    }

    let mut used_names: Vec<String> = Vec::new();
    for table in tables {
        let name = unique_sheet_name(&table.title, &used_names);
        used_names.push(name.clone());

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name).map_err(to_export_error)?;
        write_table(worksheet, table)?;
    }

    workbook.save(path).map_err(to_export_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, table: &ExportTable) -> AppResult<()> {
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(HEADER_TEXT))
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, header.as_str(), &header_format)
            .map_err(to_export_error)?;
    }

    worksheet.set_freeze_panes(1, 0).ok();

    let mut col_widths: Vec<usize> = table
        .headers
        .iter()
        .map(|h| UnicodeWidthStr::width(h.as_str()))
        .collect();

    let band1 = Color::RGB(PLAIN_FILL);
    let band2 = Color::RGB(STRIPE_FILL);

    for (row_index, values) in table.rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band_color = if row_index % 2 == 0 { band1 } else { band2 };

        for (col, value) in values.iter().enumerate().take(col_widths.len()) {
            write_xlsx_cell(worksheet, row, col as u16, value, band_color)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_export_error)?;
    }

    Ok(())
}

/// Dates and plain numbers are written as such; anything else as text.
fn write_xlsx_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    s: &str,
    bg: Color,
) -> AppResult<()> {
    let base = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    if let Some((num_format, serial)) = parse_to_excel_date(s) {
        worksheet
            .write_with_format(row, col, serial, &base.set_num_format(num_format))
            .map_err(to_export_error)?;
        return Ok(());
    }

    if let Ok(num) = s.parse::<f64>() {
        worksheet
            .write_with_format(row, col, num, &base.set_align(FormatAlign::Right))
            .map_err(to_export_error)?;
        return Ok(());
    }

    worksheet
        .write_with_format(row, col, s, &base)
        .map_err(to_export_error)?;
    Ok(())
}

/// Excel sheet names: at most 31 chars, none of `[]:*?/\`, unique.
fn unique_sheet_name(title: &str, used: &[String]) -> String {
    let clean: String = title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let clean = clean.trim();
    let base: String = if clean.is_empty() {
        "Tabela".to_string()
    } else {
        clean.chars().take(SHEET_NAME_MAX).collect()
    };

    let mut name = base.clone();
    let mut n = 2;
    while used.iter().any(|u| u.eq_ignore_ascii_case(&name)) {
        let suffix = format!(" ({n})");
        let keep = SHEET_NAME_MAX.saturating_sub(suffix.chars().count());
        name = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
        n += 1;
    }
    name
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
