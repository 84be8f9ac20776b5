// src/export/pdf_export.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{ExportTable, ReportHeading};
use crate::export::notify_export_success;
use crate::export::pdf::ReportPdf;
use crate::report::compose::NO_DATA;
use crate::ui::messages::info;
use std::fs;
use std::path::Path;

/// Every table in one document, in report order.
pub(crate) fn export_pdf(
    tables: &[ExportTable],
    path: &Path,
    heading: &ReportHeading,
) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    fs::write(path, render_pdf(tables, heading))
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))?;

    notify_export_success("PDF", path);
    Ok(())
}

pub fn render_pdf(tables: &[ExportTable], heading: &ReportHeading) -> Vec<u8> {
    let mut doc = ReportPdf::new(heading);
    for table in tables {
        doc.table(table, NO_DATA);
    }
    doc.finish()
}
