// src/export/logic.rs

use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{ExportTable, ReportHeading};
use crate::export::pdf_export::export_pdf;
use crate::export::xlsx::export_xlsx;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Write the report tables to `file` (absolute path) in `format`.
    /// `heading` heads the PDF document.
    pub fn export(
        tables: &[ExportTable],
        format: &ExportFormat,
        file: &str,
        heading: &ReportHeading,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        if tables.iter().all(ExportTable::is_empty) {
            warning("No data found for the selected range.");
        }

        match format {
            ExportFormat::Csv => export_csv(tables, path),
            ExportFormat::Json => export_json(tables, path),
            ExportFormat::Xlsx => export_xlsx(tables, path),
            ExportFormat::Pdf => export_pdf(tables, path, heading),
        }
    }
}
