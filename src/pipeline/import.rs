// src/pipeline/import.rs

//! Bulk import: spreadsheet rows → normalized novels → `POST /novels/bulk`.

use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::models::Novel;
use crate::pipeline::normalize::normalize_rows;
use crate::services::NovelStore;
use crate::utils::display;

/// Outcome of an import run.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Rows read from the input
    pub rows: usize,
    /// Novels the store reports as inserted (0 on a dry run)
    pub inserted: usize,
    pub message: String,
    pub dry_run: bool,
    pub novels: Vec<Novel>,
}

/// Read a JSON array of rows from disk.
pub async fn read_rows(path: &Path) -> Result<Value> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Normalize rows and send them to the store in one bulk request.
pub async fn run_import(store: &dyn NovelStore, rows: &Value, dry_run: bool) -> Result<ImportReport> {
    display::header("Bulk import");

    display::step(1, 2, "Normalizing rows");
    let novels = normalize_rows(rows)?;
    log::info!("Normalized {} rows", novels.len());

    let mut report = ImportReport {
        rows: novels.len(),
        dry_run,
        ..ImportReport::default()
    };

    if dry_run {
        display::step(2, 2, "Dry run, nothing sent");
        display::novel_list(&novels);
        report.message = "dry run".to_string();
    } else {
        display::step(2, 2, "Sending to the store");
        let response = store.create_bulk(&novels).await?;
        report.inserted = response.inserted_count;
        report.message = response.message;
    }

    display::summary(
        "Import Results",
        &[
            ("Rows", report.rows.to_string()),
            ("Inserted", report.inserted.to_string()),
            ("Message", report.message.clone()),
        ],
    );

    report.novels = novels;
    Ok(report)
}
