//! One-shot CSV loader for the base tables.
//!
//! Tables load in dependency order, one transaction per table, with batched
//! prepared inserts. Screenings pass through the referential filter: rows
//! pointing at an unknown theater are dropped and counted, never inserted.

pub mod record;

use std::collections::HashSet;
use std::path::Path;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::schema::{ReferentialFilter, TableSchema, ALL_TABLES};
use crate::store::Store;

use record::{convert_row, HeaderMap};

const BATCH_SIZE: usize = 1000;

/// Row counts observed while loading one table.
#[derive(Debug, Clone)]
pub struct TableLoad {
    pub table: &'static str,
    pub inserted: u64,
    /// Rows excluded by the referential filter
    pub dropped: u64,
}

/// Outcome of a full load run, one entry per base table.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub tables: Vec<TableLoad>,
}

impl LoadSummary {
    pub fn total_inserted(&self) -> u64 {
        self.tables.iter().map(|t| t.inserted).sum()
    }

    /// Fact rows dropped by the referential filter across the whole load.
    /// This is an observability signal, not a failure.
    pub fn dropped_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.dropped).sum()
    }
}

/// Load every base table from `source_dir` into the store.
///
/// Fails with `Error::SourceNotFound` if a required CSV is absent and with
/// `Error::MalformedRow` on the first row that does not normalize; either
/// aborts the run with the current table rolled back.
pub fn load_all(store: &Store, source_dir: &Path) -> Result<LoadSummary> {
    let mut conn = store.conn()?;

    let multi = MultiProgress::new();
    let style = ProgressStyle::default_bar()
        .template("{msg:40} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap()
        .progress_chars("=>-");

    let mut summary = LoadSummary::default();

    for table in ALL_TABLES {
        let file_path = source_dir.join(table.source_file);
        if !file_path.exists() {
            return Err(Error::SourceNotFound {
                table: table.name,
                path: file_path,
            });
        }

        let row_count = count_data_rows(&file_path)?;
        let pb = multi.add(ProgressBar::new(row_count));
        pb.set_style(style.clone());
        pb.set_message(table.name.to_string());

        let load = load_table(&mut conn, table, &file_path, &pb)?;
        summary.tables.push(load);
    }

    Ok(summary)
}

/// Load a single table inside one transaction. Returns the row counts.
fn load_table(
    conn: &mut Connection,
    table: &TableSchema,
    path: &Path,
    progress: &ProgressBar,
) -> Result<TableLoad> {
    // Snapshot the valid parent keys before touching the fact table
    let referential = match &table.load_filter {
        Some(filter) => {
            let idx = table
                .columns
                .iter()
                .position(|c| c.name == filter.column)
                .ok_or_else(|| {
                    Error::Schema(format!(
                        "load filter column '{}' is not part of table '{}'",
                        filter.column, table.name
                    ))
                })?;
            Some((idx, parent_keys(conn, filter)?))
        }
        None => None,
    };

    let columns: Vec<&str> = table.columns.iter().map(|c| c.name).collect();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    let insert_sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name,
        columns.join(", "),
        placeholders.join(", ")
    );

    let mut reader = csv::Reader::from_path(path)?;
    let header = HeaderMap::from_headers(table, reader.headers()?)?;

    let tx = conn.transaction()?;
    let mut inserted: u64 = 0;
    let mut dropped: u64 = 0;
    let mut batch: Vec<Vec<Value>> = Vec::with_capacity(BATCH_SIZE);

    for (i, result) in reader.records().enumerate() {
        let csv_record = result?;
        // Data starts on line 2; line 1 is the header
        let line = i as u64 + 2;
        let row = convert_row(table, &header, &csv_record, line)?;

        if let Some((idx, valid)) = &referential {
            if let Value::Integer(key) = row[*idx] {
                if !valid.contains(&key) {
                    dropped += 1;
                    progress.set_position(inserted + dropped);
                    continue;
                }
            }
        }

        batch.push(row);

        if batch.len() >= BATCH_SIZE {
            insert_batch(&tx, &insert_sql, &batch)?;
            inserted += batch.len() as u64;
            progress.set_position(inserted + dropped);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&tx, &insert_sql, &batch)?;
        inserted += batch.len() as u64;
    }

    tx.commit()?;
    progress.set_position(inserted + dropped);

    if dropped > 0 {
        progress.finish_with_message(format!(
            "{}: {} rows ({} dropped by referential filter)",
            table.name, inserted, dropped
        ));
    } else {
        progress.finish_with_message(format!("{}: {} rows", table.name, inserted));
    }

    Ok(TableLoad {
        table: table.name,
        inserted,
        dropped,
    })
}

/// Snapshot of the parent keys currently present for a referential filter.
fn parent_keys(conn: &Connection, filter: &ReferentialFilter) -> Result<HashSet<i64>> {
    let sql = format!(
        "SELECT {} FROM {}",
        filter.references_column, filter.references_table
    );
    let mut stmt = conn.prepare(&sql)?;
    let keys = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<HashSet<i64>>>()?;
    Ok(keys)
}

/// Insert a batch of rows through one cached prepared statement.
fn insert_batch(tx: &rusqlite::Transaction, sql: &str, batch: &[Vec<Value>]) -> Result<()> {
    let mut stmt = tx.prepare_cached(sql)?;

    for row in batch {
        for (idx, value) in row.iter().enumerate() {
            stmt.raw_bind_parameter(idx + 1, value)?;
        }
        stmt.raw_execute()?;
    }

    Ok(())
}

/// Count data rows so the progress bar has a length.
fn count_data_rows(path: &Path) -> Result<u64> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut count = 0u64;
    for result in reader.records() {
        result?;
        count += 1;
    }
    Ok(count)
}
