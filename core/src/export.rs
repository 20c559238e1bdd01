//! Flat-file export: one CSV per table plus a JSON run manifest.
//!
//! Any write failure aborts the export. A directory holding a partial
//! set of files is not a valid dataset.

use crate::{engine::Dataset, error::GenResult, summary::RunManifest};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

pub const POLICY_FILE: &str = "life_insurance_data.csv";
pub const TRANSACTION_FILE: &str = "premium_production.csv";
pub const CLAIM_FILE: &str = "historical_claim.csv";
pub const MANIFEST_FILE: &str = "run_manifest.json";

/// Serialize `rows` as CSV. The header line comes from the row type's
/// field names and is written with the first row, so an empty table
/// produces an empty file.
pub fn write_table<W: Write, T: Serialize>(writer: W, rows: &[T]) -> GenResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_table_file<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> GenResult<()> {
    let path = dir.join(name);
    let file = File::create(&path)?;
    write_table(BufWriter::new(file), rows)?;
    log::info!("export: wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write all three tables and the manifest into `dir`, creating it if
/// needed. Returns the file names written, in write order.
pub fn write_dataset(dir: &Path, ds: &Dataset) -> GenResult<Vec<String>> {
    fs::create_dir_all(dir)?;

    write_table_file(dir, POLICY_FILE, &ds.policies)?;
    write_table_file(dir, TRANSACTION_FILE, &ds.transactions)?;
    write_table_file(dir, CLAIM_FILE, &ds.claims)?;

    let tables: Vec<String> = [POLICY_FILE, TRANSACTION_FILE, CLAIM_FILE]
        .iter()
        .map(|f| f.to_string())
        .collect();
    let manifest = RunManifest::new(ds, tables.clone());
    let mut out = BufWriter::new(File::create(dir.join(MANIFEST_FILE))?);
    serde_json::to_writer_pretty(&mut out, &manifest)?;
    out.flush()?;
    log::debug!("export: manifest written to {}", dir.join(MANIFEST_FILE).display());

    let mut written = tables;
    written.push(MANIFEST_FILE.to_string());
    Ok(written)
}
