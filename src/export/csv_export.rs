use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::ledger::MonthlyMatrix;

/// Write `matrix` as CSV: a `participant,<months...>,total` header, one row
/// per participant and a closing `total` row.
pub(crate) fn write_matrix<W: Write>(matrix: &MonthlyMatrix, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut header = vec!["participant".to_string()];
    header.extend(matrix.labels().iter().map(|l| l.to_string()));
    header.push("total".into());
    wtr.write_record(&header)
        .context("Failed to write CSV header")?;

    for row in &matrix.rows {
        let mut record = vec![row.label.clone()];
        record.extend(row.cells.iter().map(|c| c.to_string()));
        record.push(row.total().to_string());
        wtr.write_record(&record)
            .with_context(|| format!("Failed to write CSV row for {}", row.label))?;
    }

    let mut totals = vec!["total".to_string()];
    totals.extend(matrix.column_totals().iter().map(|c| c.to_string()));
    totals.push(matrix.grand_total().to_string());
    wtr.write_record(&totals)
        .context("Failed to write CSV totals")?;

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub(crate) fn write_matrix_to_path(matrix: &MonthlyMatrix, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_matrix(matrix, file)?;
    tracing::info!(path = %path.display(), rows = matrix.rows.len(), "matrix exported");
    Ok(())
}

#[cfg(test)]
#[path = "csv_export_tests.rs"]
mod tests;
