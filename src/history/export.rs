//! CSV export of the history ledger.
//!
//! Values are written exactly as displayed (two-decimal numbers and the
//! local timestamp). Nothing is quoted or escaped.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{COLUMNS, History};

/// MIME type of the exported blob.
pub const CSV_MIME: &str = "text/csv";

/// Serialize the ledger: header row, then one row per entry, most recent
/// first, `\n`-separated with no trailing newline.
pub fn to_csv(history: &History) -> String {
    let mut lines = Vec::with_capacity(history.len() + 1);
    lines.push(COLUMNS.join(","));
    lines.extend(history.rows().iter().map(|row| row.join(",")));
    lines.join("\n")
}

/// Write the CSV to `dir/file_name` and return the written path.
///
/// The file is flushed and closed before this returns.
pub fn export(history: &History, dir: &Path, file_name: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    let csv = to_csv(history);

    let mut file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(csv.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    file.sync_all()
        .with_context(|| format!("failed to flush {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = history.len(), "exported history");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
