use std::fmt::Write;

use anyhow::Result;

use crate::io::TermStore;
use crate::models::ManifestRow;

const COLUMNS: [&str; 4] = ["Dictionary", "Flashcard", "Audio", "Image"];
const PRESENT: &str = "✅";
const ABSENT: &str = "❌";

/// Inspect every entry directory, sorted by id
pub fn scan_manifest(store: &TermStore) -> Result<Vec<ManifestRow>> {
    Ok(store
        .entries()?
        .iter()
        .map(ManifestRow::inspect)
        .collect())
}

/// Render rows as a fixed-width table
pub fn render_manifest(rows: &[ManifestRow]) -> String {
    if rows.is_empty() {
        return "No vocabulary entries found.\n".to_string();
    }

    let id_width = rows
        .iter()
        .map(|r| r.id.as_str().chars().count())
        .chain(std::iter::once("Term".len()))
        .max()
        .unwrap_or(4);

    let mut out = String::new();
    let _ = writeln!(out, "Vocabulary manifest: {} entries", rows.len());
    let _ = write!(out, "{:<width$}", "Term", width = id_width);
    for column in COLUMNS {
        let _ = write!(out, "  {:<10}", column);
    }
    out.push('\n');

    let complete = rows.iter().filter(|r| r.is_complete()).count();
    for row in rows {
        let _ = write!(out, "{:<width$}", row.id.as_str(), width = id_width);
        for (flag, column) in row.flags().iter().zip(COLUMNS) {
            let mark = if *flag { PRESENT } else { ABSENT };
            // emoji render two columns wide
            let _ = write!(out, "  {:<pad$}", mark, pad = column.len().max(10) - 1);
        }
        out.push('\n');
    }
    let _ = writeln!(out, "{} of {} entries complete", complete, rows.len());
    out
}

/// Execute the manifest stage: scan and render
pub fn execute_manifest(store: &TermStore) -> Result<String> {
    Ok(render_manifest(&scan_manifest(store)?))
}
