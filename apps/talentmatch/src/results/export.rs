//! Delimited-text export of the ranked result set.
//!
//! The header is the field list of the first candidate; every row follows that order.
//! Cells holding the delimiter, a quote or a line break are quoted RFC 4180 style.

use std::path::Path;

use tracing::info;

use crate::models::CandidateResult;
use crate::results::ranking::ResultSet;

pub const DEFAULT_REPORT_NAME: &str = "TalentMatch_Report.csv";
const DELIMITER: char = ',';
/// Joins matched skills inside one cell.
const LIST_SEPARATOR: &str = "; ";

/// `None` when the set is empty: there is nothing to export.
pub fn to_delimited_text(results: &ResultSet) -> Option<String> {
    let first = results.candidates().first()?;
    let header: Vec<&'static str> = export_fields(first).into_iter().map(|(k, _)| k).collect();

    let mut out = join_row(header.iter().map(|k| k.to_string()));
    for candidate in results.iter() {
        let fields = export_fields(candidate);
        let row = header.iter().map(|key| {
            fields
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        });
        out.push('\n');
        out.push_str(&join_row(row));
    }

    Some(out)
}

/// Writes the export to `path`. Returns `false` without touching the disk when there is nothing to write.
pub async fn write_report(path: &Path, results: &ResultSet) -> std::io::Result<bool> {
    let Some(text) = to_delimited_text(results) else {
        return Ok(false);
    };
    tokio::fs::write(path, text).await?;
    info!("Exported {} candidate(s) to {}", results.len(), path.display());
    Ok(true)
}

/// Field name and rendered value, in the order the ranking service sends them.
/// Identity fields lead when present; absent optional fields are left out.
fn export_fields(c: &CandidateResult) -> Vec<(&'static str, String)> {
    let mut fields = Vec::with_capacity(11);
    if let Some(id) = &c.candidate_id {
        fields.push(("candidate_id", id.to_string()));
    }
    if let Some(name) = &c.candidate_name {
        fields.push(("candidate_name", name.clone()));
    }
    fields.extend([
        ("final_score", c.final_score.to_string()),
        ("skills_score", c.skills_score.to_string()),
        ("exp_score", c.exp_score.to_string()),
        ("edu_score", c.edu_score.to_string()),
        ("relevance_score", c.relevance_score.to_string()),
        ("ats_score", c.ats_score.to_string()),
        ("matched_skills_count", c.matched_skills_count.to_string()),
        ("matched_skills", c.matched_skills.join(LIST_SEPARATOR)),
        ("experience", c.experience.clone()),
    ]);
    fields
}

fn join_row(cells: impl Iterator<Item = String>) -> String {
    cells
        .map(|cell| escape_cell(&cell))
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

fn escape_cell(cell: &str) -> String {
    if cell.contains([DELIMITER, '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
