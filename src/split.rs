use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::ingest::{open_csv, INSTRUCTOR_COLUMN};

static PATH_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[/\\]").expect("separator pattern is valid"));
static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("unsafe-char pattern is valid"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

#[derive(Debug, Clone)]
pub struct InstructorFile {
    pub instructor: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Filesystem-safe token for an instructor name: "Dr. A. Rao" -> "Dr_A_Rao".
/// Path separators become underscores.
pub fn sanitize_instructor_name(name: &str) -> String {
    let separated = PATH_SEPARATORS.replace_all(name, " ");
    let kept = UNSAFE_CHARS.replace_all(&separated, "");
    let joined = WHITESPACE.replace_all(&kept, "_");
    joined.trim_matches('_').to_string()
}

/// Writes one CSV per instructor into `out_dir`, keeping the original header.
/// Groups are written in order of first appearance.
pub fn split_by_instructor(csv_path: &Path, out_dir: &Path) -> AnalyzerResult<Vec<InstructorFile>> {
    let mut reader = open_csv(csv_path)?;
    let headers = reader.headers()?.clone();

    let column = headers
        .iter()
        .position(|header| header == INSTRUCTOR_COLUMN)
        .ok_or_else(|| AnalyzerError::MissingColumn {
            column: INSTRUCTOR_COLUMN.to_string(),
            found: headers.iter().collect::<Vec<_>>().join(", "),
        })?;

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<csv::StringRecord>> = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let instructor = record.get(column).unwrap_or("").trim().to_string();
        if instructor.is_empty() {
            continue;
        }
        if !groups.contains_key(&instructor) {
            order.push(instructor.clone());
        }
        groups.entry(instructor).or_default().push(record);
    }

    if order.is_empty() {
        return Err(AnalyzerError::NoInstructorData);
    }

    std::fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    for instructor in order {
        let rows = groups.remove(&instructor).unwrap_or_default();
        let path = out_dir.join(format!("{}_feedback.csv", sanitize_instructor_name(&instructor)));

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&headers)?;
        for row in &rows {
            // pad short rows to the header width
            let padding = headers.len().saturating_sub(row.len());
            writer.write_record(row.iter().chain(std::iter::repeat("").take(padding)))?;
        }
        writer.flush()?;

        tracing::debug!(instructor = %instructor, rows = rows.len(), "instructor file written");
        written.push(InstructorFile {
            instructor,
            path,
            rows: rows.len(),
        });
    }

    Ok(written)
}
