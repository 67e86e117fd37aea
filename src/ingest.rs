use std::fs::File;
use std::path::Path;

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{FeedbackRecord, QuestionAnswers};

pub const INSTRUCTOR_COLUMN: &str = "Instructor";

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Student ID", default)]
    student_id: Option<String>,
    #[serde(rename = "Course", default)]
    course: Option<String>,
    #[serde(rename = "Instructor", default)]
    instructor: Option<String>,
    #[serde(rename = "How would you rate the overall teaching?", default)]
    rating: Option<String>,
    #[serde(rename = "What did you like about the lectures?", default)]
    liked: Option<String>,
    #[serde(rename = "What can be improved in this course?", default)]
    improve: Option<String>,
    #[serde(rename = "Any additional comments?", default)]
    additional: Option<String>,
}

impl From<CsvRow> for FeedbackRecord {
    fn from(row: CsvRow) -> Self {
        FeedbackRecord {
            student_id: row.student_id,
            course: row.course,
            instructor: row.instructor,
            rating: row.rating,
            answers: QuestionAnswers {
                liked: row.liked,
                improve: row.improve,
                additional: row.additional,
            },
        }
    }
}

/// Opens a CSV input, reporting a missing file as `FileNotFound`. Short rows
/// are accepted; their missing trailing cells read as `None`.
pub fn open_csv(path: &Path) -> AnalyzerResult<csv::Reader<File>> {
    let file = File::open(path).map_err(|err| AnalyzerError::from_open(path, err))?;
    Ok(csv::ReaderBuilder::new().flexible(true).from_reader(file))
}

/// Reads survey rows. Empty cells and missing columns come through as `None`.
pub fn read_feedback_csv(path: &Path) -> AnalyzerResult<Vec<FeedbackRecord>> {
    let mut reader = open_csv(path)?;
    let mut records = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        records.push(result?.into());
    }

    tracing::debug!(rows = records.len(), path = %path.display(), "feedback rows read");
    Ok(records)
}
