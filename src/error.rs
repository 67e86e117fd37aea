use std::path::PathBuf;

/// Errors that end a run. Row-level classifier failures never show up here;
/// they are absorbed into sentinel verdicts.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Failed to load models: {0}")]
    ClassifierInit(String),

    #[error("No valid feedback found in CSV file")]
    NoValidFeedback,

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("CSV must have '{column}' column. Found columns: {found}")]
    MissingColumn { column: String, found: String },

    #[error("No instructor data found in CSV")]
    NoInstructorData,

    #[error("Invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalyzerError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AnalyzerError::Config(_) | AnalyzerError::MissingColumn { .. } => 2,
            AnalyzerError::FileNotFound(_) => 3,
            AnalyzerError::NoValidFeedback | AnalyzerError::NoInstructorData => 4,
            AnalyzerError::ClassifierInit(_) => 5,
            AnalyzerError::Csv(_) | AnalyzerError::Io(_) => 1,
        }
    }

    /// Maps a failed open into `FileNotFound` when the path is missing.
    pub fn from_open(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            AnalyzerError::FileNotFound(path.to_path_buf())
        } else {
            AnalyzerError::Io(err)
        }
    }
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_kind() {
        let codes = [
            AnalyzerError::Config("bad".to_string()).exit_code(),
            AnalyzerError::FileNotFound(PathBuf::from("x.csv")).exit_code(),
            AnalyzerError::NoValidFeedback.exit_code(),
            AnalyzerError::ClassifierInit("boom".to_string()).exit_code(),
        ];
        assert_eq!(codes, [2, 3, 4, 5]);
    }

    #[test]
    fn missing_path_becomes_file_not_found() {
        let err = AnalyzerError::from_open(
            std::path::Path::new("feedback.csv"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, AnalyzerError::FileNotFound(_)));
        assert_eq!(err.to_string(), "File not found: feedback.csv");
    }
}
