use crate::classifier::Classifiers;
use crate::models::{AnalysisResult, FeedbackRecord};
use crate::sentiment::resolve_sentiment;
use crate::topic::resolve_topic;

pub struct RecordAnalyzer<'a> {
    classifiers: &'a Classifiers,
}

impl<'a> RecordAnalyzer<'a> {
    pub fn new(classifiers: &'a Classifiers) -> Self {
        Self { classifiers }
    }

    /// Analyzes one record. Returns `None` when the record carries no text.
    pub fn analyze(&self, record: &FeedbackRecord) -> Option<AnalysisResult> {
        let feedback_text = record.answers.present().collect::<Vec<_>>().join(" ");
        if feedback_text.trim().is_empty() {
            return None;
        }

        let sentiment = resolve_sentiment(&*self.classifiers.sentiment, &feedback_text);
        let topic = resolve_topic(&*self.classifiers.topic, &feedback_text);

        tracing::debug!(
            student_id = record.student_id.as_deref().unwrap_or("Unknown"),
            sentiment = %sentiment.label,
            topic = %topic.topic,
            "record analyzed"
        );

        Some(AnalysisResult {
            student_id: or_default(&record.student_id, "Unknown"),
            course: or_default(&record.course, "Unknown"),
            instructor: or_default(&record.instructor, "Unknown"),
            rating: or_default(&record.rating, "N/A"),
            sentiment,
            topic,
            feedback_text,
            answers: record.answers.without_empty(),
        })
    }

    /// Analyzes every record in order, dropping the ones without text.
    pub fn analyze_all(&self, records: &[FeedbackRecord]) -> Vec<AnalysisResult> {
        let results: Vec<AnalysisResult> = records
            .iter()
            .filter_map(|record| self.analyze(record))
            .collect();

        let dropped = records.len() - results.len();
        if dropped > 0 {
            tracing::debug!(dropped, "records without feedback text skipped");
        }
        results
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}
