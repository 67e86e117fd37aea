use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{AnalysisResult, Summary};

#[derive(Debug, Clone, Serialize)]
pub struct IndividualAnalysis {
    pub student_id: String,
    pub course: String,
    pub instructor: String,
    pub rating: String,
    pub sentiment: String,
    pub category: String,
    pub feedback_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    pub individual_analysis: Vec<IndividualAnalysis>,
}

/// Cuts `text` to at most `max_chars` characters, appending "..." when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

pub fn individual_analysis(result: &AnalysisResult, preview_chars: usize) -> IndividualAnalysis {
    IndividualAnalysis {
        student_id: result.student_id.clone(),
        course: result.course.clone(),
        instructor: result.instructor.clone(),
        rating: result.rating.clone(),
        sentiment: format!("{} ({:.2})", result.sentiment.label, result.sentiment.confidence),
        category: format!("{} ({:.2})", result.topic.topic, result.topic.confidence),
        feedback_text: preview(&result.feedback_text, preview_chars),
    }
}

pub fn build_report(
    run_id: Uuid,
    summary: Summary,
    results: &[AnalysisResult],
    preview_chars: usize,
) -> AnalysisReport {
    AnalysisReport {
        run_id,
        generated_at: Utc::now(),
        summary,
        individual_analysis: results
            .iter()
            .map(|result| individual_analysis(result, preview_chars))
            .collect(),
    }
}

pub fn render_markdown(report: &AnalysisReport) -> String {
    let summary = &report.summary;
    let mut output = String::new();

    let _ = writeln!(output, "# Course Feedback Report");
    let _ = writeln!(
        output,
        "Generated {} (run {})",
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.run_id
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Responses: {}", summary.total_responses);
    let _ = writeln!(output, "- Average rating: {:.1}", summary.average_rating);
    let _ = writeln!(output, "- Positive share: {}%", summary.avg_sentiment_percentage);
    let _ = writeln!(output, "- Key themes: {}", summary.key_themes_count);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Sentiment Mix");
    for (label, share) in &summary.sentiment_distribution {
        let _ = writeln!(output, "- {}: {:.1}%", label, share);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Topic Mix");
    if summary.category_distribution.is_empty() {
        let _ = writeln!(output, "No topics recorded.");
    } else {
        let mut topics: Vec<_> = summary.category_distribution.iter().collect();
        topics.sort_by(|a, b| b.1.cmp(a.1));
        for (topic, count) in topics {
            let _ = writeln!(
                output,
                "- {} ({}): {} responses",
                topic,
                topic.dashboard_category().as_str(),
                count
            );
        }
    }

    write_list(&mut output, "Top Praise", &summary.top_praise_areas);
    write_list(&mut output, "Areas To Improve", &summary.improvement_areas);
    write_list(&mut output, "Recommendations", &summary.recommendations);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Question Summaries");
    if summary.ai_question_summaries.is_empty() {
        let _ = writeln!(output, "No question summaries for this batch.");
    } else {
        for entry in &summary.ai_question_summaries {
            let _ = writeln!(
                output,
                "- {} ({}): {}",
                entry.question, entry.sentiment, entry.summary
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Responses");
    for entry in report.individual_analysis.iter() {
        let _ = writeln!(
            output,
            "- {} ({}, {}) rated {}: {} / {}: {}",
            entry.student_id,
            entry.course,
            entry.instructor,
            entry.rating,
            entry.sentiment,
            entry.category,
            entry.feedback_text
        );
    }

    output
}

fn write_list(output: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## {title}");
    if items.is_empty() {
        let _ = writeln!(output, "Nothing recorded.");
    }
    for item in items {
        let _ = writeln!(output, "- {item}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::summarize;
    use crate::models::{QuestionAnswers, SentimentLabel, SentimentVerdict, Topic, TopicVerdict};

    fn sample(text: &str) -> AnalysisResult {
        AnalysisResult {
            student_id: "S1".to_string(),
            course: "CS101".to_string(),
            instructor: "Dr. Rao".to_string(),
            rating: "4.5".to_string(),
            sentiment: SentimentVerdict::new(SentimentLabel::Positive, 0.9876),
            topic: TopicVerdict::new(Topic::Infrastructure, 0.5),
            feedback_text: text.to_string(),
            answers: QuestionAnswers {
                liked: Some(text.to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 200), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("héllo wörld", 7), "héllo w...");
        assert_eq!(preview("exact", 5), "exact");
    }

    #[test]
    fn individual_lines_format_scores() {
        let entry = individual_analysis(&sample("Lab wifi is great"), 200);
        assert_eq!(entry.sentiment, "Positive (0.99)");
        assert_eq!(entry.category, "Infrastructure (0.50)");
        assert_eq!(entry.feedback_text, "Lab wifi is great");
    }

    #[test]
    fn json_uses_display_labels() {
        let results = vec![sample("Lab wifi is great")];
        let report = build_report(Uuid::new_v4(), summarize(&results), &results, 200);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["summary"]["total_responses"], 1);
        assert_eq!(value["summary"]["category_distribution"]["Infrastructure"], 1);
        assert_eq!(value["summary"]["dashboard_categories"]["Resources"], 1);
        assert_eq!(value["summary"]["sentiment_distribution"]["Positive"], 100.0);
        assert_eq!(value["individual_analysis"][0]["instructor"], "Dr. Rao");
    }

    #[test]
    fn markdown_lists_sections() {
        let results = vec![sample("Lab wifi is great")];
        let report = build_report(Uuid::new_v4(), summarize(&results), &results, 200);
        let text = render_markdown(&report);

        assert!(text.starts_with("# Course Feedback Report"));
        for section in ["## Sentiment Mix", "## Topic Mix", "## Recommendations", "## Responses"] {
            assert!(text.contains(section), "missing {section}");
        }
        assert!(text.contains("- Infrastructure (Resources): 1 responses"));
    }
}
