use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Free-text answers keyed by survey question. An answer is present when its
/// cell was non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionAnswers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improve: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional: Option<String>,
}

impl QuestionAnswers {
    /// Present answers in fixed question order: liked, improve, additional.
    pub fn present(&self) -> impl Iterator<Item = &str> {
        [&self.liked, &self.improve, &self.additional]
            .into_iter()
            .filter_map(|answer| answer.as_deref())
            .filter(|text| !text.is_empty())
    }

    /// Copy with empty answers cleared.
    pub fn without_empty(&self) -> Self {
        let keep = |answer: &Option<String>| answer.clone().filter(|text| !text.is_empty());
        Self {
            liked: keep(&self.liked),
            improve: keep(&self.improve),
            additional: keep(&self.additional),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackRecord {
    pub student_id: Option<String>,
    pub course: Option<String>,
    pub instructor: Option<String>,
    pub rating: Option<String>,
    pub answers: QuestionAnswers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Mixed,
    Neutral,
    Unknown,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Mixed => "Mixed",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentVerdict {
    pub label: SentimentLabel,
    pub confidence: f64,
}

impl SentimentVerdict {
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        Self { label, confidence }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Topic {
    #[serde(rename = "Teaching Style")]
    TeachingStyle,
    #[serde(rename = "Course Content")]
    CourseContent,
    Infrastructure,
    Assessment,
    #[serde(rename = "Faculty Behavior")]
    FacultyBehavior,
    #[serde(rename = "General Feedback")]
    GeneralFeedback,
}

impl Topic {
    /// Candidate labels handed to the topic classifier, in this order.
    pub const ALL: [Topic; 6] = [
        Topic::TeachingStyle,
        Topic::CourseContent,
        Topic::Infrastructure,
        Topic::Assessment,
        Topic::FacultyBehavior,
        Topic::GeneralFeedback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::TeachingStyle => "Teaching Style",
            Topic::CourseContent => "Course Content",
            Topic::Infrastructure => "Infrastructure",
            Topic::Assessment => "Assessment",
            Topic::FacultyBehavior => "Faculty Behavior",
            Topic::GeneralFeedback => "General Feedback",
        }
    }

    pub fn dashboard_category(&self) -> DashboardCategory {
        match self {
            Topic::TeachingStyle => DashboardCategory::TeachingQuality,
            Topic::CourseContent => DashboardCategory::CourseContent,
            Topic::Infrastructure => DashboardCategory::Resources,
            Topic::Assessment => DashboardCategory::Assessment,
            Topic::FacultyBehavior => DashboardCategory::Engagement,
            Topic::GeneralFeedback => DashboardCategory::General,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DashboardCategory {
    #[serde(rename = "Teaching Quality")]
    TeachingQuality,
    #[serde(rename = "Course Content")]
    CourseContent,
    Resources,
    Assessment,
    Engagement,
    General,
}

impl DashboardCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardCategory::TeachingQuality => "Teaching Quality",
            DashboardCategory::CourseContent => "Course Content",
            DashboardCategory::Resources => "Resources",
            DashboardCategory::Assessment => "Assessment",
            DashboardCategory::Engagement => "Engagement",
            DashboardCategory::General => "General",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicVerdict {
    pub topic: Topic,
    pub confidence: f64,
}

impl TopicVerdict {
    pub fn new(topic: Topic, confidence: f64) -> Self {
        Self { topic, confidence }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub student_id: String,
    pub course: String,
    pub instructor: String,
    pub rating: String,
    pub sentiment: SentimentVerdict,
    pub topic: TopicVerdict,
    pub feedback_text: String,
    pub answers: QuestionAnswers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSummary {
    pub question: String,
    pub sentiment: SentimentLabel,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_responses: usize,
    pub average_rating: f64,
    pub avg_sentiment_percentage: i64,
    pub key_themes_count: usize,
    pub sentiment_distribution: BTreeMap<SentimentLabel, f64>,
    pub category_distribution: BTreeMap<Topic, usize>,
    pub dashboard_categories: BTreeMap<DashboardCategory, usize>,
    pub recommendations: Vec<String>,
    pub ai_question_summaries: Vec<QuestionSummary>,
    pub top_praise_areas: Vec<String>,
    pub improvement_areas: Vec<String>,
}
