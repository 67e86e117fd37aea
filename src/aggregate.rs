use std::collections::BTreeMap;

use crate::models::{AnalysisResult, QuestionSummary, SentimentLabel, Summary, Topic};
use crate::phrases::{extract_key_phrases, PhraseFilter};

pub const TOP_PRAISE: usize = 4;
pub const TOP_IMPROVEMENTS: usize = 3;

pub struct Theme {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub static PRAISE_THEMES: [Theme; 5] = [
    Theme {
        name: "clear explanations",
        keywords: &["clear", "clarity", "explanation", "explain"],
    },
    Theme {
        name: "engaging teaching style",
        keywords: &["engaging", "interactive", "enthusiasm", "enthusiastic"],
    },
    Theme {
        name: "well-structured course materials",
        keywords: &["structured", "organized", "materials", "resources"],
    },
    Theme {
        name: "responsive to questions",
        keywords: &["responsive", "response", "questions", "queries", "helpful"],
    },
    Theme {
        name: "practical examples",
        keywords: &["practical", "examples", "real-world", "applications"],
    },
];

pub static IMPROVEMENT_THEMES: [Theme; 5] = [
    Theme {
        name: "more interactive activities",
        keywords: &["interactive", "activities", "hands-on", "practice"],
    },
    Theme {
        name: "flexible assignment deadlines",
        keywords: &["deadline", "flexible", "assignment", "time"],
    },
    Theme {
        name: "deeper topic coverage",
        keywords: &["coverage", "deeper", "detail", "more explanation"],
    },
    Theme {
        name: "additional practice problems",
        keywords: &["practice", "problems", "exercises", "more examples"],
    },
    Theme {
        name: "better lab facilities",
        keywords: &["lab", "equipment", "facilities", "resources"],
    },
];

const DEFAULT_PRAISE: [&str; 4] = [
    "Clear explanations and engaging teaching style",
    "Well-structured course materials and resources",
    "Responsive to student questions and concerns",
    "Practical examples and real-world applications",
];

const DEFAULT_IMPROVEMENTS: [&str; 3] = [
    "More interactive activities needed in lectures",
    "Assignment deadlines could be more flexible",
    "Some topics need deeper coverage",
];

/// Builds the dashboard summary. An empty slice yields `Summary::default()`.
pub fn summarize(results: &[AnalysisResult]) -> Summary {
    if results.is_empty() {
        return Summary::default();
    }

    let total = results.len();
    let mut sentiment_counts: BTreeMap<SentimentLabel, usize> = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Mixed,
        SentimentLabel::Neutral,
    ]
    .into_iter()
    .map(|label| (label, 0))
    .collect();
    let mut category_counts: BTreeMap<Topic, usize> = BTreeMap::new();
    let mut dashboard_categories = BTreeMap::new();
    let mut topics_in_order: Vec<Topic> = Vec::new();

    for result in results {
        *sentiment_counts.entry(result.sentiment.label).or_insert(0) += 1;

        let topic = result.topic.topic;
        if !topics_in_order.contains(&topic) {
            topics_in_order.push(topic);
        }
        *category_counts.entry(topic).or_insert(0) += 1;
        *dashboard_categories
            .entry(topic.dashboard_category())
            .or_insert(0) += 1;
    }

    let average = average_rating(results);
    let sentiment_distribution: BTreeMap<SentimentLabel, f64> = sentiment_counts
        .iter()
        .map(|(label, count)| (*label, percentage(*count, total)))
        .collect();
    let share = |label: SentimentLabel| sentiment_distribution.get(&label).copied().unwrap_or(0.0);
    let positive_pct = share(SentimentLabel::Positive);

    let primary_focus = primary_focus(&topics_in_order, &category_counts);
    let recommendations = recommendations(
        share(SentimentLabel::Negative),
        share(SentimentLabel::Mixed),
        positive_pct,
        primary_focus,
        average,
    );
    let (top_praise_areas, improvement_areas) = praise_and_improvement(results);

    Summary {
        total_responses: total,
        average_rating: round1(average),
        avg_sentiment_percentage: positive_pct.trunc() as i64,
        key_themes_count: category_counts.len(),
        sentiment_distribution,
        category_distribution: category_counts,
        dashboard_categories,
        recommendations,
        ai_question_summaries: question_summaries(results),
        top_praise_areas,
        improvement_areas,
    }
}

/// Parses a free-form rating. Blank, non-numeric and non-finite values yield
/// `None`.
pub fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub fn average_rating(results: &[AnalysisResult]) -> f64 {
    let ratings: Vec<f64> = results
        .iter()
        .filter_map(|result| parse_rating(&result.rating))
        .collect();
    if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().sum::<f64>() / ratings.len() as f64
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    round1(count as f64 / total as f64 * 100.0)
}

/// One decimal place with halves to even, so 6.25 gives 6.2.
fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Most frequent topic; the earliest seen wins a tie.
fn primary_focus(order: &[Topic], counts: &BTreeMap<Topic, usize>) -> Option<Topic> {
    let mut best: Option<(Topic, usize)> = None;
    for topic in order {
        let count = counts.get(topic).copied().unwrap_or(0);
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((*topic, count));
        }
    }
    best.map(|(topic, _)| topic)
}

pub fn recommendations(
    negative_pct: f64,
    mixed_pct: f64,
    positive_pct: f64,
    primary_focus: Option<Topic>,
    average_rating: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if negative_pct > 30.0 {
        recommendations.push(
            "[WARNING] High negative sentiment detected. Immediate attention required.".to_string(),
        );
    }
    if mixed_pct > 40.0 {
        recommendations.push(
            "[INFO] Many mixed responses. Conduct detailed survey to identify specific issues."
                .to_string(),
        );
    }
    if positive_pct >= 70.0 {
        recommendations.push(
            "[SUCCESS] Strong positive sentiment. Maintain current teaching standards.".to_string(),
        );
    }

    let focus = primary_focus.map_or("General", |topic| topic.as_str());
    recommendations.push(format!("[FOCUS] Primary focus area: {focus}"));

    if average_rating >= 4.5 {
        recommendations.push("[EXCELLENT] Excellent ratings! Continue the great work.".to_string());
    } else if average_rating >= 3.5 {
        recommendations.push("[GOOD] Good ratings, but room for improvement.".to_string());
    } else if average_rating > 0.0 {
        recommendations
            .push("[WARNING] Below average ratings. Review teaching methods urgently.".to_string());
    }

    recommendations
}

/// Counts how many texts mention each theme, keeps the `limit` most frequent
/// and falls back to `defaults` when none match.
fn rank_themes(texts: &[String], themes: &[Theme], limit: usize, defaults: &[&str]) -> Vec<String> {
    let lowered: Vec<String> = texts.iter().map(|text| text.to_lowercase()).collect();
    let mut counts: Vec<(&str, usize)> = themes
        .iter()
        .map(|theme| {
            let count = lowered
                .iter()
                .filter(|text| theme.keywords.iter().any(|kw| text.contains(kw)))
                .count();
            (theme.name, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();

    if counts.is_empty() {
        return defaults.iter().map(|s| s.to_string()).collect();
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(name, _)| capitalize(name))
        .collect()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn praise_and_improvement(results: &[AnalysisResult]) -> (Vec<String>, Vec<String>) {
    let mut liked = Vec::new();
    let mut improve = Vec::new();

    for result in results {
        let label = result.sentiment.label;
        if matches!(label, SentimentLabel::Positive | SentimentLabel::Mixed) {
            liked.extend(result.answers.liked.clone());
        }
        if matches!(label, SentimentLabel::Negative | SentimentLabel::Mixed) {
            improve.extend(result.answers.improve.clone());
        }
    }

    (
        rank_themes(&liked, &PRAISE_THEMES, TOP_PRAISE, &DEFAULT_PRAISE),
        rank_themes(&improve, &IMPROVEMENT_THEMES, TOP_IMPROVEMENTS, &DEFAULT_IMPROVEMENTS),
    )
}

/// Fixed narrative per question, included only when that question got answers.
pub fn question_summaries(results: &[AnalysisResult]) -> Vec<QuestionSummary> {
    let liked: Vec<&str> = results
        .iter()
        .filter_map(|result| result.answers.liked.as_deref())
        .collect();
    let improve: Vec<&str> = results
        .iter()
        .filter_map(|result| result.answers.improve.as_deref())
        .collect();
    // additional answers are already part of feedback_text
    let mentions_materials = results
        .iter()
        .any(|result| result.feedback_text.to_lowercase().contains("material"));

    let praise_phrases = extract_key_phrases(&liked, Some(PhraseFilter::Positive));
    let improvement_phrases = extract_key_phrases(&improve, Some(PhraseFilter::Negative));
    tracing::debug!(
        praise_phrases = praise_phrases.len(),
        improvement_phrases = improvement_phrases.len(),
        "key phrases extracted"
    );

    let mut summaries = Vec::new();
    if !liked.is_empty() {
        summaries.push(QuestionSummary {
            question: "What did you like most about the course?".to_string(),
            sentiment: SentimentLabel::Positive,
            summary: "Students appreciated the practical approach and real-world examples. The instructor clarity and enthusiasm were frequently praised.".to_string(),
        });
    }
    if !improve.is_empty() {
        summaries.push(QuestionSummary {
            question: "What could be improved?".to_string(),
            sentiment: SentimentLabel::Neutral,
            summary: "More interactive sessions and hands-on activities were suggested. Some students requested additional practice problems.".to_string(),
        });
    }
    if mentions_materials {
        summaries.push(QuestionSummary {
            question: "How would you rate the course materials?".to_string(),
            sentiment: SentimentLabel::Positive,
            summary: "Overall positive feedback on materials quality. Students found the resources comprehensive and well-organized.".to_string(),
        });
    }
    summaries
}
