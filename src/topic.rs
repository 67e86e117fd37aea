use crate::classifier::{ClassifierError, TopicClassifier};
use crate::models::{Topic, TopicVerdict};

pub const MIN_TEXT_CHARS: usize = 3;
/// Lexical score needed before keyword evidence overrides the classifier.
pub const KEYWORD_OVERRIDE_MIN: f64 = 1.2;
pub const KEYWORD_BOOST: f64 = 0.30;
pub const BOOST_CAP: f64 = 0.99;

pub struct TopicKeywords {
    pub topic: Topic,
    pub weight: f64,
    pub keywords: &'static [&'static str],
}

/// Keyword evidence per topic. Table order breaks ties between equal scores.
pub static TOPIC_KEYWORDS: [TopicKeywords; 6] = [
    TopicKeywords {
        topic: Topic::TeachingStyle,
        weight: 1.5,
        keywords: &[
            "lecture", "lectures", "teaching", "teach", "explain", "explanation",
            "presentation", "pace", "pacing", "speed", "slow", "fast", "quick", "delivery",
            "clarity", "clear", "confusing", "understand", "professor speaks", "instructor",
            "teacher", "interactive", "session", "sessions", "demonstrations", "demo",
            "response", "queries", "explanations", "engaging", "enthusiasm",
        ],
    },
    TopicKeywords {
        topic: Topic::CourseContent,
        weight: 1.2,
        keywords: &[
            "syllabus", "curriculum", "material", "materials", "content", "topic", "topics",
            "subject", "textbook", "readings", "chapters", "course material", "study material",
            "coverage", "slides", "case studies", "examples", "coding", "exercises", "theory",
            "practical", "resources", "quality", "comprehensive", "organized",
        ],
    },
    TopicKeywords {
        topic: Topic::Infrastructure,
        weight: 1.8,
        keywords: &[
            "classroom", "lab", "labs", "laboratory", "laboratories", "equipment", "facility",
            "facilities", "building", "wifi", "projector", "computer", "computers", "room",
            "hardware", "hands-on", "practice",
        ],
    },
    TopicKeywords {
        topic: Topic::Assessment,
        weight: 1.0,
        keywords: &[
            "exam", "exams", "test", "tests", "quiz", "quizzes", "assignment", "assignments",
            "grading", "marks", "grades", "evaluation", "homework", "project", "projects",
            "assessment", "deadline", "deadlines", "flexible",
        ],
    },
    TopicKeywords {
        topic: Topic::FacultyBehavior,
        weight: 1.0,
        keywords: &[
            "rude", "helpful", "respectful", "disrespectful", "approachable", "behavior",
            "behaviour", "attitude", "manner", "polite", "impolite", "supportive", "friendly",
            "arrogant", "responsive", "questions", "concerns",
        ],
    },
    TopicKeywords {
        topic: Topic::GeneralFeedback,
        weight: 0.5,
        keywords: &[
            "overall", "general", "experience", "semester", "course", "class", "great", "good",
        ],
    },
];

/// Weighted keyword score per topic; topics without a match are left out.
pub fn keyword_scores(text: &str) -> Vec<(Topic, f64)> {
    let lower = text.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .filter_map(|entry| {
            let matches = entry
                .keywords
                .iter()
                .filter(|keyword| lower.contains(*keyword))
                .count();
            (matches > 0).then(|| (entry.topic, matches as f64 * entry.weight))
        })
        .collect()
}

fn strongest_keyword_topic(scores: &[(Topic, f64)]) -> Option<(Topic, f64)> {
    scores.iter().fold(None, |best, &(topic, score)| match best {
        Some((_, best_score)) if best_score >= score => best,
        _ => Some((topic, score)),
    })
}

/// Resolves the topic of one feedback text. Failures degrade to
/// `General Feedback` with zero confidence.
pub fn resolve_topic(classifier: &dyn TopicClassifier, text: &str) -> TopicVerdict {
    match try_resolve(classifier, text) {
        Ok(verdict) => verdict,
        Err(err) => {
            tracing::warn!(error = %err, "topic classification failed");
            TopicVerdict::new(Topic::GeneralFeedback, 0.0)
        }
    }
}

fn try_resolve(
    classifier: &dyn TopicClassifier,
    text: &str,
) -> Result<TopicVerdict, ClassifierError> {
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return Ok(TopicVerdict::new(Topic::GeneralFeedback, 0.5));
    }

    let lexical = keyword_scores(text);
    let ranked = classifier.classify_topics(text, &Topic::ALL)?;

    if let Some((topic, score)) = strongest_keyword_topic(&lexical) {
        if score >= KEYWORD_OVERRIDE_MIN {
            let model_score = ranked
                .iter()
                .find(|entry| entry.topic == topic)
                .ok_or(ClassifierError::MissingLabel(topic))?
                .score;
            let boosted = (model_score + KEYWORD_BOOST).min(BOOST_CAP);
            return Ok(TopicVerdict::new(topic, boosted));
        }
    }

    let best = ranked.first().ok_or(ClassifierError::EmptyRanking)?;
    Ok(TopicVerdict::new(best.topic, best.score))
}
