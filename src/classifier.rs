//! Classifier capability consumed by the resolvers.
//!
//! The sentiment and topic models are opaque services behind two traits.
//! `Classifiers::init` builds the process-wide pair once, before any record is
//! analyzed; the bundled implementations are lexicon based and can be fed a
//! custom lexicon through `[classifier] lexicon_path`.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::config::ClassifierConfig;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::Topic;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier returned no scores")]
    EmptyRanking,

    #[error("classifier ranking is missing label '{0}'")]
    MissingLabel(Topic),

    #[error("classifier failed: {0}")]
    Failed(String),
}

/// Binary polarity reported by the sentiment model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub polarity: Polarity,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicScore {
    pub topic: Topic,
    pub score: f64,
}

pub trait SentimentClassifier: Send + Sync {
    fn classify_sentiment(&self, text: &str) -> Result<SentimentScore, ClassifierError>;
}

pub trait TopicClassifier: Send + Sync {
    /// Scores every candidate and returns them ranked best first.
    fn classify_topics(
        &self,
        text: &str,
        candidates: &[Topic],
    ) -> Result<Vec<TopicScore>, ClassifierError>;
}

pub struct Classifiers {
    pub sentiment: Box<dyn SentimentClassifier>,
    pub topic: Box<dyn TopicClassifier>,
}

impl Classifiers {
    pub fn new(
        sentiment: impl SentimentClassifier + 'static,
        topic: impl TopicClassifier + 'static,
    ) -> Self {
        Self {
            sentiment: Box::new(sentiment),
            topic: Box::new(topic),
        }
    }

    /// Loads the bundled classifiers. Any failure here is fatal for the run.
    pub fn init(config: &ClassifierConfig) -> AnalyzerResult<Self> {
        let lexicon = match &config.lexicon_path {
            Some(path) => Lexicon::from_path(path)?,
            None => Lexicon::builtin(),
        };
        lexicon.validate()?;

        tracing::info!(
            positive_terms = lexicon.positive.len(),
            negative_terms = lexicon.negative.len(),
            "classifiers ready"
        );

        Ok(Self::new(
            LexiconSentimentClassifier::new(&lexicon.positive, &lexicon.negative),
            DescriptorTopicClassifier::new(lexicon.topic_descriptors()?),
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Lexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    #[serde(default)]
    pub descriptors: BTreeMap<String, Vec<String>>,
}

impl Lexicon {
    pub fn from_path(path: &Path) -> AnalyzerResult<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            AnalyzerError::ClassifierInit(format!("cannot read lexicon {}: {e}", path.display()))
        })?;
        toml::from_str(&data).map_err(|e| {
            AnalyzerError::ClassifierInit(format!("cannot parse lexicon {}: {e}", path.display()))
        })
    }

    pub fn builtin() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self {
            positive: owned(POSITIVE_WORDS),
            negative: owned(NEGATIVE_WORDS),
            descriptors: BTreeMap::new(),
        }
    }

    fn validate(&self) -> AnalyzerResult<()> {
        if self.positive.is_empty() || self.negative.is_empty() {
            return Err(AnalyzerError::ClassifierInit(
                "lexicon needs both positive and negative terms".to_string(),
            ));
        }
        Ok(())
    }

    /// Descriptor terms per topic. Topics the lexicon does not mention keep
    /// their built-in descriptors; unknown topic names are rejected.
    fn topic_descriptors(&self) -> AnalyzerResult<Vec<(Topic, Vec<String>)>> {
        for name in self.descriptors.keys() {
            if !Topic::ALL.iter().any(|topic| topic.as_str() == name) {
                return Err(AnalyzerError::ClassifierInit(format!(
                    "unknown topic '{name}' in lexicon descriptors"
                )));
            }
        }

        Ok(Topic::ALL
            .iter()
            .map(|topic| {
                let terms = match self.descriptors.get(topic.as_str()) {
                    Some(terms) => terms.iter().map(|t| t.to_lowercase()).collect(),
                    None => builtin_descriptors(*topic)
                        .iter()
                        .map(|t| t.to_string())
                        .collect(),
                };
                (*topic, terms)
            })
            .collect())
    }
}

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "love", "loved", "amazing", "helpful", "clear", "engaging",
    "enjoyed", "enjoy", "interesting", "useful", "best", "awesome", "fantastic", "wonderful",
    "appreciate", "appreciated", "informative", "organized", "responsive", "patient",
    "practical", "comprehensive", "liked", "nice", "supportive", "friendly",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "terrible", "awful", "boring", "confusing", "unclear", "difficult", "hard",
    "slow", "rude", "worst", "hate", "disorganized", "outdated", "lacking", "lack", "useless",
    "waste", "frustrating", "late", "noisy", "broken", "improve", "improved", "improvement",
    "insufficient", "rushed", "unhelpful", "needs",
];

const NEGATORS: &[&str] = &["not", "no", "never", "hardly", "isn't", "wasn't", "don't", "didn't"];

fn builtin_descriptors(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::TeachingStyle => &[
            "teach", "lecture", "explain", "pace", "style", "delivery", "clarity", "engaging",
        ],
        Topic::CourseContent => &[
            "content", "material", "syllabus", "topic", "curriculum", "slides", "reading",
        ],
        Topic::Infrastructure => &[
            "lab", "room", "equipment", "wifi", "projector", "facility", "computer",
        ],
        Topic::Assessment => &[
            "exam", "quiz", "assignment", "grade", "deadline", "test", "homework",
        ],
        Topic::FacultyBehavior => &[
            "helpful", "rude", "approachable", "respect", "friendly", "attitude", "supportive",
        ],
        Topic::GeneralFeedback => &["overall", "general", "experience", "course", "class"],
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Counts lexicon hits, flipping a hit that directly follows a negator.
pub struct LexiconSentimentClassifier {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl LexiconSentimentClassifier {
    pub fn new(positive: &[String], negative: &[String]) -> Self {
        Self {
            positive: positive.iter().map(|w| w.to_lowercase()).collect(),
            negative: negative.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

impl SentimentClassifier for LexiconSentimentClassifier {
    fn classify_sentiment(&self, text: &str) -> Result<SentimentScore, ClassifierError> {
        let tokens = tokenize(text);
        let mut positive_hits = 0.0_f64;
        let mut negative_hits = 0.0_f64;

        for (index, token) in tokens.iter().enumerate() {
            let negated = index > 0 && NEGATORS.contains(&tokens[index - 1].as_str());
            let hit = if self.positive.contains(token) {
                Some(Polarity::Positive)
            } else if self.negative.contains(token) {
                Some(Polarity::Negative)
            } else {
                None
            };
            match (hit, negated) {
                (Some(Polarity::Positive), false) | (Some(Polarity::Negative), true) => {
                    positive_hits += 1.0
                }
                (Some(_), _) => negative_hits += 1.0,
                (None, _) => {}
            }
        }

        let total = positive_hits + negative_hits;
        if total == 0.0 {
            return Ok(SentimentScore {
                polarity: Polarity::Positive,
                score: 0.5,
            });
        }

        let margin = (positive_hits - negative_hits).abs() / total;
        let support = total / (total + 1.0);
        let score = (0.5 + 0.5 * margin * support).clamp(0.5, 1.0);
        let polarity = if positive_hits >= negative_hits {
            Polarity::Positive
        } else {
            Polarity::Negative
        };

        Ok(SentimentScore { polarity, score })
    }
}

/// Zero-shot stand-in: each candidate is scored by its descriptor hits with
/// add-one smoothing, normalized to sum to one.
pub struct DescriptorTopicClassifier {
    descriptors: Vec<(Topic, Vec<String>)>,
}

impl DescriptorTopicClassifier {
    pub fn new(descriptors: Vec<(Topic, Vec<String>)>) -> Self {
        Self { descriptors }
    }

    fn hits(&self, topic: Topic, text_lower: &str) -> usize {
        self.descriptors
            .iter()
            .find(|(candidate, _)| *candidate == topic)
            .map(|(_, terms)| {
                terms
                    .iter()
                    .filter(|term| text_lower.contains(term.as_str()))
                    .count()
            })
            .unwrap_or(0)
    }
}

impl TopicClassifier for DescriptorTopicClassifier {
    fn classify_topics(
        &self,
        text: &str,
        candidates: &[Topic],
    ) -> Result<Vec<TopicScore>, ClassifierError> {
        if candidates.is_empty() {
            return Err(ClassifierError::Failed("no candidate labels".to_string()));
        }

        let text_lower = text.to_lowercase();
        let raw: Vec<(Topic, f64)> = candidates
            .iter()
            .map(|topic| (*topic, self.hits(*topic, &text_lower) as f64 + 1.0))
            .collect();
        let total: f64 = raw.iter().map(|(_, value)| value).sum();

        let mut ranked: Vec<TopicScore> = raw
            .into_iter()
            .map(|(topic, value)| TopicScore {
                topic,
                score: value / total,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(ranked)
    }
}

#[cfg(test)]
pub mod testing {
    //! Deterministic doubles for the resolver and analyzer tests.

    use super::*;
    use std::collections::HashMap;

    /// Returns a fixed verdict per exact text, falling back to `default`.
    pub struct FixedSentiment {
        pub by_text: HashMap<String, SentimentScore>,
        pub default: SentimentScore,
    }

    impl FixedSentiment {
        pub fn always(polarity: Polarity, score: f64) -> Self {
            Self {
                by_text: HashMap::new(),
                default: SentimentScore { polarity, score },
            }
        }

        pub fn with(mut self, text: &str, polarity: Polarity, score: f64) -> Self {
            self.by_text
                .insert(text.to_string(), SentimentScore { polarity, score });
            self
        }
    }

    impl SentimentClassifier for FixedSentiment {
        fn classify_sentiment(&self, text: &str) -> Result<SentimentScore, ClassifierError> {
            Ok(*self.by_text.get(text).unwrap_or(&self.default))
        }
    }

    pub struct FailingSentiment;

    impl SentimentClassifier for FailingSentiment {
        fn classify_sentiment(&self, _text: &str) -> Result<SentimentScore, ClassifierError> {
            Err(ClassifierError::Failed("model offline".to_string()))
        }
    }

    /// Returns the candidates in the given fixed ranking.
    pub struct FixedTopics {
        pub ranking: Vec<(Topic, f64)>,
    }

    impl FixedTopics {
        pub fn ranked(ranking: &[(Topic, f64)]) -> Self {
            Self {
                ranking: ranking.to_vec(),
            }
        }
    }

    impl TopicClassifier for FixedTopics {
        fn classify_topics(
            &self,
            _text: &str,
            _candidates: &[Topic],
        ) -> Result<Vec<TopicScore>, ClassifierError> {
            Ok(self
                .ranking
                .iter()
                .map(|(topic, score)| TopicScore {
                    topic: *topic,
                    score: *score,
                })
                .collect())
        }
    }

    pub struct FailingTopics;

    impl TopicClassifier for FailingTopics {
        fn classify_topics(
            &self,
            _text: &str,
            _candidates: &[Topic],
        ) -> Result<Vec<TopicScore>, ClassifierError> {
            Err(ClassifierError::Failed("model offline".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn builtin_sentiment() -> LexiconSentimentClassifier {
        let lexicon = Lexicon::builtin();
        LexiconSentimentClassifier::new(&lexicon.positive, &lexicon.negative)
    }

    #[test]
    fn lexicon_sentiment_reads_polarity() {
        let classifier = builtin_sentiment();

        let positive = classifier
            .classify_sentiment("Great lectures and very helpful examples")
            .unwrap();
        assert_eq!(positive.polarity, Polarity::Positive);
        assert!(positive.score > 0.6);

        let negative = classifier
            .classify_sentiment("The labs were boring and confusing")
            .unwrap();
        assert_eq!(negative.polarity, Polarity::Negative);
        assert!(negative.score > 0.6);
    }

    #[test]
    fn lexicon_sentiment_without_evidence_is_low_confidence() {
        let result = builtin_sentiment()
            .classify_sentiment("The course ran on Tuesdays")
            .unwrap();
        assert_eq!(result.score, 0.5);
    }

    #[test]
    fn negation_flips_a_hit() {
        let result = builtin_sentiment()
            .classify_sentiment("The slides were not clear")
            .unwrap();
        assert_eq!(result.polarity, Polarity::Negative);
    }

    #[test]
    fn descriptor_topics_rank_every_candidate() {
        let lexicon = Lexicon::builtin();
        let classifier = DescriptorTopicClassifier::new(lexicon.topic_descriptors().unwrap());

        let ranked = classifier
            .classify_topics("The exam and the quiz deadline were tight", &Topic::ALL)
            .unwrap();
        assert_eq!(ranked.len(), 6);
        assert_eq!(ranked[0].topic, Topic::Assessment);
        let total: f64 = ranked.iter().map(|entry| entry.score).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(ranked.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn init_with_builtin_lexicon() {
        let classifiers = Classifiers::init(&ClassifierConfig::default()).unwrap();
        let ranked = classifiers
            .topic
            .classify_topics("wifi in the lab", &Topic::ALL)
            .unwrap();
        assert_eq!(ranked[0].topic, Topic::Infrastructure);
    }

    #[test]
    fn init_fails_on_missing_lexicon() {
        let config = ClassifierConfig {
            lexicon_path: Some("/nonexistent/lexicon.toml".into()),
        };
        let err = Classifiers::init(&config).err().unwrap();
        assert!(matches!(err, AnalyzerError::ClassifierInit(_)));
    }

    #[test]
    fn init_rejects_empty_word_lists() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "positive = []\nnegative = [\"bad\"]").unwrap();
        let config = ClassifierConfig {
            lexicon_path: Some(file.path().to_path_buf()),
        };
        let err = Classifiers::init(&config).err().unwrap();
        assert!(matches!(err, AnalyzerError::ClassifierInit(_)));
    }

    #[test]
    fn custom_descriptors_override_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "positive = [\"good\"]\nnegative = [\"bad\"]\n\n[descriptors]\n\"Assessment\" = [\"rubric\"]"
        )
        .unwrap();
        let config = ClassifierConfig {
            lexicon_path: Some(file.path().to_path_buf()),
        };
        let classifiers = Classifiers::init(&config).unwrap();
        let ranked = classifiers
            .topic
            .classify_topics("the rubric", &Topic::ALL)
            .unwrap();
        assert_eq!(ranked[0].topic, Topic::Assessment);
    }

    #[test]
    fn unknown_descriptor_topic_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "positive = [\"good\"]\nnegative = [\"bad\"]\n\n[descriptors]\n\"Parking\" = [\"car\"]"
        )
        .unwrap();
        let config = ClassifierConfig {
            lexicon_path: Some(file.path().to_path_buf()),
        };
        assert!(Classifiers::init(&config).is_err());
    }
}
