use std::collections::HashSet;

use crate::classifier::{ClassifierError, Polarity, SentimentClassifier};
use crate::models::{SentimentLabel, SentimentVerdict};
use crate::segment::{has_contrast_cue, split_clauses};

pub const MIN_TEXT_CHARS: usize = 3;
/// Whole-text confidence band in which a contrast cue turns the verdict Mixed.
pub const MIXED_BAND: (f64, f64) = (0.50, 0.95);
pub const NEUTRAL_BELOW: f64 = 0.60;
const MIN_SEGMENT_WORDS: usize = 2;

/// Resolves the sentiment of one feedback text. Classifier failures degrade to
/// `Unknown` with zero confidence.
pub fn resolve_sentiment(classifier: &dyn SentimentClassifier, text: &str) -> SentimentVerdict {
    match try_resolve(classifier, text) {
        Ok(verdict) => verdict,
        Err(err) => {
            tracing::warn!(error = %err, "sentiment classification failed");
            SentimentVerdict::new(SentimentLabel::Unknown, 0.0)
        }
    }
}

fn try_resolve(
    classifier: &dyn SentimentClassifier,
    text: &str,
) -> Result<SentimentVerdict, ClassifierError> {
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return Ok(SentimentVerdict::new(SentimentLabel::Neutral, 0.5));
    }

    let has_mixed = has_contrast_cue(text);

    if has_mixed && segments_disagree(classifier, text)? {
        let whole = classifier.classify_sentiment(text)?;
        return Ok(SentimentVerdict::new(SentimentLabel::Mixed, whole.score));
    }

    let whole = classifier.classify_sentiment(text)?;
    let score = whole.score;

    if has_mixed && (MIXED_BAND.0..=MIXED_BAND.1).contains(&score) {
        return Ok(SentimentVerdict::new(SentimentLabel::Mixed, score));
    }
    if score < NEUTRAL_BELOW {
        return Ok(SentimentVerdict::new(SentimentLabel::Neutral, score));
    }

    let label = match whole.polarity {
        Polarity::Positive => SentimentLabel::Positive,
        Polarity::Negative => SentimentLabel::Negative,
    };
    Ok(SentimentVerdict::new(label, score))
}

/// True when at least two clauses of two or more words get different
/// polarities.
fn segments_disagree(
    classifier: &dyn SentimentClassifier,
    text: &str,
) -> Result<bool, ClassifierError> {
    let segments = split_clauses(text);
    if segments.len() < 2 {
        return Ok(false);
    }

    let mut polarities = HashSet::new();
    for segment in &segments {
        if segment.split_whitespace().count() >= MIN_SEGMENT_WORDS {
            polarities.insert(classifier.classify_sentiment(segment)?.polarity);
        }
    }
    Ok(polarities.len() > 1)
}
