use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseFilter {
    Positive,
    Negative,
}

const PRAISE_PATTERNS: &[&str] = &[
    r"clear explanation[s]?",
    r"engaging",
    r"well[- ]structured",
    r"practical (approach|examples?|applications?)",
    r"real[- ]world (examples?|applications?)",
    r"responsive",
    r"helpful",
    r"comprehensive",
    r"well[- ]organized",
    r"good coverage",
    r"excellent",
    r"great",
    r"love[d]?",
    r"appreciate[d]?",
];

const IMPROVEMENT_PATTERNS: &[&str] = &[
    r"more (interactive|hands-on|practice|examples?)",
    r"(too|very) fast",
    r"need[s]? (more|deeper) (coverage|explanation)",
    r"deadline[s]? (could be|should be) more flexible",
    r"(lack of|need|want) (more|additional)",
    r"confusing",
    r"difficult to understand",
    r"not enough",
    r"should (improve|add|include)",
    r"could be better",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("phrase pattern is valid"))
        .collect()
}

static PRAISE: Lazy<Vec<Regex>> = Lazy::new(|| compile(PRAISE_PATTERNS));
static IMPROVEMENT: Lazy<Vec<Regex>> = Lazy::new(|| compile(IMPROVEMENT_PATTERNS));

/// Runs the praise and/or improvement patterns over the lower-cased,
/// space-joined texts. Matches come back in pattern order, duplicates kept.
pub fn extract_key_phrases<S: AsRef<str>>(texts: &[S], filter: Option<PhraseFilter>) -> Vec<String> {
    let joined = texts
        .iter()
        .map(|text| text.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let patterns: Vec<&Regex> = match filter {
        Some(PhraseFilter::Positive) => PRAISE.iter().collect(),
        Some(PhraseFilter::Negative) => IMPROVEMENT.iter().collect(),
        None => PRAISE.iter().chain(IMPROVEMENT.iter()).collect(),
    };

    patterns
        .into_iter()
        .flat_map(|pattern| {
            pattern
                .find_iter(&joined)
                .map(|found| found.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}
