use once_cell::sync::Lazy;
use regex::Regex;

/// Words that signal a change of sentiment inside one answer.
pub const CONTRAST_CONNECTIVES: [&str; 7] =
    ["but", "however", "although", "though", "yet", "except", "while"];

static CONTRAST_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(?:but|however|although|though|yet|except|while)\s+")
        .expect("contrast pattern is valid")
});

/// Case-insensitive substring test for any connective. Deliberately looser
/// than the splitter: "butter" counts.
pub fn has_contrast_cue(text: &str) -> bool {
    let lower = text.to_lowercase();
    CONTRAST_CONNECTIVES
        .iter()
        .any(|connective| lower.contains(connective))
}

/// Splits `text` into clauses at whitespace-delimited connectives. Returns the
/// original text as the only segment when fewer than two clauses survive.
pub fn split_clauses(text: &str) -> Vec<String> {
    let segments: Vec<String> = CONTRAST_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter(|part| !CONTRAST_CONNECTIVES.contains(&part.to_lowercase().as_str()))
        .map(str::to_string)
        .collect();

    if segments.len() > 1 {
        segments
    } else {
        vec![text.to_string()]
    }
}
