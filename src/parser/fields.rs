//! Heading-driven single-line field extraction.
//!
//! Each extractor scans the response top to bottom: find a heading line
//! whose lowercased trimmed form starts with a known marker, then take the
//! next non-empty line that is not itself a heading. Missing sections yield
//! `None`, never an error.

const NAME_HEADING: &str = "## extracted name";
const CONTACT_HEADING: &str = "## most likely contact";
const CONFIDENCE_HEADING: &str = "## confidence";

const CONFIDENCE_LEVELS: &[&str] = &["Low", "Medium", "High"];
const CONFIDENCE_FALLBACK_CHARS: usize = 80;

/// Most likely display name, if the response has one.
///
/// The extracted-name section wins over most-likely-contact when both are
/// present. The template allows a one-line description after the name, so
/// the candidate is cut at the first em-dash or hyphen.
pub fn extract_name(text: &str) -> Option<String> {
    let line = section_line(text, NAME_HEADING)
        .or_else(|| section_line(text, CONTACT_HEADING))?;

    let mut candidate = line;
    for label in ["name:", "contact:"] {
        candidate = strip_label(candidate, label);
    }
    let candidate = candidate.split('—').next().unwrap_or(candidate);
    let candidate = candidate.split('-').next().unwrap_or(candidate);
    let name = candidate.trim();

    (!name.is_empty()).then(|| name.to_string())
}

/// Confidence level: `Low` / `Medium` / `High`, or the first 80 characters
/// of the section line when it does not start with a canonical word.
pub fn extract_confidence(text: &str) -> Option<String> {
    let line = section_line(text, CONFIDENCE_HEADING)?;
    let first = line.split_whitespace().next().unwrap_or("");
    let token = first.trim_end_matches(['.', ',', ';', ':']);
    if CONFIDENCE_LEVELS.contains(&token) {
        return Some(token.to_string());
    }
    Some(line.chars().take(CONFIDENCE_FALLBACK_CHARS).collect())
}

/// First non-empty, non-heading line after a heading starting with `marker`.
fn section_line<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let mut found = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.to_lowercase().starts_with(marker) {
            found = true;
            continue;
        }
        if found && !trimmed.is_empty() && !trimmed.starts_with('#') {
            return Some(trimmed);
        }
    }
    None
}

/// Drop a leading `label` (case-insensitive) and following whitespace.
fn strip_label<'a>(line: &'a str, label: &str) -> &'a str {
    match line.get(..label.len()) {
        Some(head) if head.eq_ignore_ascii_case(label) => line[label.len()..].trim_start(),
        _ => line,
    }
}
