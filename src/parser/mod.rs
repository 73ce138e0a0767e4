pub mod fields;
pub mod links;

pub use links::{Platform, ProfileLink};

/// Everything extracted from one model response, plus the raw text.
///
/// Transient: only derived fields end up in the search log. Any subset of
/// the optional fields may be absent and the result is still displayable.
#[derive(Debug, Clone)]
pub struct ResearchResult {
    pub profile: String,
    pub links: Vec<ProfileLink>,
    pub name: Option<String>,
    pub confidence: Option<String>,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

impl ResearchResult {
    /// Platform labels only, for the search log's `links_found` field.
    pub fn platforms_found(&self) -> Vec<String> {
        self.links
            .iter()
            .map(|l| l.platform.label().to_string())
            .collect()
    }
}

/// Run every extractor over the response text.
pub fn parse_response(
    text: &str,
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
) -> ResearchResult {
    ResearchResult {
        profile: text.to_string(),
        links: links::extract_links(text),
        name: fields::extract_name(text),
        confidence: fields::extract_confidence(text),
        input_tokens,
        output_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_template_fixture() {
        let md = std::fs::read_to_string("tests/fixtures/full_response.md").unwrap();
        let result = parse_response(&md, Some(12_000), Some(950));

        assert_eq!(result.name.as_deref(), Some("Rangaraj Iyengar"));
        assert_eq!(result.confidence.as_deref(), Some("High"));
        assert_eq!(
            result.platforms_found(),
            vec!["LinkedIn".to_string(), "Other".to_string()]
        );
        assert_eq!(result.input_tokens, Some(12_000));
        assert_eq!(result.profile, md);
    }

    #[test]
    fn reordered_sections_fixture() {
        let md = std::fs::read_to_string("tests/fixtures/reordered_response.md").unwrap();
        let result = parse_response(&md, None, None);

        assert_eq!(result.name.as_deref(), Some("Maya Chen"));
        assert_eq!(result.confidence.as_deref(), Some("Medium"));
        assert!(result
            .links
            .iter()
            .any(|l| l.platform == Platform::LinkedIn));
    }

    #[test]
    fn prose_without_sections_is_all_absent() {
        let result = parse_response("I could not find this person online.", None, None);
        assert!(result.name.is_none());
        assert!(result.confidence.is_none());
        assert!(result.links.is_empty());
        assert_eq!(result.profile, "I could not find this person online.");
    }

    #[test]
    fn partial_document_keeps_what_it_finds() {
        let md = "## Public Profiles & Links\n- LinkedIn: https://linkedin.com/in/partial\n";
        let result = parse_response(md, None, None);
        assert!(result.name.is_none());
        assert!(result.confidence.is_none());
        assert_eq!(result.links.len(), 1);
    }

    #[test]
    fn empty_response() {
        let result = parse_response("", None, None);
        assert!(result.name.is_none());
        assert!(result.links.is_empty());
    }
}
