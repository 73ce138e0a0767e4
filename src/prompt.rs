//! The instructional prompts sent with every research call. The user prompt
//! pins the response template the extractors in `parser` depend on; change
//! them together and bump `PROMPT_VERSION`.

pub const PROMPT_VERSION: &str = "v2";

pub const SYSTEM_PROMPT: &str = "\
You are a professional networking assistant. The user meets people at conferences, \
events, and social gatherings and wants help finding their publicly available \
professional information so they can follow up and stay in touch.

Your job is to find whatever the person has chosen to make public: their LinkedIn \
profile, company page, Twitter/X, published articles, conference talks, news \
mentions, and similar. You surface only information the person has voluntarily \
published — you do not aggregate private details.

This is the same kind of research anyone would do by Googling a new contact's name \
after a networking event. Treat it accordingly: helpful, factual, focused on \
professional and public-facing information.";

/// The per-search user prompt: the narrative between fences plus the exact
/// response template.
pub fn build_prompt(narrative: &str) -> String {
    format!(
        "I met someone at an event and want to find their public professional \
profiles so I can follow up with them. Here are my notes from our conversation:

---
{narrative}
---

Please search for this person's publicly available professional information. \
Use whatever clues are in my notes — name, employer, city, industry, role — \
to find the right person. If a few people match, lead with the most likely one.

Return in this exact format:

## Most Likely Contact
[Name and one-line description — who you think this is and why]

## Professional Summary
[2–3 sentences: current role, company, what they're known for]

## Career Background
[Previous roles, companies, notable projects or achievements]

## Public Profiles & Links
- LinkedIn: [full URL or \"not found\"]
- Twitter/X: [full URL or \"not found\"]
- Company / personal site: [full URL or \"not found\"]
- Other: [conference talks, articles, news mentions, etc.]

## Additional Public Info
[Anything else they've published publicly — interviews, articles, awards, etc.]

## Confidence
[High / Medium / Low — one sentence on why]

## Extracted Name
[Their most likely full name, one line only]
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_narrative_between_fences() {
        let prompt = build_prompt("met Priya from Acme Robotics");
        assert!(prompt.contains("---\nmet Priya from Acme Robotics\n---"));
    }

    #[test]
    fn prompt_requests_the_sections_the_extractors_scan_for() {
        let prompt = build_prompt("anyone");
        assert!(prompt.contains("## Most Likely Contact"));
        assert!(prompt.contains("## Confidence"));
        assert!(prompt.contains("## Extracted Name"));
        assert!(prompt.contains("- LinkedIn:"));
    }
}
