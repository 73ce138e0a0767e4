use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s)>"\]',]+"#).unwrap());

/// Platforms the response template labels with a `Name:` bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    LinkedIn,
    TwitterX,
    Instagram,
    Facebook,
    Other,
}

const ALL_PLATFORMS: [Platform; 5] = [
    Platform::LinkedIn,
    Platform::TwitterX,
    Platform::Instagram,
    Platform::Facebook,
    Platform::Other,
];

impl Platform {
    pub fn label(self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::TwitterX => "Twitter / X",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Other => "Other",
        }
    }

    /// A line claims a platform only through its explicit `label:` marker,
    /// so a prose mention of the platform name never matches.
    fn claims(self, lower: &str) -> bool {
        match self {
            Platform::LinkedIn => lower.contains("linkedin:"),
            Platform::TwitterX => lower.contains("twitter:") || lower.contains("twitter/x:"),
            Platform::Instagram => lower.contains("instagram:"),
            Platform::Facebook => lower.contains("facebook:"),
            Platform::Other => lower.contains("other:"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileLink {
    pub platform: Platform,
    pub url: String,
}

/// Pull labeled profile URLs out of the response text.
///
/// Line-by-line scan; a line contributes at most one link. The first URL
/// found for a platform wins, later lines for the same platform are ignored.
/// Platforms with no qualifying line are simply absent.
pub fn extract_links(text: &str) -> Vec<ProfileLink> {
    let mut links: Vec<ProfileLink> = Vec::new();

    for line in text.lines() {
        let Some(url) = first_url(line) else { continue };
        let lower = line.to_lowercase();
        let Some(platform) = ALL_PLATFORMS.into_iter().find(|p| p.claims(&lower)) else {
            continue;
        };
        if links.iter().any(|l| l.platform == platform) {
            continue;
        }
        links.push(ProfileLink { platform, url });
    }

    links
}

/// First URL-shaped substring on the line, trailing punctuation dropped.
/// A match without a `.` is rejected as a degenerate hit.
fn first_url(line: &str) -> Option<String> {
    let m = URL_RE.find(line)?;
    let url = m.as_str().trim_end_matches(['.', ',', ';', ')']);
    if url.contains('.') {
        Some(url.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(links: &[ProfileLink], platform: Platform) -> Option<&str> {
        links
            .iter()
            .find(|l| l.platform == platform)
            .map(|l| l.url.as_str())
    }

    #[test]
    fn linkedin_bullet() {
        let links = extract_links("- LinkedIn: https://linkedin.com/in/x");
        assert_eq!(get(&links, Platform::LinkedIn), Some("https://linkedin.com/in/x"));
    }

    #[test]
    fn trailing_punctuation_stripped() {
        let links = extract_links("- LinkedIn: https://linkedin.com/in/x).");
        assert_eq!(get(&links, Platform::LinkedIn), Some("https://linkedin.com/in/x"));
    }

    #[test]
    fn prose_mention_without_marker_ignored() {
        let links =
            extract_links("Their LinkedIn presence is active, see https://example.com/profile");
        assert!(get(&links, Platform::LinkedIn).is_none());
    }

    #[test]
    fn first_url_wins_per_platform() {
        let md = "- LinkedIn: https://linkedin.com/in/first\n- LinkedIn: https://linkedin.com/in/second";
        let links = extract_links(md);
        assert_eq!(links.len(), 1);
        assert_eq!(get(&links, Platform::LinkedIn), Some("https://linkedin.com/in/first"));
    }

    #[test]
    fn twitter_x_variant_marker() {
        let links = extract_links("- Twitter/X: https://x.com/someone");
        assert_eq!(get(&links, Platform::TwitterX), Some("https://x.com/someone"));
    }

    #[test]
    fn not_found_lines_yield_nothing() {
        let md = "- LinkedIn: not found\n- Twitter/X: not found";
        assert!(extract_links(md).is_empty());
    }

    #[test]
    fn url_without_dot_rejected() {
        let links = extract_links("- Other: http://localhost");
        assert!(links.is_empty());
    }

    #[test]
    fn order_follows_first_appearance() {
        let md = "- Other: https://news.example.com/story\n- LinkedIn: https://linkedin.com/in/x";
        let links = extract_links(md);
        assert_eq!(links[0].platform, Platform::Other);
        assert_eq!(links[1].platform, Platform::LinkedIn);
    }

    #[test]
    fn url_cut_at_closing_bracket_chars() {
        let links = extract_links("- Other: (see https://example.com/a,b) for details");
        assert_eq!(get(&links, Platform::Other), Some("https://example.com/a"));
    }

    #[test]
    fn empty_text() {
        assert!(extract_links("").is_empty());
    }
}
