//! Candidate construction from listing hrefs

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use shared::{Candidate, FirmId};

fn firm_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"_([A-Za-z0-9]+)/?$").expect("static pattern"))
}

/// Extract the firm id from a detail url (`…/anna-coaching_Ab12Cd` → `Ab12Cd`)
///
/// Query string and fragment are ignored.
pub fn extract_firm_id(url: &Url) -> Option<FirmId> {
    let captures = firm_id_pattern().captures(url.path())?;
    FirmId::new(captures.get(1)?.as_str()).ok()
}

/// Resolve a listing href against the site base and build a candidate
pub fn candidate_from_href(base: &Url, href: &str) -> Option<Candidate> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("mailto:") {
        return None;
    }
    let mut url = base.join(href).ok()?;
    if url.host_str() != base.host_str() {
        return None;
    }
    url.set_fragment(None);
    let id = extract_firm_id(&url)?;
    Some(Candidate::new(id, url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.firmenabc.at").unwrap()
    }

    #[test]
    fn test_extract_firm_id() {
        let url = Url::parse("https://www.firmenabc.at/anna-coaching_Ab12Cd").unwrap();
        assert_eq!(extract_firm_id(&url).unwrap().as_str(), "Ab12Cd");

        let with_query = Url::parse("https://www.firmenabc.at/anna_X9?ref=search#top").unwrap();
        assert_eq!(extract_firm_id(&with_query).unwrap().as_str(), "X9");

        let no_id = Url::parse("https://www.firmenabc.at/impressum").unwrap();
        assert!(extract_firm_id(&no_id).is_none());
    }

    #[test]
    fn test_relative_href_is_resolved() {
        let candidate = candidate_from_href(&base(), "/wien/anna-coaching_Ab12Cd").unwrap();
        assert_eq!(candidate.url, "https://www.firmenabc.at/wien/anna-coaching_Ab12Cd");
        assert_eq!(candidate.id.as_str(), "Ab12Cd");
    }

    #[test]
    fn test_foreign_and_anchor_hrefs_are_ignored() {
        assert!(candidate_from_href(&base(), "https://other.example/x_A1").is_none());
        assert!(candidate_from_href(&base(), "#results").is_none());
        assert!(candidate_from_href(&base(), "mailto:a@b.at").is_none());
        assert!(candidate_from_href(&base(), "   ").is_none());
    }
}
