//! Contact extraction — name, emails, phone numbers and profile links.
//!
//! Emails, phones and links are searched across the whole document; contact details
//! turn up in headers and footers as often as in the body.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::entity::EntityResolver;
use crate::extraction::matcher::{Capture, MatcherChain, RegexMatcher};
use crate::models::resume::{ContactInfo, NOT_FOUND};

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"[\w.+\-]+@[\w\-]+(?:\.[\w\-]+)+").unwrap();

    static ref URL_REGEX: Regex = Regex::new(
        r#"(?i)(?:https?://|www\.)[^\s<>"']+|\b(?:linkedin|github)\.com/[^\s<>"']+"#
    )
    .unwrap();

    /// Loose international format first so a number carrying a country code
    /// wins over the local digits inside it.
    static ref PHONE_CHAIN: MatcherChain = MatcherChain::new("phone")
        .with(RegexMatcher::new(
            "international",
            r"\+\d{1,3}[\s.\-]?\(?\d{1,4}\)?(?:[\s.\-]?\d{2,5}){2,4}",
            Capture::Whole,
        ))
        .with(RegexMatcher::new(
            "grouped_local",
            r"\(?\b\d{3}\)?[\s.\-]?\d{3}[\s.\-]?\d{4}\b",
            Capture::Whole,
        ));
}

/// Separator used when several distinct phone numbers are found.
const PHONE_SEPARATOR: &str = ", ";

const PORTFOLIO_MARKERS: &[&str] = &["portfolio", "personal", "website"];

pub fn extract_contact(text: &str, resolver: &EntityResolver) -> ContactInfo {
    let mut info = ContactInfo {
        emails: extract_emails(text).into_iter().collect(),
        ..ContactInfo::default()
    };

    if let Some(name) = resolver.person_name(text) {
        info.name = name;
    }

    let phones = PHONE_CHAIN.all_distinct(text);
    if !phones.is_empty() {
        info.phone = phones.join(PHONE_SEPARATOR);
    }

    classify_links(text, &mut info);
    info
}

pub fn extract_emails(text: &str) -> Vec<String> {
    let mut emails: Vec<String> = Vec::new();
    for m in EMAIL_REGEX.find_iter(text) {
        let email = m.as_str().trim_end_matches('.').to_string();
        if !emails.contains(&email) {
            emails.push(email);
        }
    }
    emails
}

/// URL-like tokens in document order, with trailing punctuation removed.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ')', ';', ']']).to_string())
        .filter(|u| !u.is_empty())
        .collect()
}

/// Each bucket keeps the first URL that qualifies for it; later ones and unmatched URLs drop.
fn classify_links(text: &str, info: &mut ContactInfo) {
    for url in extract_urls(text) {
        let lower = url.to_lowercase();
        let bucket = if lower.contains("linkedin.com") {
            &mut info.linkedin
        } else if lower.contains("github.com") {
            &mut info.github
        } else if PORTFOLIO_MARKERS.iter().any(|m| lower.contains(m)) {
            &mut info.portfolio
        } else {
            continue;
        };
        if *bucket == NOT_FOUND {
            *bucket = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> EntityResolver {
        EntityResolver::regex_only()
    }

    #[test]
    fn test_basic_contact_block() {
        let info = extract_contact("John Smith\nSoftware Engineer\njohn@example.com", &resolver());
        assert_eq!(info.name, "John Smith");
        assert_eq!(info.emails.len(), 1);
        assert!(info.emails.contains("john@example.com"));
        assert_eq!(info.phone, NOT_FOUND);
    }

    #[test]
    fn test_emails_are_deduplicated() {
        let text = "a@x.io\nContact: a@x.io\nFooter a@x.io, b.c+cv@mail.example.org.";
        let info = extract_contact(text, &resolver());
        assert_eq!(info.emails.len(), 2);
        assert!(info.emails.contains("a@x.io"));
        assert!(info.emails.contains("b.c+cv@mail.example.org"));
    }

    #[test]
    fn test_phone_local_format() {
        let info = extract_contact("Call (555) 123-4567 today", &resolver());
        assert_eq!(info.phone, "(555) 123-4567");
    }

    #[test]
    fn test_phone_international_not_split_into_local() {
        let info = extract_contact("Phone: +1 555-123-4567", &resolver());
        assert_eq!(info.phone, "+1 555-123-4567");
    }

    #[test]
    fn test_multiple_distinct_phones_joined() {
        let text = "Mobile 555.123.4567\nHome 555.987.6543\nMobile again 555.123.4567";
        let info = extract_contact(text, &resolver());
        assert_eq!(info.phone, "555.123.4567, 555.987.6543");
    }

    #[test]
    fn test_year_ranges_are_not_phones() {
        let info = extract_contact("Sept 2018 - May 2022\nGPA 3.8", &resolver());
        assert_eq!(info.phone, NOT_FOUND);
    }

    #[test]
    fn test_links_classified_by_priority() {
        let text = "https://linkedin.com/in/jdoe, https://github.com/jdoe.\n\
                    https://jdoe-portfolio.dev https://example.com/blog \
                    https://github.com/other";
        let info = extract_contact(text, &resolver());
        assert_eq!(info.linkedin, "https://linkedin.com/in/jdoe");
        assert_eq!(info.github, "https://github.com/jdoe");
        assert_eq!(info.portfolio, "https://jdoe-portfolio.dev");
    }

    #[test]
    fn test_bare_profile_links_recognised() {
        let info = extract_contact("linkedin.com/in/jdoe | www.jdoe-personal.net", &resolver());
        assert_eq!(info.linkedin, "linkedin.com/in/jdoe");
        assert_eq!(info.portfolio, "www.jdoe-personal.net");
        assert_eq!(info.github, NOT_FOUND);
    }

    #[test]
    fn test_empty_text_all_sentinels() {
        let info = extract_contact("", &resolver());
        assert_eq!(info, ContactInfo::default());
    }
}
