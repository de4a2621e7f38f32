//! Certification and internship extraction.
//!
//! Both lists share one section family, so a single pass walks the section with a small
//! state machine. Header lines switch the active bucket and are discarded; every other
//! line lands in whichever bucket is active, or is dropped when none is.

use crate::extraction::lines::{clean_item, content_lines};
use crate::extraction::sections::{is_header_line, locate_earliest_section, CERTIFICATION_HEADERS};
use crate::models::resume::CertificationRecord;

const CERTIFICATION_KEYWORDS: &[&str] = &["certification", "certificate", "training", "license", "licence"];
const INTERNSHIP_KEYWORDS: &[&str] = &["internship"];

/// Which list incoming lines are appended to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Bucket {
    #[default]
    None,
    Certifications,
    Internships,
}

impl Bucket {
    /// Transition for one line: `Some(next)` when the line is a bucket header.
    ///
    /// Containing a keyword is not enough. The line must also be header-shaped (a known
    /// section header, ending in `:`, or all capitals), so items such as
    /// `Certificate in Data Science, Coursera` or `Summer internship at Globex` stay
    /// items instead of switching the bucket.
    pub fn transition(line: &str) -> Option<Bucket> {
        if !looks_like_header(line) {
            return None;
        }
        let lower = line.to_lowercase();
        if INTERNSHIP_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Some(Bucket::Internships)
        } else if CERTIFICATION_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Some(Bucket::Certifications)
        } else {
            None
        }
    }
}

/// Scan state: the active bucket plus both lists.
#[derive(Debug, Default)]
struct Scanner {
    bucket: Bucket,
    record: CertificationRecord,
}

impl Scanner {
    fn feed(&mut self, line: &str) {
        if let Some(next) = Bucket::transition(line) {
            self.bucket = next;
            return;
        }
        let item = clean_item(line);
        if item.is_empty() {
            return;
        }
        match self.bucket {
            Bucket::None => {}
            Bucket::Certifications => self.record.certifications.push(item),
            Bucket::Internships => self.record.internships.push(item),
        }
    }
}

/// `None` when the document has no certification/internship section at all.
pub fn extract_certifications(text: &str) -> Option<CertificationRecord> {
    let section = locate_earliest_section(text, CERTIFICATION_HEADERS)?;
    let mut scanner = Scanner::default();

    // The header line itself selects the first bucket.
    scanner.feed(&section.header);
    for line in content_lines(&section.body) {
        scanner.feed(line);
    }
    Some(scanner.record)
}

fn looks_like_header(line: &str) -> bool {
    let line = line.trim();
    if is_header_line(line) || line.ends_with(':') {
        return true;
    }
    let mut letters = line.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}
