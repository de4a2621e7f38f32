//! Section locator — isolates the text under a header such as "EDUCATION".
//!
//! Headers are tried in the caller's priority order; the first one present wins.
//! The section runs until the next line that is *any* recognised header from
//! `HEADER_ALPHABET` (other than the caller's own synonyms), or to end of document.
//!
//! A header line is either the header alone on its line (any case, optional trailing
//! colon, optional markdown `#`), or an upper-case header followed by a separator and
//! inline content (`SKILLS: Rust, Go`). Title-case inline labels such as
//! `Languages: Rust` are ordinary content, not headers.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

pub const EDUCATION_HEADERS: &[&str] = &[
    "EDUCATION",
    "ACADEMIC BACKGROUND",
    "EDUCATIONAL QUALIFICATION",
    "EDUCATIONAL QUALIFICATIONS",
    "ACADEMIC QUALIFICATIONS",
];

pub const EXPERIENCE_HEADERS: &[&str] = &[
    "EXPERIENCE",
    "WORK HISTORY",
    "PROFESSIONAL EXPERIENCE",
    "WORK EXPERIENCE",
    "EMPLOYMENT HISTORY",
];

pub const SKILLS_HEADERS: &[&str] = &["SKILLS", "TECHNICAL SKILLS", "TECHNOLOGIES", "KEY SKILLS"];

pub const CERTIFICATION_HEADERS: &[&str] = &[
    "CERTIFICATIONS",
    "CERTIFICATION",
    "CERTIFICATES",
    "LICENSES & CERTIFICATIONS",
    "LICENSES",
    "TRAINING",
    "TRAININGS",
    "INTERNSHIPS",
    "INTERNSHIP",
];

/// Headers that only ever terminate other sections.
const BOUNDARY_HEADERS: &[&str] = &[
    "PROJECTS",
    "ACADEMIC PROJECTS",
    "PERSONAL PROJECTS",
    "SUMMARY",
    "PROFESSIONAL SUMMARY",
    "OBJECTIVE",
    "CAREER OBJECTIVE",
    "PROFILE",
    "ACHIEVEMENTS",
    "AWARDS",
    "HONORS",
    "PUBLICATIONS",
    "LANGUAGES",
    "INTERESTS",
    "HOBBIES",
    "ACTIVITIES",
    "EXTRACURRICULAR ACTIVITIES",
    "VOLUNTEER EXPERIENCE",
    "REFERENCES",
    "DECLARATION",
    "PERSONAL DETAILS",
];

lazy_static! {
    /// Every header used anywhere in the pipeline, with its compiled line pattern.
    static ref HEADER_ALPHABET: Vec<(&'static str, Regex)> = EDUCATION_HEADERS
        .iter()
        .chain(EXPERIENCE_HEADERS)
        .chain(SKILLS_HEADERS)
        .chain(CERTIFICATION_HEADERS)
        .chain(BOUNDARY_HEADERS)
        .map(|h| (*h, header_regex(h)))
        .collect();
}

/// Builds the line pattern for one header. Group `rest` holds inline content.
fn header_regex(header: &str) -> Regex {
    let upper = header.to_uppercase();
    let words = regex::escape(&upper).replace(' ', r"[ \t]+");
    let pattern = format!(
        r"(?m)^[ \t]*(?:#{{1,3}}[ \t]*)?(?:(?i:{words})[ \t]*:?|{words}[ \t]*[:|–—-][ \t]*(?P<rest>[^\n]*?))[ \t]*\r?$"
    );
    Regex::new(&pattern).unwrap_or_else(|e| panic!("bad header pattern for {header}: {e}"))
}

fn pattern_for(header: &str) -> Regex {
    HEADER_ALPHABET
        .iter()
        .find(|(h, _)| h.eq_ignore_ascii_case(header))
        .map(|(_, re)| re.clone())
        .unwrap_or_else(|| header_regex(header))
}

/// A located section: the header line as written and the body beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub header: String,
    pub body: String,
}

/// Returns the body of the first matching synonym's section, or `""` when none match.
pub fn find_section(text: &str, header_synonyms: &[&str]) -> String {
    locate_section(text, header_synonyms)
        .map(|s| s.body)
        .unwrap_or_default()
}

pub fn locate_section(text: &str, header_synonyms: &[&str]) -> Option<Section> {
    header_synonyms.iter().find_map(|synonym| {
        let caps = pattern_for(synonym).captures(text)?;
        Some(section_from(text, &caps, synonym, header_synonyms))
    })
}

/// Like `locate_section`, but the synonym appearing first in the document wins rather
/// than the first in priority order. Used for section families whose members share
/// one body (certifications and internships).
pub fn locate_earliest_section(text: &str, header_synonyms: &[&str]) -> Option<Section> {
    header_synonyms
        .iter()
        .filter_map(|synonym| {
            let caps = pattern_for(synonym).captures(text)?;
            let start = caps.get(0)?.start();
            Some((start, section_from(text, &caps, synonym, header_synonyms)))
        })
        .min_by_key(|(start, _)| *start)
        .map(|(_, section)| section)
}

fn section_from(
    text: &str,
    caps: &regex::Captures<'_>,
    synonym: &str,
    header_synonyms: &[&str],
) -> Section {
    let (start, line_end) = caps
        .get(0)
        .map(|m| (m.start(), m.end()))
        .unwrap_or((0, 0));
    let inline = caps.name("rest").map(|m| m.as_str()).unwrap_or("");
    let end = next_header_start(text, line_end, header_synonyms).unwrap_or(text.len());

    let mut body = String::with_capacity(inline.len() + end - line_end);
    body.push_str(inline);
    body.push_str(&text[line_end..end]);

    debug!(header = synonym, start, end, "section located");
    Section {
        header: text[start..line_end].trim().to_string(),
        body: body.trim().to_string(),
    }
}

/// Byte offset of the earliest recognised header line at or after `from`,
/// ignoring the caller's own synonyms.
fn next_header_start(text: &str, from: usize, own: &[&str]) -> Option<usize> {
    HEADER_ALPHABET
        .iter()
        .filter(|(h, _)| !own.iter().any(|o| o.eq_ignore_ascii_case(h)))
        .filter_map(|(_, re)| re.find_at(text, from).map(|m| m.start()))
        .min()
}

/// Offset of the first recognised header anywhere in the document.
pub fn first_header_offset(text: &str) -> Option<usize> {
    next_header_start(text, 0, &[])
}

/// True when the whole line is a recognised header.
pub fn is_header_line(line: &str) -> bool {
    HEADER_ALPHABET.iter().any(|(_, re)| {
        re.find(line)
            .is_some_and(|m| m.start() == 0 && m.end() == line.len())
    })
}
