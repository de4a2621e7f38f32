//! Education extraction — one entry per institution.
//!
//! Per entry the first line is the institution. Every later line is checked in a fixed
//! order (date range, GPA, degree, coursework) and each match is cut out of the line
//! before the next check runs, so a date can never leak into the degree text.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::lines::{
    contains_url, content_lines, is_bullet, is_page_footer, strip_bullet, DATE_RANGES,
};
use crate::extraction::matcher::{collapse_whitespace, Capture, MatcherChain, RegexMatcher};
use crate::extraction::sections::{find_section, EDUCATION_HEADERS};
use crate::models::resume::EducationEntry;

lazy_static! {
    static ref GPA_CHAIN: MatcherChain = MatcherChain::new("gpa").with(RegexMatcher::new(
        "gpa_label",
        r"(?i)\b(CGPA|GPA|Score|Percentage)\s*[:•\-]?\s*(\d+(?:\.\d+)?\s*(?:/\s*\d+(?:\.\d+)?|%)?)",
        Capture::LabelValue,
    ));

    static ref DEGREE_REGEX: Regex = Regex::new(concat!(
        r"\b(?i:bachelor|master|associate|diploma|doctorate)(?:'s|’s|s)?\b",
        r"|\b(?i:higher\s+secondary|senior\s+secondary|intermediate)\b",
        r"|\b(?:B\.\s?(?:Tech|E|Sc|S|A|Com)|M\.\s?(?:Tech|E|Sc|S|A|Com)|BTech|MTech|BSc|MSc",
        r"|BEng|MEng|BCom|MCom|BBA|MBA|BCA|MCA|HSC|SSC|Ph\.?\s?D)\b",
    ))
    .unwrap();

    static ref INSTITUTION_REGEX: Regex = Regex::new(
        r"(?i)\b(?:university|universit[éa]|college|institute|school|academy|polytechnic|conservatory|IIT|NIT|IIIT)\b"
    )
    .unwrap();
}

pub fn extract_education(text: &str) -> Vec<EducationEntry> {
    let section = find_section(text, EDUCATION_HEADERS);
    let entries: Vec<EducationEntry> = split_entries(&section)
        .iter()
        .filter_map(|lines| parse_entry(lines))
        .collect();

    if entries.is_empty() {
        vec![EducationEntry::placeholder()]
    } else {
        entries
    }
}

pub fn is_degree_line(line: &str) -> bool {
    DEGREE_REGEX.is_match(line)
}

/// Groups section lines into entries. A line opens a new entry when it names an
/// institution, or when it is a capitalised phrase directly followed by a degree
/// or date line.
fn split_entries(section: &str) -> Vec<Vec<&str>> {
    let lines = content_lines(section);
    let mut entries: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !current.is_empty() && starts_institution(line, lines.get(i + 1).copied()) {
            entries.push(std::mem::take(&mut current));
        }
        current.push(line);
    }
    if !current.is_empty() {
        entries.push(current);
    }
    entries
}

fn starts_institution(line: &str, next: Option<&str>) -> bool {
    if is_bullet(line) || is_degree_line(line) || is_coursework(line) {
        return false;
    }
    if !line.starts_with(|c: char| c.is_uppercase()) {
        return false;
    }
    if INSTITUTION_REGEX.is_match(line) {
        return true;
    }
    let capitalised_phrase = !line.chars().any(|c| c.is_ascii_digit());
    capitalised_phrase
        && next.is_some_and(|n| is_degree_line(n) || DATE_RANGES.first(n).is_some())
}

fn is_coursework(line: &str) -> bool {
    line.to_lowercase().contains("coursework")
}

fn parse_entry(lines: &[&str]) -> Option<EducationEntry> {
    let (first, rest) = lines.split_first()?;

    let mut entry = EducationEntry::default();

    let mut institution = collapse_whitespace(strip_bullet(first));
    let original = institution.clone();
    if let Some(dates) = DATE_RANGES.take_first(&mut institution) {
        if institution.is_empty() {
            institution = original;
        } else {
            entry.dates = dates;
        }
    }
    entry.institution = institution;

    for raw in rest {
        let mut line = collapse_whitespace(strip_bullet(raw));

        if let Some(dates) = DATE_RANGES.take_first(&mut line) {
            if entry.dates.is_empty() {
                entry.dates = dates;
            }
        }
        if let Some(gpa) = GPA_CHAIN.take_first(&mut line) {
            if entry.gpa.is_empty() {
                entry.gpa = gpa;
            }
        }
        let line = line.trim_matches(|c: char| c == ',' || c == '|' || c.is_whitespace());
        if line.is_empty() {
            continue;
        }

        if entry.degree.is_empty() && is_degree_line(line) {
            entry.degree = line.to_string();
            continue;
        }
        if is_coursework(line) {
            entry.details.push(format_coursework(line));
            continue;
        }
        if is_page_footer(line) || contains_url(line) {
            continue;
        }
        entry.details.push(line.to_string());
    }

    Some(entry)
}

/// `Relevant Coursework: A, B` → `Coursework: A, B`.
fn format_coursework(line: &str) -> String {
    match line.split_once([':', ',']) {
        Some((_, courses)) if !courses.trim().is_empty() => {
            format!("Coursework: {}", courses.trim())
        }
        _ => line.to_string(),
    }
}
