//! Line-level helpers shared by the entry extractors.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::matcher::{collapse_whitespace, Capture, MatcherChain, RegexMatcher};

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";
const OPEN_END: &str = r"(?:present|current|now|till\s+date|ongoing)";
const DASH: &str = r"(?:-|–|—|to)";

lazy_static! {
    /// `Sept 2018 - May 2022`, `Jan 2021 – Present`, then bare year ranges.
    pub static ref DATE_RANGES: MatcherChain = MatcherChain::new("date_range")
        .with(RegexMatcher::new(
            "month_year_range",
            &format!(r"(?i)\b{MONTH}\s+\d{{4}}\s*{DASH}\s*(?:{MONTH}\s+\d{{4}}|{OPEN_END})\b"),
            Capture::Whole,
        ))
        .with(RegexMatcher::new(
            "year_range",
            &format!(r"(?i)\b(?:19|20)\d{{2}}\s*{DASH}\s*(?:(?:19|20)\d{{2}}|{OPEN_END})\b"),
            Capture::Whole,
        ));

    static ref BULLET_REGEX: Regex = Regex::new(r"^[\s•●○▪■◦‣→➢➤✓✔*\-–—]+").unwrap();
    static ref ENUMERATION_REGEX: Regex = Regex::new(r"^\d{1,2}\s*[.)]\s+").unwrap();
    static ref PAGE_FOOTER_REGEX: Regex =
        Regex::new(r"(?i)^(?:-\s*)?page\s+\d+(?:\s*(?:of|/)\s*\d+)?(?:\s*-)?$|\bpage\s+\d+\b").unwrap();
    static ref URL_LINE_REGEX: Regex = Regex::new(r"(?i)https?://|www\.").unwrap();
}

/// Removes leading bullet glyphs and the whitespace after them.
pub fn strip_bullet(line: &str) -> &str {
    match BULLET_REGEX.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
    .trim()
}

/// Like `strip_bullet`, and also drops a leading `1.` / `2)` enumeration.
pub fn strip_list_marker(line: &str) -> &str {
    let line = strip_bullet(line);
    match ENUMERATION_REGEX.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line,
    }
}

pub fn is_bullet(line: &str) -> bool {
    BULLET_REGEX.find(line).is_some_and(|m| m.end() > 0 && !line[..m.end()].trim().is_empty())
}

/// Page-number footers left behind by PDF extraction.
pub fn is_page_footer(line: &str) -> bool {
    PAGE_FOOTER_REGEX.is_match(line.trim())
}

pub fn contains_url(line: &str) -> bool {
    URL_LINE_REGEX.is_match(line)
}

/// Bullet stripped, whitespace collapsed, trailing `.`/`,`/`;` trimmed.
pub fn clean_item(line: &str) -> String {
    collapse_whitespace(strip_list_marker(line))
        .trim_end_matches(['.', ',', ';'])
        .trim_end()
        .to_string()
}

/// Trimmed, non-empty lines.
pub fn content_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}
