//! Entity recognition for the candidate's name — pluggable, trait-based.
//!
//! Two backends ship:
//! - `GazetteerRecognizer`: dictionary NER over the contact header, keyed on known given names.
//! - `PatternRecognizer`: the deterministic regex chain, always available.
//!
//! `EntityResolver` asks the configured backend first and falls through to the pattern
//! chain, so running with only the pattern backend degrades accuracy, never correctness.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::matcher::{Capture, Hit, Matcher, MatcherChain, RegexMatcher};
use crate::extraction::sections::{first_header_offset, is_header_line};

/// Lines of the document considered the contact header.
const HEADER_REGION_LINES: usize = 10;
const MAX_NAME_TOKENS: usize = 4;

/// Document titles that sit where a name usually would.
const TITLE_WORDS: &[&str] = &["resume", "résumé", "curriculum", "vitae", "cv", "biodata"];

// ────────────────────────────────────────────────────────────────────────────
// Entity model and trait
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityLabel {
    Person,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
}

/// Implement this to add a recognizer backend without touching the extractors.
///
/// Carried in `AppState` as `Arc<dyn EntityRecognizer>`.
pub trait EntityRecognizer: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Entities in document order.
    fn recognize(&self, text: &str) -> Vec<Entity>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NerBackend {
    #[default]
    Gazetteer,
    Regex,
}

impl NerBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            NerBackend::Gazetteer => GAZETTEER_BACKEND,
            NerBackend::Regex => PATTERN_BACKEND,
        }
    }
}

impl fmt::Display for NerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gazetteer" | "ner" => Ok(NerBackend::Gazetteer),
            "regex" | "pattern" | "none" => Ok(NerBackend::Regex),
            other => Err(format!(
                "unknown NER backend '{other}' (expected 'gazetteer' or 'regex')"
            )),
        }
    }
}

/// Builds the recognizer selected at startup.
pub fn build_recognizer(backend: NerBackend, extra_names: &[String]) -> Arc<dyn EntityRecognizer> {
    match backend {
        NerBackend::Gazetteer => Arc::new(GazetteerRecognizer::with_extra_names(extra_names)),
        NerBackend::Regex => Arc::new(PatternRecognizer),
    }
}

/// Reads a newline-separated name list; blank lines and `#` comments are skipped.
pub fn load_name_lexicon(path: &Path) -> std::io::Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

// ────────────────────────────────────────────────────────────────────────────
// Resolver
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct EntityResolver {
    primary: Arc<dyn EntityRecognizer>,
}

impl EntityResolver {
    pub fn new(primary: Arc<dyn EntityRecognizer>) -> Self {
        EntityResolver { primary }
    }

    pub fn regex_only() -> Self {
        EntityResolver::new(Arc::new(PatternRecognizer))
    }

    pub fn backend(&self) -> &'static str {
        self.primary.backend()
    }

    /// Best-effort person name. `None` when neither backend finds one.
    pub fn person_name(&self, text: &str) -> Option<String> {
        if let Some(name) = first_person(self.primary.recognize(text)) {
            debug!(backend = self.primary.backend(), %name, "person name resolved");
            return Some(name);
        }
        if self.primary.backend() == PATTERN_BACKEND {
            return None;
        }
        first_person(PatternRecognizer.recognize(text))
    }
}

fn first_person(entities: Vec<Entity>) -> Option<String> {
    entities
        .into_iter()
        .find(|e| e.label == EntityLabel::Person)
        .map(|e| e.text)
}

// ────────────────────────────────────────────────────────────────────────────
// PatternRecognizer — regex-only fallback
// ────────────────────────────────────────────────────────────────────────────

pub const PATTERN_BACKEND: &str = "regex";

lazy_static! {
    /// Priority order: ALL-CAPS leading line, Title-Case leading line,
    /// Title-Case line isolated by blank lines.
    static ref NAME_CHAIN: MatcherChain = MatcherChain::new("person_name")
        .with(LeadingLine {
            inner: RegexMatcher::new(
                "all_caps_line",
                r"^([A-Z][A-Z'\-]+(?:[ \t]+[A-Z][A-Z'.\-]*){1,3})$",
                Capture::Group(1),
            ),
            title_case: true,
        })
        .with(LeadingLine {
            inner: RegexMatcher::new(
                "title_case_leading_line",
                r"^([A-Z][a-z]+(?:[ \t]+(?:[A-Z]\.|[A-Z][a-z]+)){1,3})\b",
                Capture::Group(1),
            ),
            title_case: false,
        })
        .with(IsolatedLine {
            regex: Regex::new(r"^[A-Z][a-z]+(?:[ \t]+(?:[A-Z]\.|[A-Z][a-z]+)){1,3}$")
                .unwrap(),
        });
}

pub struct PatternRecognizer;

impl EntityRecognizer for PatternRecognizer {
    fn backend(&self) -> &'static str {
        PATTERN_BACKEND
    }

    fn recognize(&self, text: &str) -> Vec<Entity> {
        NAME_CHAIN
            .first(header_region(text))
            .map(|hit| Entity {
                label: EntityLabel::Person,
                text: hit.value,
            })
            .into_iter()
            .collect()
    }
}

/// Runs the inner matcher against the first non-empty, non-title line only.
struct LeadingLine {
    inner: RegexMatcher,
    title_case: bool,
}

impl Matcher for LeadingLine {
    fn label(&self) -> &'static str {
        self.inner.label()
    }

    fn find(&self, haystack: &str) -> Option<Hit> {
        let line = haystack
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !is_document_title(l))?;
        if is_header_line(line) {
            return None;
        }
        let mut hit = self.inner.find(line)?;
        if self.title_case {
            hit.value = title_case(&hit.value);
        }
        Some(hit)
    }
}

/// A whole line matching `regex` with a blank line directly above and below.
struct IsolatedLine {
    regex: Regex,
}

impl Matcher for IsolatedLine {
    fn label(&self) -> &'static str {
        "title_case_isolated_line"
    }

    fn find(&self, haystack: &str) -> Option<Hit> {
        let lines: Vec<&str> = haystack.lines().map(str::trim).collect();
        (1..lines.len().saturating_sub(1)).find_map(|i| {
            let line = lines[i];
            let isolated = lines[i - 1].is_empty() && lines[i + 1].is_empty();
            (isolated && self.regex.is_match(line) && !is_header_line(line)).then(|| Hit {
                range: 0..0,
                value: line.to_string(),
            })
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// GazetteerRecognizer — dictionary NER
// ────────────────────────────────────────────────────────────────────────────

pub const GAZETTEER_BACKEND: &str = "gazetteer";

/// Built-in given names. Extend at startup via `NAME_LEXICON_PATH`.
const GIVEN_NAMES: &[&str] = &[
    "aaron", "abdul", "adam", "aditya", "ahmed", "aisha", "akash", "alex", "alexander", "alice",
    "amanda", "amit", "amy", "ana", "andrea", "andrew", "angela", "anil", "anita", "anjali", "ankit",
    "anna", "anthony", "arjun", "arun", "ashley", "barbara", "ben", "benjamin", "brian", "carlos",
    "carol", "catherine", "charles", "chen", "chris", "christina", "christopher", "daniel", "david",
    "deepak", "divya", "dmitri", "edward", "elena", "elizabeth", "emily", "emma", "eric", "fatima",
    "francesca", "gabriel", "george", "grace", "hannah", "harish", "hiroshi", "ian", "isabella",
    "jacob", "james", "jane", "jason", "jennifer", "jessica", "john", "jonathan", "jose", "joseph",
    "joshua", "juan", "julia", "karan", "karen", "kavya", "kevin", "kim", "kumar", "laura", "li",
    "linda", "lisa", "lucas", "maria", "mark", "mary", "matthew", "mei", "michael", "michelle",
    "mohammed", "muhammad", "nancy", "neha", "nicholas", "nikhil", "noah", "olivia", "omar", "pablo",
    "patricia", "paul", "pooja", "priya", "rahul", "raj", "rajesh", "ravi", "rebecca", "richard",
    "robert", "rohan", "ryan", "sahil", "samuel", "sandra", "sara", "sarah", "sanjay", "shreya",
    "siddharth", "sneha", "sophia", "srijan", "stephen", "steven", "sunil", "susan", "thomas",
    "timothy", "vijay", "vikram", "wei", "william", "yuki", "zhang",
];

pub struct GazetteerRecognizer {
    given_names: HashSet<String>,
}

impl GazetteerRecognizer {
    pub fn new() -> Self {
        Self::with_extra_names(&[])
    }

    pub fn with_extra_names(extra: &[String]) -> Self {
        let given_names = GIVEN_NAMES
            .iter()
            .map(|n| n.to_string())
            .chain(extra.iter().map(|n| n.trim().to_lowercase()))
            .filter(|n| !n.is_empty())
            .collect();
        GazetteerRecognizer { given_names }
    }

    pub fn knows(&self, name: &str) -> bool {
        self.given_names.contains(&name.to_lowercase())
    }

    fn persons_in_line(&self, line: &str) -> Vec<Entity> {
        let mut found = Vec::new();
        let mut run: Vec<&str> = Vec::new();

        for raw in line.split_whitespace() {
            let token = raw.trim_end_matches([',', ';', ':', '|']);
            let closes_run = token.len() != raw.len();
            if is_capitalized_token(token) {
                run.push(token);
            } else {
                self.flush_run(&mut run, &mut found);
            }
            if closes_run {
                self.flush_run(&mut run, &mut found);
            }
        }
        self.flush_run(&mut run, &mut found);
        found
    }

    fn flush_run(&self, run: &mut Vec<&str>, found: &mut Vec<Entity>) {
        if let Some(start) = run.iter().position(|t| self.knows(t)) {
            let end = (start + MAX_NAME_TOKENS).min(run.len());
            if end - start >= 2 {
                found.push(Entity {
                    label: EntityLabel::Person,
                    text: title_case(&run[start..end].join(" ")),
                });
            }
        }
        run.clear();
    }
}

impl Default for GazetteerRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRecognizer for GazetteerRecognizer {
    fn backend(&self) -> &'static str {
        GAZETTEER_BACKEND
    }

    fn recognize(&self, text: &str) -> Vec<Entity> {
        header_region(text)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !is_header_line(l))
            .take(HEADER_REGION_LINES)
            .flat_map(|l| self.persons_in_line(l))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Text above the first recognised section header (the whole text when there is none).
fn header_region(text: &str) -> &str {
    match first_header_offset(text) {
        Some(offset) if offset > 0 => &text[..offset],
        _ => text,
    }
}

fn is_document_title(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .all(|w| TITLE_WORDS.contains(&w))
}

/// Title-Case (`Jane`) or ALL-CAPS (`JANE`) alphabetic token; `'`, `-` and `.` allowed.
fn is_capitalized_token(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_uppercase() {
        return false;
    }
    token
        .chars()
        .all(|c| c.is_alphabetic() || matches!(c, '\'' | '’' | '-' | '.'))
}

/// Upper-cases the first letter of every alphabetic run, lower-cases the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
