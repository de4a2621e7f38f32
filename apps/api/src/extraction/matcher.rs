//! Ordered matcher chains — "first pattern that matches wins" as data, not branches.
//!
//! Every heuristic list in the extractors (name patterns, phone formats, date ranges,
//! degree keywords) is a `MatcherChain`, so its priority order is visible in one place
//! and each matcher can be exercised on its own.

use std::ops::Range;

use regex::Regex;
use tracing::{debug, trace};

/// A single successful match: where it sits in the haystack and the value to store.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub range: Range<usize>,
    pub value: String,
}

/// One matching strategy.
pub trait Matcher: Send + Sync {
    fn label(&self) -> &'static str;

    fn find(&self, haystack: &str) -> Option<Hit>;

    /// All non-overlapping hits. Strategies that only ever produce one value
    /// can rely on the default.
    fn find_all(&self, haystack: &str) -> Vec<Hit> {
        self.find(haystack).into_iter().collect()
    }
}

/// How a `RegexMatcher` turns captures into the stored value.
#[derive(Debug, Clone, Copy)]
pub enum Capture {
    /// The whole match, trimmed.
    Whole,
    /// A single capture group, trimmed. The hit range still covers the whole match.
    Group(usize),
    /// `"<group 1>: <group 2>"`, e.g. `GPA: 3.8`.
    LabelValue,
}

pub struct RegexMatcher {
    label: &'static str,
    regex: Regex,
    capture: Capture,
}

impl RegexMatcher {
    /// Panics on an invalid pattern. Patterns are compile-time constants.
    pub fn new(label: &'static str, pattern: &str, capture: Capture) -> Self {
        RegexMatcher {
            label,
            regex: Regex::new(pattern).unwrap_or_else(|e| panic!("bad pattern {label}: {e}")),
            capture,
        }
    }

    fn hit_from(&self, caps: &regex::Captures<'_>) -> Option<Hit> {
        let whole = caps.get(0)?;
        let value = match self.capture {
            Capture::Whole => whole.as_str().trim().to_string(),
            Capture::Group(i) => caps.get(i)?.as_str().trim().to_string(),
            Capture::LabelValue => format!(
                "{}: {}",
                caps.get(1)?.as_str().trim(),
                caps.get(2)?.as_str().trim()
            ),
        };
        if value.is_empty() {
            return None;
        }
        Some(Hit {
            range: whole.range(),
            value,
        })
    }
}

impl Matcher for RegexMatcher {
    fn label(&self) -> &'static str {
        self.label
    }

    fn find(&self, haystack: &str) -> Option<Hit> {
        self.regex
            .captures_iter(haystack)
            .find_map(|caps| self.hit_from(&caps))
    }

    fn find_all(&self, haystack: &str) -> Vec<Hit> {
        self.regex
            .captures_iter(haystack)
            .filter_map(|caps| self.hit_from(&caps))
            .collect()
    }
}

/// Matchers evaluated strictly in insertion order.
pub struct MatcherChain {
    name: &'static str,
    matchers: Vec<Box<dyn Matcher>>,
}

impl MatcherChain {
    pub fn new(name: &'static str) -> Self {
        MatcherChain {
            name,
            matchers: Vec::new(),
        }
    }

    pub fn with(mut self, matcher: impl Matcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.label()).collect()
    }

    /// First hit of the first matcher that produces one.
    pub fn first(&self, haystack: &str) -> Option<Hit> {
        let hit = self.matchers.iter().find_map(|m| {
            let hit = m.find(haystack)?;
            debug!(chain = self.name, matcher = m.label(), value = %hit.value, "matched");
            Some(hit)
        });
        if hit.is_none() {
            trace!(chain = self.name, tried = ?self.labels(), "no match");
        }
        hit
    }

    /// Like `first`, but cuts the matched span out of `line` before returning the value,
    /// so later checks on the same line cannot see it again.
    pub fn take_first(&self, line: &mut String) -> Option<String> {
        let hit = self.first(line)?;
        line.replace_range(hit.range.clone(), " ");
        let collapsed = collapse_whitespace(line);
        *line = collapsed;
        Some(hit.value)
    }

    /// Hits from every matcher. When spans overlap the longer one is kept, and values
    /// are deduplicated while preserving document order.
    pub fn all_distinct(&self, haystack: &str) -> Vec<String> {
        let mut hits: Vec<Hit> = self
            .matchers
            .iter()
            .flat_map(|m| m.find_all(haystack))
            .collect();
        hits.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then(b.range.len().cmp(&a.range.len()))
        });

        let mut kept: Vec<Hit> = Vec::new();
        for hit in hits {
            match kept.last_mut() {
                Some(last) if hit.range.start < last.range.end => {
                    if hit.range.len() > last.range.len() {
                        *last = hit;
                    }
                }
                _ => kept.push(hit),
            }
        }

        let mut values: Vec<String> = Vec::new();
        for hit in kept {
            if !values.contains(&hit.value) {
                values.push(hit.value);
            }
        }
        values
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
