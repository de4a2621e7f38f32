//! Skills extraction — comma/semicolon separated tokens sorted into fixed categories.
//!
//! Categories are tested in priority order and the first one whose keyword list contains
//! the token wins; anything unrecognised goes to `Other`. Empty categories are dropped.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::lines::{content_lines, strip_bullet};
use crate::extraction::matcher::collapse_whitespace;
use crate::extraction::sections::{find_section, is_header_line, SKILLS_HEADERS};
use crate::models::resume::SkillCategories;

pub const OTHER_CATEGORY: &str = "Other";

/// Inline label prefixes (`Languages: …`, `Tools - …`) longer than this are kept as content.
const MAX_LABEL_WORDS: usize = 3;

const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Programming Languages",
        &[
            "python", "java", "javascript", "typescript", "c", "c++", "c#", "go", "golang", "rust",
            "ruby", "php", "swift", "kotlin", "scala", "r", "matlab", "perl", "dart", "haskell",
            "elixir", "lua", "bash", "shell", "sql", "html", "css", "objective-c", "julia",
        ],
    ),
    (
        "Frameworks & Libraries",
        &[
            "react", "angular", "vue", "svelte", "next.js", "node.js", "express", "django", "flask",
            "fastapi", "spring", "spring boot", "rails", "laravel", ".net", "tensorflow", "pytorch",
            "keras", "scikit-learn", "pandas", "numpy", "jquery", "bootstrap", "tailwind", "axum",
            "tokio", "streamlit", "spacy", "opencv", "hadoop", "spark",
        ],
    ),
    (
        "Databases",
        &[
            "mysql", "postgresql", "postgres", "sqlite", "mongodb", "redis", "oracle", "cassandra",
            "dynamodb", "elasticsearch", "mariadb", "sql server", "firebase", "neo4j", "snowflake",
            "bigquery",
        ],
    ),
    (
        "Tools & Platforms",
        &[
            "git", "github", "gitlab", "docker", "kubernetes", "aws", "azure", "gcp",
            "google cloud", "linux", "jenkins", "terraform", "ansible", "jira", "figma", "postman",
            "vs code", "heroku", "vercel", "nginx", "kafka", "rabbitmq", "tableau", "power bi",
            "excel", "ci/cd",
        ],
    ),
    (
        "Soft Skills",
        &[
            "communication", "leadership", "teamwork", "problem solving", "problem-solving",
            "time management", "critical thinking", "collaboration", "adaptability",
            "creativity", "project management", "public speaking", "mentoring", "negotiation",
        ],
    ),
];

lazy_static! {
    /// One alternation per category. Keywords match as whole terms, where `+`, `#` and `.`
    /// count as part of a term so `c` does not match inside `c++`.
    static ref CATEGORY_PATTERNS: Vec<(&'static str, Regex)> = CATEGORIES
        .iter()
        .map(|(label, keywords)| (*label, category_regex(keywords)))
        .collect();

    static ref TOKEN_SPLIT: Regex = Regex::new(r"[,;]").unwrap();
    static ref LABEL_PREFIX: Regex = Regex::new(r"^([^:,;]+?)\s*(?::|\s-\s)\s*").unwrap();
}

fn category_regex(keywords: &[&str]) -> Regex {
    let mut sorted: Vec<&str> = keywords.to_vec();
    // Longest first so `spring boot` wins over `spring`.
    sorted.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let alternation = sorted
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?i)(?:^|[^\w+#.])(?:{alternation})(?:$|[^\w+#]|\.(?:\s|$))");
    Regex::new(&pattern).unwrap_or_else(|e| panic!("bad skills pattern: {e}"))
}

pub fn extract_skills(text: &str) -> SkillCategories {
    let section = find_section(text, SKILLS_HEADERS);
    let mut skills = SkillCategories::new();
    for (label, _) in CATEGORIES {
        skills.insert(label.to_string(), Vec::new());
    }
    skills.insert(OTHER_CATEGORY.to_string(), Vec::new());

    // Sub-headers from the skills family do not end the section, so skip them here.
    for line in content_lines(&section).into_iter().filter(|l| !is_header_line(l)) {
        for token in tokens(line) {
            let bucket = skills
                .entry(categorize(&token).to_string())
                .or_default();
            if !bucket.contains(&token) {
                bucket.push(token);
            }
        }
    }

    skills.retain(|_, items| !items.is_empty());
    skills
}

/// First category whose keywords match the token, else `Other`.
pub fn categorize(token: &str) -> &'static str {
    CATEGORY_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(token))
        .map(|(label, _)| *label)
        .unwrap_or(OTHER_CATEGORY)
}

fn tokens(line: &str) -> Vec<String> {
    let line = strip_bullet(line);
    let line = match LABEL_PREFIX.captures(line) {
        Some(caps) if is_label(caps.get(1).map_or("", |m| m.as_str())) => {
            &line[caps.get(0).map_or(0, |m| m.end())..]
        }
        _ => line,
    };
    TOKEN_SPLIT
        .split(line)
        .map(|t| collapse_whitespace(t).trim_end_matches('.').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_label(prefix: &str) -> bool {
    let words = prefix.split_whitespace().count();
    words > 0 && words <= MAX_LABEL_WORDS
}
