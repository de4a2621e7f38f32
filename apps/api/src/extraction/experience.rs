//! Experience extraction — one entry per position.

use crate::extraction::lines::{content_lines, is_bullet, is_page_footer, strip_bullet, DATE_RANGES};
use crate::extraction::matcher::collapse_whitespace;
use crate::extraction::sections::{find_section, EXPERIENCE_HEADERS};
use crate::models::resume::ExperienceEntry;

/// Checked in order; the first one present in the title line splits off the company.
const COMPANY_SEPARATORS: &[&str] = &[" at ", ", ", " - ", " | "];

/// Longest line still treated as a position line.
const MAX_POSITION_WORDS: usize = 12;
/// Separator-free lines up to this length open an entry as well.
const MAX_BARE_POSITION_WORDS: usize = 6;

pub fn extract_experience(text: &str) -> Vec<ExperienceEntry> {
    let section = find_section(text, EXPERIENCE_HEADERS);
    let entries: Vec<ExperienceEntry> = split_entries(&section)
        .iter()
        .filter_map(|lines| parse_entry(lines))
        .collect();

    if entries.is_empty() {
        vec![ExperienceEntry::placeholder()]
    } else {
        entries
    }
}

fn split_entries(section: &str) -> Vec<Vec<&str>> {
    let mut entries: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content_lines(section) {
        if !current.is_empty() && is_position_start(line) {
            entries.push(std::mem::take(&mut current));
        }
        current.push(line);
    }
    if !current.is_empty() {
        entries.push(current);
    }
    entries
}

/// A position line starts with a capital, is not a bullet or a sentence, and is either
/// short or carries one of the title/company separators.
fn is_position_start(line: &str) -> bool {
    if is_bullet(line) || is_page_footer(line) || line.ends_with('.') {
        return false;
    }
    if !line.starts_with(|c: char| c.is_uppercase()) {
        return false;
    }

    let mut without_dates = line.to_string();
    DATE_RANGES.take_first(&mut without_dates);
    if without_dates.is_empty() {
        return false;
    }

    let words = without_dates.split_whitespace().count();
    let has_separator = COMPANY_SEPARATORS.iter().any(|s| without_dates.contains(s));
    (has_separator && words <= MAX_POSITION_WORDS) || words <= MAX_BARE_POSITION_WORDS
}

fn parse_entry(lines: &[&str]) -> Option<ExperienceEntry> {
    let (first, rest) = lines.split_first()?;
    let mut entry = ExperienceEntry::default();

    let original = collapse_whitespace(strip_bullet(first));
    let mut title = original.clone();
    if let Some(dates) = DATE_RANGES.take_first(&mut title) {
        entry.dates = dates;
    }
    let title = title
        .trim_end_matches(|c: char| matches!(c, ',' | '|' | '-' | '–') || c.is_whitespace())
        .to_string();
    if title.is_empty() {
        // A date-only first line still heads the entry; it just names no company.
        entry.title = if original.is_empty() {
            first.trim().to_string()
        } else {
            original
        };
    } else {
        entry.company = company_of(&title);
        entry.title = title;
    }

    for raw in rest {
        if is_page_footer(raw) {
            continue;
        }
        let mut line = collapse_whitespace(strip_bullet(raw));
        if entry.dates.is_empty() {
            if let Some(dates) = DATE_RANGES.take_first(&mut line) {
                entry.dates = dates;
            }
        }
        if !line.is_empty() {
            entry.description.push(line);
        }
    }

    Some(entry)
}

/// Trailing segment after the first separator, in `COMPANY_SEPARATORS` order.
pub fn company_of(title_line: &str) -> String {
    COMPANY_SEPARATORS
        .iter()
        .find_map(|sep| title_line.split_once(sep))
        .map(|(_, company)| company.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::EXPERIENCE_NOT_FOUND;

    #[test]
    fn test_company_separator_priority() {
        assert_eq!(company_of("Software Engineer at Acme, Inc"), "Acme, Inc");
        assert_eq!(company_of("Acme Corp, Backend Engineer"), "Backend Engineer");
        assert_eq!(company_of("Data Analyst - Globex"), "Globex");
        assert_eq!(company_of("Intern | Initech"), "Initech");
        assert_eq!(company_of("Freelancer"), "");
    }

    #[test]
    fn test_entries_split_and_bullets_stripped() {
        let text = "EXPERIENCE\n\
                    Software Engineer at Acme\n\
                    Jan 2021 - Present\n\
                    • Built the billing service\n\
                    → Cut latency by 40%\n\
                    Page 2\n\
                    Intern - Globex\n\
                    - Wrote tests.\n\
                    SKILLS\n\
                    Rust";
        let entries = extract_experience(text);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].title, "Software Engineer at Acme");
        assert_eq!(entries[0].company, "Acme");
        assert_eq!(entries[0].dates, "Jan 2021 - Present");
        assert_eq!(
            entries[0].description,
            vec!["Built the billing service".to_string(), "Cut latency by 40%".to_string()]
        );

        assert_eq!(entries[1].title, "Intern - Globex");
        assert_eq!(entries[1].company, "Globex");
        assert_eq!(entries[1].description, vec!["Wrote tests.".to_string()]);
    }

    #[test]
    fn test_dates_cut_from_title_line() {
        let text = "WORK HISTORY\nBackend Developer | Initech Mar 2019 – Dec 2020\n- Maintained APIs";
        let entries = extract_experience(text);
        assert_eq!(entries[0].title, "Backend Developer | Initech");
        assert_eq!(entries[0].company, "Initech");
        assert_eq!(entries[0].dates, "Mar 2019 – Dec 2020");
    }

    #[test]
    fn test_sentence_lines_stay_in_description() {
        let text = "EXPERIENCE\nTeaching Assistant\nGraded assignments for two hundred students each term.";
        let entries = extract_experience(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].company, "");
        assert_eq!(entries[0].description.len(), 1);
    }

    #[test]
    fn test_date_only_first_line_keeps_entry() {
        let text = "EXPERIENCE\n2019 - 2021\n• Built the billing service\n• Led migrations";
        let entries = extract_experience(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "2019 - 2021");
        assert_eq!(entries[0].dates, "2019 - 2021");
        assert_eq!(entries[0].company, "");
        assert_eq!(
            entries[0].description,
            vec!["Built the billing service".to_string(), "Led migrations".to_string()]
        );
    }

    #[test]
    fn test_missing_section_yields_placeholder() {
        let entries = extract_experience("Jane Doe\nEDUCATION\nMIT University");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, EXPERIENCE_NOT_FOUND);
        assert!(entries[0].description.is_empty());
    }
}
