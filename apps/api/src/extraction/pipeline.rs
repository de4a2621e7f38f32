//! Aggregator — runs every extractor over one document and assembles the record.
//!
//! `ResumeParser` holds only the configured entity resolver; each call owns its text
//! and every entity derived from it, so one parser can serve concurrent requests.

use tracing::{info, warn};

use crate::extraction::certifications::extract_certifications;
use crate::extraction::contact::extract_contact;
use crate::extraction::education::extract_education;
use crate::extraction::entity::EntityResolver;
use crate::extraction::experience::extract_experience;
use crate::extraction::skills::extract_skills;
use crate::extraction::text::{extract_text, DocumentFormat};
use crate::models::resume::{ParsedResume, CERTIFICATIONS_NOT_FOUND, INTERNSHIPS_NOT_FOUND};

/// A parsed record plus the user-facing messages produced along the way.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub record: ParsedResume,
    pub warnings: Vec<String>,
}

#[derive(Clone)]
pub struct ResumeParser {
    resolver: EntityResolver,
}

impl ResumeParser {
    pub fn new(resolver: EntityResolver) -> Self {
        ResumeParser { resolver }
    }

    /// Decodes and parses a document. Never fails: undecodable input yields a record made
    /// entirely of sentinels, with the decoding error in `warnings`.
    pub fn parse_document(&self, bytes: &[u8], format: DocumentFormat) -> ParseOutcome {
        let extracted = extract_text(bytes, format);
        let mut warnings = Vec::new();
        if let Some(message) = extracted.error {
            warn!(?format, bytes = bytes.len(), "continuing with empty text");
            warnings.push(message);
        }

        let record = self.parse_text(&extracted.text);
        info!(
            ?format,
            ner_backend = self.resolver.backend(),
            education = record.education.len(),
            experience = record.experience.len(),
            skill_categories = record.skills.len(),
            "resume parsed"
        );
        ParseOutcome { record, warnings }
    }

    /// Runs the field extractors over already-normalized text.
    pub fn parse_text(&self, text: &str) -> ParsedResume {
        let (certifications, internships) = match extract_certifications(text) {
            Some(record) => (record.certifications, record.internships),
            None => (
                vec![CERTIFICATIONS_NOT_FOUND.to_string()],
                vec![INTERNSHIPS_NOT_FOUND.to_string()],
            ),
        };

        ParsedResume {
            personal_info: extract_contact(text, &self.resolver),
            education: extract_education(text),
            experience: extract_experience(text),
            skills: extract_skills(text),
            certifications,
            internships,
            text: text.to_string(),
        }
    }
}

impl Default for ResumeParser {
    fn default() -> Self {
        ResumeParser::new(EntityResolver::regex_only())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::extraction::entity::GazetteerRecognizer;
    use crate::models::resume::{ContactInfo, EducationEntry, ExperienceEntry};

    const SAMPLE: &str = "PRIYA SHARMA\n\
        priya.sharma@example.com | +91 98765 43210\n\
        https://linkedin.com/in/priyasharma https://github.com/priyas\n\
        \n\
        EDUCATION\n\
        MIT University\n\
        Bachelor of Science\n\
        Sept 2018 - May 2022\n\
        GPA: 3.8\n\
        \n\
        EXPERIENCE\n\
        Software Engineer at Acme\n\
        Jan 2021 - Present\n\
        • Built ingestion pipelines\n\
        \n\
        SKILLS\n\
        Python, Docker, PostgreSQL\n\
        \n\
        CERTIFICATIONS\n\
        • AWS Certified Developer\n\
        INTERNSHIPS\n\
        • Data Intern, Globex\n\
        priya.sharma@example.com\n";

    fn parser() -> ResumeParser {
        ResumeParser::new(EntityResolver::new(Arc::new(GazetteerRecognizer::new())))
    }

    #[test]
    fn test_undecodable_input_yields_sentinels() {
        let outcome = parser().parse_document(b"not a pdf at all", DocumentFormat::Pdf);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].starts_with("Error extracting text"));

        let record = outcome.record;
        assert_eq!(record.personal_info, ContactInfo::default());
        assert_eq!(record.education, vec![EducationEntry::placeholder()]);
        assert_eq!(record.experience, vec![ExperienceEntry::placeholder()]);
        assert!(record.skills.is_empty());
        assert_eq!(record.certifications, vec![CERTIFICATIONS_NOT_FOUND.to_string()]);
        assert_eq!(record.internships, vec![INTERNSHIPS_NOT_FOUND.to_string()]);
        assert_eq!(record.text, "");
    }

    #[test]
    fn test_full_document() {
        let outcome = parser().parse_document(SAMPLE.as_bytes(), DocumentFormat::PlainText);
        assert!(outcome.warnings.is_empty());
        let record = outcome.record;

        let info = &record.personal_info;
        assert_eq!(info.name, "Priya Sharma");
        assert_eq!(info.emails.len(), 1);
        assert_eq!(info.phone, "+91 98765 43210");
        assert_eq!(info.linkedin, "https://linkedin.com/in/priyasharma");
        assert_eq!(info.github, "https://github.com/priyas");

        assert_eq!(record.education.len(), 1);
        assert_eq!(record.education[0].institution, "MIT University");
        assert_eq!(record.education[0].gpa, "GPA: 3.8");

        assert_eq!(record.experience[0].company, "Acme");
        assert_eq!(record.experience[0].dates, "Jan 2021 - Present");

        assert_eq!(record.skills["Programming Languages"], vec!["Python".to_string()]);
        assert_eq!(record.skills["Databases"], vec!["PostgreSQL".to_string()]);

        assert_eq!(record.certifications, vec!["AWS Certified Developer".to_string()]);
        assert_eq!(
            record.internships,
            vec!["Data Intern, Globex".to_string(), "priya.sharma@example.com".to_string()]
        );
        assert!(record.text.starts_with("PRIYA SHARMA"));
    }

    #[test]
    fn test_same_email_three_times_is_one_entry() {
        let text = "Sam Lee\nsam@lee.dev\nContact sam@lee.dev\nFooter: sam@lee.dev";
        let record = ResumeParser::default().parse_text(text);
        assert_eq!(record.personal_info.emails.len(), 1);
        assert!(record.personal_info.emails.contains("sam@lee.dev"));
    }

    #[test]
    fn test_name_and_email_from_minimal_text() {
        let record = ResumeParser::default()
            .parse_text("John Smith\nSoftware Engineer\njohn@example.com");
        assert_eq!(record.personal_info.name, "John Smith");
        assert_eq!(
            record.personal_info.emails.iter().collect::<Vec<_>>(),
            vec!["john@example.com"]
        );
    }

    #[test]
    fn test_no_education_header_gives_placeholder() {
        let record = ResumeParser::default().parse_text("Jane Doe\nSKILLS\nRust");
        assert_eq!(record.education, vec![EducationEntry::placeholder()]);
    }

    #[test]
    fn test_empty_text_is_total() {
        let record = ResumeParser::default().parse_text("");
        assert_eq!(record.personal_info, ContactInfo::default());
        assert_eq!(record.experience, vec![ExperienceEntry::placeholder()]);
    }
}
