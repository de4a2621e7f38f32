use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder used by every optional scalar field that could not be located.
pub const NOT_FOUND: &str = "Not found";

pub const EDUCATION_NOT_FOUND: &str = "Education information not found";
pub const EXPERIENCE_NOT_FOUND: &str = "Experience information not found";
pub const CERTIFICATIONS_NOT_FOUND: &str = "Certification information not found";
pub const INTERNSHIPS_NOT_FOUND: &str = "Internship information not found";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    /// Ordered set so serialized output is stable across runs.
    pub emails: BTreeSet<String>,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
}

impl Default for ContactInfo {
    fn default() -> Self {
        ContactInfo {
            name: NOT_FOUND.to_string(),
            emails: BTreeSet::new(),
            phone: NOT_FOUND.to_string(),
            linkedin: NOT_FOUND.to_string(),
            github: NOT_FOUND.to_string(),
            portfolio: NOT_FOUND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub dates: String,
    pub gpa: String,
    pub details: Vec<String>,
}

impl EducationEntry {
    pub fn placeholder() -> Self {
        EducationEntry {
            institution: EDUCATION_NOT_FOUND.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    /// Combined title/company line as written in the document.
    pub title: String,
    pub company: String,
    pub dates: String,
    pub description: Vec<String>,
}

impl ExperienceEntry {
    pub fn placeholder() -> Self {
        ExperienceEntry {
            title: EXPERIENCE_NOT_FOUND.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificationRecord {
    pub certifications: Vec<String>,
    pub internships: Vec<String>,
}

/// Category label → skills, in category priority order. Empty categories never appear.
pub type SkillCategories = IndexMap<String, Vec<String>>;

/// The structured candidate record. Top-level keys are fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub personal_info: ContactInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: SkillCategories,
    pub certifications: Vec<String>,
    pub internships: Vec<String>,
    /// Normalized document text, kept for audit and display.
    pub text: String,
}
