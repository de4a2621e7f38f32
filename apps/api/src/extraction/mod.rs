//! Résumé extraction pipeline.
//!
//! bytes → `text` → `sections` → field extractors → `pipeline::ResumeParser` → `ParsedResume`.
//! Everything below `text` is a pure function of the normalized text.

pub mod certifications;
pub mod contact;
pub mod education;
pub mod entity;
pub mod experience;
pub mod handlers;
pub mod lines;
pub mod matcher;
pub mod pipeline;
pub mod sections;
pub mod skills;
pub mod text;

pub use pipeline::ResumeParser;
pub use text::DocumentFormat;
