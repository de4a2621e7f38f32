use std::sync::Arc;

use crate::config::Config;
use crate::extraction::entity::{EntityRecognizer, EntityResolver};
use crate::extraction::ResumeParser;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable name recognizer. Default: GazetteerRecognizer. Swap via NER_BACKEND env.
    pub recognizer: Arc<dyn EntityRecognizer>,
    pub parser: ResumeParser,
}

impl AppState {
    pub fn new(config: Config, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        let parser = ResumeParser::new(EntityResolver::new(recognizer.clone()));
        AppState {
            config,
            recognizer,
            parser,
        }
    }
}
