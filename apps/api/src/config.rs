use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::extraction::entity::NerBackend;

/// Matches the upload cap of the web front end.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Request body cap for uploads, enforced by `DefaultBodyLimit`.
    pub max_upload_bytes: usize,
    pub ner_backend: NerBackend,
    /// Extra given names merged into the gazetteer lexicon.
    pub name_lexicon_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            ner_backend: NerBackend::default(),
            name_lexicon_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        Ok(Config {
            port: match lookup("PORT") {
                Some(v) => v.parse::<u16>().context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes: match lookup("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => defaults.max_upload_bytes,
            },
            ner_backend: match lookup("NER_BACKEND") {
                Some(v) => v.parse::<NerBackend>().map_err(|e| anyhow!(e))?,
                None => defaults.ner_backend,
            },
            name_lexicon_path: lookup("NAME_LEXICON_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.ner_backend, NerBackend::Gazetteer);
        assert!(config.name_lexicon_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("NER_BACKEND", "regex"),
            ("NAME_LEXICON_PATH", "/etc/names.txt"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.ner_backend, NerBackend::Regex);
        assert_eq!(config.name_lexicon_path, Some(PathBuf::from("/etc/names.txt")));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("MAX_UPLOAD_BYTES", "-1")])).is_err());
        let err = Config::from_lookup(lookup_from(&[("NER_BACKEND", "spacy")])).unwrap_err();
        assert!(err.to_string().contains("spacy"));
    }
}
