use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

pub const DEFAULT_BOOK_COUNT: u32 = 18;
pub const DEFAULT_FETCH_TEMPLATE: &str = "https://bombay.indology.info/mahabharata/text/UD/MBh{n}.txt";
pub const DEFAULT_OUTPUT_ROOT: &str = "texts/mahabharata";
pub const DEFAULT_TITLE: &str = "mahAbhAratam";
pub const DEFAULT_SLUG: &str = "mahabharata";

/// Placeholder in fetch and file templates, replaced by the book identifier.
pub const BOOK_ID_PLACEHOLDER: &str = "{n}";

/// Settings for one corpus run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusConfig {
    /// Books are requested as 1..=book_count.
    pub book_count: u32,
    pub fetch_template: String,
    pub output_root: PathBuf,
    /// Where downloaded raw texts are kept between runs.
    pub cache_dir: Option<PathBuf>,
    pub title: String,
    pub slug: String,
    pub show_progress: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        CorpusConfig {
            book_count: DEFAULT_BOOK_COUNT,
            fetch_template: DEFAULT_FETCH_TEMPLATE.to_string(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            cache_dir: None,
            title: DEFAULT_TITLE.to_string(),
            slug: DEFAULT_SLUG.to_string(),
            show_progress: false,
        }
    }
}

impl CorpusConfig {
    /// Defaults overridden by `KANDA_BOOK_COUNT`, `KANDA_FETCH_TEMPLATE`,
    /// `KANDA_OUTPUT_DIR` and `KANDA_CACHE_DIR`.
    pub fn from_env() -> Result<Self> {
        let mut config = CorpusConfig::default();

        if let Some(s) = non_empty_var("KANDA_BOOK_COUNT") {
            config.book_count = s
                .parse()
                .map_err(|_| anyhow!("Invalid KANDA_BOOK_COUNT: '{}'", s))?;
        }
        if let Some(s) = non_empty_var("KANDA_FETCH_TEMPLATE") {
            config.fetch_template = s;
        }
        if let Some(s) = non_empty_var("KANDA_OUTPUT_DIR") {
            config.output_root = PathBuf::from(s);
        }
        config.cache_dir = non_empty_var("KANDA_CACHE_DIR").map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Identifiers are two digits wide.
        if self.book_count == 0 || self.book_count > 99 {
            return Err(anyhow!("book_count must be between 1 and 99, got {}", self.book_count));
        }
        if !self.fetch_template.contains(BOOK_ID_PLACEHOLDER) {
            return Err(anyhow!(
                "fetch_template must contain {}: '{}'",
                BOOK_ID_PLACEHOLDER,
                self.fetch_template
            ));
        }
        Ok(())
    }

    /// Book identifiers in processing order: "01", "02", ...
    pub fn book_ids(&self) -> Vec<String> {
        (1..=self.book_count).map(book_identifier).collect()
    }
}

/// 1 → "01"
pub fn book_identifier(n: u32) -> String {
    format!("{:02}", n)
}

/// Replace `{n}` in a template with the book identifier.
pub fn fill_template(template: &str, book_id: &str) -> String {
    template.replace(BOOK_ID_PLACEHOLDER, book_id)
}

fn non_empty_var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in ["KANDA_BOOK_COUNT", "KANDA_FETCH_TEMPLATE", "KANDA_OUTPUT_DIR", "KANDA_CACHE_DIR"] {
            unsafe { env::remove_var(key); }
        }
    }

    #[test]
    fn test_book_identifier() {
        assert_eq!(book_identifier(1), "01");
        assert_eq!(book_identifier(18), "18");
        let ids = CorpusConfig::default().book_ids();
        assert_eq!(ids.len(), 18);
        assert_eq!(ids.first().unwrap(), "01");
        assert_eq!(ids.last().unwrap(), "18");
    }

    #[test]
    fn test_fill_template() {
        assert_eq!(
            fill_template(DEFAULT_FETCH_TEMPLATE, "05"),
            "https://bombay.indology.info/mahabharata/text/UD/MBh05.txt"
        );
    }

    #[test]
    fn test_validate() {
        assert!(CorpusConfig::default().validate().is_ok());

        let config = CorpusConfig { book_count: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = CorpusConfig { fetch_template: "http://x/MBh.txt".to_string(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        assert_eq!(CorpusConfig::from_env().unwrap(), CorpusConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        unsafe {
            env::set_var("KANDA_BOOK_COUNT", "2");
            env::set_var("KANDA_OUTPUT_DIR", "/tmp/kanda-out");
            env::set_var("KANDA_CACHE_DIR", "/tmp/kanda-cache");
        }
        let config = CorpusConfig::from_env().unwrap();
        assert_eq!(config.book_count, 2);
        assert_eq!(config.output_root, PathBuf::from("/tmp/kanda-out"));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/kanda-cache")));

        unsafe { env::set_var("KANDA_BOOK_COUNT", "many"); }
        assert!(CorpusConfig::from_env().is_err());
        clear_env();
    }
}
