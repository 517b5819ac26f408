//! Suppliers of raw book text.
//!
//! A source is asked for one book at a time by its two-digit identifier.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::fill_template;
use crate::error::FetchError;
use crate::logger;

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// File name template of the raw book texts, as published.
pub const DEFAULT_FILE_TEMPLATE: &str = "MBh{n}.txt";

pub trait TextSource {
    fn fetch(&mut self, book_id: &str) -> Result<String, FetchError>;
}

/// Downloads raw texts over HTTP, optionally keeping a copy in `cache_dir`.
pub struct HttpTextSource {
    fetch_template: String,
    cache_dir: Option<PathBuf>,
    client: Option<reqwest::blocking::Client>,
}

impl HttpTextSource {
    pub fn new(fetch_template: &str, cache_dir: Option<PathBuf>) -> Self {
        Self {
            fetch_template: fetch_template.to_string(),
            cache_dir,
            client: None,
        }
    }

    pub fn url_for(&self, book_id: &str) -> String {
        fill_template(&self.fetch_template, book_id)
    }

    /// Cache file for a book, named after the last path segment of its URL.
    pub fn cache_path_for(&self, book_id: &str) -> Option<PathBuf> {
        let dir = self.cache_dir.as_ref()?;
        let url = self.url_for(book_id);
        let file_name = url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fill_template(DEFAULT_FILE_TEMPLATE, book_id));
        Some(dir.join(file_name))
    }

    fn client(&mut self, url: &str) -> Result<reqwest::blocking::Client, FetchError> {
        if let Some(ref client) = self.client {
            return Ok(client.clone());
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|source| FetchError::Http { url: url.to_string(), source })?;
        self.client = Some(client.clone());
        Ok(client)
    }

    fn download(&mut self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client(url)?
            .get(url)
            .send()
            .map_err(|source| FetchError::Http { url: url.to_string(), source })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .text()
            .map_err(|source| FetchError::Http { url: url.to_string(), source })
    }
}

impl TextSource for HttpTextSource {
    fn fetch(&mut self, book_id: &str) -> Result<String, FetchError> {
        let cache_path = self.cache_path_for(book_id);

        if let Some(ref path) = cache_path {
            if path.is_file() {
                logger::debug(&format!("Reading cached text: {}", path.display()));
                return read_text(path);
            }
        }

        let url = self.url_for(book_id);
        logger::info(&format!("Fetching {}", url));
        let text = self.download(&url)?;

        if let Some(path) = cache_path {
            // A failed cache write does not fail the fetch.
            if let Err(e) = write_cache(&path, &text) {
                logger::warn(&format!("Failed to cache {}: {}", path.display(), e));
            }
        }

        Ok(text)
    }
}

/// Reads raw texts from a local directory.
pub struct LocalTextSource {
    dir: PathBuf,
    file_template: String,
}

impl LocalTextSource {
    pub fn new(dir: PathBuf) -> Self {
        Self::with_file_template(dir, DEFAULT_FILE_TEMPLATE)
    }

    pub fn with_file_template(dir: PathBuf, file_template: &str) -> Self {
        Self {
            dir,
            file_template: file_template.to_string(),
        }
    }

    pub fn path_for(&self, book_id: &str) -> PathBuf {
        self.dir.join(fill_template(&self.file_template, book_id))
    }
}

impl TextSource for LocalTextSource {
    fn fetch(&mut self, book_id: &str) -> Result<String, FetchError> {
        let path = self.path_for(book_id);
        logger::info(&format!("Reading {}", path.display()));
        read_text(&path)
    }
}

pub fn read_text(path: &Path) -> Result<String, FetchError> {
    fs::read_to_string(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_cache(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}
