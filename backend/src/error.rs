//! Error types for parsing, fetching, persisting and the corpus run.

use std::path::PathBuf;

use thiserror::Error;

/// Structural failures while turning one book's raw text into a `Book`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A non-comment line does not match the tag grammar.
    #[error("line {line_number} does not match the tag grammar: {line:?}")]
    TagGrammar { line_number: usize, line: String },

    /// The book's raw text produced no sections.
    #[error("no sections found, cannot derive the book number")]
    EmptySection,

    /// A section's book number differs from the first section's.
    #[error("section {section} belongs to book {found}, expected book {expected}")]
    MixedBook { expected: u32, found: u32, section: u32 },

    /// A section number appears in two separate runs of the same book.
    #[error("section {book}.{section} is interrupted by another section and resumes later")]
    DuplicateSection { book: u32, section: u32 },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize XML: {0}")]
    Xml(String),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// First failure of a corpus run. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to fetch book {book_id}: {source}")]
    Fetch {
        book_id: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to parse book {book_id}: {source}")]
    Parse {
        book_id: String,
        #[source]
        source: ParseError,
    },

    #[error("book {book_id} was requested but the text is tagged as book {found}")]
    BookMismatch { book_id: String, found: u32 },

    #[error("failed to persist {key}: {source}")]
    Persist {
        key: String,
        #[source]
        source: PersistError,
    },
}
