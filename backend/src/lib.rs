pub mod types;
pub mod error;
pub mod logger;
pub mod config;
pub mod verse_text;
pub mod output;
pub mod sources;
pub mod corpus;

pub use types::{Line, Verse, Section, Book, VerseRange};
pub use error::{ParseError, FetchError, PersistError, CorpusError};
pub use config::CorpusConfig;
pub use corpus::CorpusDriver;
pub use verse_text::parse_book;
