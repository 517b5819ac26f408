#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use kanda_backend::error::{FetchError, PersistError};
use kanda_backend::output::{CorpusMetadata, CorpusSink};
use kanda_backend::sources::TextSource;
use kanda_backend::types::Section;

/// Serves raw texts from memory, counting requests.
#[derive(Default)]
pub struct MemorySource {
    pub texts: HashMap<String, String>,
    pub requested: Vec<String>,
}

impl MemorySource {
    pub fn with(texts: &[(&str, String)]) -> Self {
        MemorySource {
            texts: texts.iter().map(|(id, t)| (id.to_string(), t.clone())).collect(),
            requested: Vec::new(),
        }
    }
}

impl TextSource for MemorySource {
    fn fetch(&mut self, book_id: &str) -> Result<String, FetchError> {
        self.requested.push(book_id.to_string());
        self.texts.get(book_id).cloned().ok_or_else(|| FetchError::Io {
            path: PathBuf::from(format!("memory/{}", book_id)),
            source: io::Error::new(io::ErrorKind::NotFound, "no such book"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Written {
    Section(String),
    Metadata(String),
}

/// Records what was persisted, optionally failing on one key.
#[derive(Default)]
pub struct RecordingSink {
    pub written: Vec<Written>,
    pub sections: Vec<Section>,
    pub metadata: Option<CorpusMetadata>,
    pub fail_on: Option<String>,
}

impl RecordingSink {
    fn check(&self, key: &str) -> Result<(), PersistError> {
        if self.fail_on.as_deref() == Some(key) {
            return Err(PersistError::Io {
                path: PathBuf::from(key),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        Ok(())
    }
}

impl CorpusSink for RecordingSink {
    fn persist_section(&mut self, section: &Section, key: &str) -> Result<(), PersistError> {
        self.check(key)?;
        self.written.push(Written::Section(key.to_string()));
        self.sections.push(section.clone());
        Ok(())
    }

    fn persist_metadata(&mut self, metadata: &CorpusMetadata, key: &str) -> Result<(), PersistError> {
        self.check(key)?;
        self.written.push(Written::Metadata(key.to_string()));
        self.metadata = Some(metadata.clone());
        Ok(())
    }
}

/// Raw text for book `n` with `sections` sections of two verses each.
pub fn raw_book(n: u32, sections: u32) -> String {
    let mut raw = format!("% MBh{:02}\n", n);
    for s in 1..=sections {
        for v in 1..=2 {
            raw.push_str(&format!("{:02}{:03}{:03}a pada a;\n", n, s, v));
            raw.push_str(&format!("{:02}{:03}{:03}c pada c\n", n, s, v));
        }
    }
    raw
}
