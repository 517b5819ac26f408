//! Writing section documents and the corpus metadata.

pub mod section_xml;
pub mod metadata;
pub mod verify;

pub use section_xml::{section_to_xml, read_section_xml, SectionReadError};
pub use metadata::{CorpusMetadata, BookEntry, SectionEntry};
pub use verify::{verify_output_dir, VerifyReport};

use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::PersistError;
use crate::types::Section;

pub const METADATA_FILE_NAME: &str = "index.json";

/// 1, 12 → `1.12.xml`
pub fn section_file_name(book: u32, section: u32) -> String {
    format!("{}.{}.xml", book, section)
}

/// `1.12.xml` → (1, 12)
pub fn parse_section_file_name(name: &str) -> Option<(u32, u32)> {
    lazy_static! {
        static ref RE_SECTION_FILE: Regex = Regex::new(r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.xml$").unwrap();
    }
    let caps = RE_SECTION_FILE.captures(name)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// Destination for converted documents.
pub trait CorpusSink {
    fn persist_section(&mut self, section: &Section, key: &str) -> Result<(), PersistError>;

    fn persist_metadata(&mut self, metadata: &CorpusMetadata, key: &str) -> Result<(), PersistError>;
}

/// Writes every document as a file under `output_root`.
pub struct XmlDirSink {
    output_root: PathBuf,
}

impl XmlDirSink {
    pub fn new(output_root: PathBuf) -> Self {
        Self { output_root }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.output_root.join(key)
    }

    fn write(&self, key: &str, content: &str) -> Result<(), PersistError> {
        if !self.output_root.exists() {
            fs::create_dir_all(&self.output_root).map_err(|source| PersistError::Io {
                path: self.output_root.clone(),
                source,
            })?;
        }

        let path = self.path_for(key);
        fs::write(&path, content).map_err(|source| PersistError::Io { path, source })
    }
}

impl CorpusSink for XmlDirSink {
    fn persist_section(&mut self, section: &Section, key: &str) -> Result<(), PersistError> {
        let xml = section_to_xml(section)?;
        self.write(key, &xml)
    }

    fn persist_metadata(&mut self, metadata: &CorpusMetadata, key: &str) -> Result<(), PersistError> {
        let json = metadata.to_json()?;
        self.write(key, &json)
    }
}
