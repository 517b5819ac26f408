//! Consistency check of a converted output directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::output::{parse_section_file_name, read_section_xml, CorpusMetadata, METADATA_FILE_NAME};

#[derive(Debug, Default)]
pub struct VerifyReport {
    pub books: usize,
    pub sections_checked: usize,
    /// One message per section document that is missing or disagrees with the metadata.
    pub problems: Vec<String>,
    /// Section documents present on disk but not listed in the metadata.
    pub unlisted: Vec<String>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Read the metadata document and every section document it addresses.
pub fn verify_output_dir(dir: &Path) -> Result<VerifyReport> {
    let metadata_path = dir.join(METADATA_FILE_NAME);
    let json = fs::read_to_string(&metadata_path)
        .with_context(|| format!("Failed to read {}", metadata_path.display()))?;
    let metadata = CorpusMetadata::from_json(&json)
        .with_context(|| format!("Failed to parse {}", metadata_path.display()))?;

    let mut report = VerifyReport {
        books: metadata.books.len(),
        ..Default::default()
    };

    let mut listed: BTreeSet<String> = BTreeSet::new();

    for book in &metadata.books {
        if book.section_count != book.sections.len() {
            report.problems.push(format!(
                "book {}: section_count is {} but {} sections are listed",
                book.n,
                book.section_count,
                book.sections.len()
            ));
        }

        for entry in &book.sections {
            listed.insert(entry.key.clone());
            report.sections_checked += 1;

            if parse_section_file_name(&entry.key) != Some((book.n, entry.n)) {
                report.problems.push(format!("{}: key does not address section {}.{}", entry.key, book.n, entry.n));
                continue;
            }

            let xml = match fs::read_to_string(dir.join(&entry.key)) {
                Ok(xml) => xml,
                Err(e) => {
                    report.problems.push(format!("{}: {}", entry.key, e));
                    continue;
                }
            };

            match read_section_xml(&xml) {
                Ok(section) => {
                    if (section.book, section.section) != (book.n, entry.n) {
                        report.problems.push(format!(
                            "{}: document holds section {}",
                            entry.key,
                            section.reference()
                        ));
                    } else if section.verses.len() != entry.verse_count || section.verse_range != entry.verses {
                        report.problems.push(format!(
                            "{}: {} verses ({}), metadata says {} ({})",
                            entry.key,
                            section.verses.len(),
                            section.verse_range,
                            entry.verse_count,
                            entry.verses
                        ));
                    }
                }
                Err(e) => report.problems.push(format!("{}: {}", entry.key, e)),
            }
        }
    }

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).into_iter().filter_map(|e| e.ok()) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().is_file() && parse_section_file_name(&name).is_some() && !listed.contains(&name) {
            report.unlisted.push(name);
        }
    }
    report.unlisted.sort();

    Ok(report)
}
