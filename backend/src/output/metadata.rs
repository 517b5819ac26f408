use serde::{Deserialize, Serialize};

use crate::output::section_file_name;
use crate::types::{Book, VerseRange};

/// Summary of the whole work, written once after every book is converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusMetadata {
    pub title: String,
    pub slug: String,
    pub books: Vec<BookEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    pub n: u32,
    pub section_count: usize,
    pub sections: Vec<SectionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub n: u32,
    /// File name of the section document, e.g. `1.1.xml`
    pub key: String,
    pub verses: VerseRange,
    pub verse_count: usize,
}

impl CorpusMetadata {
    /// Books are listed in the order given, which is the processing order.
    pub fn from_books(title: &str, slug: &str, books: &[Book]) -> Self {
        let books = books
            .iter()
            .map(|book| BookEntry {
                n: book.n,
                section_count: book.sections.len(),
                sections: book
                    .sections
                    .iter()
                    .map(|s| SectionEntry {
                        n: s.section,
                        key: section_file_name(s.book, s.section),
                        verses: s.verse_range,
                        verse_count: s.verses.len(),
                    })
                    .collect(),
            })
            .collect();

        CorpusMetadata {
            title: title.to_string(),
            slug: slug.to_string(),
            books,
        }
    }

    pub fn section_count(&self) -> usize {
        self.books.iter().map(|b| b.section_count).sum()
    }

    /// (book, section, key) for every section document the metadata addresses.
    pub fn section_keys(&self) -> impl Iterator<Item = (u32, u32, &str)> + '_ {
        self.books
            .iter()
            .flat_map(|b| b.sections.iter().map(move |s| (b.n, s.n, s.key.as_str())))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Section;

    fn book(n: u32, section_count: u32) -> Book {
        Book {
            n,
            sections: (1..=section_count)
                .map(|s| Section {
                    book: n,
                    section: s,
                    verse_range: VerseRange { first: 1, last: 4 },
                    verses: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn test_from_books_counts_sections() {
        let meta = CorpusMetadata::from_books("mahAbhAratam", "mahabharata", &[book(1, 3), book(2, 5)]);
        assert_eq!(meta.books.len(), 2);
        assert_eq!(meta.books[0].n, 1);
        assert_eq!(meta.books[0].section_count, 3);
        assert_eq!(meta.books[1].n, 2);
        assert_eq!(meta.books[1].section_count, 5);
        assert_eq!(meta.section_count(), 8);
        assert_eq!(meta.books[1].sections[4].key, "2.5.xml");
    }

    #[test]
    fn test_json_shape() {
        let meta = CorpusMetadata::from_books("t", "s", &[book(1, 1)]);
        let value: serde_json::Value = serde_json::from_str(&meta.to_json().unwrap()).unwrap();
        assert_eq!(value["title"], "t");
        assert_eq!(value["slug"], "s");
        assert_eq!(value["books"][0]["section_count"], 1);
        assert_eq!(value["books"][0]["sections"][0]["key"], "1.1.xml");
        assert_eq!(value["books"][0]["sections"][0]["verses"]["last"], 4);
        assert_eq!(CorpusMetadata::from_json(&meta.to_json().unwrap()).unwrap(), meta);
    }

    #[test]
    fn test_section_keys() {
        let meta = CorpusMetadata::from_books("t", "s", &[book(1, 2), book(2, 1)]);
        let keys: Vec<(u32, u32, &str)> = meta.section_keys().collect();
        assert_eq!(keys, vec![(1, 1, "1.1.xml"), (1, 2, "1.2.xml"), (2, 1, "2.1.xml")]);
    }
}
