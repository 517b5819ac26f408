//! Records for the book → section → verse → line hierarchy.
//!
//! Every record is built once by its grouping stage and only read afterwards.

use serde::{Deserialize, Serialize};

/// One tagged half-line of the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub book: u32,
    pub section: u32,
    pub verse: u32,
    /// Half-line marker, a single letter or empty.
    pub pada: String,
    /// Cleaned text: `;` removed, `&` escaped as `&amp;`.
    pub text: String,
}

impl Line {
    pub fn verse_key(&self) -> (u32, u32, u32) {
        (self.book, self.section, self.verse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub book: u32,
    pub section: u32,
    pub verse: u32,
    /// Half-lines in input order, never empty.
    pub lines: Vec<Line>,
}

impl Verse {
    pub fn section_key(&self) -> (u32, u32) {
        (self.book, self.section)
    }

    /// Dotted reference, e.g. `1.1.1`
    pub fn reference(&self) -> String {
        format!("{}.{}.{}", self.book, self.section, self.verse)
    }
}

/// Verse numbers of the first and last verse of a section, in encounter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRange {
    pub first: u32,
    pub last: u32,
}

impl std::fmt::Display for VerseRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub book: u32,
    pub section: u32,
    pub verse_range: VerseRange,
    /// Verses in input order, never empty.
    pub verses: Vec<Verse>,
}

impl Section {
    /// Dotted reference, e.g. `1.1`
    pub fn reference(&self) -> String {
        format!("{}.{}", self.book, self.section)
    }

    pub fn line_count(&self) -> usize {
        self.verses.iter().map(|v| v.lines.len()).sum()
    }
}

/// A top-level division of the work (kanda / parvan).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub n: u32,
    pub sections: Vec<Section>,
}

impl Book {
    pub fn verse_count(&self) -> usize {
        self.sections.iter().map(|s| s.verses.len()).sum()
    }
}
