//! Parser for the tagged verse-line format.
//!
//! Raw text → `Line` → `Verse` → `Section` → `Book`, each stage a pure function.

pub mod line_tagger;
pub mod grouping;
pub mod book_assembler;

pub use line_tagger::{tag_line, tag_lines, clean_text, split_lines};
pub use grouping::{group_adjacent, group_verses, group_sections};
pub use book_assembler::assemble_book;

use crate::error::ParseError;
use crate::types::Book;

/// Parse one book's complete raw text.
pub fn parse_book(raw: &str) -> Result<Book, ParseError> {
    let lines = tag_lines(raw)?;
    let verses = group_verses(lines);
    let sections = group_sections(verses);
    assemble_book(sections)
}
