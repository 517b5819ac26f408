use std::collections::HashSet;

use crate::error::ParseError;
use crate::types::{Book, Section};

/// Wrap one book's sections into a `Book`, taking `n` from the first section.
///
/// Every section must carry the same book number, and each section number
/// may appear only once, since it addresses one output document.
pub fn assemble_book(sections: Vec<Section>) -> Result<Book, ParseError> {
    let n = sections.first().map(|s| s.book).ok_or(ParseError::EmptySection)?;

    if let Some(stray) = sections.iter().find(|s| s.book != n) {
        return Err(ParseError::MixedBook {
            expected: n,
            found: stray.book,
            section: stray.section,
        });
    }

    let mut seen: HashSet<u32> = HashSet::new();
    if let Some(repeated) = sections.iter().find(|s| !seen.insert(s.section)) {
        return Err(ParseError::DuplicateSection {
            book: n,
            section: repeated.section,
        });
    }

    Ok(Book { n, sections })
}
