//! Adjacency grouping of lines into verses and verses into sections.
//!
//! Only consecutive records with the same key are merged. A key that shows up
//! again after a different key starts a new group; runs are never merged
//! across the stream.

use crate::types::{Line, Section, Verse, VerseRange};

/// Split `items` into maximal runs of consecutive items with equal keys.
///
/// Every returned run is non-empty and the runs keep the input order.
pub fn group_adjacent<T, K, F>(items: Vec<T>, key: F) -> Vec<(K, Vec<T>)>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let item_key = key(&item);
        let extends_open = matches!(groups.last(), Some((open_key, _)) if *open_key == item_key);

        if extends_open {
            if let Some((_, run)) = groups.last_mut() {
                run.push(item);
            }
        } else {
            groups.push((item_key, vec![item]));
        }
    }

    groups
}

/// Collapse consecutive lines with the same (book, section, verse) into verses.
pub fn group_verses(lines: Vec<Line>) -> Vec<Verse> {
    group_adjacent(lines, Line::verse_key)
        .into_iter()
        .map(|((book, section, verse), lines)| Verse { book, section, verse, lines })
        .collect()
}

/// Collapse consecutive verses with the same (book, section) into sections.
pub fn group_sections(verses: Vec<Verse>) -> Vec<Section> {
    group_adjacent(verses, Verse::section_key)
        .into_iter()
        .map(|((book, section), verses)| {
            // Runs are never empty.
            let first = verses.first().map(|v| v.verse).unwrap_or_default();
            let last = verses.last().map(|v| v.verse).unwrap_or_default();
            Section {
                book,
                section,
                verse_range: VerseRange { first, last },
                verses,
            }
        })
        .collect()
}
