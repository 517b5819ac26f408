//! Turns raw tagged lines into `Line` records.
//!
//! A tagged line looks like `01001001a dharmakSetre`: two digits of book,
//! three of section, three of verse, an optional pada letter, one space,
//! then the text. Lines starting with `%` are comments.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ParseError;
use crate::types::Line;

pub const COMMENT_MARKER: char = '%';

lazy_static! {
    // Captures: (1) book, (2) section, (3) verse, (4) pada, (5) text
    static ref RE_TAGGED_LINE: Regex =
        Regex::new(r"^([0-9]{2})([0-9]{3})([0-9]{3})([a-zA-Z]?) (.*)$").unwrap();

    // Line boundaries, CRLF taken as one
    static ref RE_LINE_BREAK: Regex =
        Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C\x1D\x1E\x{85}\x{2028}\x{2029}]").unwrap();
}

pub fn is_comment(raw: &str) -> bool {
    raw.starts_with(COMMENT_MARKER)
}

/// Strip `;` and escape `&`. Stripping first, so the entity's `;` survives.
pub fn clean_text(text: &str) -> String {
    text.replace(';', "").replace('&', "&amp;")
}

/// Tag one raw line.
///
/// Returns `Ok(None)` for comment lines. `line_number` is only used for the error.
pub fn tag_line(raw: &str, line_number: usize) -> Result<Option<Line>, ParseError> {
    if is_comment(raw) {
        return Ok(None);
    }

    let caps = RE_TAGGED_LINE.captures(raw).ok_or_else(|| ParseError::TagGrammar {
        line_number,
        line: raw.to_string(),
    })?;

    // ASCII digits of bounded width
    let number = |idx: usize| -> Result<u32, ParseError> {
        caps[idx].parse::<u32>().map_err(|_| ParseError::TagGrammar {
            line_number,
            line: raw.to_string(),
        })
    };

    Ok(Some(Line {
        book: number(1)?,
        section: number(2)?,
        verse: number(3)?,
        pada: caps[4].to_string(),
        text: clean_text(&caps[5]),
    }))
}

/// Split raw text into lines at any line boundary. A trailing boundary does
/// not produce an empty last line.
pub fn split_lines(raw: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = RE_LINE_BREAK.split(raw).collect();
    if parts.last() == Some(&"") {
        parts.pop();
    }
    parts
}

/// Tag every line of one book's raw text, stopping at the first malformed line.
pub fn tag_lines(raw: &str) -> Result<Vec<Line>, ParseError> {
    let mut lines = Vec::new();
    for (idx, raw_line) in split_lines(raw).into_iter().enumerate() {
        if let Some(line) = tag_line(raw_line, idx + 1)? {
            lines.push(line);
        }
    }
    Ok(lines)
}
