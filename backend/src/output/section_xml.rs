//! Section documents in a TEI-like XML layout.
//!
//! - `<div type="book" n="1">` → book
//! - `<div type="section" n="1.1" verses="1-2">` → section
//! - `<lg n="1.1.1">` → verse
//! - `<l n="a">` → half-line, `n` omitted when the line has no pada
//!
//! The tagger already escaped `&` in line text, so only `<` and `>` are
//! escaped when writing, and only those two are unescaped when reading.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

use crate::error::PersistError;
use crate::types::{Line, Section, Verse, VerseRange};

/// `<` and `>` to entities. `&` is left alone, the text already carries `&amp;`.
fn escape_markup(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn unescape_markup(text: &str) -> String {
    text.replace("&lt;", "<").replace("&gt;", ">")
}

fn xml_err<E: std::fmt::Display>(e: E) -> PersistError {
    PersistError::Xml(e.to_string())
}

/// Render one section document.
pub fn section_to_xml(section: &Section) -> Result<String, PersistError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    let book_n = section.book.to_string();
    writer
        .write_event(Event::Start(
            BytesStart::new("div").with_attributes([("type", "book"), ("n", book_n.as_str())]),
        ))
        .map_err(xml_err)?;

    let section_n = section.reference();
    let verses = section.verse_range.to_string();
    writer
        .write_event(Event::Start(BytesStart::new("div").with_attributes([
            ("type", "section"),
            ("n", section_n.as_str()),
            ("verses", verses.as_str()),
        ])))
        .map_err(xml_err)?;

    for verse in &section.verses {
        let verse_n = verse.reference();
        writer
            .write_event(Event::Start(
                BytesStart::new("lg").with_attributes([("n", verse_n.as_str())]),
            ))
            .map_err(xml_err)?;

        for line in &verse.lines {
            let mut l = BytesStart::new("l");
            if !line.pada.is_empty() {
                l.push_attribute(("n", line.pada.as_str()));
            }
            writer.write_event(Event::Start(l)).map_err(xml_err)?;
            // Written even when empty, it keeps </l> on the same line.
            writer
                .write_event(Event::Text(BytesText::from_escaped(escape_markup(&line.text))))
                .map_err(xml_err)?;
            writer.write_event(Event::End(BytesEnd::new("l"))).map_err(xml_err)?;
        }

        writer.write_event(Event::End(BytesEnd::new("lg"))).map_err(xml_err)?;
    }

    writer.write_event(Event::End(BytesEnd::new("div"))).map_err(xml_err)?;
    writer.write_event(Event::End(BytesEnd::new("div"))).map_err(xml_err)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(xml_err)?;
    xml.push('\n');
    Ok(xml)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SectionReadError {
    #[error("XML parse error at position {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("missing or invalid attribute '{attr}' on <{element}>")]
    Attribute { element: String, attr: String },

    #[error("unexpected <{element}> at this level")]
    Unexpected { element: String },

    #[error("document contains no section")]
    NoSection,
}

fn attribute(e: &BytesStart, attr: &str) -> Result<Option<String>, SectionReadError> {
    for a in e.attributes() {
        let a = a.map_err(|_| SectionReadError::Attribute {
            element: element_name(e),
            attr: attr.to_string(),
        })?;
        if a.key.as_ref() == attr.as_bytes() {
            return Ok(Some(String::from_utf8_lossy(&a.value).into_owned()));
        }
    }
    Ok(None)
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Dotted numbers of an attribute, e.g. `1.1.7` → `[1, 1, 7]`
fn dotted_numbers(e: &BytesStart, attr: &str, parts: usize) -> Result<Vec<u32>, SectionReadError> {
    let invalid = || SectionReadError::Attribute {
        element: element_name(e),
        attr: attr.to_string(),
    };
    let value = attribute(e, attr)?.ok_or_else(invalid)?;
    let numbers = value
        .split('.')
        .map(|p| p.parse::<u32>())
        .collect::<Result<Vec<u32>, _>>()
        .map_err(|_| invalid())?;
    if numbers.len() != parts {
        return Err(invalid());
    }
    Ok(numbers)
}

fn verse_range(e: &BytesStart) -> Result<VerseRange, SectionReadError> {
    let invalid = || SectionReadError::Attribute {
        element: element_name(e),
        attr: "verses".to_string(),
    };
    let value = attribute(e, "verses")?.ok_or_else(invalid)?;
    let (first, last) = value.split_once('-').ok_or_else(invalid)?;
    Ok(VerseRange {
        first: first.parse().map_err(|_| invalid())?,
        last: last.parse().map_err(|_| invalid())?,
    })
}

/// Parse a section document back into a `Section`.
pub fn read_section_xml(xml: &str) -> Result<Section, SectionReadError> {
    let mut reader = Reader::from_str(xml);

    let mut book_n: Option<u32> = None;
    let mut section: Option<Section> = None;
    let mut current_verse: Option<Verse> = None;
    let mut current_line: Option<Line> = None;

    loop {
        let event = reader.read_event().map_err(|e| SectionReadError::Xml {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.name().as_ref() {
                    b"div" => match attribute(e, "type")?.as_deref() {
                        Some("book") => {
                            book_n = Some(dotted_numbers(e, "n", 1)?[0]);
                        }
                        Some("section") => {
                            let n = dotted_numbers(e, "n", 2)?;
                            if book_n.is_some_and(|b| b != n[0]) {
                                return Err(SectionReadError::Attribute {
                                    element: "div".to_string(),
                                    attr: "n".to_string(),
                                });
                            }
                            section = Some(Section {
                                book: n[0],
                                section: n[1],
                                verse_range: verse_range(e)?,
                                verses: Vec::new(),
                            });
                        }
                        _ => {
                            return Err(SectionReadError::Attribute {
                                element: "div".to_string(),
                                attr: "type".to_string(),
                            });
                        }
                    },
                    b"lg" => {
                        let Some(ref current) = section else {
                            return Err(SectionReadError::Unexpected { element: "lg".to_string() });
                        };
                        let n = dotted_numbers(e, "n", 3)?;
                        if (n[0], n[1]) != (current.book, current.section) {
                            return Err(SectionReadError::Attribute {
                                element: "lg".to_string(),
                                attr: "n".to_string(),
                            });
                        }
                        current_verse = Some(Verse {
                            book: n[0],
                            section: n[1],
                            verse: n[2],
                            lines: Vec::new(),
                        });
                    }
                    b"l" => {
                        let verse = current_verse
                            .as_ref()
                            .ok_or_else(|| SectionReadError::Unexpected { element: "l".to_string() })?;
                        let line = Line {
                            book: verse.book,
                            section: verse.section,
                            verse: verse.verse,
                            pada: attribute(e, "n")?.unwrap_or_default(),
                            text: String::new(),
                        };
                        if is_empty {
                            if let Some(ref mut verse) = current_verse {
                                verse.lines.push(line);
                            }
                        } else {
                            current_line = Some(line);
                        }
                    }
                    _ => {
                        return Err(SectionReadError::Unexpected { element: element_name(e) });
                    }
                }
            }
            Event::Text(ref t) => {
                // Whitespace between elements is indentation, text inside <l> is kept verbatim.
                if let Some(ref mut line) = current_line {
                    line.text.push_str(&unescape_markup(&String::from_utf8_lossy(t)));
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"l" => {
                    if let (Some(line), Some(verse)) = (current_line.take(), current_verse.as_mut()) {
                        verse.lines.push(line);
                    }
                }
                b"lg" => {
                    if let (Some(verse), Some(section)) = (current_verse.take(), section.as_mut()) {
                        section.verses.push(verse);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    section.ok_or(SectionReadError::NoSection)
}
