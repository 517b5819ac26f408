mod helpers;

use kanda_backend::config::CorpusConfig;
use kanda_backend::corpus::CorpusDriver;
use kanda_backend::error::{CorpusError, FetchError, ParseError};

use helpers::{raw_book, MemorySource, RecordingSink, Written};

fn config(book_count: u32) -> CorpusConfig {
    CorpusConfig {
        book_count,
        ..Default::default()
    }
}

#[test]
fn test_run_writes_sections_then_metadata() {
    let source = MemorySource::with(&[("01", raw_book(1, 3)), ("02", raw_book(2, 5))]);
    let mut driver = CorpusDriver::new(config(2), source, RecordingSink::default());

    let metadata = driver.run().unwrap();
    let (source, sink) = driver.into_parts();

    assert_eq!(source.requested, vec!["01", "02"]);

    assert_eq!(sink.written.len(), 3 + 5 + 1);
    assert_eq!(sink.written[0], Written::Section("1.1.xml".to_string()));
    assert_eq!(sink.written[3], Written::Section("2.1.xml".to_string()));
    assert_eq!(sink.written.last(), Some(&Written::Metadata("index.json".to_string())));

    assert_eq!(metadata.title, "mahAbhAratam");
    assert_eq!(metadata.slug, "mahabharata");
    let counts: Vec<(u32, usize)> = metadata.books.iter().map(|b| (b.n, b.section_count)).collect();
    assert_eq!(counts, vec![(1, 3), (2, 5)]);
    assert_eq!(sink.metadata, Some(metadata));
}

#[test]
fn test_written_sections_carry_cleaned_text() {
    let source = MemorySource::with(&[("01", raw_book(1, 1))]);
    let mut driver = CorpusDriver::new(config(1), source, RecordingSink::default());
    driver.run().unwrap();
    let (_, sink) = driver.into_parts();

    let section = &sink.sections[0];
    assert_eq!(section.verses.len(), 2);
    assert_eq!(section.verses[0].lines[0].text, "pada a");
    assert_eq!(section.verses[0].lines[1].pada, "c");
}

#[test]
fn test_fetch_failure_aborts_before_metadata() {
    // Book 03 is missing.
    let source = MemorySource::with(&[("01", raw_book(1, 3)), ("02", raw_book(2, 5))]);
    let mut driver = CorpusDriver::new(config(3), source, RecordingSink::default());

    let err = driver.run().unwrap_err();
    assert!(matches!(
        err,
        CorpusError::Fetch { ref book_id, source: FetchError::Io { .. } } if book_id == "03"
    ));

    let (_, sink) = driver.into_parts();
    // Sections of completed books stay written.
    assert_eq!(sink.sections.len(), 8);
    assert!(sink.metadata.is_none());
    assert!(!sink.written.iter().any(|w| matches!(w, Written::Metadata(_))));
}

#[test]
fn test_parse_failure_stops_the_run() {
    let bad = format!("{}02001003 ok\nbroken line\n", raw_book(2, 1));
    let source = MemorySource::with(&[("01", raw_book(1, 1)), ("02", bad), ("03", raw_book(3, 1))]);
    let mut driver = CorpusDriver::new(config(3), source, RecordingSink::default());

    let err = driver.run().unwrap_err();
    match err {
        CorpusError::Parse { book_id, source: ParseError::TagGrammar { line, .. } } => {
            assert_eq!(book_id, "02");
            assert_eq!(line, "broken line");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let (source, sink) = driver.into_parts();
    assert_eq!(source.requested, vec!["01", "02"]);
    assert_eq!(sink.sections.len(), 1);
    assert!(sink.metadata.is_none());
}

#[test]
fn test_book_of_only_comments_is_empty_section_error() {
    let source = MemorySource::with(&[("01", "% nothing here\n".to_string())]);
    let mut driver = CorpusDriver::new(config(1), source, RecordingSink::default());

    let err = driver.run().unwrap_err();
    assert!(matches!(err, CorpusError::Parse { source: ParseError::EmptySection, .. }));
}

#[test]
fn test_book_number_must_match_identifier() {
    let source = MemorySource::with(&[("01", raw_book(4, 1))]);
    let mut driver = CorpusDriver::new(config(1), source, RecordingSink::default());

    let err = driver.run().unwrap_err();
    assert!(matches!(err, CorpusError::BookMismatch { ref book_id, found: 4 } if book_id == "01"));
    let (_, sink) = driver.into_parts();
    assert!(sink.written.is_empty());
}

#[test]
fn test_resumed_section_fails_before_writing_the_book() {
    let interleaved = "02001001a x\n02002001a y\n02001002a z\n".to_string();
    let source = MemorySource::with(&[("01", raw_book(1, 2)), ("02", interleaved)]);
    let mut driver = CorpusDriver::new(config(2), source, RecordingSink::default());

    let err = driver.run().unwrap_err();
    assert!(matches!(
        err,
        CorpusError::Parse { ref book_id, source: ParseError::DuplicateSection { book: 2, section: 1 } }
            if book_id == "02"
    ));

    let (_, sink) = driver.into_parts();
    // Only book 1 was written, nothing of book 2.
    assert_eq!(sink.written, vec![
        Written::Section("1.1.xml".to_string()),
        Written::Section("1.2.xml".to_string()),
    ]);
    assert!(sink.metadata.is_none());
}

#[test]
fn test_persist_failure_aborts() {
    let source = MemorySource::with(&[("01", raw_book(1, 3)), ("02", raw_book(2, 1))]);
    let sink = RecordingSink {
        fail_on: Some("1.2.xml".to_string()),
        ..Default::default()
    };
    let mut driver = CorpusDriver::new(config(2), source, sink);

    let err = driver.run().unwrap_err();
    assert!(matches!(err, CorpusError::Persist { ref key, .. } if key == "1.2.xml"));

    let (source, sink) = driver.into_parts();
    assert_eq!(source.requested, vec!["01"]);
    assert_eq!(sink.written, vec![Written::Section("1.1.xml".to_string())]);
}

#[test]
fn test_metadata_persist_failure() {
    let source = MemorySource::with(&[("01", raw_book(1, 1))]);
    let sink = RecordingSink {
        fail_on: Some("index.json".to_string()),
        ..Default::default()
    };
    let mut driver = CorpusDriver::new(config(1), source, sink);

    let err = driver.run().unwrap_err();
    assert!(matches!(err, CorpusError::Persist { ref key, .. } if key == "index.json"));
}

#[test]
fn test_parse_one() {
    let source = MemorySource::with(&[("07", raw_book(7, 2))]);
    let mut driver = CorpusDriver::new(config(18), source, RecordingSink::default());

    let book = driver.parse_one(7).unwrap();
    assert_eq!(book.n, 7);
    assert_eq!(book.sections.len(), 2);
    assert_eq!(book.verse_count(), 4);
}
