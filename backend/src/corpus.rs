//! Converts every book of the work, in order, and writes the metadata last.

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{book_identifier, CorpusConfig};
use crate::error::CorpusError;
use crate::logger;
use crate::output::{section_file_name, CorpusMetadata, CorpusSink, XmlDirSink, METADATA_FILE_NAME};
use crate::sources::TextSource;
use crate::types::Book;
use crate::verse_text::parse_book;

pub struct CorpusDriver<S: TextSource, W: CorpusSink> {
    config: CorpusConfig,
    source: S,
    sink: W,
}

impl<S: TextSource> CorpusDriver<S, XmlDirSink> {
    /// Driver writing section files and metadata under `config.output_root`.
    pub fn to_output_dir(config: CorpusConfig, source: S) -> Self {
        let sink = XmlDirSink::new(config.output_root.clone());
        Self::new(config, source, sink)
    }
}

impl<S: TextSource, W: CorpusSink> CorpusDriver<S, W> {
    pub fn new(config: CorpusConfig, source: S, sink: W) -> Self {
        Self { config, source, sink }
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    pub fn into_parts(self) -> (S, W) {
        (self.source, self.sink)
    }

    /// Fetch and parse one book. `n` is the book number the text must be tagged with.
    pub fn parse_one(&mut self, n: u32) -> Result<Book, CorpusError> {
        let book_id = book_identifier(n);

        let raw = self.source.fetch(&book_id).map_err(|source| CorpusError::Fetch {
            book_id: book_id.clone(),
            source,
        })?;

        let book = parse_book(&raw).map_err(|source| CorpusError::Parse {
            book_id: book_id.clone(),
            source,
        })?;

        if book.n != n {
            return Err(CorpusError::BookMismatch { book_id, found: book.n });
        }

        Ok(book)
    }

    fn persist_sections(&mut self, book: &Book) -> Result<(), CorpusError> {
        for section in &book.sections {
            let key = section_file_name(section.book, section.section);
            self.sink
                .persist_section(section, &key)
                .map_err(|source| CorpusError::Persist { key: key.clone(), source })?;
            logger::debug(&format!("Wrote section {}", key));
        }
        Ok(())
    }

    /// Convert books 1..=book_count, then write the metadata document.
    ///
    /// Sections are written as soon as their book is parsed. The first error
    /// stops the run; sections of earlier books stay written, the metadata
    /// is not written.
    pub fn run(&mut self) -> Result<CorpusMetadata, CorpusError> {
        logger::info(&format!(
            "Converting {} books of {} into {}",
            self.config.book_count,
            self.config.slug,
            self.config.output_root.display()
        ));

        let pb = if self.config.show_progress {
            ProgressBar::new(self.config.book_count as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        let mut books: Vec<Book> = Vec::new();

        for n in 1..=self.config.book_count {
            pb.set_message(format!("book {}", book_identifier(n)));

            let book = match self.parse_one(n) {
                Ok(book) => book,
                Err(e) => {
                    pb.abandon_with_message(format!("failed at book {}", book_identifier(n)));
                    logger::error(&e.to_string());
                    return Err(e);
                }
            };

            logger::info(&format!(
                "Book {}: {} sections, {} verses",
                book.n,
                book.sections.len(),
                book.verse_count()
            ));

            if let Err(e) = self.persist_sections(&book) {
                pb.abandon_with_message(format!("failed at book {}", book_identifier(n)));
                logger::error(&e.to_string());
                return Err(e);
            }

            books.push(book);
            pb.inc(1);
        }

        let metadata = CorpusMetadata::from_books(&self.config.title, &self.config.slug, &books);
        self.sink
            .persist_metadata(&metadata, METADATA_FILE_NAME)
            .map_err(|source| CorpusError::Persist {
                key: METADATA_FILE_NAME.to_string(),
                source,
            })?;

        pb.finish_with_message("Done");
        logger::info(&format!(
            "Wrote metadata for {} sections to {}",
            metadata.section_count(),
            METADATA_FILE_NAME
        ));

        Ok(metadata)
    }
}
