use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use kanda_backend::config::{CorpusConfig, DEFAULT_BOOK_COUNT, DEFAULT_FETCH_TEMPLATE, DEFAULT_OUTPUT_ROOT};
use kanda_backend::corpus::CorpusDriver;
use kanda_backend::output::verify_output_dir;
use kanda_backend::sources::{read_text, HttpTextSource, LocalTextSource};
use kanda_backend::{logger, parse_book};

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert the tagged Mahabharata text to XML sections", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level: silent, error, warn, info, debug
    #[arg(long, global = true, value_name = "LEVEL", env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Append log messages to this file
    #[arg(long, global = true, value_name = "FILE_PATH", env = "LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch and convert every book, write one XML file per section and index.json
    Convert {
        /// Number of books, requested as 01..N
        #[arg(long, value_name = "N", env = "KANDA_BOOK_COUNT", default_value_t = DEFAULT_BOOK_COUNT)]
        book_count: u32,

        /// URL template for the raw texts, {n} is replaced by the book identifier
        #[arg(long, value_name = "URL", env = "KANDA_FETCH_TEMPLATE", default_value = DEFAULT_FETCH_TEMPLATE)]
        fetch_template: String,

        /// Read MBh{n}.txt files from this directory instead of fetching them
        #[arg(long, value_name = "DIRECTORY_PATH", env = "KANDA_SOURCE_DIR")]
        source_dir: Option<PathBuf>,

        /// Keep downloaded raw texts here and reuse them on the next run
        #[arg(long, value_name = "DIRECTORY_PATH", env = "KANDA_CACHE_DIR")]
        cache_dir: Option<PathBuf>,

        /// Where the section files and index.json are written
        #[arg(long, value_name = "DIRECTORY_PATH", env = "KANDA_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_ROOT)]
        output_dir: PathBuf,

        /// Don't show the progress bar
        #[arg(long, default_value_t = false)]
        no_progress: bool,
    },

    /// Parse one raw book file and print its sections
    #[command(arg_required_else_help = true)]
    Parse {
        /// Path to a raw book text, e.g. MBh01.txt
        #[arg(value_name = "FILE_PATH")]
        path: PathBuf,

        /// Print the parsed book as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Check that index.json and the section files of an output directory agree
    Check {
        #[arg(value_name = "DIRECTORY_PATH", env = "KANDA_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_ROOT)]
        dir: PathBuf,
    },
}

fn convert(config: CorpusConfig, source_dir: Option<PathBuf>) -> Result<()> {
    config.validate()?;

    let start_time: DateTime<Local> = Local::now();

    let metadata = match source_dir {
        Some(dir) => {
            if !dir.is_dir() {
                anyhow::bail!("Source directory does not exist: {}", dir.display());
            }
            CorpusDriver::to_output_dir(config, LocalTextSource::new(dir)).run()?
        }
        None => {
            let source = HttpTextSource::new(&config.fetch_template, config.cache_dir.clone());
            CorpusDriver::to_output_dir(config, source).run()?
        }
    };

    let end_time = Local::now();
    let duration = (end_time - start_time).to_std().unwrap_or_default();

    logger::info(&format!(
        r#"
======
Books:             {}
Sections:          {}
Conversion started: {}
Conversion ended:   {}
Duration:           {}
"#,
        metadata.books.len(),
        metadata.section_count(),
        start_time.format("%Y-%m-%d %H:%M:%S"),
        end_time.format("%Y-%m-%d %H:%M:%S"),
        logger::format_duration(duration)
    ));

    Ok(())
}

fn parse_file(path: &Path, json: bool) -> Result<()> {
    let raw = read_text(path)?;
    let book = parse_book(&raw).with_context(|| format!("Failed to parse {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&book)?);
        return Ok(());
    }

    println!("Book {}: {} sections, {} verses", book.n, book.sections.len(), book.verse_count());
    for section in &book.sections {
        println!(
            "  {}: verses {}, {} verses, {} lines",
            section.reference(),
            section.verse_range,
            section.verses.len(),
            section.line_count()
        );
    }

    Ok(())
}

fn check(dir: &Path) -> Result<()> {
    let report = verify_output_dir(dir)?;

    for problem in &report.problems {
        println!("ERROR {}", problem);
    }
    for name in &report.unlisted {
        println!("WARN {} is not listed in the metadata", name);
    }
    println!(
        "{} books, {} sections checked, {} problems",
        report.books,
        report.sections_checked,
        report.problems.len()
    );

    if !report.is_ok() {
        anyhow::bail!("{} is inconsistent", dir.display());
    }
    Ok(())
}

fn main() {
    if dotenv().is_err() {
        println!("Info: No .env file found or failed to load.");
    }

    let cli = Cli::parse();

    logger::init(cli.log_file.clone());
    if let Some(ref level) = cli.log_level {
        if !logger::set_log_level_str(level) {
            eprintln!("Error: Invalid log level: {}", level);
            exit(1);
        }
    }

    let command_result = match cli.command {
        Commands::Convert {
            book_count,
            fetch_template,
            source_dir,
            cache_dir,
            output_dir,
            no_progress,
        } => {
            let config = CorpusConfig {
                book_count,
                fetch_template,
                output_root: output_dir,
                cache_dir,
                show_progress: !no_progress,
                ..Default::default()
            };
            convert(config, source_dir)
        }

        Commands::Parse { path, json } => parse_file(&path, json),

        Commands::Check { dir } => check(&dir),
    };

    if let Err(e) = command_result {
        eprintln!("Error executing command: {:#}", e);
        exit(1);
    }
}
