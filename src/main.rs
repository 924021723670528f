//! folio - package chapter lists into EPUB files

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use folio::{BuildRequest, Packager, PackagerConfig};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Package chapter lists into EPUB files", long_about = None)]
#[command(after_help = "EXAMPLES:
    folio book.json book.epub               Package a book
    folio book.json book.epub -l de         Package with German metadata
    folio -i book.json                      List the chapters of a request

INPUT FORMAT:
    {\"bookTitle\": \"...\", \"author\": \"...\",
     \"chapters\": [{\"id\": \"...\", \"sequence\": 1, \"title\": \"...\", \"body\": \"...\"}]}")]
struct Cli {
    /// Build request (JSON)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output EPUB file
    #[arg(value_name = "OUTPUT", required_unless_present = "info")]
    output: Option<PathBuf>,

    /// Show the chapters of the request without packaging
    #[arg(short, long)]
    info: bool,

    /// Language tag for the package metadata
    #[arg(short, long, default_value = "en")]
    language: String,

    /// Deflate level (0-9) for archive members
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=9))]
    compression_level: Option<u32>,

    /// Replace the built-in stylesheet with this CSS file
    #[arg(long, value_name = "CSS")]
    stylesheet: Option<PathBuf>,

    /// Fixed edition identifier instead of a random urn:uuid
    #[arg(long)]
    identifier: Option<String>,

    /// Render chapters on a single thread
    #[arg(long)]
    sequential: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = if cli.info {
        show_info(&cli)
    } else {
        package(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_request(path: &Path) -> Result<BuildRequest, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&json).map_err(|e| format!("invalid request {}: {e}", path.display()))
}

fn show_info(cli: &Cli) -> Result<(), String> {
    let request = load_request(&cli.input)?;

    println!("Title: {}", request.book_title);
    if let Some(ref author) = request.author {
        println!("Author: {author}");
    }
    println!("Chapters: {}", request.chapters.len());
    for (index, chapter) in request.chapters.iter().enumerate() {
        let marker = if chapter.is_empty() { " (empty)" } else { "" };
        println!(
            "  ch_{index}.xhtml  #{:<4} {}{marker}",
            chapter.sequence, chapter.title
        );
    }

    Ok(())
}

fn package(cli: &Cli) -> Result<(), String> {
    let Some(ref output) = cli.output else {
        return Err("output path required".to_string());
    };
    let request = load_request(&cli.input)?;

    let mut config = PackagerConfig::default()
        .with_language(cli.language.clone())
        .with_parallel(!cli.sequential);
    if let Some(level) = cli.compression_level {
        config = config.with_compression_level(level);
    }
    if let Some(ref path) = cli.stylesheet {
        let css = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        config = config.with_stylesheet(css);
    }
    if let Some(ref identifier) = cli.identifier {
        config = config.with_identifier(identifier.clone());
    }

    let book = Packager::new()
        .with_config(config)
        .package(&request)
        .map_err(|e| e.to_string())?;
    book.write_to(output).map_err(|e| e.to_string())?;

    if !cli.quiet {
        println!(
            "Wrote {} ({} chapters, {} bytes, {})",
            output.display(),
            book.chapters().len(),
            book.len(),
            book.identifier()
        );
    }

    Ok(())
}
