//! prospectus CLI - offering document extraction tool

use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use prospectus::bundle::{bundle_name, file_stem, part_name};
use prospectus::parser::Pdftoppm;
use prospectus::render::{self, render_pages};
use prospectus::sections::SectionSplitter;
use prospectus::{
    parse_file_with_options, BatchSession, ExportFormat, ExportOptions, Exporter, JsonFormat,
    PageMarker, PageSelection, ParseOptions, PdfParser, RenderOptions, SplitterOptions,
};

#[derive(Parser)]
#[command(name = "prospectus")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Split PDF offering documents into text, JSON and zip bundles", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output zip file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PDF to page-marked text
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Page marker style
        #[arg(long, value_enum, default_value = "heading")]
        marker: Marker,
    },

    /// Convert PDF to JSON
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Write one JSON file per section listed on the index page
    Sections {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Page holding the index (searched for if not given)
        #[arg(long, value_name = "N")]
        index_page: Option<u32>,

        /// Keyword index lines must contain
        #[arg(long, default_value = "section")]
        keyword: String,
    },

    /// Write a zip with the cover image and per-batch parts
    Bundle {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output zip file
        #[arg(short, long, value_name = "ZIP")]
        output: Option<PathBuf>,

        /// Write JSON parts instead of text
        #[arg(long)]
        json: bool,

        /// Pages per part
        #[arg(long, env = "PROSPECTUS_BATCH_SIZE", default_value = "200")]
        batch_size: NonZeroU32,

        /// Cover image resolution
        #[arg(long, env = "PROSPECTUS_DPI", default_value = "300")]
        dpi: u32,

        /// Page marker style for text parts
        #[arg(long, value_enum, default_value = "heading")]
        marker: Marker,
    },

    /// Process the next page batch recorded in a session file
    Batch {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Session file (defaults to <stem>.session.json next to the output)
        #[arg(long, value_name = "PATH")]
        session: Option<PathBuf>,

        /// Pages per batch
        #[arg(long, env = "PROSPECTUS_BATCH_SIZE", default_value = "200")]
        batch_size: NonZeroU32,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Page marker style
        #[arg(long, value_enum, default_value = "heading")]
        marker: Marker,
    },

    /// Print the section entries found on the index page
    Index {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page holding the index (searched for if not given)
        #[arg(long, value_name = "N")]
        index_page: Option<u32>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Marker {
    /// "# Page N" above each page
    Heading,
    /// "Page No N" below each page, blank pages skipped
    Footer,
}

impl From<Marker> for PageMarker {
    fn from(marker: Marker) -> Self {
        match marker {
            Marker::Heading => PageMarker::Heading,
            Marker::Footer => PageMarker::Footer,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Text {
            input,
            output,
            pages,
            marker,
        }) => cmd_text(&input, output.as_deref(), pages.as_deref(), marker),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Sections {
            input,
            output,
            index_page,
            keyword,
        }) => cmd_sections(&input, output.as_deref(), index_page, &keyword),
        Some(Commands::Bundle {
            input,
            output,
            json,
            batch_size,
            dpi,
            marker,
        }) => cmd_bundle(&input, output.as_deref(), json, batch_size, dpi, marker),
        Some(Commands::Batch {
            input,
            session,
            batch_size,
            output,
            marker,
        }) => cmd_batch(
            &input,
            session.as_deref(),
            batch_size,
            output.as_deref(),
            marker,
        ),
        Some(Commands::Index { input, index_page }) => cmd_index(&input, index_page),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: footer-marked text bundle if input is provided
            if let Some(input) = cli.input {
                cmd_bundle(
                    &input,
                    cli.output.as_deref(),
                    false,
                    prospectus::DEFAULT_BATCH_SIZE,
                    prospectus::parser::DEFAULT_DPI,
                    Marker::Footer,
                )
            } else {
                println!("{}", "Usage: prospectus <FILE> [OUTPUT]".yellow());
                println!("       prospectus --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn parse_pages(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p)?),
        None => Ok(PageSelection::All),
    }
}

fn cover_status(rasterizer: &Pdftoppm) -> &'static str {
    if rasterizer.is_available() {
        "available"
    } else {
        "unavailable (install poppler-utils for pdftoppm)"
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
    marker: Marker,
) -> Result<(), Box<dyn std::error::Error>> {
    let page_selection = parse_pages(pages)?;

    // Use lenient mode to continue even if some text extraction fails
    let options = ExportOptions::new()
        .with_parse_options(ParseOptions::new().lenient().with_pages(page_selection.clone()))
        .with_render_options(
            RenderOptions::new()
                .with_page_marker(marker.into())
                .with_pages(page_selection),
        );

    let result = Exporter::new(options).export_file(input, ExportFormat::Text)?;
    let text = result
        .artifacts
        .first()
        .and_then(|a| a.as_str())
        .unwrap_or_default();

    write_or_print(output, text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = prospectus::parse_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&doc, format)?;
    write_or_print(output, &json)
}

fn cmd_sections(
    input: &Path,
    output: Option<&Path>,
    index_page: Option<u32>,
    keyword: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let stem = file_stem(input);
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(format!("{}_sections", stem)));

    let mut splitter = SplitterOptions::new().with_keyword(keyword);
    if let Some(page) = index_page {
        splitter = splitter.with_index_page(page);
    }

    let options = ExportOptions::new().lenient().with_splitter(splitter);
    let result = Exporter::new(options).export_file(input, ExportFormat::Sections)?;

    if result.is_empty() {
        println!("{}", "No section entries found on the index page".yellow());
        return Ok(());
    }

    let paths = result.write_all(&output_dir)?;
    println!("\n{}", "Output files:".green().bold());
    for (i, path) in paths.iter().enumerate() {
        let branch = if i + 1 == paths.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }

    Ok(())
}

fn cmd_bundle(
    input: &Path,
    output: Option<&Path>,
    json: bool,
    batch_size: NonZeroU32,
    dpi: u32,
    marker: Marker,
) -> Result<(), Box<dyn std::error::Error>> {
    let stem = file_stem(input);
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(bundle_name(&stem)));

    let rasterizer = Pdftoppm::default();
    if !rasterizer.is_available() {
        println!(
            "{} cover image {}",
            "Note:".yellow(),
            cover_status(&rasterizer)
        );
    }

    let pb = progress_bar(2);

    pb.set_message("Parsing PDF...");
    let data = fs::read(input)?;
    let options = ExportOptions::new()
        .lenient()
        .with_render_options(RenderOptions::new().with_page_marker(marker.into()))
        .with_batch_size(batch_size)
        .with_dpi(dpi);
    let exporter = Exporter::with_rasterizer(options, rasterizer);
    let doc = PdfParser::from_bytes_with_options(&data, exporter.options().parse.clone())?.parse()?;
    pb.inc(1);

    pb.set_message("Writing bundle...");
    let format = if json {
        ExportFormat::JsonBundle
    } else {
        ExportFormat::Bundle
    };
    let result = exporter.export_document(&doc, Some(&data), &stem, format)?;
    let Some(archive) = result.artifacts.first() else {
        return Err("export produced no archive".into());
    };
    fs::write(&output, &archive.data)?;
    pb.inc(1);

    pb.finish_with_message("Done!");
    println!(
        "\n{} {} ({} pages)",
        "Saved to".green(),
        output.display(),
        doc.page_count()
    );

    Ok(())
}

fn session_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!("{}.session.json", stem))
}

fn load_session(path: &Path, document_id: &str) -> Result<BatchSession, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Ok(BatchSession::new(document_id));
    }

    let session: BatchSession = serde_json::from_str(&fs::read_to_string(path)?)?;
    if session.is_for(document_id) {
        Ok(session)
    } else {
        log::info!(
            "Session {} belongs to {}; starting over",
            path.display(),
            session.document_id
        );
        Ok(BatchSession::new(document_id))
    }
}

fn save_session(path: &Path, session: &BatchSession) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, serde_json::to_string_pretty(session)?)?;
    Ok(())
}

fn cmd_batch(
    input: &Path,
    session: Option<&Path>,
    batch_size: NonZeroU32,
    output: Option<&Path>,
    marker: Marker,
) -> Result<(), Box<dyn std::error::Error>> {
    let stem = file_stem(input);
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let session_file = session
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| session_path(&output_dir, &stem));
    let document_id = input.display().to_string();
    let mut progress = load_session(&session_file, &document_id)?;

    let total = PdfParser::open(input)?.page_count();
    let Some(range) = progress.next_batch(total, batch_size) else {
        println!("{} all {} pages processed", "Done!".green().bold(), total);
        return Ok(());
    };

    let pb = progress_bar(1);
    pb.set_message(format!("Pages {}-{} of {}", range.start + 1, range.end, total));

    let selection = PageSelection::Range(range.start + 1..=range.end);
    let doc = parse_file_with_options(input, ParseOptions::new().lenient().with_pages(selection))?;
    let text = render_pages(
        doc.pages.iter(),
        &RenderOptions::new().with_page_marker(marker.into()),
    );

    let index = (range.start / batch_size.get()) as usize + 1;
    let part = output_dir.join(part_name(&stem, index, "txt"));
    fs::write(&part, text)?;

    progress.advance(&range);
    save_session(&session_file, &progress)?;
    pb.inc(1);
    pb.finish_with_message("Done!");

    println!("{} {}", "Saved to".green(), part.display());
    if progress.is_complete(total) {
        println!("{}", "All batches processed".green().bold());
    } else {
        println!(
            "{} {} pages remaining; run again to continue",
            "Next:".cyan(),
            total - progress.next_start_page
        );
    }

    Ok(())
}

fn cmd_index(input: &Path, index_page: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let options = ParseOptions::new().lenient().text_only();
    let doc = parse_file_with_options(input, options)?;

    let mut splitter_options = SplitterOptions::new();
    if let Some(page) = index_page {
        splitter_options = splitter_options.with_index_page(page);
    }
    let splitter = SectionSplitter::new(splitter_options);

    let Some(page) = splitter.locate_index(&doc) else {
        println!("{}", "No index page found".yellow());
        return Ok(());
    };

    println!("{} {}", "Index page".cyan().bold(), page.number);
    println!("{}", "─".repeat(40).dimmed());
    for entry in splitter.parse_index(&page.text) {
        println!("{:>5}  {}", entry.page_number, entry.title);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Use lenient mode for info command - we want to show metadata even if text extraction fails
    let options = ParseOptions::new().lenient();
    let doc = parse_file_with_options(input, options)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), doc.metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), doc.metadata.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if doc.metadata.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = doc.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref producer) = doc.metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = doc.metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = doc.plain_text();
    let sections = prospectus::split_sections(&doc, &SplitterOptions::default());

    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.len());
    println!("{}: {}", "Tables".bold(), doc.table_count());
    println!("{}: {}", "Sections".bold(), sections.len());
    println!(
        "{}: {}",
        "Cover image".bold(),
        cover_status(&Pdftoppm::default())
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "prospectus".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Offering document extraction tool");
    println!();
    println!("License: MIT");
}
