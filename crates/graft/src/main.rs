//! graft - extract embedded foreign code from host documents
//!
//! graft scans a host document (e.g. a Python notebook script) for embedded
//! foreign-language fragments such as `%%bigquery` SQL cells, maps every
//! fragment back to exact host coordinates, and prints the resulting
//! host-range to virtual-buffer map.

use clap::{Args, Parser, Subcommand};
use eyre::{Result, WrapErr};
use graft::config;
use graft::output::{self, OutputFormat};
use graft_core::{
    EditorId, ExtractionEngine, ForeignExtractor, HostBlock, ManifestWarning, Position,
    ShadowFilesystem, VirtualWorkspace,
};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "graft", version, about = "Extract embedded foreign code from host documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
enum Command {
    /// Run one extraction pass over a file and print the block map
    Extract(ExtractArgs),

    /// List registered extractors per host language
    Magics(MagicsArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Host document to scan
    file: PathBuf,

    /// Host language tag (inferred from the file extension when omitted)
    #[arg(short, long)]
    language: Option<String>,

    /// Extractor manifest (default: .config/graft/extractors.json, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the built-in IPython magic extractors
    #[arg(long)]
    no_builtins: bool,

    /// Host-document line where the scanned text starts
    #[arg(long, default_value_t = 0)]
    line: usize,

    /// Host-document column where the scanned text starts
    #[arg(long, default_value_t = 0)]
    column: usize,

    /// Output format: text, json
    #[arg(short, long)]
    format: Option<String>,

    /// Also write the resulting foreign buffers under this directory
    #[arg(long)]
    shadow: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct MagicsArgs {
    /// Extractor manifest (default: .config/graft/extractors.json, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the built-in IPython magic extractors
    #[arg(long)]
    no_builtins: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract(args) => run_extract(args),
        Command::Magics(args) => run_magics(args),
    }
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .wrap_err_with(|| format!("Failed to read {}", args.file.display()))?;

    let host_language = match args.language {
        Some(language) => language,
        None => {
            let extension = args
                .file
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or_default();
            config::language_for_extension(extension)
                .map(str::to_string)
                .ok_or_else(|| {
                    eyre::eyre!(
                        "Cannot infer a host language for {} - pass --language",
                        args.file.display()
                    )
                })?
        }
    };

    let format = args
        .format
        .as_deref()
        .and_then(OutputFormat::from_str)
        .unwrap_or_default();

    let manifest_path = config::resolve_manifest_path(args.config.as_deref());
    let (registry, warnings) = config::build_registry(manifest_path.as_deref(), !args.no_builtins)?;
    print_warnings(&warnings);

    let editor = EditorId::new(args.file.display().to_string());
    let block = HostBlock::new(&text, Position::new(args.line, args.column), &editor);
    let map = ExtractionEngine::new(&registry).extract(&block, &host_language);

    eprintln!(
        "{} Extracted {} foreign blocks from {}",
        "->".blue().bold(),
        map.len().to_string().green(),
        args.file.display()
    );

    if let Some(dir) = args.shadow {
        let mut workspace = VirtualWorkspace::new();
        let events = workspace.apply(&map);
        let filesystem = ShadowFilesystem::new(&dir)?;
        filesystem.sync(&workspace, &events)?;
        eprintln!(
            "   Wrote {} buffers to {}",
            workspace.len().to_string().green(),
            dir.display()
        );
    }

    print!("{}", output::render_map(&host_language, &map, format));
    Ok(())
}

fn run_magics(args: MagicsArgs) -> Result<()> {
    let manifest_path = config::resolve_manifest_path(args.config.as_deref());
    let (registry, warnings) = config::build_registry(manifest_path.as_deref(), !args.no_builtins)?;
    print_warnings(&warnings);

    if registry.is_empty() {
        println!("No extractors registered.");
        return Ok(());
    }

    let mut host_languages: Vec<&str> = registry.host_languages().collect();
    host_languages.sort_unstable();

    for host_language in host_languages {
        println!("{}", host_language.cyan().bold());
        for extractor in registry.extractors_for(host_language) {
            let kind = if extractor.standalone() {
                "standalone"
            } else {
                "persistent"
            };
            let magic = if extractor.has_cell_magic() {
                ", cell magic"
            } else {
                ""
            };
            println!(
                "   {} (.{}, {}{})",
                extractor.language(),
                extractor.file_extension(),
                kind,
                magic
            );
        }
    }

    Ok(())
}

fn print_warnings(warnings: &[ManifestWarning]) {
    for warning in warnings {
        eprintln!(
            "{} Skipped extractor {} -> {}: {}",
            "!".yellow().bold(),
            warning.host_language,
            warning.language,
            warning.error
        );
    }
}
