//! flatform CLI - turn flat worksheet layouts into fillable form plans

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use flatform::{
    default_output_path, load_layout, EngineOptions, Flatform, JsonFormat, MaterializeMode,
    PageSelection, PageTemplate,
};

#[derive(Parser)]
#[command(name = "flatform")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Place form fields on flat worksheet pages", long_about = None)]
struct Cli {
    /// Input layout file
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file (defaults to INPUT with a -fillable or -preview suffix)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Outline placements instead of creating widgets
    #[arg(long)]
    preview: bool,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// Detect fields from drawn boxes on unrecognized pages
    #[arg(long)]
    shape_fallback: bool,

    /// Process pages in parallel
    #[arg(long)]
    parallel: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the detected template of every page
    Classify {
        /// Input layout file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

struct RunArgs<'a> {
    input: &'a Path,
    output: Option<&'a Path>,
    preview: bool,
    pages: Option<&'a str>,
    compact: bool,
    shape_fallback: bool,
    parallel: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Classify { ref input }) => cmd_classify(input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(ref input) = cli.input {
                cmd_run(RunArgs {
                    input,
                    output: cli.output.as_deref(),
                    preview: cli.preview,
                    pages: cli.pages.as_deref(),
                    compact: cli.compact,
                    shape_fallback: cli.shape_fallback,
                    parallel: cli.parallel,
                })
            } else {
                println!("{}", "Usage: flatform <INPUT> [-o OUTPUT]".yellow());
                println!("       flatform --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn ensure_exists(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("input file not found: {}", input.display()).into());
    }
    Ok(())
}

fn cmd_run(args: RunArgs<'_>) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(args.input)?;

    let page_selection = if let Some(p) = args.pages {
        PageSelection::parse(p)?
    } else {
        PageSelection::All
    };

    let mode = if args.preview {
        MaterializeMode::Preview
    } else {
        MaterializeMode::Commit
    };
    let output = args
        .output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output_path(args.input, mode));

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Loading layout...");
    let layout = load_layout(args.input)?;
    pb.inc(1);

    pb.set_message("Placing fields...");
    let options = EngineOptions::new()
        .with_pages(page_selection)
        .with_parallel(args.parallel)
        .with_shape_fallback(args.shape_fallback);
    let result = Flatform::new()
        .with_options(options)
        .with_mode(mode)
        .process_layout(&layout);
    pb.inc(1);

    pb.set_message("Writing plan...");
    let format = if args.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = result.plan_json(format)?;
    log::debug!("writing {} bytes to {}", json.len(), output.display());
    fs::write(&output, &json)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", result.to_text()?);
    println!("{} {}", "Saved to".green(), output.display());

    Ok(())
}

fn cmd_classify(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(input)?;
    let layout = load_layout(input)?;

    println!("{}", "Page Templates".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for page in &layout.pages {
        let template = flatform::classify_page(page);
        let label = match template {
            PageTemplate::None => template.label().dimmed(),
            PageTemplate::ReferenceOnly => template.label().yellow(),
            _ => template.label().green(),
        };
        println!("{:>4}  {}", page.number, label);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "flatform".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Fillable form placement for flat worksheets");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/flatform".dimmed());
    println!("License: MIT");
}
