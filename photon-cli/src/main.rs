//! photon: image format converter.
//!
//! Without a subcommand this opens the interactive TUI. The subcommands are
//! for scripting: single-file convert, directory batch, header inspection.

mod batch;
mod config;
mod info;
mod logging;
mod output;
mod process;
mod tui;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Image format converter.
#[derive(Parser, Debug)]
#[command(
    name = "photon",
    version,
    about = "Photon - Image format converter",
    long_about = "Photon - Image format converter\n\n\
        Converts between PNG, JPEG, GIF, WebP, BMP, TIFF and AVIF, and reads HEIC.\n\n\
        Run without arguments to launch the interactive TUI.\n\
        Use subcommands for CLI/scripting mode."
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a single image.
    #[command(
        visible_alias = "c",
        after_help = "Examples:\n  photon convert photo.heic photo.jpg\n  photon convert input.png output.webp -q 85"
    )]
    Convert(ConvertArgs),

    /// Convert every matching image in a directory.
    #[command(
        visible_alias = "b",
        after_help = "Examples:\n  photon batch ./photos --from heic --to jpg\n  photon batch ./images --from png --to webp -q 80"
    )]
    Batch(BatchArgs),

    /// Probe and display image headers without decoding.
    Info(InfoArgs),

    /// List supported formats and what this build can do with them.
    Formats,
}

/// Arguments for the `convert` subcommand.
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Input image (format detected from content).
    pub input: PathBuf,

    /// Output image (format taken from the extension).
    pub output: PathBuf,

    /// Output quality (1-100). Defaults to the configured quality.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Lossless where the format allows it, maximum quality otherwise.
    #[arg(long)]
    pub lossless: bool,

    /// Overwrite an existing output file.
    #[arg(long)]
    pub force: bool,

    /// Create missing parent directories for the output.
    #[arg(long)]
    pub mkdir: bool,
}

/// Arguments for the `batch` subcommand.
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Directory to scan (not recursive).
    pub dir: PathBuf,

    /// Source extension, e.g. heic or .heic.
    #[arg(long)]
    pub from: String,

    /// Target extension, e.g. jpg or .jpg.
    #[arg(long)]
    pub to: String,

    /// Output quality (1-100). Defaults to the configured quality.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Number of parallel workers (default: CPU count).
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Print a per-file summary table.
    #[arg(long)]
    pub report: bool,

    /// Write a CSV report to this file.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Arguments for the `info` subcommand.
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Input files, directories or glob patterns.
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // The alternate screen owns stdout/stderr, so logs go to a file.
            if let Err(e) = logging::init_file(&config::log_path()) {
                eprintln!("warning: logging disabled: {e:#}");
            }
            tui::run()
        }
        Some(command) => {
            logging::init_stderr(cli.verbose);
            match command {
                Command::Convert(args) => process::run_convert(args),
                Command::Batch(args) => process::run_batch(args),
                Command::Info(args) => info::run(args),
                Command::Formats => {
                    info::print_formats();
                    Ok(())
                }
            }
        }
    }
}
