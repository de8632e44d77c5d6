//! Image inspection: probe headers and display them without decoding.

use std::path::Path;

use anyhow::bail;
use photon::{CodecRegistry, ImageFormat};
use serde::Serialize;

use crate::InfoArgs;
use crate::batch;

/// Run the `info` subcommand.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let files = batch::expand_inputs(&args.files)?;

    if files.is_empty() {
        bail!("no image files found");
    }

    let multi = files.len() > 1;
    let mut failed = 0usize;

    for (i, path) in files.iter().enumerate() {
        if multi && !args.json {
            if i > 0 {
                println!();
            }
            println!("{}:", path.display());
        }

        match inspect_file(path) {
            Ok(info) => {
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    print_info(&info);
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("error: {}: {e:#}", path.display());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files could not be read", files.len());
    }
    Ok(())
}

/// Probe a single file and return structured info.
fn inspect_file(path: &Path) -> anyhow::Result<ImageInfoDisplay> {
    let info = photon::probe_file(path)?;
    let file_size = path.metadata()?.len();

    Ok(ImageInfoDisplay {
        path: path.display().to_string(),
        format: info.format.name(),
        mime_type: info.format.mime_type(),
        width: info.width,
        height: info.height,
        has_alpha: info.has_alpha,
        file_size,
    })
}

#[derive(Debug, Serialize)]
struct ImageInfoDisplay {
    path: String,
    format: &'static str,
    mime_type: &'static str,
    width: Option<u32>,
    height: Option<u32>,
    has_alpha: Option<bool>,
    file_size: u64,
}

fn print_info(info: &ImageInfoDisplay) {
    println!("  Format:       {} ({})", info.format, info.mime_type);
    match (info.width, info.height) {
        (Some(w), Some(h)) => println!("  Dimensions:   {w}x{h}"),
        _ => println!("  Dimensions:   unknown"),
    }
    if let Some(alpha) = info.has_alpha {
        println!("  Alpha:        {}", if alpha { "yes" } else { "no" });
    }
    println!("  File size:    {}", batch::format_size(info.file_size));
}

/// Print the format table for the `formats` subcommand.
pub fn print_formats() {
    let registry = CodecRegistry::all();

    println!(
        "{:<6} {:<22} {:<7} {:<7} Description",
        "Format", "Extensions", "Decode", "Encode"
    );
    println!("{}", "-".repeat(72));
    for format in ImageFormat::ALL {
        println!(
            "{:<6} {:<22} {:<7} {:<7} {}",
            format.name(),
            format.extensions().join(", "),
            yes_no(registry.can_decode(format)),
            yes_no(registry.can_encode(format)),
            format.description(),
        );
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
