//! The `convert` and `batch` subcommands.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use photon::ConvertOptions;

use crate::batch::{self, BatchSummary};
use crate::config::Config;
use crate::output::OutputConfig;
use crate::{BatchArgs, ConvertArgs};

/// Run the `convert` subcommand.
pub fn run_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let options = ConvertOptions {
        quality: args
            .quality
            .unwrap_or_else(|| Config::load_or_default().default_quality),
        lossless: args.lossless,
    };

    let output_config = OutputConfig::new(args.force, args.mkdir);
    output_config.check_writable(&args.input, &args.output)?;
    output_config.prepare(&args.output)?;

    let report = photon::convert(&args.input, &args.output, &options)
        .with_context(|| format!("converting {}", args.input.display()))?;

    println!(
        "Converted {} ({}) -> {} ({})",
        report.input.display(),
        report.source_format,
        report.output.display(),
        report.target_format,
    );
    Ok(())
}

/// Run the `batch` subcommand.
pub fn run_batch(args: BatchArgs) -> anyhow::Result<()> {
    let options = ConvertOptions {
        quality: args
            .quality
            .unwrap_or_else(|| Config::load_or_default().default_quality),
        lossless: false,
    };

    let jobs = args.jobs.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} {pos} files ({elapsed})")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    // Collected on the side so --report and --csv still see partial batches.
    let summary = Mutex::new(BatchSummary::new());

    let outcome = pool.install(|| {
        batch::convert_batch(&args.dir, &args.from, &args.to, &options, |result| {
            summary
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(result.clone());
            pb.inc(1);
        })
    });
    pb.finish_and_clear();

    let mut summary = summary.into_inner().unwrap_or_else(PoisonError::into_inner);
    summary.results.sort_by(|a, b| a.input.cmp(&b.input));

    if args.report {
        summary.print_report();
    }

    if let Some(csv_path) = &args.csv {
        summary.write_csv(csv_path)?;
        eprintln!("CSV report written to {}", csv_path.display());
    }

    let summary = outcome?;
    println!("Batch complete: {} files converted", summary.success_count());
    Ok(())
}
