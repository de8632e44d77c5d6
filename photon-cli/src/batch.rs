//! File expansion, batch conversion, and batch reporting.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use photon::{ConvertOptions, ImageFormat};
use rayon::prelude::*;

/// Expand input patterns into a deduplicated list of image files.
///
/// Handles:
/// - Glob patterns (containing `*`, `?`, `[`)
/// - Plain file paths
/// - Directories (recursive image discovery)
///
/// Files are deduplicated by canonical path and keep first-seen order.
pub fn expand_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            for entry in glob::glob(pattern)? {
                let path = entry?;
                if path.is_file() && is_image(&path) {
                    push_unique(path, &mut seen, &mut files);
                }
            }
        } else {
            let path = PathBuf::from(pattern);
            if path.is_dir() {
                for_each_image_in_dir(&path, &mut seen, &mut files);
            } else if path.is_file() {
                push_unique(path, &mut seen, &mut files);
            } else {
                bail!("not a file or directory: {}", path.display());
            }
        }
    }

    Ok(files)
}

fn push_unique(path: PathBuf, seen: &mut HashSet<PathBuf>, files: &mut Vec<PathBuf>) {
    if let Ok(canonical) = path.canonicalize()
        && seen.insert(canonical)
    {
        files.push(path);
    }
}

/// Check if a file path has a recognized image extension.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension)
        .is_some()
}

/// Recursively find image files in a directory, sorted by name per level.
fn for_each_image_in_dir(dir: &Path, seen: &mut HashSet<PathBuf>, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            for_each_image_in_dir(&path, seen, files);
        } else if path.is_file() && is_image(&path) {
            push_unique(path, seen, files);
        }
    }
}

/// Lowercase and drop one leading dot: ".HEIC" -> "heic".
pub fn normalize_ext(ext: &str) -> String {
    let lower = ext.to_ascii_lowercase();
    match lower.strip_prefix('.') {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// Convert every `dir/*.<from>` to `dir/<base>.<to>` in parallel.
///
/// Runs on the current rayon pool. `on_result` sees each file as it finishes.
/// One failure does not stop the others; if any failed, the error lists every
/// failure in input order.
pub fn convert_batch(
    dir: &Path,
    from: &str,
    to: &str,
    options: &ConvertOptions,
    on_result: impl Fn(&FileResult) + Sync,
) -> anyhow::Result<BatchSummary> {
    let from = normalize_ext(from);
    let to = normalize_ext(to);

    let inputs = find_by_extension(dir, &from)?;
    if inputs.is_empty() {
        bail!("no .{from} files found in {}", dir.display());
    }

    if ImageFormat::from_extension(&to).is_none() {
        bail!("unsupported format: {to}");
    }

    let suffix = format!(".{from}");
    let jobs: Vec<(PathBuf, PathBuf)> = inputs
        .into_iter()
        .map(|input| {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let base = name.strip_suffix(&suffix).unwrap_or(&name);
            let output = dir.join(format!("{base}.{to}"));
            (input, output)
        })
        .collect();

    tracing::info!(
        dir = %dir.display(),
        from = %from,
        to = %to,
        files = jobs.len(),
        "batch started"
    );

    let results = jobs
        .par_iter()
        .map(|(input, output)| {
            let result = convert_one(input, output, options);
            on_result(&result);
            result
        })
        .collect();

    BatchSummary { results }.into_result()
}

/// Convert `files` into `out_dir` as `target`, keeping every per-file result.
pub fn convert_files(
    files: &[PathBuf],
    out_dir: &Path,
    target: ImageFormat,
    options: &ConvertOptions,
    on_result: impl Fn(&FileResult) + Sync,
) -> BatchSummary {
    let results = files
        .par_iter()
        .map(|input| {
            let output = photon::output_path_for(input, out_dir, target);
            let result = convert_one(input, &output, options);
            on_result(&result);
            result
        })
        .collect();
    BatchSummary { results }
}

/// Non-recursive `dir/*.<ext>`, sorted by name.
fn find_by_extension(dir: &Path, ext: &str) -> anyhow::Result<Vec<PathBuf>> {
    let pattern =
        Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join(format!("*.{ext}"));
    let pattern = pattern.to_string_lossy();

    let mut files = Vec::new();
    for entry in glob::glob(&pattern).with_context(|| format!("glob pattern: {pattern}"))? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Convert one file, catching the error into the result.
fn convert_one(input: &Path, output: &Path, options: &ConvertOptions) -> FileResult {
    let start = Instant::now();
    let outcome = photon::convert(input, output, options);
    let duration = start.elapsed();

    match outcome {
        Ok(report) => FileResult {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            input_size: report.input_size,
            output_size: Some(report.output_size),
            error: None,
            duration,
        },
        Err(e) => {
            tracing::warn!(input = %input.display(), "conversion failed: {e}");
            FileResult {
                input: input.to_path_buf(),
                output: output.to_path_buf(),
                input_size: input.metadata().map(|m| m.len()).unwrap_or(0),
                output_size: None,
                error: Some(e.to_string()),
                duration,
            }
        }
    }
}

/// Result of converting a single file.
#[derive(Clone, Debug)]
pub struct FileResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_size: u64,
    pub output_size: Option<u64>,
    pub error: Option<String>,
    pub duration: Duration,
}

impl FileResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Accumulated batch summary.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub results: Vec<FileResult>,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn total_input_size(&self) -> u64 {
        self.results.iter().map(|r| r.input_size).sum()
    }

    pub fn total_output_size(&self) -> u64 {
        self.results.iter().filter_map(|r| r.output_size).sum()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn error_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.results.iter().filter(|r| !r.is_ok())
    }

    /// Turn a summary with failures into an error listing them.
    pub fn into_result(self) -> anyhow::Result<Self> {
        let failed: Vec<String> = self
            .failures()
            .map(|r| {
                format!(
                    "{}: {}",
                    r.input.display(),
                    r.error.as_deref().unwrap_or_default()
                )
            })
            .collect();

        if failed.is_empty() {
            Ok(self)
        } else {
            bail!(
                "failed to convert {} files:\n{}",
                failed.len(),
                failed.join("\n")
            )
        }
    }

    /// Print a human-readable summary table.
    pub fn print_report(&self) {
        if self.results.is_empty() {
            println!("No files processed.");
            return;
        }

        println!(
            "{:<40} {:>10} {:>10} {:>8} {:>8}",
            "File", "Input", "Output", "Change", "Time"
        );
        println!("{}", "-".repeat(80));

        for r in &self.results {
            let name = r
                .input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "?".to_string());
            let name = truncate_left(&name, 38);

            match (&r.error, r.output_size) {
                (Some(err), _) => {
                    println!("{:<40} {:>10} {}", name, format_size(r.input_size), err);
                }
                (None, Some(out_size)) => {
                    println!(
                        "{:<40} {:>10} {:>10} {:>8} {:>8}",
                        name,
                        format_size(r.input_size),
                        format_size(out_size),
                        format_change(r.input_size, out_size),
                        format_duration(r.duration),
                    );
                }
                (None, None) => {}
            }
        }

        println!("{}", "-".repeat(80));
        let total_in = self.total_input_size();
        let total_out = self.total_output_size();
        println!(
            "{} converted, {} errors | {} -> {} ({})",
            self.success_count(),
            self.error_count(),
            format_size(total_in),
            format_size(total_out),
            format_change(total_in, total_out),
        );
    }

    /// Write results as CSV.
    pub fn write_csv(&self, path: &Path) -> anyhow::Result<()> {
        let mut f = std::fs::File::create(path)
            .with_context(|| format!("creating CSV report: {}", path.display()))?;
        writeln!(
            f,
            "input,input_size,output,output_size,change_pct,duration_ms,status"
        )?;
        for r in &self.results {
            let out_size = r.output_size.unwrap_or(0);
            let change = match r.output_size {
                Some(out) if r.input_size > 0 => percent_change(r.input_size, out),
                _ => 0.0,
            };
            writeln!(
                f,
                "{},{},{},{},{:.1},{},{}",
                csv_field(&r.input.display().to_string()),
                r.input_size,
                csv_field(&r.output.display().to_string()),
                out_size,
                change,
                r.duration.as_millis(),
                if r.is_ok() { "ok" } else { "error" },
            )?;
        }
        Ok(())
    }
}

/// Quote a CSV field when it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn truncate_left(name: &str, max_chars: usize) -> String {
    let count = name.chars().count();
    if count <= max_chars {
        return name.to_string();
    }
    let tail: String = name.chars().skip(count - (max_chars - 2)).collect();
    format!("..{tail}")
}

fn percent_change(before: u64, after: u64) -> f64 {
    (after as f64 - before as f64) / before as f64 * 100.0
}

fn format_change(before: u64, after: u64) -> String {
    if before > 0 {
        format!("{:+.1}%", percent_change(before, after))
    } else {
        "N/A".to_string()
    }
}

fn format_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    if ms >= 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{ms}ms")
    }
}

/// Format a byte size into a human-readable string.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
