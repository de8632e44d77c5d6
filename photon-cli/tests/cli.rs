//! CLI end-to-end tests for the `photon` binary.

use assert_cmd::prelude::*;
use photon::{EncodeRequest, ImageFormat, PixelData};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::{TempDir, tempdir};

/// A `photon` command with HOME pointed at a scratch directory so the real
/// config is never read or written.
#[allow(deprecated)]
fn photon_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("photon").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

fn write_png(path: &Path, width: u32, height: u32) {
    let mut bytes = Vec::new();
    for y in 0..height {
        for x in 0..width {
            bytes.extend_from_slice(&[(x * 7) as u8, (y * 11) as u8, 90, 255]);
        }
    }
    let pixels = PixelData::from_rgba_bytes(&bytes, width, height).unwrap();
    let png = EncodeRequest::new(ImageFormat::Png).encode(&pixels).unwrap();
    fs::write(path, png.data).unwrap();
}

fn setup() -> (TempDir, TempDir) {
    (tempdir().unwrap(), tempdir().unwrap())
}

#[test]
fn help_lists_subcommands() {
    let (home, _) = setup();
    photon_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn convert_png_to_jpeg() {
    let (home, work) = setup();
    let input = work.path().join("photo.png");
    let output = work.path().join("photo.jpg");
    write_png(&input, 32, 24);

    photon_cmd(home.path())
        .args(["convert", "-q", "80"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("(png) ->"))
        .stdout(predicate::str::contains("(jpeg)"));

    let data = fs::read(&output).unwrap();
    assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Jpeg));
}

#[test]
fn convert_refuses_existing_output_without_force() {
    let (home, work) = setup();
    let input = work.path().join("a.png");
    let output = work.path().join("a.webp");
    write_png(&input, 8, 8);
    fs::write(&output, b"old").unwrap();

    photon_cmd(home.path())
        .arg("convert")
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read(&output).unwrap(), b"old");

    photon_cmd(home.path())
        .args(["convert", "--force"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    let data = fs::read(&output).unwrap();
    assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::WebP));
}

#[test]
fn convert_missing_directory_needs_mkdir() {
    let (home, work) = setup();
    let input = work.path().join("a.png");
    let output = work.path().join("nested").join("dir").join("a.bmp");
    write_png(&input, 8, 8);

    photon_cmd(home.path())
        .arg("convert")
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to write"));

    photon_cmd(home.path())
        .args(["convert", "--mkdir"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert!(output.is_file());
}

#[test]
fn convert_to_heic_is_blocked() {
    let (home, work) = setup();
    let input = work.path().join("a.png");
    write_png(&input, 8, 8);

    photon_cmd(home.path())
        .arg("convert")
        .arg(&input)
        .arg(work.path().join("a.heic"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("HEIC encoding not supported"));
    assert!(!work.path().join("a.heic").exists());
}

#[test]
fn convert_unknown_extension_fails() {
    let (home, work) = setup();
    let input = work.path().join("a.png");
    write_png(&input, 8, 8);

    photon_cmd(home.path())
        .arg("convert")
        .arg(&input)
        .arg(work.path().join("a.xyz"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported format: xyz"));
}

#[test]
fn convert_uses_configured_quality() {
    let (home, work) = setup();
    let config_dir = home.path().join(".config").join("photon");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.json"), r#"{"default_quality": 10}"#).unwrap();

    let input = work.path().join("a.png");
    write_png(&input, 64, 64);
    let low = work.path().join("low.jpg");
    let high = work.path().join("high.jpg");

    photon_cmd(home.path())
        .arg("convert")
        .arg(&input)
        .arg(&low)
        .assert()
        .success();
    photon_cmd(home.path())
        .args(["convert", "-q", "100"])
        .arg(&input)
        .arg(&high)
        .assert()
        .success();

    let low_size = fs::metadata(&low).unwrap().len();
    let high_size = fs::metadata(&high).unwrap().len();
    assert!(low_size < high_size, "{low_size} >= {high_size}");
}

#[test]
fn batch_converts_directory() {
    let (home, work) = setup();
    for name in ["one", "two", "three"] {
        write_png(&work.path().join(format!("{name}.png")), 16, 16);
    }
    let csv = work.path().join("report.csv");

    photon_cmd(home.path())
        .args(["batch", "--from", ".PNG", "--to", "gif", "-j", "2", "--csv"])
        .arg(&csv)
        .arg(work.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch complete: 3 files converted"));

    for name in ["one", "two", "three"] {
        assert!(work.path().join(format!("{name}.gif")).is_file());
    }
    let report = fs::read_to_string(&csv).unwrap();
    assert_eq!(report.lines().count(), 4);
}

#[test]
fn batch_without_matches_fails() {
    let (home, work) = setup();

    photon_cmd(home.path())
        .args(["batch", "--from", "heic", "--to", "jpg"])
        .arg(work.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no .heic files found"));
}

#[test]
fn batch_reports_failures() {
    let (home, work) = setup();
    write_png(&work.path().join("good.png"), 8, 8);
    fs::write(work.path().join("broken.png"), b"garbage").unwrap();

    photon_cmd(home.path())
        .args(["batch", "--from", "png", "--to", "jpg", "--report"])
        .arg(work.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 converted, 1 errors"))
        .stderr(predicate::str::contains("failed to convert 1 files"))
        .stderr(predicate::str::contains("broken.png"));
    assert!(work.path().join("good.jpg").is_file());
}

#[test]
fn info_prints_json() {
    let (home, work) = setup();
    let input = work.path().join("shape.png");
    write_png(&input, 12, 5);

    let output = photon_cmd(home.path())
        .args(["info", "--json"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["format"], "png");
    assert_eq!(json["width"], 12);
    assert_eq!(json["height"], 5);
    assert_eq!(json["has_alpha"], true);
}

#[test]
fn info_text_for_directory() {
    let (home, work) = setup();
    write_png(&work.path().join("a.png"), 3, 4);
    write_png(&work.path().join("b.png"), 5, 6);

    photon_cmd(home.path())
        .arg("info")
        .arg(work.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Dimensions:   3x4"))
        .stdout(predicate::str::contains("Dimensions:   5x6"));
}

#[test]
fn formats_table() {
    let (home, _) = setup();
    photon_cmd(home.path())
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("webp"))
        .stdout(predicate::str::contains("heic"))
        .stdout(predicate::str::contains("Apple photo format, read-only"));
}
