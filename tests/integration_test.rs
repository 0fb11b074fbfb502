use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([30, 30, 30]);
const WIDTH: u32 = 20;

/// Scratch directory holding one fixture page
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// White page of `height` rows with each `(top, rows)` band inked
    fn with_page(height: u32, bands: &[(i32, u32)]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut page = RgbImage::from_pixel(WIDTH, height, WHITE);
        for &(top, rows) in bands {
            draw_filled_rect_mut(&mut page, Rect::at(0, top).of_size(WIDTH, rows), INK);
        }
        page.save(dir.path().join("page.png"))
            .expect("Failed to write fixture");
        Self { dir }
    }

    fn input(&self) -> PathBuf {
        self.dir.path().join("page.png")
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join("save")
    }

    fn run(&self, extra: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_page-slicer"))
            .arg("--input_file")
            .arg(self.input())
            .arg("--output_path")
            .arg(self.output())
            .args(extra)
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run page-slicer")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn slice_heights(dir: &Path) -> Vec<u32> {
    let mut heights = Vec::new();
    for i in 0.. {
        let path = dir.join(format!("cropped_image_{i}.png"));
        if !path.exists() {
            break;
        }
        heights.push(image::open(&path).expect("Unreadable slice").height());
    }
    heights
}

#[test]
fn test_long_gap_splits_into_two_images() {
    // content 5..=24 and 70..=89; only the 45-row gap survives smoothing
    let ws = Workspace::with_page(100, &[(5, 20), (70, 20)]);
    let output = ws.run(&[]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains(&format!("mkdir {}", ws.output().display())));
    assert!(text.contains("Cropping finished: 2 images"));

    // (0,24) -> rows 0..=25, (70,99) -> rows 69..=99
    assert_eq!(slice_heights(&ws.output()), vec![26, 31]);
}

#[test]
fn test_short_gaps_give_one_full_height_image() {
    let ws = Workspace::with_page(9, &[(3, 3)]);
    let output = ws.run(&[]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Cropping finished: 1 images"));
    assert_eq!(slice_heights(&ws.output()), vec![9]);
}

#[test]
fn test_blank_page_writes_nothing() {
    let ws = Workspace::with_page(40, &[]);
    let output = ws.run(&[]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Cropping finished: 0 images"));
    assert!(slice_heights(&ws.output()).is_empty());
}

#[test]
fn test_pad_edge_policy() {
    let ws = Workspace::with_page(100, &[(5, 20), (70, 20)]);
    let output = ws.run(&["--edge", "pad"]);

    assert!(output.status.success());
    assert_eq!(slice_heights(&ws.output()), vec![27, 32]);

    let first = image::open(ws.output().join("cropped_image_0.png"))
        .unwrap()
        .to_rgb8();
    assert_eq!(*first.get_pixel(0, 0), Rgb([0, 0, 0]));
    assert_eq!(*first.get_pixel(0, 1), WHITE);
}

#[test]
fn test_minimum_white_controls_splitting() {
    let ws = Workspace::with_page(100, &[(5, 20), (70, 20)]);
    let output = ws.run(&["--minimum_white", "50"]);

    assert!(output.status.success());
    assert_eq!(slice_heights(&ws.output()), vec![100]);
}

#[test]
fn test_existing_output_dir_is_reused() {
    let ws = Workspace::with_page(9, &[(3, 3)]);
    std::fs::create_dir(ws.output()).unwrap();
    let output = ws.run(&[]);

    assert!(output.status.success());
    assert!(!stdout(&output).contains("mkdir"));
}

#[test]
fn test_json_dry_run() {
    let ws = Workspace::with_page(100, &[(5, 20), (70, 20)]);
    let output = ws.run(&["--dry-run", "--json"]);

    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");

    assert_eq!(summary["height"], 100);
    assert_eq!(summary["minimum_white"], 30);
    assert_eq!(summary["edge"], "clamp");
    assert_eq!(summary["count"], 0);
    assert_eq!(
        summary["ranges"],
        serde_json::json!([{ "start": 0, "end": 24 }, { "start": 70, "end": 99 }])
    );
    assert_eq!(summary["steps"].as_array().map(Vec::len), Some(3));
    assert_eq!(summary["rows"], 100);
    assert_eq!(summary["blank_rows"], 60);
    assert_eq!(summary["blank_rows_smoothed"], 45);
    assert!(!ws.output().exists());
}

#[test]
fn test_json_reports_written_slices() {
    let ws = Workspace::with_page(100, &[(5, 20), (70, 20)]);
    let output = ws.run(&["--json"]);

    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["count"], 2);
    assert_eq!(summary["slices"][1]["top"], 69);
    assert_eq!(summary["slices"][1]["height"], 31);
}

#[test]
fn test_kebab_case_aliases() {
    let ws = Workspace::with_page(9, &[(3, 3)]);
    let output = Command::new(env!("CARGO_BIN_EXE_page-slicer"))
        .arg("--input-file")
        .arg(ws.input())
        .arg("--output-path")
        .arg(ws.output())
        .args(["--minimum-white", "30"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(slice_heights(&ws.output()), vec![9]);
}

#[test]
fn test_missing_input_fails() {
    let ws = Workspace::with_page(9, &[]);
    let output = Command::new(env!("CARGO_BIN_EXE_page-slicer"))
        .arg("--input_file")
        .arg(ws.dir.path().join("nope.png"))
        .arg("--output_path")
        .arg(ws.output())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "unexpected stderr: {stderr}");
    assert!(!ws.output().exists());
}

#[test]
fn test_input_format_is_detected_from_contents() {
    let ws = Workspace::with_page(9, &[(3, 3)]);
    let bare = ws.dir.path().join("page");
    std::fs::rename(ws.input(), &bare).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_page-slicer"))
        .arg("--input_file")
        .arg(&bare)
        .arg("--output_path")
        .arg(ws.output())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(slice_heights(&ws.output()), vec![9]);
}

#[test]
fn test_undecodable_input_fails() {
    let ws = Workspace::with_page(9, &[]);
    std::fs::write(ws.input(), b"definitely not a png").unwrap();
    let output = ws.run(&[]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unsupported image"));
}

#[test]
fn test_zero_minimum_white_is_rejected() {
    let ws = Workspace::with_page(9, &[]);
    let output = ws.run(&["--minimum_white", "0"]);
    assert!(!output.status.success());
}
