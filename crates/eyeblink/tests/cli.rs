use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

fn eyeblink(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_eyeblink"))
        .env_remove("EYEBLINK_CONFIG")
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .expect("failed to run eyeblink")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is utf-8")
}

#[test]
fn sample_json_reports_open_eye_center() {
    let output = eyeblink(&[
        "sample",
        "--size",
        "100x100",
        "--pixel",
        "50,50",
        "--time",
        "1.5707964",
        "--blink",
        "sharp",
        "--background",
        "white",
        "--json",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let intensity = report["intensity"].as_f64().unwrap();
    assert!((intensity - 0.99921).abs() < 1e-4, "intensity {intensity}");
    assert!((report["vignette"].as_f64().unwrap() - 0.975).abs() < 1e-6);
    assert_eq!(report["blink_mode"], "sharp");
    assert_eq!(report["color"][3].as_f64().unwrap(), 0.0);
}

#[test]
fn sample_at_blink_instant_is_black() {
    let output = eyeblink(&[
        "sample", "--size", "64x64", "--pixel", "32,32", "--time", "0", "--json",
    ]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(report["intensity"].as_f64().unwrap() < 1e-3);
}

#[test]
fn far_out_of_frame_textured_sample_is_black() {
    let output = eyeblink(&[
        "sample",
        "--size",
        "10x10",
        "--pixel",
        "1e20,5",
        "--time",
        "1",
        "--background",
        "textured",
        "--json",
    ]);
    assert!(output.status.success(), "{output:?}");
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["intensity"].as_f64().unwrap(), 0.0);
    assert_eq!(report["color"][0].as_f64().unwrap(), 0.0);
}

#[test]
fn config_file_selects_modes() {
    let root = TempDir::new().unwrap();
    let path = root.path().join("effect.toml");
    fs::write(
        &path,
        r#"
version = 1

[blink]
mode = "smooth"

[background]
mode = "textured"

[background.texture]
pattern = "checker"
width = 16
height = 16
cells = 4

[output]
alpha = "opaque"
"#,
    )
    .unwrap();

    let output = eyeblink(&["config", "--config", path.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("mode = \"smooth\""), "{text}");
    assert!(text.contains("mode = \"textured\""), "{text}");
    assert!(text.contains("alpha = \"opaque\""), "{text}");

    let output = Command::new(env!("CARGO_BIN_EXE_eyeblink"))
        .env("EYEBLINK_CONFIG", &path)
        .env("RUST_LOG", "warn")
        .args(["sample", "--size", "10x10", "--pixel", "5,5", "--json"])
        .output()
        .expect("failed to run eyeblink with env config");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["blink_mode"], "smooth");
    assert_eq!(report["background"], "textured");
    assert_eq!(report["color"][3].as_f64().unwrap(), 1.0);
}

#[test]
fn preview_prints_requested_grid() {
    let output = eyeblink(&["preview", "--size", "12x5", "--time", "1.5707964"]);
    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|line| line.len() == 12));
}

#[test]
fn animated_preview_labels_frames() {
    let output = eyeblink(&[
        "preview", "--size", "4x2", "--time", "0", "--frames", "3", "--fps", "2",
    ]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("frame 0 t=0.0000"));
    assert!(text.contains("frame 2 t=1.0000"));
}

#[test]
fn wave_table_has_requested_rows() {
    let output = eyeblink(&["wave", "--steps", "5", "--blink", "smooth"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert_eq!(text.lines().count(), 6);
    assert!(text.lines().next().unwrap().contains("smooth"));
}

#[test]
fn stats_reports_intensity_range() {
    let output = eyeblink(&["stats", "--size", "32x18", "--time", "1.5707964"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("size:     32x18"));
    assert!(text.contains("mean:"));
}

#[test]
fn rejects_invalid_arguments() {
    let zero = eyeblink(&["stats", "--size", "0x10"]);
    assert!(!zero.status.success());

    let bad_mode = eyeblink(&["wave", "--blink", "wink"]);
    assert!(!bad_mode.status.success());

    let root = TempDir::new().unwrap();
    let path = root.path().join("broken.toml");
    fs::write(&path, "version = 7\n").unwrap();
    let bad_config = eyeblink(&["config", "--config", path.to_str().unwrap()]);
    assert!(!bad_config.status.success());
}
