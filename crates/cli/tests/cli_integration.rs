use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// 'H' advances 12 design units and 'I' advances 6.
const FONT: &str = "\
999 72 6
0 0 0
0 18 1
12 0 0
12 18 1
0 9 0
12 9 1
999 73 2
6 0 0
6 18 1
999 32 0
";

fn workspace(text: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join("SingleStrokeFont.txt"), FONT).expect("write font");
    fs::write(dir.path().join("TestData.txt"), text).expect("write text");
    dir
}

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stroke-writer"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("run stroke-writer")
}

#[test]
fn prints_gcode_for_default_files() {
    let dir = workspace("HI");
    let output = run(&["--font-size", "9"], dir.path());

    assert!(output.status.success(), "process failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(&lines[..4], ["S0", "G0 X0.00 Y0.00", "S1000", "G1 X0.00 Y9.00"]);
    assert_eq!(&lines[lines.len() - 2..], ["S0", "G0 X0.00 Y0.00"]);
    // 'I' starts where 'H' ends.
    assert!(stdout.contains("G0 X9.00 Y0.00"));
    assert!(lines.iter().all(|line| !line.is_empty()));
}

#[test]
fn writes_gcode_to_output_file() {
    let dir = workspace("H H\nI");
    let output = run(
        &["TestData.txt", "-s", "10", "-o", "out.gcode", "--line-width", "50"],
        dir.path(),
    );

    assert!(output.status.success(), "process failed: {output:?}");
    assert!(output.stdout.is_empty());

    let gcode = fs::read_to_string(dir.path().join("out.gcode")).expect("read output");
    // After the newline, 'I' sits one line height (10 + 2) lower.
    assert!(gcode.contains("Y-12.00"));
    assert!(gcode.ends_with("S0\nG0 X0.00 Y0.00\n"));
}

#[test]
fn prompts_for_font_size() {
    let dir = workspace("I");
    let mut child = Command::new(env!("CARGO_BIN_EXE_stroke-writer"))
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn stroke-writer");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"42\n4\n")
        .expect("write font size");
    let output = child.wait_with_output().expect("wait for stroke-writer");

    assert!(output.status.success(), "process failed: {output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid font size"));
    assert!(stderr.contains("Selected font size: 4"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("G1 "));
}

#[test]
fn renders_svg_preview() {
    let dir = workspace("HI HI");
    let output = run(&["-s", "8", "--mode", "preview"], dir.path());

    assert!(output.status.success(), "process failed: {output:?}");
    let svg = fs::read_to_string(dir.path().join("preview.svg")).expect("read preview");
    assert!(svg.contains("<svg"));
    assert!(svg.contains("<path"));
}

#[test]
fn missing_font_exits_with_1() {
    let dir = workspace("HI");
    let output = run(&["-s", "5", "--font", "nope.txt"], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.txt"));
}

#[test]
fn malformed_font_exits_with_2() {
    let dir = workspace("HI");
    fs::write(dir.path().join("bad.txt"), "999 72 3 0 0 0").expect("write font");
    let output = run(&["-s", "5", "--font", "bad.txt"], dir.path());

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_document_exits_with_3() {
    let dir = workspace("HI");
    let output = run(&["-s", "5", "missing.txt"], dir.path());

    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn invalid_font_size_exits_with_5() {
    let dir = workspace("HI");
    let output = run(&["-s", "12"], dir.path());

    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("font size 12"));
}

#[test]
fn zero_pen_power_exits_with_5() {
    let dir = workspace("HI");
    let output = run(&["-s", "5", "--pen-power", "0"], dir.path());

    assert_eq!(output.status.code(), Some(5));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("pen power"));
}

#[test]
fn device_mode_needs_a_device() {
    let dir = workspace("HI");
    let output = run(&["-s", "5", "--mode", "device"], dir.path());

    assert_eq!(output.status.code(), Some(5));
}
