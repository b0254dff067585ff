use std::path::PathBuf;
use std::process::Command;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "eolchan-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn eolchan() -> Command {
    Command::new(env!("CARGO_BIN_EXE_eolchan"))
}

#[test]
fn convert_crlf_file_to_lf() {
    let dir = unique_temp_dir("convert");
    let input = dir.join("in.txt");
    let output = dir.join("out.txt");
    std::fs::write(&input, b"alpha\r\nbeta\r\ngamma").expect("input should be writable");

    let status = eolchan()
        .arg("convert")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--in-mode", "crlf", "--out-mode", "lf"])
        .status()
        .expect("convert should spawn");
    assert!(status.success());

    let converted = std::fs::read(&output).expect("output should exist");
    assert_eq!(converted, b"alpha\nbeta\ngamma");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn convert_auto_input_normalizes_mixed_terminators() {
    let dir = unique_temp_dir("convert-auto");
    let input = dir.join("in.txt");
    let output = dir.join("out.txt");
    std::fs::write(&input, b"a\r\nb\nc\rd").expect("input should be writable");

    let status = eolchan()
        .arg("convert")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--in-mode", "auto", "--out-mode", "lf"])
        .status()
        .expect("convert should spawn");
    assert!(status.success());

    let converted = std::fs::read(&output).expect("output should exist");
    assert_eq!(converted, b"a\nb\nc\nd");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn convert_missing_input_fails_with_nonzero_exit() {
    let dir = unique_temp_dir("convert-missing");
    let status = eolchan()
        .arg("convert")
        .arg(dir.join("does-not-exist.txt"))
        .status()
        .expect("convert should spawn");
    assert!(!status.success());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn inspect_reports_counts_as_json() {
    let dir = unique_temp_dir("inspect");
    let input = dir.join("in.txt");
    std::fs::write(&input, b"a\r\nb\r\nc\n").expect("input should be writable");

    let out = eolchan()
        .arg("inspect")
        .arg(&input)
        .args(["--format", "json"])
        .output()
        .expect("inspect should spawn");
    assert!(out.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("inspect should print json");
    assert_eq!(report["crlf"], 2);
    assert_eq!(report["lone_lf"], 1);
    assert_eq!(report["lone_cr"], 0);
    assert_eq!(report["convention"], "mixed");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_package_version() {
    let out = eolchan()
        .arg("version")
        .output()
        .expect("version should spawn");
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}
