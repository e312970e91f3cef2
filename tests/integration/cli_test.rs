//! Integration tests for the `splitter` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_splitter"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run the splitter binary")
}

fn dir_arg(dir: &Path) -> &str {
    dir.to_str().expect("temp dir path is not UTF-8")
}

#[test]
fn test_cli_split_then_merge() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    let data: Vec<u8> = (0..250u32).map(|i| (i * 3) as u8).collect();
    fs::write(dir.join("payload"), &data).unwrap();

    let output = run(&["split", dir_arg(dir), "payload", "100"]);
    assert!(output.status.success(), "split failed: {:?}", output);
    assert_eq!(fs::read(dir.join("payload.0")).unwrap(), &data[..100]);
    assert_eq!(fs::read(dir.join("payload.2")).unwrap(), &data[200..]);

    fs::remove_file(dir.join("payload")).unwrap();
    let output = run(&["merge", dir_arg(dir), "payload"]);
    assert!(output.status.success(), "merge failed: {:?}", output);
    assert_eq!(fs::read(dir.join("payload")).unwrap(), data);
}

#[test]
fn test_cli_non_positive_size_uses_default() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("small"), vec![1u8; 1000]).unwrap();

    // With the 49 MiB default a 1000 byte file is never split
    for size in ["0", "-5"] {
        let output = run(&["split", dir_arg(dir), "small", size]);
        assert!(output.status.success(), "split with size {} failed: {:?}", size, output);
    }
    let output = run(&["split", dir_arg(dir), "small"]);
    assert!(output.status.success());

    assert!(!dir.join("small.0").exists());
}

#[test]
fn test_cli_failed_split_exits_non_zero() {
    let temp_dir = tempdir().unwrap();

    let output = run(&["split", dir_arg(temp_dir.path()), "does-not-exist", "10"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does-not-exist"), "unexpected stderr: {}", stderr);
}

#[test]
fn test_cli_failed_merge_exits_non_zero() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("missing-dir");

    let output = run(&["merge", missing.to_str().unwrap(), "base"]);

    assert!(!output.status.success());
}

#[test]
fn test_cli_usage_errors() {
    // Too few arguments
    let output = run(&["split", "/tmp"]);
    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());

    // Unknown mode
    let output = run(&["shuffle", "/tmp", "file"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));

    // No arguments at all
    let output = run(&[]);
    assert!(!output.status.success());
}
