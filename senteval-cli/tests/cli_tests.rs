//! End-to-end tests for the `senteval` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn senteval() -> Command {
    let mut cmd = Command::cargo_bin("senteval").unwrap();
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_normalize_text_flags() {
    senteval()
        .args(["normalize", "--text", "The Quick-Brown Fox jumps! 123", "--text", "42"])
        .assert()
        .success()
        .stdout("quickbrown fox jumps\n\n");
}

#[test]
fn test_normalize_reads_stdin_lines() {
    senteval()
        .arg("normalize")
        .write_stdin("A man is playing a flute.\nThe kids are running!\n")
        .assert()
        .success()
        .stdout("man playing flute\nkids running\n");
}

#[test]
fn test_normalize_tolerates_invalid_utf8_lines() {
    senteval()
        .arg("normalize")
        .write_stdin(b"Good movie\nCaf\xe9 latte\r\nThe end\n".to_vec())
        .assert()
        .success()
        .stdout("good movie\ncaf latte\nend\n");
}

#[test]
fn test_normalize_with_custom_stop_words() {
    let dir = tempfile::tempdir().unwrap();
    let words = dir.path().join("words.txt");
    std::fs::write(&words, "Flute\n").unwrap();
    let input = dir.path().join("input.txt");
    std::fs::write(&input, "A man is playing a flute.\n").unwrap();

    senteval()
        .args(["normalize", "--stop-words"])
        .arg(&words)
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout("a man is playing a\n");
}

#[test]
fn test_missing_stop_word_file_fails_before_output() {
    let dir = tempfile::tempdir().unwrap();

    senteval()
        .args(["normalize", "--text", "hello world", "--stop-words"])
        .arg(dir.path().join("missing.txt"))
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("unavailable"));
}

#[test]
fn test_params_prints_defaults() {
    senteval()
        .env_remove("SENTEVAL_CONFIG")
        .arg("params")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kfold\": 10"))
        .stdout(predicate::str::contains("\"usepytorch\": true"))
        .stdout(predicate::str::contains("STSBenchmark"));
}

#[test]
fn test_params_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eval.json");
    std::fs::write(&path, r#"{ "params": { "kfold": 1 } }"#).unwrap();

    senteval()
        .args(["params", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("kfold must be at least 2"));
}

#[test]
fn test_params_write_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");

    senteval()
        .env_remove("SENTEVAL_CONFIG")
        .args(["params", "--write"])
        .arg(&path)
        .assert()
        .success()
        .stdout("");

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("SICKRelatedness"));
}

#[test]
fn test_params_reads_config_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eval.json");
    std::fs::write(&path, r#"{ "params": { "seed": 7 } }"#).unwrap();

    senteval()
        .env("SENTEVAL_CONFIG", &path)
        .arg("params")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"seed\": 7"));
}
