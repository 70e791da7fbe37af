use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// The binary with config and data directories pointed at a scratch home.
fn spellcommit(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("spellcommit").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("RUST_LOG")
        .arg("--no-color")
        .arg("--no-dictionary");
    cmd
}

#[test]
fn check_accepts_technical_words() {
    let home = TempDir::new().unwrap();
    spellcommit(&home)
        .args(["check", "react jwt cors api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No spelling errors found"));
}

#[test]
fn check_reports_typo_and_fails() {
    let home = TempDir::new().unwrap();
    spellcommit(&home)
        .args(["check", "fix", "teh", "bug"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("1:5 teh"))
        .stdout(predicate::str::contains("→ the"));
}

#[test]
fn check_no_fail_exits_zero() {
    let home = TempDir::new().unwrap();
    spellcommit(&home)
        .args(["check", "--no-fail", "teh"])
        .assert()
        .success();
}

#[test]
fn check_json_output() {
    let home = TempDir::new().unwrap();
    let output = spellcommit(&home)
        .args(["check", "--format", "json", "--no-fail", "Fix fucntion that handls"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total_findings"], 2);
    assert_eq!(json["findings"][0]["word"], "fucntion");
    assert_eq!(json["findings"][0]["column"], 5);
    assert_eq!(json["findings"][1]["suggestions"][0], "handles");
}

#[test]
fn check_reads_file() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("MSG"), "first line\nsecond teh\n").unwrap();
    spellcommit(&home)
        .args(["check", "--file", "MSG"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("2:8 teh"));
}

#[test]
fn fix_corrects_sentence() {
    let home = TempDir::new().unwrap();
    spellcommit(&home)
        .args(["fix", "Fix fucntion that handls user authetication"])
        .assert()
        .success()
        .stdout("Fix function that handles user authentication\n")
        .stderr(predicate::str::contains("3 corrections applied"));
}

#[test]
fn fix_reads_stdin() {
    let home = TempDir::new().unwrap();
    spellcommit(&home)
        .arg("fix")
        .write_stdin("Teh cache\n")
        .assert()
        .success()
        .stdout("The cache\n");
}

#[test]
fn stats_json_reports_degraded_mode() {
    let home = TempDir::new().unwrap();
    spellcommit(&home)
        .args(["stats", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"has_dictionary\": false"));
}

#[test]
fn local_config_extends_rules() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join(".spellcommit.toml"),
        "technical_words = [\"frobnicator\"]\n\n[typo_rules]\nfrobnicatr = \"frobnicator\"\n",
    )
    .unwrap();

    spellcommit(&home)
        .args(["fix", "frobnicatr frobnicator"])
        .assert()
        .success()
        .stdout("frobnicator frobnicator\n");
}

#[test]
fn personal_dictionary_allowlists_words() {
    let home = TempDir::new().unwrap();
    let personal = home.path().join("words.txt");
    fs::write(&personal, "# team words\nteh\n").unwrap();

    // Allowlisted words are never reported, not even typo-rule keys
    spellcommit(&home)
        .arg("--personal-dict")
        .arg(&personal)
        .args(["check", "teh"])
        .assert()
        .success();
}

#[test]
fn commit_needs_a_terminal() {
    let home = TempDir::new().unwrap();
    spellcommit(&home)
        .args(["commit", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("terminal"));
}

#[test]
fn completion_script() {
    let home = TempDir::new().unwrap();
    spellcommit(&home)
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("spellcommit"));
}
