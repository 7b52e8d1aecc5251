// Drives the built binary end to end
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn cfg_oracle() -> Command {
    Command::cargo_bin("cfg-oracle").unwrap()
}

#[test]
fn batch_matches_expected_output() {
    let expected = fs::read_to_string("example_data/output_cfg.txt").unwrap();

    cfg_oracle()
        .args(["batch", "example_data/input_cfg.txt", "-"])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn batch_reads_stdin() {
    cfg_oracle()
        .args(["batch", "-", "-"])
        .write_stdin("4\naaa\naab\nend\n9\naaa\nend\n")
        .assert()
        .success()
        .stdout("4\naccepted\nnot accepted\nx\n9\nInvalid problem number\nx\n");
}

#[test]
fn batch_writes_output_file() {
    let output = std::env::temp_dir().join(format!("cfg-oracle-{}.txt", std::process::id()));

    cfg_oracle()
        .arg("batch")
        .arg("example_data/input_cfg.txt")
        .arg(&output)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    let _ = fs::remove_file(&output);
    assert_eq!(written, fs::read_to_string("example_data/output_cfg.txt").unwrap());
}

#[test]
fn batch_missing_input_fails() {
    cfg_oracle()
        .args(["batch", "example_data/nope.txt", "-"])
        .assert()
        .failure()
        .stderr(contains("Could not open"));
}

#[test]
fn check_builtin_problem() {
    cfg_oracle()
        .args(["check", "--problem", "4", "aaa", "aaaaab", "aaaab", "aab", "ε"])
        .assert()
        .success()
        .stdout("aaa: accepted\naaaaab: accepted\naaaab: not accepted\naab: not accepted\nε: not accepted\n");
}

#[test]
fn check_grammar_file() {
    cfg_oracle()
        .args(["check", "--grammar", "example_data/balanced.cfg", "abba", "aab"])
        .assert()
        .success()
        .stdout("abba: accepted\naab: not accepted\n");
}

#[test]
fn check_with_budget_reports_exhaustion() {
    cfg_oracle()
        .args(["check", "--grammar", "example_data/divergent.cfg", "--max-expansions", "100", "aa", "b"])
        .assert()
        .success()
        .stdout("aa: accepted\nb: search exhausted\n");
}

#[test]
fn check_unknown_problem_fails() {
    cfg_oracle()
        .args(["check", "--problem", "6", "ab"])
        .assert()
        .failure()
        .stderr(contains("Invalid problem number 6"));
}

#[test]
fn malformed_grammar_lists_every_error() {
    cfg_oracle()
        .args(["show", "--grammar", "example_data/malformed.cfg"])
        .assert()
        .failure()
        .stderr(
            contains("malformed.cfg:3")
                .and(contains("malformed.cfg:5"))
                .and(contains("malformed.cfg:6"))
                .and(contains("Unmatched quotes")),
        );
}

#[test]
fn show_builtin_problem() {
    cfg_oracle()
        .args(["show", "-p", "3"])
        .assert()
        .success()
        .stdout(contains("S = aAb | bAa | aSb | bSa | aSa | bSb\nA = aA | bA | ε\n"));
}

#[test]
fn generated_strings_are_accepted() {
    let output = cfg_oracle()
        .args(["generate", "-p", "4", "-n", "5"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let samples: Vec<String> = String::from_utf8(output).unwrap().lines().map(str::to_string).collect();
    assert_eq!(samples.len(), 5);

    cfg_oracle()
        .args(["check", "-p", "4"])
        .args(&samples)
        .assert()
        .success()
        .stdout(contains("not accepted").not());
}

#[test]
fn verbose_logging_goes_to_stderr() {
    cfg_oracle()
        .args(["-vv", "check", "-p", "1", "ab"])
        .assert()
        .success()
        .stdout("ab: accepted\n")
        .stderr(contains("[DEBUG]"));
}
