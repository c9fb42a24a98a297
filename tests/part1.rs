use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn part1_output_right_answer() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/example.txt");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("41 position(s)"));
}

#[test]
fn part1_draws_patrol() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/example.txt").arg("--draw");

    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains(".#XXXXXXX.")
                .and(predicate::str::contains("41 position(s)")),
        );
}

#[test]
fn part1_rejects_ragged_rows() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/ragged.txt");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Row has 9 tile(s) while the first row has 10."));
}

#[test]
fn part1_reports_missing_file() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/no_such_lab.txt");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read laboratory layout"));
}

#[test]
fn part1_help_lists_guard_markers() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("'>', 'v' or '<' for a guard facing right, down or left"));
}
