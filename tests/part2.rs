use assert_cmd::Command;
use predicates::prelude::predicate::str;

#[test]
fn part2_output_right_answer() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/data/example.txt");

    cmd.assert().success().stdout(str::contains("6 location(s)"));
}

#[test]
fn part2_in_place_output_right_answer() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/data/example.txt").arg("--in-place");

    cmd.assert().success().stdout(str::contains("6 location(s)"));
}

#[test]
fn part2_patrol_path_candidates_with_jobs() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/data/example.txt")
        .arg("--candidates")
        .arg("patrol-path")
        .arg("--jobs")
        .arg("2");

    cmd.assert().success().stdout(str::contains("6 location(s)"));
}

#[test]
fn part2_rejects_multiple_guards() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/data/two_guards.txt");

    cmd.assert()
        .failure()
        .stderr(str::contains("Guard ^(2, 2) and guard ^(5, 4) both found"));
}

#[test]
fn part2_patrol_path_candidates_when_guard_already_loops() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/data/boxed_in.txt")
        .arg("--candidates")
        .arg("patrol-path");

    cmd.assert().success().stdout(str::contains("4 location(s)"));
}
