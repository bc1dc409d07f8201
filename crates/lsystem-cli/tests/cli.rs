//! End-to-end checks against the compiled `lsystem` binary: a grammar file on disk in, an
//! output file and a bounds file out. Driven through `assert_cmd` since this crate carries
//! no library target for an in-process integration test to link against.

use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

const DOUBLING_GRAMMAR: &str = "#define maxgen 2\nstart: F\nF -> F F\n";

#[test]
fn derives_and_writes_a_generic_scene_with_bounds() {
    let dir = tempdir().expect("create temp dir");
    let grammar_path = dir.path().join("doubling.lsys");
    let output_path = dir.path().join("out.txt");
    let bounds_path = dir.path().join("bounds.txt");
    fs::write(&grammar_path, DOUBLING_GRAMMAR).expect("write grammar file");

    Command::cargo_bin("lsystem")
        .expect("find lsystem binary")
        .arg(&grammar_path)
        .arg("-o")
        .arg(&output_path)
        .arg("-b")
        .arg(&bounds_path)
        .arg("--seed")
        .arg("1")
        .assert()
        .success();

    let output = fs::read_to_string(&output_path).expect("read output file");
    // Two generations of `F -> F F` starting from one `F` leaves four `F`s, each a line.
    assert_eq!(output.matches("Start Group").count(), 4);
    assert_eq!(output.matches("line").count(), 4);
    assert!(output.contains("End File"));

    let bounds = fs::read_to_string(&bounds_path).expect("read bounds file");
    assert!(bounds.contains("bounds"));
    assert!(bounds.contains("min:"));
    assert!(bounds.contains("max:"));
}

#[test]
fn maxgen_flag_overrides_the_grammar_s_own_define() {
    let dir = tempdir().expect("create temp dir");
    let grammar_path = dir.path().join("doubling.lsys");
    let output_path = dir.path().join("out.txt");
    let bounds_path = dir.path().join("bounds.txt");
    fs::write(&grammar_path, DOUBLING_GRAMMAR).expect("write grammar file");

    Command::cargo_bin("lsystem")
        .expect("find lsystem binary")
        .arg(&grammar_path)
        .arg("-o")
        .arg(&output_path)
        .arg("-b")
        .arg(&bounds_path)
        .arg("--maxgen")
        .arg("0")
        .assert()
        .success();

    let output = fs::read_to_string(&output_path).expect("read output file");
    assert_eq!(output.matches("Start Group").count(), 1);
}

#[test]
fn rejects_a_grammar_with_no_axiom() {
    let dir = tempdir().expect("create temp dir");
    let grammar_path = dir.path().join("bad.lsys");
    let output_path = dir.path().join("out.txt");
    fs::write(&grammar_path, "F -> F\n").expect("write grammar file");

    let assert = Command::cargo_bin("lsystem")
        .expect("find lsystem binary")
        .arg(&grammar_path)
        .arg("-o")
        .arg(&output_path)
        .assert()
        .failure();

    let stderr = String::from_utf8(assert.get_output().stderr.clone()).expect("utf8 stderr");
    assert!(stderr.contains("could not parse grammar"));
}

#[test]
fn display_flag_prints_each_generation_s_module_string() {
    let dir = tempdir().expect("create temp dir");
    let grammar_path = dir.path().join("doubling.lsys");
    let output_path = dir.path().join("out.txt");
    let bounds_path = dir.path().join("bounds.txt");
    fs::write(&grammar_path, DOUBLING_GRAMMAR).expect("write grammar file");

    let assert = Command::cargo_bin("lsystem")
        .expect("find lsystem binary")
        .arg(&grammar_path)
        .arg("-o")
        .arg(&output_path)
        .arg("-b")
        .arg(&bounds_path)
        .arg("--display")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    insta::assert_snapshot!(stdout, @r###"
    F
    F F
    F F F F
    "###);
}
