#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn cardscan() -> Command {
    Command::cargo_bin("cardscan").expect("cardscan binary")
}

fn render(dir: &Path, name: &str, text: &str, back: bool) -> PathBuf {
    let out = dir.join(name);
    let mut cmd = cardscan();
    cmd.args(["render", "--text", text, "--out"]).arg(&out);
    if back {
        cmd.arg("--back");
    }
    cmd.assert().success();
    out
}

#[test]
fn table_lists_every_ebcdic_byte() {
    cardscan()
        .arg("table")
        .assert()
        .success()
        .stdout(predicate::str::contains("0xC1    100100000000  12-1        A"))
        .stdout(predicate::str::contains("0x50    100000000000  12          &"))
        .stdout(predicate::function(|out: &str| out.lines().count() == 257));
}

#[test]
fn matching_pair_verifies_good() {
    let dir = tempfile::tempdir().expect("tempdir");
    let front = render(dir.path(), "card_f.png", "       DIMENSION A(10)", false);
    let back = render(dir.path(), "card_b.png", "       DIMENSION A(10)", true);

    cardscan()
        .arg("verify")
        .arg(&front)
        .arg(&back)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("good        DIMENSION A(10)"))
        .stdout(predicate::str::contains("# fs").not());
}

#[test]
fn mismatched_pair_fails_with_dumps() {
    let dir = tempfile::tempdir().expect("tempdir");
    let front = render(dir.path(), "one_f.png", "HELLO", false);
    let other = render(dir.path(), "two_b.png", "WORLD", true);
    let good_front = render(dir.path(), "three_f.png", "SAME", false);
    let good_back = render(dir.path(), "three_b.png", "SAME", true);

    cardscan()
        .arg("verify")
        .args([&good_front, &good_back, &front, &other])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("good SAME"))
        .stdout(predicate::str::contains("bad  HELLO"))
        .stdout(predicate::str::contains("# fs HELLO"))
        .stdout(predicate::str::contains("# bs WORLD"));
}

#[test]
fn odd_image_count_is_a_usage_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = render(dir.path(), "a.png", "A", false);
    let b = render(dir.path(), "b.png", "A", true);
    cardscan()
        .arg("verify")
        .args([&a, &b, &a])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("FRONT BACK pairs"));
}

#[test]
fn verify_writes_debug_images() {
    let dir = tempfile::tempdir().expect("tempdir");
    let front = render(dir.path(), "deck_f.png", "X", false);
    let back = render(dir.path(), "deck_b.png", "X", true);
    let debug_dir = dir.path().join("debug");

    cardscan()
        .arg("verify")
        .arg(&front)
        .arg(&back)
        .arg("--debug-dir")
        .arg(&debug_dir)
        .assert()
        .success();
    assert!(debug_dir.join("001-front-deck_f.png").is_file());
    assert!(debug_dir.join("001-back-deck_b.png").is_file());
}

#[test]
fn debug_images_with_equal_stems_do_not_collide() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut images = Vec::new();
    for (deck, text) in [("deck1", "ONE"), ("deck2", "TWO")] {
        let sub = dir.path().join(deck);
        std::fs::create_dir(&sub).expect("mkdir");
        images.push(render(&sub, "card.png", text, false));
        images.push(render(&sub, "card_back.png", text, true));
    }
    let debug_dir = dir.path().join("debug");

    cardscan()
        .arg("verify")
        .args(&images)
        .arg("--debug-dir")
        .arg(&debug_dir)
        .assert()
        .success();
    let written = std::fs::read_dir(&debug_dir).expect("debug dir").count();
    assert_eq!(written, 4);
    assert!(debug_dir.join("001-front-card.png").is_file());
    assert!(debug_dir.join("002-front-card.png").is_file());
}

#[test]
fn read_prints_text_and_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let back = render(dir.path(), "card_b.png", "$1", true);

    cardscan()
        .args(["read", "--back", "--national", "danish"])
        .arg(&back)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Å1"))
        .stdout(predicate::function(|out: &str| out.lines().count() == 13));
}

#[test]
fn read_json_reports_quality() {
    let dir = tempfile::tempdir().expect("tempdir");
    let front = render(dir.path(), "card_f.png", "JSON", false);

    let output = cardscan()
        .args(["read", "--json"])
        .arg(&front)
        .output()
        .expect("run");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert!(report["text"]
        .as_str()
        .is_some_and(|t| t.starts_with("JSON ")));
    assert_eq!(report["quality"]["front_edge_found"], true);
    assert_eq!(report["reading"]["values"].as_array().map(Vec::len), Some(80));
}

#[test]
fn config_file_and_polarity_flag_are_applied() {
    let dir = tempfile::tempdir().expect("tempdir");
    let front = render(dir.path(), "card_f.png", "A", false);
    let config = dir.path().join("params.json");
    std::fs::write(&config, r#"{"dpi": -1.0}"#).expect("write");

    cardscan()
        .arg("read")
        .arg(&front)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("dpi must be positive"));

    // inverted polarity sees no card at all, so nothing is punched
    cardscan()
        .args(["read", "--polarity", "bright-holes"])
        .arg(&front)
        .assert()
        .success()
        .stdout(predicate::str::contains("#").not());
}

#[test]
fn render_rejects_text_longer_than_a_card() {
    let dir = tempfile::tempdir().expect("tempdir");
    cardscan()
        .args(["render", "--text", &"9".repeat(81), "--out"])
        .arg(dir.path().join("long.png"))
        .assert()
        .failure();
}
