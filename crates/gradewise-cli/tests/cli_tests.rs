//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `gradewise` command isolated from any user configuration.
fn gradewise(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("gradewise").unwrap();
    cmd.env("HOME", home)
        .env_remove("GRADEWISE_PARALLELISM")
        .env_remove("GRADEWISE_OUTPUT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == extension))
        .collect();
    files.sort();
    files
}

fn run_biology(home: &TempDir, output: &Path, format: &str) {
    gradewise(home.path())
        .arg("run")
        .arg("--exam")
        .arg("../../exams/biology.toml")
        .arg("--answers")
        .arg("../../answers/biology.json")
        .arg("--output")
        .arg(output)
        .arg("--format")
        .arg(format)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Lovelace"))
        .stdout(predicate::str::contains("Mean"))
        .stdout(predicate::str::contains("Passed "));
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    gradewise(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Automated short-answer grading"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    gradewise(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gradewise"));
}

#[test]
fn grade_exact_match() {
    let home = TempDir::new().unwrap();
    gradewise(home.path())
        .args(["grade", "--model-answer", "Paris is the capital of France"])
        .args(["--answer", "paris is the capital of france!"])
        .args(["--keywords", "Paris"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 10 / 10 (100.0%)"))
        .stdout(predicate::str::contains("Perfect answer!"));
}

#[test]
fn grade_json_output() {
    let home = TempDir::new().unwrap();
    let output = gradewise(home.path())
        .args(["grade", "--model-answer", "The mitochondria produces ATP."])
        .args(["--answer", "Mitochondria make energy for cells."])
        .args(["--keywords", "mitochondria,ATP"])
        .args(["--max-marks", "5", "--min-words", "8", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["max_marks"], 5.0);
    assert_eq!(value["outcome"], "graded");
    assert_eq!(value["matched_keywords"], serde_json::json!(["mitochondria"]));
    assert_eq!(value["missed_keywords"], serde_json::json!(["ATP"]));
    let score = value["score"].as_f64().unwrap();
    assert!(score > 0.0 && score < 5.0);
    let concerns = value["concerns"].as_array().unwrap();
    assert!(concerns.contains(&serde_json::json!("incomplete")));
}

#[test]
fn grade_empty_answer() {
    let home = TempDir::new().unwrap();
    gradewise(home.path())
        .args(["grade", "--model-answer", "Photosynthesis", "--answer", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0 / 10"))
        .stdout(predicate::str::contains("No answer was provided"));
}

#[test]
fn grade_rejects_bad_weights() {
    let home = TempDir::new().unwrap();
    gradewise(home.path())
        .args(["grade", "--model-answer", "x", "--answer", "y"])
        .args(["--weights", "0.5,0.5,0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("sum to 1.0"));

    gradewise(home.path())
        .args(["grade", "--model-answer", "x", "--answer", "y"])
        .args(["--weights", "half,half"])
        .assert()
        .failure();
}

#[test]
fn grade_rejects_unknown_policy() {
    let home = TempDir::new().unwrap();
    gradewise(home.path())
        .args(["grade", "--model-answer", "x", "--answer", "y", "--policy", "generous"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown policy preset"));
}

#[test]
fn grade_legacy_policy() {
    let home = TempDir::new().unwrap();
    gradewise(home.path())
        .args(["grade", "--model-answer", "A hospital treats sick people."])
        .args(["--answer", "hospital", "--min-words", "15", "--policy", "legacy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Coherence:  0.000"));
}

#[test]
fn validate_valid_exam() {
    let home = TempDir::new().unwrap();
    gradewise(home.path())
        .args(["validate", "--exam", "../../exams/biology.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cell Biology Quiz"))
        .stdout(predicate::str::contains("3 questions"))
        .stdout(predicate::str::contains("All exams valid"));
}

#[test]
fn validate_directory() {
    let home = TempDir::new().unwrap();
    gradewise(home.path())
        .args(["validate", "--exam", "../../exams"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cell Biology Quiz"))
        .stdout(predicate::str::contains("World Capitals"));
}

#[test]
fn validate_reports_warnings() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("bad.toml");
    std::fs::write(
        &path,
        r#"
[exam]
id = "bad"
title = "Bad Exam"

[[questions]]
id = "q1"
model_answer = ""
max_marks = 0
"#,
    )
    .unwrap();

    gradewise(home.path())
        .arg("validate")
        .arg("--exam")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[q1] WARNING: model answer is empty"))
        .stdout(predicate::str::contains("2 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    let home = TempDir::new().unwrap();
    gradewise(home.path())
        .args(["validate", "--exam", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    gradewise(dir.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created gradewise.toml"))
        .stdout(predicate::str::contains("Created exams/example.toml"))
        .stdout(predicate::str::contains("Created answers/example.json"));

    assert!(dir.path().join("gradewise.toml").exists());
    assert!(dir.path().join("exams/example.toml").exists());
    assert!(dir.path().join("answers/example.json").exists());

    // The generated files work together.
    gradewise(dir.path())
        .current_dir(dir.path())
        .args(["validate", "--exam", "exams/example.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All exams valid"));

    gradewise(dir.path())
        .current_dir(dir.path())
        .args(["run", "--exam", "exams/example.toml", "--answers", "answers/example.json"])
        .assert()
        .success();
    assert_eq!(
        files_with_extension(&dir.path().join("gradewise-results"), "json").len(),
        1
    );
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    gradewise(dir.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    gradewise(dir.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn run_writes_json_and_html() {
    let home = TempDir::new().unwrap();
    let output = home.path().join("results");
    run_biology(&home, &output, "all");

    let json = files_with_extension(&output, "json");
    assert_eq!(json.len(), 1);
    assert_eq!(files_with_extension(&output, "html").len(), 1);

    let set: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json[0]).unwrap()).unwrap();
    let submissions = set["submissions"].as_array().unwrap();
    let ids: Vec<&str> = submissions
        .iter()
        .map(|s| s["student_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["s001", "s002", "s003"]);
    assert_eq!(set["exam"]["total_marks"], 14.0);

    // Exact match on the first question.
    assert_eq!(submissions[0]["results"][0]["score"], 5.0);
    assert_eq!(submissions[0]["results"][0]["outcome"], "exact_match");
    // Short sheet: the missing answer is graded blank.
    assert_eq!(submissions[1]["results"][2]["answer_text"], "(no answer)");
    assert_eq!(submissions[1]["results"][2]["score"], 0.0);
    assert_eq!(submissions[2]["results"][0]["outcome"], "no_answer");
    assert_eq!(submissions[2]["results"][1]["outcome"], "no_answer");
}

#[test]
fn run_rejects_unknown_format() {
    let home = TempDir::new().unwrap();
    gradewise(home.path())
        .args(["run", "--exam", "../../exams/biology.toml"])
        .args(["--answers", "../../answers/biology.json"])
        .arg("--output")
        .arg(home.path())
        .args(["--format", "sarif"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown output format"));
}

#[test]
fn run_uses_config_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.toml");
    let output = home.path().join("from-config");
    std::fs::write(
        &config,
        format!(
            "output_dir = {:?}\nparallelism = 1\n\n[policy]\npreset = \"legacy\"\n",
            output.display().to_string()
        ),
    )
    .unwrap();

    gradewise(home.path())
        .args(["run", "--exam", "../../exams/biology.toml"])
        .args(["--answers", "../../answers/biology.json"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("policy: legacy"));

    assert_eq!(files_with_extension(&output, "json").len(), 1);
}

#[test]
fn run_rejects_invalid_config_weights() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.toml");
    std::fs::write(
        &config,
        "[policy]\nweights = { semantic = 0.9, keyword = 0.9, coherence = 0.9 }\n",
    )
    .unwrap();

    gradewise(home.path())
        .args(["run", "--exam", "../../exams/biology.toml"])
        .args(["--answers", "../../answers/biology.json"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("weights must sum to 1.0"));
}

#[test]
fn override_updates_totals() {
    let home = TempDir::new().unwrap();
    let output = home.path().join("results");
    run_biology(&home, &output, "json");
    let path = files_with_extension(&output, "json").remove(0);

    gradewise(home.path())
        .arg("override")
        .arg("--submissions")
        .arg(&path)
        .args(["--student", "s003", "--question", "1", "--score", "4.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s003 [powerhouse]: 0 -> 4.5"));

    gradewise(home.path())
        .arg("override")
        .arg("--submissions")
        .arg(&path)
        .args(["--student", "s003", "--question", "photosynthesis", "--score", "2"])
        .assert()
        .success();

    let set: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let s003 = &set["submissions"][2];
    assert_eq!(s003["results"][0]["score"], 4.5);
    assert_eq!(s003["results"][0]["percentage"], 90.0);
    assert_eq!(s003["results"][0]["overridden"], true);
    assert_eq!(s003["results"][1]["score"], 2.0);

    let sum: f64 = s003["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["score"].as_f64().unwrap())
        .sum();
    let total = s003["total_score"].as_f64().unwrap();
    assert!((total - sum).abs() < 0.011, "total {total} vs sum {sum}");
}

#[test]
fn override_rejects_bad_input() {
    let home = TempDir::new().unwrap();
    let output = home.path().join("results");
    run_biology(&home, &output, "json");
    let path = files_with_extension(&output, "json").remove(0);
    let before = std::fs::read_to_string(&path).unwrap();

    gradewise(home.path())
        .arg("override")
        .arg("--submissions")
        .arg(&path)
        .args(["--student", "s001", "--question", "1", "--score", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));

    gradewise(home.path())
        .arg("override")
        .arg("--submissions")
        .arg(&path)
        .args(["--student", "s001", "--question", "9", "--score", "1"])
        .assert()
        .failure();

    gradewise(home.path())
        .arg("override")
        .arg("--submissions")
        .arg(&path)
        .args(["--student", "nobody", "--question", "1", "--score", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no submission found"));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}
