//! The `gradewise init` command.

use std::path::Path;

use anyhow::{Context, Result};

use gradewise_core::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG_TOML};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new(CONFIG_FILE_NAME), DEFAULT_CONFIG_TOML)?;
    write_if_missing(Path::new("exams/example.toml"), EXAMPLE_EXAM)?;
    write_if_missing(Path::new("answers/example.json"), EXAMPLE_ANSWERS)?;

    println!("\nNext steps:");
    println!("  1. Edit exams/example.toml with your own questions");
    println!("  2. Run: gradewise validate --exam exams/example.toml");
    println!("  3. Run: gradewise run --exam exams/example.toml --answers answers/example.json");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

const EXAMPLE_EXAM: &str = r#"[exam]
id = "example"
title = "Example Science Quiz"
subject = "Science"
duration_minutes = 15

[[questions]]
id = "powerhouse"
text = "What is the powerhouse of the cell, and what does it produce?"
model_answer = "The mitochondria is the powerhouse of the cell. It produces ATP through cellular respiration."
keywords = ["mitochondria", "ATP", "respiration"]
max_marks = 5
min_words = 8

[[questions]]
id = "photosynthesis"
text = "Briefly describe photosynthesis."
model_answer = "Photosynthesis is the process by which plants use sunlight, water and carbon dioxide to produce glucose and oxygen."
keywords = ["sunlight", "carbon dioxide", "glucose", "oxygen"]
max_marks = 5
min_words = 10
"#;

const EXAMPLE_ANSWERS: &str = r#"[
  {
    "student_id": "s001",
    "student_name": "Ada Lovelace",
    "answers": [
      "The mitochondria is the powerhouse of the cell. It produces ATP through cellular respiration.",
      "Plants use sunlight and water to make glucose, releasing oxygen."
    ]
  },
  {
    "student_id": "s002",
    "student_name": "Alan Turing",
    "answers": [
      "Mitochondria make energy.",
      "(no answer)"
    ]
  }
]
"#;
