//! Command-line interface for gradewise.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gradewise", version, about = "Automated short-answer grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a single answer against a model answer
    Grade {
        /// The teacher's reference answer
        #[arg(long)]
        model_answer: String,

        /// The student's answer
        #[arg(long)]
        answer: String,

        /// Expected keywords (comma-separated)
        #[arg(long)]
        keywords: Option<String>,

        /// Marks available for the question
        #[arg(long, default_value = "10")]
        max_marks: f64,

        /// Expected minimum answer length in words
        #[arg(long, default_value = "0")]
        min_words: usize,

        /// Signal weights "semantic,keyword,coherence" (must sum to 1.0)
        #[arg(long)]
        weights: Option<String>,

        /// Scoring policy: default, legacy
        #[arg(long, default_value = "default")]
        policy: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Grade answer sheets for an exam
    Run {
        /// Path to the exam .toml file
        #[arg(long)]
        exam: PathBuf,

        /// Answer sheet .json file or directory of them
        #[arg(long)]
        answers: PathBuf,

        /// Max sheets graded concurrently (default: from config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Override the score of one answer in a submissions file
    Override {
        /// Submissions JSON written by `gradewise run`
        #[arg(long)]
        submissions: PathBuf,

        /// Student ID
        #[arg(long)]
        student: String,

        /// Question number (starting at 1) or question ID
        #[arg(long)]
        question: String,

        /// New score
        #[arg(long)]
        score: f64,
    },

    /// Validate exam TOML files
    Validate {
        /// Path to exam file or directory
        #[arg(long)]
        exam: PathBuf,
    },

    /// Create starter config, example exam, and example answers
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradewise=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            model_answer,
            answer,
            keywords,
            max_marks,
            min_words,
            weights,
            policy,
            json,
        } => commands::grade::execute(commands::grade::GradeArgs {
            model_answer,
            answer,
            keywords,
            max_marks,
            min_words,
            weights,
            policy,
            json,
        }),
        Commands::Run {
            exam,
            answers,
            parallelism,
            output,
            format,
            config,
        } => commands::run::execute(exam, answers, parallelism, output, format, config).await,
        Commands::Override {
            submissions,
            student,
            question,
            score,
        } => commands::override_score::execute(submissions, student, question, score),
        Commands::Validate { exam } => commands::validate::execute(exam),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
