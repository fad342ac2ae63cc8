use std::fmt;

use chrono::Utc;
use quiz_core::model::{QuestionDraft, QuizDraft};
use storage::repository::{NewQuizRecord, Storage};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    title: String,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("QUIZ_DB_URL").unwrap_or_else(|_| "sqlite:quizzes.sqlite3?mode=rwc".into());
        let mut title = "Geography".to_string();

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--title" => {
                    title = require_value(&mut args, "--title")?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, title })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:quizzes.sqlite3?mode=rwc)");
    eprintln!("  --title <title>           Title of the sample quiz (default: Geography)");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL");
}

fn sample_questions() -> Vec<QuestionDraft> {
    vec![
        QuestionDraft::new("boolean", "Is Earth round?").with_correct_answers(["True"]),
        QuestionDraft::new("checkbox", "Which of these are oceans?")
            .with_options(["Atlantic", "Sahara", "Pacific", "Alps"])
            .with_correct_answers(["Atlantic", "Pacific"]),
        QuestionDraft::new("input", "What is the capital of Japan?")
            .with_correct_answers(["Tokyo"]),
    ]
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let quiz = QuizDraft::new(args.title, sample_questions()).validate()?;
    let created = storage
        .quizzes
        .create_quiz(NewQuizRecord::from_new_quiz(quiz, Utc::now()))
        .await?;

    println!(
        "Seeded quiz {} ({:?}) with {} questions into {}",
        created.id(),
        created.title(),
        created.questions().len(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
