use std::fmt;
use std::path::PathBuf;

use quiz_core::content::sample_questions;
use quiz_core::model::{Question, QuestionDraft};
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    file: Option<PathBuf>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidFile { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidFile { raw } => write!(f, "invalid --file value: {raw}"),
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
        let mut db_url = std::env::var("RAIL_QUIZ_DB_URL")
            .unwrap_or_else(|_| "sqlite:rail_quiz.sqlite3?mode=rwc".into());
        let mut file = std::env::var("RAIL_QUIZ_QUESTIONS").ok().map(PathBuf::from);

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
                "--file" => {
                    let value = require_value(&mut args, "--file")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidFile { raw: value });
                    }
                    file = Some(PathBuf::from(value));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, file })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>    SQLite URL (default: sqlite:rail_quiz.sqlite3?mode=rwc)");
    eprintln!("  --file <path>        JSON array of questions (default: built-in sample set)");
    eprintln!("  -h, --help           Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  RAIL_QUIZ_DB_URL, RAIL_QUIZ_QUESTIONS");
}

fn load_questions(file: Option<&PathBuf>) -> Result<Vec<Question>, Box<dyn std::error::Error>> {
    let Some(path) = file else {
        return Ok(sample_questions()?);
    };
    let raw = std::fs::read_to_string(path)?;
    let drafts: Vec<QuestionDraft> = serde_json::from_str(&raw)?;
    let questions = drafts
        .into_iter()
        .map(QuestionDraft::validate)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(questions)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let questions = load_questions(args.file.as_ref())?;
    let storage = Storage::sqlite(&args.db_url).await?;
    storage.questions.replace_questions(&questions).await?;

    println!(
        "Seeded {} questions into {}",
        questions.len(),
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
