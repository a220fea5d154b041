use std::fmt;

use quiz_core::content::sample_questions;
use quiz_core::model::{SessionKey, TravelMode};
use services::{AppServices, Clock, ShuffleSource};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;

mod terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidMode { raw: String },
    InvalidUser { raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidMode { raw } => {
                write!(f, "invalid --mode value (expected normal or express): {raw}")
            }
            ArgsError::InvalidUser { raw } => write!(f, "invalid --user value: {raw:?}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
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

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    std::env::var(key).ok()?.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    mode: Option<TravelMode>,
    user: SessionKey,
    seed: Option<u64>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play [--db <sqlite_url>] [--mode <normal|express>]");
    eprintln!("                           [--user <name>] [--seed <u64>]");
    eprintln!("  cargo run -p app -- seed [--db <sqlite_url>]   # load the built-in questions");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:rail_quiz.sqlite3");
    eprintln!("  --user player");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  RAIL_QUIZ_DB_URL, RAIL_QUIZ_MODE, RAIL_QUIZ_USER, RAIL_QUIZ_SEED");
    eprintln!("  RUST_LOG controls log output on stderr (default: info)");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = normalize_sqlite_url(
            std::env::var("RAIL_QUIZ_DB_URL").unwrap_or_else(|_| "rail_quiz.sqlite3".into()),
        );
        let mut mode: Option<TravelMode> = read_env("RAIL_QUIZ_MODE");
        let mut user = std::env::var("RAIL_QUIZ_USER").unwrap_or_else(|_| "player".into());
        let mut seed: Option<u64> = read_env("RAIL_QUIZ_SEED");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--mode" => {
                    let value = require_value(args, "--mode")?;
                    let parsed = value
                        .parse::<TravelMode>()
                        .map_err(|_| ArgsError::InvalidMode { raw: value.clone() })?;
                    mode = Some(parsed);
                }
                "--user" => {
                    user = require_value(args, "--user")?;
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed = value
                        .parse::<u64>()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let user = SessionKey::new(user.clone()).map_err(|_| ArgsError::InvalidUser { raw: user })?;

        Ok(Self {
            db_url,
            mode,
            user,
            seed,
        })
    }

    fn shuffle(&self) -> ShuffleSource {
        self.seed.map_or(ShuffleSource::Thread, ShuffleSource::Seeded)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means play.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;

    match cmd {
        Command::Play => {
            let services =
                AppServices::new_sqlite(&parsed.db_url, Clock::default_clock(), parsed.shuffle())
                    .await?;
            tracing::info!(user = parsed.user.as_str(), db = %parsed.db_url, "starting play loop");
            terminal::play(&services.game_loop(), &parsed.user, parsed.mode).await
        }
        Command::Seed => {
            let storage = Storage::sqlite(&parsed.db_url).await?;
            let questions = sample_questions()?;
            storage.questions.replace_questions(&questions).await?;
            tracing::info!(
                count = questions.len(),
                db = %parsed.db_url,
                "seeded built-in questions"
            );
            Ok(())
        }
    }
}

/// `RUST_LOG` directives when set and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // Binary glue reports once.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn rust_log_level_is_respected() {
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(Some("warn")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn missing_or_blank_rust_log_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some("  ")).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn sqlite_urls_are_made_absolute() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        let url = normalize_sqlite_url("sqlite:quiz.sqlite3".into());
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("quiz.sqlite3"));
    }
}
