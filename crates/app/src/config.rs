//! Process configuration: command-line flags with environment fallbacks.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DEFAULT_DB_URL: &str = "sqlite:quizzes.sqlite3";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArgsError {
    #[error("{flag} requires a value")]
    MissingValue { flag: &'static str },
    #[error("unknown argument: {0}")]
    UnknownArg(String),
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
    #[error("invalid --bind value: {raw}")]
    InvalidBindAddr { raw: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_url: String,
    pub bind_addr: String,
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Serve(Config),
    Help,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Config {
    /// Parse flags, falling back to `QUIZ_DB_URL` / `QUIZ_BIND_ADDR` looked up
    /// through `env`, then to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown flags, missing values, or blank values.
    pub fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Invocation, ArgsError> {
        let mut db_url = env("QUIZ_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.into());
        let mut bind_addr = env("QUIZ_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--bind" => {
                    let value = require_value(&mut args, "--bind")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidBindAddr { raw: value });
                    }
                    bind_addr = value;
                }
                "--help" | "-h" => return Ok(Invocation::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Invocation::Serve(Self {
            db_url: normalize_sqlite_url(db_url),
            bind_addr,
        }))
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p quiz-api -- [--db <sqlite_url>] [--bind <addr>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --bind {DEFAULT_BIND_ADDR}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_BIND_ADDR, RUST_LOG (a .env file is honoured)");
}

fn is_memory_url(url: &str) -> bool {
    url == "sqlite::memory:" || url.contains("mode=memory")
}

/// Turn relative file URLs into absolute `sqlite://` URLs.
#[must_use]
pub fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if is_memory_url(trimmed) || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file and its parent directory exist; sqlx does not
/// create them by default.
///
/// # Errors
///
/// Returns an error if the URL has no file path or the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if is_memory_url(db_url) {
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

    let path = Path::new(path);
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
