use chrono::{Local, NaiveDateTime};
use env_logger::{Builder, Env, Target};
use log::Level;
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file: {0}")]
    Open(#[from] std::io::Error),
    #[error("Logger already initialized: {0}")]
    Init(#[from] log::SetLoggerError),
}

/// `2024-03-05 14:07:09,042 - ERROR - message`
pub fn format_line(timestamp: NaiveDateTime, level: Level, message: impl Display) -> String {
    format!(
        "{} - {} - {}",
        timestamp.format("%Y-%m-%d %H:%M:%S,%3f"),
        level,
        message
    )
}

/// Installs env_logger with `timestamp - LEVEL - message` lines, appended to
/// `log_file` when one is given and written to stderr otherwise.
pub fn init(log_file: Option<&Path>) -> Result<(), LoggingError> {
    let mut builder = Builder::from_env(Env::new().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{}",
            format_line(Local::now().naive_local(), record.level(), record.args())
        )
    });

    if let Some(path) = log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init()?;
    Ok(())
}
