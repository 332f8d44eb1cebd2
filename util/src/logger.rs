//! Logger initialisation
//!
//! Log lines are written to stdout with coloured level tags and to the
//! session log file without colour. Each line is stamped with the seconds
//! elapsed since the session epoch.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{info, Level, Record};
use std::fmt::Arguments;
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level less than `INFO`, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// `module_levels` overrides the level for individual module paths, e.g. to
/// quieten per-point tracing in a hot loop while keeping the rest at debug.
///
/// `min_level` must be at least `Info`. This function must only be called once
/// per process.
pub fn logger_init(
    min_level: LevelFilter,
    module_levels: &[(&'static str, LevelFilter)],
    session: &Session,
) -> Result<(), LoggerInitError> {
    if min_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    let log_file =
        fern::log_file(&session.log_file_path).map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new().level(min_level);
    for &(module, level) in module_levels {
        dispatch = dispatch.level_for(module, level);
    }

    dispatch
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{}",
                        format_line(record, coloured_level(record.level()), message)
                    ))
                })
                .chain(std::io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{}",
                        format_line(record, plain_level(record.level()), message)
                    ))
                })
                .chain(log_file),
        )
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    if let Some(epoch) = session::get_epoch() {
        info!("    Session epoch: {}", epoch);
    }
    info!("    Log level: {:?}", min_level);
    for (module, level) in module_levels {
        info!("    Log level for {}: {:?}", module, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Build one log line. Debug and trace lines include the record target.
fn format_line<L: std::fmt::Display>(record: &Record, level: L, message: &Arguments) -> String {
    if record.level() > Level::Info {
        format!(
            "[{:10.6} {}] {}: {}",
            session::get_elapsed_seconds(),
            level,
            record.target(),
            message
        )
    } else {
        format!(
            "[{:10.6} {}] {}",
            session::get_elapsed_seconds(),
            level,
            message
        )
    }
}

fn plain_level(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRC",
        Level::Debug => "DBG",
        Level::Info => "INF",
        Level::Warn => "WRN",
        Level::Error => "ERR",
    }
}

fn coloured_level(level: Level) -> ColoredString {
    let tag = plain_level(level);
    match level {
        Level::Trace => tag.dimmed().italic(),
        Level::Debug => tag.dimmed(),
        Level::Info => tag.normal(),
        Level::Warn => tag.yellow(),
        Level::Error => tag.red().bold(),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_line() {
        let record = Record::builder()
            .level(Level::Debug)
            .target("hwy_lib::path_ctrl")
            .build();
        let line = format_line(&record, plain_level(Level::Debug), &format_args!("x = {}", 3));
        assert!(line.ends_with("DBG] hwy_lib::path_ctrl: x = 3"), "{}", line);

        let record = Record::builder().level(Level::Warn).target("hwy_exec").build();
        let line = format_line(&record, plain_level(Level::Warn), &format_args!("slow"));
        assert!(line.ends_with("WRN] slow"), "{}", line);
    }
}
