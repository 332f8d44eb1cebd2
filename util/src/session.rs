//! Session management
//!
//! A session is one run of an executable. Each session gets its own
//! timestamped directory holding the log file, the archives and a snapshot of
//! the parameters the run used.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::{OnceCell, TryInitError};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal imports
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

/// Time the first session of this process was started.
static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Format of the timestamp in session directory names, see
/// https://docs.rs/chrono/0.4.11/chrono/format/strftime/index.html.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Session {
    /// The root directory for this session
    pub session_root: PathBuf,

    /// The root directory for this session's archives
    pub arch_root: PathBuf,

    /// The path to the session's log file
    pub log_file_path: PathBuf,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (HWY_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error("Cannot initialise the session epoch (conquer_once error: {0})")]
    CannotInitEpoch(TryInitError),

    #[error("Cannot get the epoch time")]
    CannotGetEpoch,

    #[error("Cannot serialise the parameter snapshot: {0}")]
    ParamSerialiseError(toml::ser::Error),

    #[error("Cannot write the parameter snapshot: {0}")]
    ParamWriteError(std::io::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start a new session in `$HWY_SW_ROOT/{sessions_dir}`.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let root = crate::host::get_sw_root().map_err(|_| SessionError::SwRootNotSet)?;
        Self::new_in(root.join(sessions_dir), exec_name)
    }

    /// Start a new session in the given directory.
    ///
    /// The session directory is named `{exec_name}_{timestamp}`, where the
    /// timestamp is the session epoch. The epoch is set by the first session
    /// started in the process and shared by any later ones.
    pub fn new_in<P: AsRef<Path>>(sessions_dir: P, exec_name: &str) -> Result<Self, SessionError> {
        match SESSION_EPOCH.try_init_once(Utc::now) {
            Ok(()) | Err(TryInitError::AlreadyInit) => (),
            Err(e) => return Err(SessionError::CannotInitEpoch(e)),
        }

        let timestamp = match SESSION_EPOCH.get() {
            Some(e) => e.format(TIMESTAMP_FORMAT),
            None => return Err(SessionError::CannotGetEpoch),
        };

        let session_root = sessions_dir
            .as_ref()
            .join(format!("{}_{}", exec_name, timestamp));
        let arch_root = session_root.join("arch");

        fs::create_dir_all(&arch_root).map_err(SessionError::CannotCreateDir)?;

        Ok(Session {
            log_file_path: session_root.join(format!("{}.log", exec_name)),
            session_root,
            arch_root,
        })
    }

    /// Write a copy of a parameter set into the session's `params` directory.
    pub fn save_params<P: Serialize>(&self, file_name: &str, params: &P) -> Result<(), SessionError> {
        let params_str = toml::to_string(params).map_err(SessionError::ParamSerialiseError)?;

        let params_dir = self.session_root.join("params");
        fs::create_dir_all(&params_dir).map_err(SessionError::ParamWriteError)?;
        fs::write(params_dir.join(file_name), params_str).map_err(SessionError::ParamWriteError)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the number of seconds elapsed since the session epoch.
///
/// Returns zero if no session has been started, so that logging from code run
/// outside a session (unit tests, benches) is still well formed.
pub fn get_elapsed_seconds() -> f64 {
    match SESSION_EPOCH.get() {
        Some(e) => time::duration_to_seconds(Utc::now() - *e).unwrap_or(std::f64::NAN),
        None => 0.0,
    }
}

/// The session epoch, if a session has been started.
pub fn get_epoch() -> Option<&'static DateTime<Utc>> {
    SESSION_EPOCH.get()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
