//! Error types for Drover
//!
//! Uses `thiserror` for library errors. Transport-level failures carry their
//! own enum in `crate::remote` and are wrapped here.

use std::path::PathBuf;
use thiserror::Error;

use crate::remote::TransportError;

/// Result type alias for Drover operations
pub type DroverResult<T> = Result<T, DroverError>;

/// Main error type for Drover operations
#[derive(Error, Debug)]
pub enum DroverError {
    /// Cannot write or overwrite a local config file
    #[error("failed to write local config '{path}': {source}")]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Upload or remote command channel unreachable/rejected
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Remote shell snippet exited non-zero
    #[error("remote command for task '{task}' failed with exit code {code}: {stderr}")]
    RemoteCommand {
        task: String,
        code: i32,
        stderr: String,
    },

    /// Uploaded file does not match the locally rendered content
    #[error("verification failed for '{file}': local {local_hash} != remote {remote_hash}")]
    VerifyMismatch {
        file: String,
        local_hash: String,
        remote_hash: String,
    },

    /// Config file cannot be read
    #[error("failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file cannot be parsed
    #[error("invalid config in '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Required setting missing from config file and flags
    #[error("missing required setting '{key}' - set it in drover.toml or pass --{flag}")]
    MissingSetting {
        key: &'static str,
        flag: &'static str,
    },

    /// Task aborted at the confirmation prompt
    #[error("task aborted by user")]
    Aborted,
}
