//! Remote execution and upload ports
//!
//! Abstracts the remote channel behind the [`Transport`] trait so tasks can
//! be exercised against a recording double in tests. A non-zero exit status
//! from a remote script is data, not a transport failure: `run` returns the
//! captured [`CommandOutput`] either way, and the task layer decides what a
//! failure means. Transport errors cover only the channel itself.

mod ssh;

pub use ssh::SshTransport;

use std::path::Path;

use thiserror::Error;

/// Error on the remote channel (connection, spawn, upload)
#[derive(Error, Debug)]
pub enum TransportError {
    /// Could not reach the remote host or spawn the channel process
    #[error("connection to '{host}' failed: {message}")]
    Connection { host: String, message: String },

    /// Upload rejected or destination path could not be created
    #[error("upload of '{file}' to '{host}' failed: {message}")]
    Upload {
        host: String,
        file: String,
        message: String,
    },

    /// Local staging error while preparing an upload
    #[error("staging error: {0}")]
    Staging(String),

    /// Remote output was not valid UTF-8
    #[error("remote output was not valid UTF-8: {0}")]
    InvalidOutput(String),
}

/// Captured result of one remote script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Remote command-execution and file-upload channel
pub trait Transport {
    /// Display name of the remote destination
    fn host(&self) -> &str;

    /// Run a shell script on the remote host and capture its output
    fn run(&self, script: &str) -> Result<CommandOutput, TransportError>;

    /// Copy a local file to an absolute remote path, byte for byte
    fn upload(&self, local: &Path, remote: &str) -> Result<(), TransportError>;

    /// SHA-256 of a remote file, via `sha256sum` over the command channel
    fn remote_hash(&self, remote: &str) -> Result<Option<String>, TransportError> {
        let output = self.run(&format!("sha256sum {}", shell_quote(remote)))?;
        if !output.success() {
            return Ok(None);
        }
        Ok(output
            .stdout
            .split_whitespace()
            .next()
            .map(|h| h.to_string()))
    }
}

/// Quote a string for safe interpolation into a remote shell command
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_quote_wraps_in_single_quotes() {
        assert_eq!(shell_quote("/srv/app/config"), "'/srv/app/config'");
    }

    #[test]
    fn shell_quote_escapes_embedded_quotes() {
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn command_output_success_tracks_exit_code() {
        let ok = CommandOutput {
            code: 0,
            stdout: String::new(),
            stderr: String::new(),
        };
        let failed = CommandOutput {
            code: 2,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(ok.success());
        assert!(!failed.success());
    }

    struct FixedOutput(CommandOutput);

    impl Transport for FixedOutput {
        fn host(&self) -> &str {
            "test"
        }

        fn run(&self, _script: &str) -> Result<CommandOutput, TransportError> {
            Ok(self.0.clone())
        }

        fn upload(&self, _local: &Path, _remote: &str) -> Result<(), TransportError> {
            Ok(())
        }
    }

    #[test]
    fn remote_hash_parses_sha256sum_output() {
        let transport = FixedOutput(CommandOutput {
            code: 0,
            stdout: "abc123  /srv/app/config/unicorn.conf\n".to_string(),
            stderr: String::new(),
        });
        let hash = transport.remote_hash("/srv/app/config/unicorn.conf").unwrap();
        assert_eq!(hash.as_deref(), Some("abc123"));
    }

    #[test]
    fn remote_hash_is_none_when_file_missing() {
        let transport = FixedOutput(CommandOutput {
            code: 1,
            stdout: String::new(),
            stderr: "No such file or directory".to_string(),
        });
        let hash = transport.remote_hash("/srv/app/missing").unwrap();
        assert!(hash.is_none());
    }
}
