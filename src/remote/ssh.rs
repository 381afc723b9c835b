//! SSH transport
//!
//! Runs remote scripts through the `ssh` binary and copies files with `scp`,
//! so authentication, known-hosts handling and any channel timeouts stay
//! with the operator's OpenSSH configuration.

use std::path::Path;
use std::process::{Command, Stdio};

use super::{shell_quote, CommandOutput, Transport, TransportError};

/// Transport backed by the system `ssh` and `scp` binaries
pub struct SshTransport {
    /// SSH destination ("host" or "user@host")
    host: String,
}

impl SshTransport {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// Parent directory of an absolute remote path
    fn remote_parent(remote: &str) -> Option<&str> {
        match remote.rfind('/') {
            Some(0) => Some("/"),
            Some(idx) => Some(&remote[..idx]),
            None => None,
        }
    }

    fn connection_error(&self, err: std::io::Error) -> TransportError {
        TransportError::Connection {
            host: self.host.clone(),
            message: err.to_string(),
        }
    }
}

impl Transport for SshTransport {
    fn host(&self) -> &str {
        &self.host
    }

    fn run(&self, script: &str) -> Result<CommandOutput, TransportError> {
        let output = Command::new("ssh")
            .arg(&self.host)
            .arg(script)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.connection_error(e))?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| TransportError::InvalidOutput(e.to_string()))?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        Ok(CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout,
            stderr,
        })
    }

    fn upload(&self, local: &Path, remote: &str) -> Result<(), TransportError> {
        // scp does not create destination directories
        if let Some(parent) = Self::remote_parent(remote) {
            let mkdir = self.run(&format!("mkdir -p {}", shell_quote(parent)))?;
            if !mkdir.success() {
                return Err(TransportError::Upload {
                    host: self.host.clone(),
                    file: remote.to_string(),
                    message: format!("mkdir -p failed: {}", mkdir.stderr.trim()),
                });
            }
        }

        let output = Command::new("scp")
            .arg("-q")
            .arg("-p") // preserve timestamps
            .arg(local)
            .arg(format!("{}:{}", self.host, remote))
            .stdin(Stdio::inherit()) // allow password input
            .stdout(Stdio::null())
            .output()
            .map_err(|e| self.connection_error(e))?;

        if !output.status.success() {
            return Err(TransportError::Upload {
                host: self.host.clone(),
                file: remote.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_reports_host() {
        let transport = SshTransport::new("deploy@web1");
        assert_eq!(transport.host(), "deploy@web1");
    }

    #[test]
    fn remote_parent_of_nested_path() {
        assert_eq!(
            SshTransport::remote_parent("/srv/shop/current/config/unicorn.conf"),
            Some("/srv/shop/current/config")
        );
    }

    #[test]
    fn remote_parent_of_root_level_path() {
        assert_eq!(SshTransport::remote_parent("/unicorn.conf"), Some("/"));
    }

    #[test]
    fn remote_parent_of_bare_name() {
        assert_eq!(SshTransport::remote_parent("unicorn.conf"), None);
    }
}
