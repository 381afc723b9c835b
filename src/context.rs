//! Deployment context value object
//!
//! The context replaces the ambient deploy-session variables of classic
//! recipe tools with an explicit, immutable value created once per
//! invocation. All remote paths are POSIX strings, never touched by the
//! local platform's path handling.

/// Immutable deployment context for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployContext {
    /// Application name, used in socket, upstream and link names
    application: String,
    /// Absolute path of the currently active release on the remote host
    release_path: String,
    /// Absolute path of data shared across releases on the remote host
    shared_path: String,
    /// Public hostname served by the reverse proxy
    host_header: String,
}

impl DeployContext {
    pub fn new(
        application: impl Into<String>,
        release_path: impl Into<String>,
        shared_path: impl Into<String>,
        host_header: impl Into<String>,
    ) -> Self {
        Self {
            application: application.into(),
            release_path: trim_trailing_slash(release_path.into()),
            shared_path: trim_trailing_slash(shared_path.into()),
            host_header: host_header.into(),
        }
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn release_path(&self) -> &str {
        &self.release_path
    }

    pub fn shared_path(&self) -> &str {
        &self.shared_path
    }

    pub fn host_header(&self) -> &str {
        &self.host_header
    }

    /// UNIX domain socket shared by Unicorn and the Nginx upstream
    pub fn socket_path(&self) -> String {
        format!("/tmp/.sock_{}", self.application)
    }

    /// PID file the worker-manager tasks condition on
    pub fn pid_file(&self) -> String {
        format!("{}/pids/unicorn.pid", self.shared_path)
    }

    /// Remote directory the rendered configs are uploaded into
    pub fn remote_config_dir(&self) -> String {
        format!("{}/config", self.release_path)
    }

    /// Remote path of one uploaded config file
    pub fn remote_config_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.remote_config_dir(), file_name)
    }

    /// Rack entry point handed to the Unicorn launch command
    pub fn rackup_path(&self) -> String {
        format!("{}/config.ru", self.release_path)
    }

    /// Name of the server-block symlink in the proxy include directory
    pub fn server_link_name(&self) -> String {
        format!("{}_nginx_server.conf", self.application)
    }

    /// Name of the upstream symlink in the proxy include directory
    pub fn upstream_link_name(&self) -> String {
        format!("{}_nginx_upstream.conf", self.application)
    }
}

fn trim_trailing_slash(mut s: String) -> String {
    while s.len() > 1 && s.ends_with('/') {
        s.pop();
    }
    s
}
