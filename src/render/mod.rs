//! Template renderer
//!
//! Pure functions from a [`DeployContext`] to the three configuration
//! documents the recipe manages. Template text lives as string constants in
//! the per-service modules; rendering is placeholder substitution only, with
//! no I/O. Writing and uploading belong to the task layer.

mod nginx;
mod unicorn;

pub use nginx::{render_server, render_upstream};
pub use unicorn::render_unicorn;

use sha2::{Digest, Sha256};

use crate::context::DeployContext;

/// Local file name of the worker-manager config
pub const UNICORN_CONF: &str = "unicorn.conf";
/// Local file name of the proxy upstream definition
pub const NGINX_UPSTREAM_CONF: &str = "nginx_upstream.conf";
/// Local file name of the proxy server block
pub const NGINX_SERVER_CONF: &str = "nginx_server.conf";

/// A rendered configuration document ready to be written and uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConfig {
    file_name: &'static str,
    content: String,
}

impl RenderedConfig {
    fn new(file_name: &'static str, content: String) -> Self {
        Self { file_name, content }
    }

    /// File name used both locally and at the remote destination
    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// SHA-256 hash of the content, matching `sha256sum` output
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// The full set of documents produced by one render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSet {
    pub unicorn: RenderedConfig,
    pub upstream: RenderedConfig,
    pub server: RenderedConfig,
}

impl ConfigSet {
    /// Iterate the documents in write/upload order
    pub fn iter(&self) -> impl Iterator<Item = &RenderedConfig> {
        [&self.unicorn, &self.upstream, &self.server].into_iter()
    }
}

/// Render all three configuration documents from a context
///
/// Regenerates every document from scratch - there is no incremental merge
/// and no carryover from a previous run.
pub fn render(ctx: &DeployContext) -> ConfigSet {
    ConfigSet {
        unicorn: RenderedConfig::new(UNICORN_CONF, render_unicorn(ctx)),
        upstream: RenderedConfig::new(NGINX_UPSTREAM_CONF, render_upstream(ctx)),
        server: RenderedConfig::new(NGINX_SERVER_CONF, render_server(ctx)),
    }
}

/// Substitute `{{name}}` placeholders in a template
pub(crate) fn fill(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in substitutions {
        out = out.replace(&format!("{{{{{name}}}}}"), value);
    }
    out
}
