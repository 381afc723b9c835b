//! Drover - deploy recipe tool for a Unicorn + Nginx stack
//!
//! Drover renders a worker-manager config and a reverse-proxy upstream and
//! server block from a deployment context, writes them locally, uploads them
//! to the active release on a remote host, links them into the proxy's
//! include directory, and drives both services with fixed remote commands.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod remote;
pub mod render;
pub mod tasks;

// Re-exports for convenience
pub use config::{resolve_context, Config, Overrides, Settings};
pub use context::DeployContext;
pub use error::{DroverError, DroverResult};
pub use remote::{shell_quote, CommandOutput, SshTransport, Transport, TransportError};
pub use render::{render, ConfigSet, RenderedConfig};
pub use tasks::{ProxyAction, TaskReport};
