use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;

/// Drover - deploy recipe tool for a Unicorn + Nginx stack
#[derive(Parser, Debug)]
#[command(name = "drover")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output a JSON summary instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v shows the remote scripts issued)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Path to the drover config file
    #[arg(long, global = true, default_value = "drover.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Context and host overrides shared by every task
#[derive(Args, Debug, Default, Clone)]
pub struct ContextArgs {
    /// Application name
    #[arg(long)]
    pub app: Option<String>,

    /// Public hostname served by the reverse proxy
    #[arg(long)]
    pub host_header: Option<String>,

    /// Absolute remote path of the active release
    #[arg(long)]
    pub release_path: Option<String>,

    /// Absolute remote path of data shared across releases
    #[arg(long)]
    pub shared_path: Option<String>,

    /// SSH destination (host or user@host)
    #[arg(long)]
    pub host: Option<String>,
}

impl ContextArgs {
    pub fn into_overrides(self) -> Overrides {
        Overrides {
            app: self.app,
            host_header: self.host_header,
            release_path: self.release_path,
            shared_path: self.shared_path,
            host: self.host,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the configs, write them locally and upload to the release
    Setup {
        #[command(flatten)]
        context: ContextArgs,

        /// Compare remote sha256sum against the local content after upload
        #[arg(long)]
        verify: bool,
    },

    /// Force-link the uploaded Nginx configs into the proxy include dir
    LinkConfigs {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Start the worker manager unless its PID file exists
    StartWorker {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Gracefully stop the worker manager if its PID file exists
    StopWorker {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Signal the old worker master (if any) and launch a fresh one
    RestartWorker {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Start the reverse proxy service
    StartProxy {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Stop the reverse proxy service
    StopProxy {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Restart the reverse proxy service
    RestartProxy {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Full deploy: setup, link-configs, restart-worker
    Deploy {
        #[command(flatten)]
        context: ContextArgs,

        /// Compare remote sha256sum against the local content after upload
        #[arg(long)]
        verify: bool,
    },

    /// First-time host preparation: setup then link-configs
    Bootstrap {
        #[command(flatten)]
        context: ContextArgs,

        /// Compare remote sha256sum against the local content after upload
        #[arg(long)]
        verify: bool,
    },

    /// Print the rendered configs without touching local disk or the remote
    Render {
        #[command(flatten)]
        context: ContextArgs,
    },
}
