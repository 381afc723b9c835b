//! Deploy task surface
//!
//! Each task sequences local writes, uploads and remote scripts through the
//! [`Transport`] port and reports what it did. Execution is strictly
//! sequential; there is no retry and no rollback - a failure aborts the task
//! and leaves earlier steps in place, the invoking deploy tool owns any
//! higher-level policy.

mod nginx;
mod setup;
mod unicorn;

pub use nginx::{proxy_control, ProxyAction};
pub use setup::{link_configs, setup};
pub use unicorn::{restart_worker, start_worker, stop_worker};

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Settings;
use crate::error::{DroverError, DroverResult};
use crate::remote::{CommandOutput, Transport};
use crate::render::ConfigSet;

/// What one task did, for human and JSON reporting
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskReport {
    /// Task name as exposed on the CLI
    pub task: String,
    /// Local files written
    pub written: Vec<PathBuf>,
    /// Remote paths uploaded to
    pub uploaded: Vec<String>,
    /// Remote scripts issued
    pub commands: Vec<String>,
    /// Remote stdout worth surfacing ("Unicorn pid file exists", ...)
    pub notes: Vec<String>,
}

impl TaskReport {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            ..Self::default()
        }
    }

    /// Fold a sub-task's report into a sequence report
    pub fn absorb(&mut self, other: TaskReport) {
        self.written.extend(other.written);
        self.uploaded.extend(other.uploaded);
        self.commands.extend(other.commands);
        self.notes.extend(other.notes);
    }
}

/// Run a remote script, treating a non-zero exit as task failure
pub(crate) fn run_remote(
    transport: &dyn Transport,
    task: &str,
    script: &str,
) -> DroverResult<CommandOutput> {
    let output = transport.run(script)?;
    if !output.success() {
        return Err(DroverError::RemoteCommand {
            task: task.to_string(),
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        });
    }
    Ok(output)
}

/// Record a script and its interesting stdout on a report
pub(crate) fn record(report: &mut TaskReport, script: &str, output: &CommandOutput) {
    report.commands.push(script.to_string());
    let note = output.stdout.trim();
    if !note.is_empty() {
        report.notes.push(note.to_string());
    }
}

/// Full deploy sequence: setup, link configs, restart the worker manager
///
/// Mirrors the post-deploy hook chain of the original recipe.
pub fn deploy(
    transport: &dyn Transport,
    settings: &Settings,
    configs: &ConfigSet,
    verify: bool,
) -> DroverResult<TaskReport> {
    let mut report = TaskReport::new("deploy");
    report.absorb(setup(transport, settings, configs, verify)?);
    report.absorb(link_configs(transport, settings)?);
    report.absorb(restart_worker(transport, &settings.context)?);
    Ok(report)
}

/// Release-environment initialization: setup then link configs
pub fn bootstrap(
    transport: &dyn Transport,
    settings: &Settings,
    configs: &ConfigSet,
    verify: bool,
) -> DroverResult<TaskReport> {
    let mut report = TaskReport::new("bootstrap");
    report.absorb(setup(transport, settings, configs, verify)?);
    report.absorb(link_configs(transport, settings)?);
    Ok(report)
}
