//! Worker-manager (Unicorn) lifecycle tasks
//!
//! The conditional logic lives in literal shell snippets shipped to the
//! remote executor verbatim, keyed on the existence of the PID file under
//! the shared path. A service already in its desired state is success, not
//! an error: the snippets print a note and exit zero.

use crate::context::DeployContext;
use crate::error::DroverResult;
use crate::remote::Transport;

use super::{record, run_remote, TaskReport};

/// Daemonized launch command pointed at the uploaded config
fn launch_command(ctx: &DeployContext) -> String {
    format!(
        "unicorn -D -c {} {}",
        ctx.remote_config_path(crate::render::UNICORN_CONF),
        ctx.rackup_path()
    )
}

/// Shell snippet for `start-worker`: launch only if no PID file exists
pub fn start_script(ctx: &DeployContext) -> String {
    format!(
        "if [ -e \"{pid}\" ]; then\n  \
           echo \"Unicorn pid file exists\";\n\
         else\n  \
           {launch};\n\
         fi",
        pid = ctx.pid_file(),
        launch = launch_command(ctx),
    )
}

/// Shell snippet for `stop-worker`: graceful QUIT to the recorded PID
pub fn stop_script(ctx: &DeployContext) -> String {
    format!(
        "if [ -e \"{pid}\" ]; then\n  \
           pid=`cat {pid}`;\n  \
           kill -s QUIT $pid;\n\
         else\n  \
           echo \"No pid file for unicorn\";\n\
         fi",
        pid = ctx.pid_file(),
    )
}

/// Shell snippet for `restart-worker`: QUIT the old master if present,
/// then launch a fresh one unconditionally
///
/// There is deliberately no wait between the signal and the launch; the
/// original recipe's ordering is preserved as a contract.
pub fn restart_script(ctx: &DeployContext) -> String {
    format!(
        "if [ -e \"{pid}\" ]; then\n  \
           pid=`cat {pid}`;\n  \
           kill -s QUIT $pid;\n  \
           {launch};\n\
         else\n  \
           {launch};\n\
         fi",
        pid = ctx.pid_file(),
        launch = launch_command(ctx),
    )
}

/// Start the worker manager if its PID file is absent
pub fn start_worker(transport: &dyn Transport, ctx: &DeployContext) -> DroverResult<TaskReport> {
    let mut report = TaskReport::new("start-worker");
    let script = start_script(ctx);
    let output = run_remote(transport, "start-worker", &script)?;
    record(&mut report, &script, &output);
    Ok(report)
}

/// Gracefully stop the worker manager if its PID file is present
pub fn stop_worker(transport: &dyn Transport, ctx: &DeployContext) -> DroverResult<TaskReport> {
    let mut report = TaskReport::new("stop-worker");
    let script = stop_script(ctx);
    let output = run_remote(transport, "stop-worker", &script)?;
    record(&mut report, &script, &output);
    Ok(report)
}

/// Restart the worker manager, always ending with one launch
pub fn restart_worker(transport: &dyn Transport, ctx: &DeployContext) -> DroverResult<TaskReport> {
    let mut report = TaskReport::new("restart-worker");
    let script = restart_script(ctx);
    let output = run_remote(transport, "restart-worker", &script)?;
    record(&mut report, &script, &output);
    Ok(report)
}
