//! Reverse-proxy (Nginx) lifecycle tasks
//!
//! Each task issues one fixed privileged service-manager command by name.
//! No local state is inspected first; success is whatever the remote service
//! manager reports.

use crate::error::DroverResult;
use crate::remote::Transport;

use super::{record, run_remote, TaskReport};

/// Service-manager action for the reverse proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyAction {
    Start,
    Stop,
    Restart,
}

impl ProxyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }

    fn task_name(&self) -> &'static str {
        match self {
            Self::Start => "start-proxy",
            Self::Stop => "stop-proxy",
            Self::Restart => "restart-proxy",
        }
    }

    fn command(&self) -> String {
        format!("sudo /sbin/service nginx {}", self.as_str())
    }
}

/// Issue one service-manager command for the proxy
pub fn proxy_control(transport: &dyn Transport, action: ProxyAction) -> DroverResult<TaskReport> {
    let mut report = TaskReport::new(action.task_name());
    let script = action.command();
    let output = run_remote(transport, action.task_name(), &script)?;
    record(&mut report, &script, &output);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::CommandOutput;
    use crate::tasks::test_support::RecordingTransport;

    #[test]
    fn each_action_maps_to_one_service_command() {
        for (action, expected) in [
            (ProxyAction::Start, "sudo /sbin/service nginx start"),
            (ProxyAction::Stop, "sudo /sbin/service nginx stop"),
            (ProxyAction::Restart, "sudo /sbin/service nginx restart"),
        ] {
            let transport = RecordingTransport::new();
            let report = proxy_control(&transport, action).unwrap();
            assert_eq!(transport.scripts.borrow().as_slice(), [expected]);
            assert_eq!(report.commands, [expected]);
        }
    }

    #[test]
    fn proxy_failure_carries_service_manager_stderr() {
        let transport = RecordingTransport::new().respond(
            "nginx restart",
            CommandOutput {
                code: 1,
                stdout: String::new(),
                stderr: "nginx: configuration file test failed\n".to_string(),
            },
        );
        let err = proxy_control(&transport, ProxyAction::Restart).unwrap_err();
        match err {
            crate::error::DroverError::RemoteCommand { task, stderr, .. } => {
                assert_eq!(task, "restart-proxy");
                assert!(stderr.contains("configuration file test failed"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
