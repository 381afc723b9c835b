//! Drover CLI - deploy recipe tool for a Unicorn + Nginx stack
//!
//! Usage: drover <TASK>
//!
//! Tasks:
//!   setup           Render configs, write them locally, upload to the release
//!   link-configs    Link the uploaded Nginx configs into the include dir
//!   start-worker    Start the worker manager unless its PID file exists
//!   stop-worker     Gracefully stop the worker manager
//!   restart-worker  Signal the old master and launch a fresh one
//!   start-proxy     Start the reverse proxy
//!   stop-proxy      Stop the reverse proxy
//!   restart-proxy   Restart the reverse proxy
//!   deploy          setup + link-configs + restart-worker
//!   bootstrap       setup + link-configs
//!   render          Print the rendered configs

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;

use drover::cli::{Cli, Commands, ContextArgs};
use drover::{render, tasks, Config, DroverError, Settings, SshTransport, TaskReport};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "status": "error", "error": format!("{err:#}") })
                );
            } else {
                eprintln!("✗ {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config)?;
    let json = cli.json;
    let verbose = cli.verbose;
    let yes = cli.yes;

    match cli.command {
        Commands::Setup { context, verify } => {
            let report = with_transport(config, context, |settings, transport| {
                let configs = render(&settings.context);
                tasks::setup(transport, settings, &configs, verify)
            })?;
            print_report(&report, json, verbose);
        }
        Commands::LinkConfigs { context } => {
            let report = with_transport(config, context, |settings, transport| {
                tasks::link_configs(transport, settings)
            })?;
            print_report(&report, json, verbose);
        }
        Commands::StartWorker { context } => {
            let report = with_transport(config, context, |settings, transport| {
                tasks::start_worker(transport, &settings.context)
            })?;
            print_report(&report, json, verbose);
        }
        Commands::StopWorker { context } => {
            confirm("Stop the worker manager?", yes)?;
            let report = with_transport(config, context, |settings, transport| {
                tasks::stop_worker(transport, &settings.context)
            })?;
            print_report(&report, json, verbose);
        }
        Commands::RestartWorker { context } => {
            let report = with_transport(config, context, |settings, transport| {
                tasks::restart_worker(transport, &settings.context)
            })?;
            print_report(&report, json, verbose);
        }
        Commands::StartProxy { context } => {
            let report = with_transport(config, context, |_, transport| {
                tasks::proxy_control(transport, tasks::ProxyAction::Start)
            })?;
            print_report(&report, json, verbose);
        }
        Commands::StopProxy { context } => {
            confirm("Stop the reverse proxy?", yes)?;
            let report = with_transport(config, context, |_, transport| {
                tasks::proxy_control(transport, tasks::ProxyAction::Stop)
            })?;
            print_report(&report, json, verbose);
        }
        Commands::RestartProxy { context } => {
            let report = with_transport(config, context, |_, transport| {
                tasks::proxy_control(transport, tasks::ProxyAction::Restart)
            })?;
            print_report(&report, json, verbose);
        }
        Commands::Deploy { context, verify } => {
            let report = with_transport(config, context, |settings, transport| {
                let configs = render(&settings.context);
                tasks::deploy(transport, settings, &configs, verify)
            })?;
            print_report(&report, json, verbose);
        }
        Commands::Bootstrap { context, verify } => {
            let report = with_transport(config, context, |settings, transport| {
                let configs = render(&settings.context);
                tasks::bootstrap(transport, settings, &configs, verify)
            })?;
            print_report(&report, json, verbose);
        }
        Commands::Render { context } => {
            let ctx = drover::resolve_context(config, context.into_overrides())?;
            let configs = render(&ctx);
            if json {
                let files: Vec<_> = configs
                    .iter()
                    .map(|doc| {
                        serde_json::json!({
                            "file": doc.file_name(),
                            "content": doc.content(),
                            "sha256": doc.content_hash(),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({ "status": "ok", "files": files })
                );
            } else {
                for doc in configs.iter() {
                    println!("# ===== {} =====", doc.file_name());
                    println!("{}", doc.content());
                }
            }
        }
    }

    Ok(())
}

/// Resolve settings, open the SSH transport and run one task against it
fn with_transport<F>(config: Config, context: ContextArgs, task: F) -> Result<TaskReport>
where
    F: FnOnce(&Settings, &SshTransport) -> drover::DroverResult<TaskReport>,
{
    let settings = Settings::resolve(config, context.into_overrides())?;
    let transport = SshTransport::new(settings.host.clone());
    Ok(task(&settings, &transport)?)
}

/// Ask before a disruptive task; `--yes` and non-interactive runs skip it
fn confirm(prompt: &str, yes: bool) -> Result<()> {
    if yes || !std::io::stdin().is_terminal() {
        return Ok(());
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if confirmed {
        Ok(())
    } else {
        Err(DroverError::Aborted.into())
    }
}

fn print_report(report: &TaskReport, json: bool, verbose: u8) {
    if json {
        println!(
            "{}",
            serde_json::json!({ "status": "ok", "report": report })
        );
        return;
    }

    println!("✓ {} complete", report.task);
    for path in &report.written {
        println!("  wrote {}", path.display());
    }
    for remote in &report.uploaded {
        println!("  uploaded {remote}");
    }
    for note in &report.notes {
        println!("  {note}");
    }
    if verbose > 0 {
        for command in &report.commands {
            println!("  $ {command}");
        }
    }
}
