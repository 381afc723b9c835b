//! Setup and link tasks
//!
//! `setup` writes the rendered documents to the local config directory and
//! uploads each one to `{release_path}/config/`. `link_configs` force-links
//! the uploaded Nginx files into the proxy's include directory so a re-run
//! never fails on a pre-existing link.

use std::fs;

use crate::config::Settings;
use crate::error::{DroverError, DroverResult};
use crate::remote::{shell_quote, Transport};
use crate::render::ConfigSet;

use super::{record, run_remote, TaskReport};

/// Write the rendered configs locally and upload them to the release
///
/// Files are fully regenerated and overwritten on every run. With `verify`
/// set, each upload is checked against the remote `sha256sum` afterwards.
pub fn setup(
    transport: &dyn Transport,
    settings: &Settings,
    configs: &ConfigSet,
    verify: bool,
) -> DroverResult<TaskReport> {
    let mut report = TaskReport::new("setup");
    let local_dir = &settings.local_config_dir;
    let ctx = &settings.context;

    fs::create_dir_all(local_dir).map_err(|source| DroverError::LocalIo {
        path: local_dir.clone(),
        source,
    })?;

    for doc in configs.iter() {
        let path = local_dir.join(doc.file_name());
        fs::write(&path, doc.content()).map_err(|source| DroverError::LocalIo {
            path: path.clone(),
            source,
        })?;
        report.written.push(path);
    }

    // Local writes complete before the first upload; an upload failure
    // leaves earlier uploads in place (no rollback).
    for doc in configs.iter() {
        let local = local_dir.join(doc.file_name());
        let remote = ctx.remote_config_path(doc.file_name());
        transport.upload(&local, &remote)?;
        report.uploaded.push(remote);
    }

    if verify {
        for doc in configs.iter() {
            let remote = ctx.remote_config_path(doc.file_name());
            let local_hash = doc.content_hash();
            let remote_hash = transport.remote_hash(&remote)?;
            match remote_hash {
                Some(ref h) if *h == local_hash => {}
                other => {
                    return Err(DroverError::VerifyMismatch {
                        file: remote,
                        local_hash,
                        remote_hash: other.unwrap_or_else(|| "(missing)".to_string()),
                    })
                }
            }
        }
        report
            .notes
            .push(format!("verified {} uploads", report.uploaded.len()));
    }

    Ok(report)
}

/// Force-create the proxy include symlinks for the uploaded Nginx configs
pub fn link_configs(transport: &dyn Transport, settings: &Settings) -> DroverResult<TaskReport> {
    let mut report = TaskReport::new("link-configs");
    let ctx = &settings.context;

    let links = [
        (
            ctx.remote_config_path(crate::render::NGINX_SERVER_CONF),
            format!("{}/{}", settings.link_dir, ctx.server_link_name()),
        ),
        (
            ctx.remote_config_path(crate::render::NGINX_UPSTREAM_CONF),
            format!("{}/{}", settings.link_dir, ctx.upstream_link_name()),
        ),
    ];

    for (target, link) in links {
        let script = format!("ln -s -f {} {}", shell_quote(&target), shell_quote(&link));
        let output = run_remote(transport, "link-configs", &script)?;
        record(&mut report, &script, &output);
    }

    Ok(report)
}
