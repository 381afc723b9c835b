//! Worker-manager (Unicorn) configuration template
//!
//! The output is a Unicorn configurator file. Each directive is emitted
//! exactly once; later directives never shadow earlier ones.

use super::fill;
use crate::context::DeployContext;

const UNICORN_TEMPLATE: &str = r#"# Unicorn configuration generated by drover - do not edit by hand.

worker_processes 4

# Spawn in the symlinked release directory so restarts pick up new code.
working_directory "{{release_path}}"

# Listen on a UNIX domain socket for the proxy plus a TCP port for
# direct access; the short backlog gives quicker failover when busy.
listen "{{socket_path}}", :backlog => 64
listen 8080, :tcp_nopush => true

# Nuke workers after 30 seconds instead of the 60 second default.
timeout 30

pid "{{shared_path}}/pids/unicorn.pid"

# Keep daemonized stdout/stderr out of /dev/null.
stderr_path "{{shared_path}}/log/unicorn.stderr.log"
stdout_path "{{shared_path}}/log/unicorn.stdout.log"

# Preload the app before forking; pairs with a copy-on-write friendly GC.
preload_app true
GC.respond_to?(:copy_on_write_friendly=) and
  GC.copy_on_write_friendly = true
"#;

/// Render the worker-manager config for a deployment context
pub fn render_unicorn(ctx: &DeployContext) -> String {
    fill(
        UNICORN_TEMPLATE,
        &[
            ("release_path", ctx.release_path()),
            ("shared_path", ctx.shared_path()),
            ("socket_path", &ctx.socket_path()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DeployContext {
        DeployContext::new(
            "shop",
            "/srv/shop/current",
            "/srv/shop/shared",
            "shop.example.com",
        )
    }

    #[test]
    fn unicorn_config_contains_required_directives() {
        let out = render_unicorn(&ctx());
        assert!(out.contains("worker_processes 4"));
        assert!(out.contains(r#"working_directory "/srv/shop/current""#));
        assert!(out.contains(r#"listen "/tmp/.sock_shop", :backlog => 64"#));
        assert!(out.contains("listen 8080, :tcp_nopush => true"));
        assert!(out.contains("timeout 30"));
        assert!(out.contains(r#"pid "/srv/shop/shared/pids/unicorn.pid""#));
        assert!(out.contains(r#"stderr_path "/srv/shop/shared/log/unicorn.stderr.log""#));
        assert!(out.contains(r#"stdout_path "/srv/shop/shared/log/unicorn.stdout.log""#));
        assert!(out.contains("preload_app true"));
    }

    #[test]
    fn unicorn_config_emits_each_directive_once() {
        let out = render_unicorn(&ctx());
        for directive in [
            "worker_processes",
            "working_directory",
            "timeout",
            "pid ",
            "stderr_path",
            "stdout_path",
            "preload_app",
        ] {
            let count = out.matches(directive).count();
            assert_eq!(count, 1, "directive '{directive}' appears {count} times");
        }
    }
}
