//! Reverse-proxy (Nginx) configuration templates
//!
//! Two documents: an upstream group pointing at the worker socket, and a
//! server block that serves static files first and proxies everything else
//! to that upstream.

use super::fill;
use crate::context::DeployContext;

const UPSTREAM_TEMPLATE: &str = r#"upstream {{app}} {
  # fail_timeout=0 means we always retry the upstream even after a bad
  # response, in case the master nuked a worker for timing out.
  server unix:{{socket_path}} fail_timeout=0;
}
"#;

const SERVER_TEMPLATE: &str = r#"server {
  listen 80 default deferred;

  client_max_body_size 4G;
  server_name {{host_header}};

  keepalive_timeout 5;

  # Serve static files straight from the proxy before touching the
  # application server: static file, .html variant, directory index,
  # then hand off to the upstream.
  root {{release_path}}/static;
  try_files $uri/index.html $uri.html $uri @app;

  location @app {
    proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;

    # Pass the client Host header along so the application can build
    # redirects itself; redirect rewriting stays off.
    proxy_set_header Host $http_host;
    proxy_redirect off;

    proxy_pass http://{{app}};
  }

  error_page 500 502 503 504 /500.html;
  location = /500.html {
    root /var/www/{{app}}/current/public;
  }
}
"#;

/// Render the upstream group definition for a deployment context
pub fn render_upstream(ctx: &DeployContext) -> String {
    fill(
        UPSTREAM_TEMPLATE,
        &[
            ("app", ctx.application()),
            ("socket_path", &ctx.socket_path()),
        ],
    )
}

/// Render the virtual-host server block for a deployment context
pub fn render_server(ctx: &DeployContext) -> String {
    fill(
        SERVER_TEMPLATE,
        &[
            ("app", ctx.application()),
            ("host_header", ctx.host_header()),
            ("release_path", ctx.release_path()),
        ],
    )
}
