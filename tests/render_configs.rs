//! Renderer tests: the documented end-to-end scenario plus properties over
//! randomized contexts.

use drover::{render, DeployContext};
use proptest::prelude::*;

fn shop_context() -> DeployContext {
    DeployContext::new(
        "shop",
        "/srv/shop/current",
        "/srv/shop/shared",
        "shop.example.com",
    )
}

#[test]
fn shop_scenario_upstream_document() {
    let set = render(&shop_context());
    let upstream = set.upstream.content();
    assert!(upstream.contains("upstream shop {"));
    assert!(upstream.contains("server unix:/tmp/.sock_shop fail_timeout=0;"));
}

#[test]
fn shop_scenario_server_document() {
    let set = render(&shop_context());
    let server = set.server.content();
    assert!(server.contains("server_name shop.example.com;"));
    assert!(server.contains("proxy_pass http://shop;"));
}

#[test]
fn shop_scenario_worker_document() {
    let set = render(&shop_context());
    let unicorn = set.unicorn.content();
    assert!(unicorn.contains(r#"working_directory "/srv/shop/current""#));
    assert!(unicorn.contains(r#"pid "/srv/shop/shared/pids/unicorn.pid""#));
}

#[test]
fn upstream_document_snapshot() {
    let set = render(&shop_context());
    insta::assert_snapshot!(set.upstream.content().trim_end(), @r###"
    upstream shop {
      # fail_timeout=0 means we always retry the upstream even after a bad
      # response, in case the master nuked a worker for timing out.
      server unix:/tmp/.sock_shop fail_timeout=0;
    }
    "###);
}

fn app_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,15}").unwrap()
}

fn abs_path() -> impl Strategy<Value = String> {
    proptest::string::string_regex("(/[a-z0-9_]{1,8}){1,4}").unwrap()
}

fn hostname() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9-]{0,10}(\\.[a-z]{2,6}){1,2}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: No template placeholder syntax survives rendering.
    #[test]
    fn property_no_placeholder_survives(
        app in app_name(),
        release in abs_path(),
        shared in abs_path(),
        host in hostname(),
    ) {
        let ctx = DeployContext::new(app, release, shared, host);
        let set = render(&ctx);
        for doc in set.iter() {
            prop_assert!(!doc.content().contains("{{"), "leftover placeholder in {}", doc.file_name());
            prop_assert!(!doc.content().contains("}}"), "leftover placeholder in {}", doc.file_name());
        }
    }

    /// PROPERTY: The application name lands in every substitution slot.
    #[test]
    fn property_application_fills_every_slot(
        app in app_name(),
        release in abs_path(),
        shared in abs_path(),
        host in hostname(),
    ) {
        let ctx = DeployContext::new(app.clone(), release, shared, host);
        let set = render(&ctx);

        let upstream = set.upstream.content();
        let expected_block = format!("upstream {app} {{");
        let expected_sock = format!("server unix:/tmp/.sock_{app} fail_timeout=0;");
        prop_assert!(upstream.contains(&expected_block));
        prop_assert!(upstream.contains(&expected_sock));

        let server = set.server.content();
        let expected_proxy = format!("proxy_pass http://{app};");
        let expected_root = format!("root /var/www/{app}/current/public;");
        prop_assert!(server.contains(&expected_proxy));
        prop_assert!(server.contains(&expected_root));

        let unicorn = set.unicorn.content();
        let expected_listen = format!("listen \"/tmp/.sock_{app}\", :backlog => 64");
        prop_assert!(unicorn.contains(&expected_listen));
    }

    /// PROPERTY: Rendering is a pure function of the context.
    #[test]
    fn property_render_is_deterministic(
        app in app_name(),
        release in abs_path(),
        shared in abs_path(),
        host in hostname(),
    ) {
        let ctx = DeployContext::new(app, release, shared, host);
        prop_assert_eq!(render(&ctx), render(&ctx));
    }
}
