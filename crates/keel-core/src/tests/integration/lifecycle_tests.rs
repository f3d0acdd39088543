use crate::bootstrap::{BootstrapErrorKind, BootstrapPhase};
use crate::environment::ConfigMap;
use crate::Bootstrap;

use super::common::{
    event_recorder, host_info, json_renderer, plain_renderer, reporter, telemetry, HostInfo, Renderer,
    Reporter, Telemetry,
};

fn full_registry() -> Bootstrap {
    let mut bootstrap = Bootstrap::new();
    bootstrap.register(host_info()).unwrap();
    bootstrap.register(json_renderer()).unwrap();
    bootstrap.register(plain_renderer()).unwrap();
    bootstrap.register(reporter()).unwrap();
    bootstrap.register(telemetry()).unwrap();
    bootstrap
}

#[tokio::test]
async fn test_full_run_wires_dependencies_across_modules() {
    let mut bootstrap = full_registry();
    let mut overrides = ConfigMap::new();
    overrides.insert("output.json", true);
    overrides.insert("telemetry.enabled", true);

    let context = bootstrap.run(overrides).await.unwrap();

    assert_eq!(context.ids(), &["host-info", "json-renderer", "telemetry", "reporter"]);
    assert_eq!(context.get::<Renderer>().unwrap().format, "json");
    assert!(context.get::<Telemetry>().unwrap().enabled);
    assert_eq!(
        context.get::<Reporter>().unwrap().line,
        "{\"host\":\"testhost\",\"telemetry\":true}"
    );
}

#[tokio::test]
async fn test_fallback_renderer_without_flags() {
    let mut bootstrap = full_registry();
    let events = event_recorder(&mut bootstrap);

    let context = bootstrap.run(ConfigMap::new()).await.unwrap();

    assert!(context.has::<HostInfo>());
    assert!(!context.has::<Telemetry>(), "telemetry is gated off by default");
    assert_eq!(context.get::<Renderer>().unwrap().format, "plain");
    assert_eq!(
        context.get::<Reporter>().unwrap().line,
        "host testhost (telemetry: false)"
    );
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            "bootstrap.started",
            "bootstrap.environment_prepared",
            "bootstrap.prepared",
            "bootstrap.ready",
        ]
    );
}

#[tokio::test]
async fn test_failure_emits_single_failed_event_with_cause() {
    let mut bootstrap = Bootstrap::new();
    let events = event_recorder(&mut bootstrap);
    // The reporter's mandatory dependencies are not registered.
    bootstrap.register(reporter()).unwrap();

    let err = bootstrap.run(ConfigMap::new()).await.unwrap_err();

    assert_eq!(err.phase, BootstrapPhase::Resolving);
    assert!(matches!(err.kind, BootstrapErrorKind::MissingDependency { .. }));
    let log = events.lock().unwrap();
    assert_eq!(
        *log,
        vec!["bootstrap.started", "bootstrap.environment_prepared", "bootstrap.failed"]
    );
    assert_eq!(log.iter().filter(|name| **name == "bootstrap.failed").count(), 1);
}

#[tokio::test]
async fn test_second_run_is_refused() {
    let mut bootstrap = full_registry();
    bootstrap.run(ConfigMap::new()).await.unwrap();

    let err = bootstrap.run(ConfigMap::new()).await.unwrap_err();
    assert_eq!(err.kind, BootstrapErrorKind::AlreadyRan);
}
