use std::fs;

use tempfile::tempdir;

use crate::bootstrap::BootstrapPhase;
use crate::component::{Condition, ComponentDescriptor};
use crate::component::provider;
use crate::environment::{ConfigMap, EnvironmentSources, StaticCapabilities};
use crate::Bootstrap;

use super::common::{host_info, json_renderer, plain_renderer, reporter, Renderer, Telemetry};

#[tokio::test]
async fn test_config_file_selects_renderer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("application.json");
    fs::write(&path, r#"{ "output": { "json": true }, "debug": true }"#).unwrap();

    let mut bootstrap = Bootstrap::with_sources(EnvironmentSources::new().with_file(&path));
    bootstrap.register(host_info()).unwrap();
    bootstrap.register(plain_renderer()).unwrap();
    bootstrap.register(json_renderer()).unwrap();
    bootstrap.register(reporter()).unwrap();

    let context = bootstrap.run(ConfigMap::new()).await.unwrap();
    assert_eq!(context.get::<Renderer>().unwrap().format, "json");

    // `debug` was set in the file, so the condition report is retained.
    let report = bootstrap.startup_report().unwrap();
    assert_eq!(report.len(), 4);
    let plain = report.get("plain-renderer").unwrap();
    assert!(!plain.matched);
    assert_eq!(plain.reason, "superseded by 'json-renderer'");
}

#[tokio::test]
async fn test_override_beats_file_value() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("application.json");
    fs::write(&path, r#"{ "output": { "json": true } }"#).unwrap();

    let mut bootstrap = Bootstrap::with_sources(EnvironmentSources::new().with_file(&path));
    bootstrap.register(plain_renderer()).unwrap();
    bootstrap.register(json_renderer()).unwrap();

    let mut overrides = ConfigMap::new();
    overrides.insert("output.json", false);
    let context = bootstrap.run(overrides).await.unwrap();

    assert_eq!(context.get::<Renderer>().unwrap().format, "plain");
}

#[tokio::test]
async fn test_capability_probe_gates_component() {
    let sources = EnvironmentSources::new().with_probe(StaticCapabilities::from_names(["telemetry.bus"]));
    let mut bootstrap = Bootstrap::with_sources(sources);
    bootstrap
        .register(
            ComponentDescriptor::new::<Telemetry>("telemetry", provider(|_| Ok(Telemetry { enabled: true })))
                .with_condition(Condition::capability("telemetry.bus")),
        )
        .unwrap();

    let context = bootstrap.run(ConfigMap::new()).await.unwrap();
    assert!(context.has::<Telemetry>());
}

#[tokio::test]
async fn test_undetected_capability_excludes_component() {
    let mut bootstrap = Bootstrap::new();
    bootstrap
        .register(
            ComponentDescriptor::new::<Telemetry>("telemetry", provider(|_| Ok(Telemetry { enabled: true })))
                .with_condition(Condition::capability("telemetry.bus")),
        )
        .unwrap();

    let context = bootstrap.run(ConfigMap::new()).await.unwrap();
    assert!(context.is_empty());
}

#[tokio::test]
async fn test_report_survives_failed_run() {
    let mut bootstrap = Bootstrap::new();
    bootstrap.register(reporter()).unwrap();

    let mut overrides = ConfigMap::new();
    overrides.insert("debug", true);
    let err = bootstrap.run(overrides).await.unwrap_err();

    assert_eq!(err.phase, BootstrapPhase::Resolving);
    let report = bootstrap.startup_report().unwrap();
    assert_eq!(report.len(), 1);
    assert!(report.get("reporter").unwrap().matched, "eligibility was decided before the failure");
}

#[tokio::test]
async fn test_missing_optional_config_file_is_tolerated() {
    let dir = tempdir().unwrap();
    let sources = EnvironmentSources::new()
        .with_optional_file(dir.path().join("absent.json"))
        .with_default("output.json", true);

    let mut bootstrap = Bootstrap::with_sources(sources);
    bootstrap.register(plain_renderer()).unwrap();
    bootstrap.register(json_renderer()).unwrap();

    let context = bootstrap.run(ConfigMap::new()).await.unwrap();
    assert_eq!(context.get::<Renderer>().unwrap().format, "json");
}
