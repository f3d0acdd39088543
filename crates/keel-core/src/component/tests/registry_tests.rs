use crate::component::condition::Condition;
use crate::component::descriptor::{provider, ComponentDescriptor};
use crate::component::error::ComponentSystemError;
use crate::component::registry::{ComponentRegistry, Resolution};
use crate::environment::config::ConfigMap;
use crate::environment::EnvironmentSnapshot;

#[derive(Default)]
struct Alpha;
#[derive(Default)]
struct Beta;
#[derive(Default)]
struct Gamma;
#[derive(Default)]
struct CLink;
#[derive(Default)]
struct DLink;
#[derive(Default)]
struct ELink;
#[derive(Default)]
struct Output;

fn providing<T: Default + Send + Sync + 'static>(id: &str) -> ComponentDescriptor {
    ComponentDescriptor::new::<T>(id, provider(|_| Ok(T::default())))
}

fn snapshot_with(entries: &[(&str, serde_json::Value)]) -> EnvironmentSnapshot {
    let mut values = ConfigMap::new();
    for (key, value) in entries {
        values.insert(*key, value.clone());
    }
    EnvironmentSnapshot::with_values(values)
}

fn empty_snapshot() -> EnvironmentSnapshot {
    EnvironmentSnapshot::with_values(ConfigMap::new())
}

fn planned_ids(resolution: &Resolution) -> Vec<String> {
    resolution
        .plan
        .as_ref()
        .unwrap()
        .iter()
        .map(|entry| entry.descriptor.id().to_string())
        .collect()
}

#[test]
fn test_register_rejects_duplicate_id() {
    let mut registry = ComponentRegistry::new();
    registry.register(providing::<Alpha>("core")).unwrap();

    let err = registry.register(providing::<Beta>("core")).unwrap_err();
    assert!(matches!(err, ComponentSystemError::DuplicateComponent { id } if id == "core"));
    assert_eq!(registry.len(), 1, "the first registration stays untouched");
}

#[test]
fn test_get_and_registration_order() {
    let mut registry = ComponentRegistry::new();
    assert!(registry.is_empty());
    registry.register(providing::<Alpha>("first")).unwrap();
    registry.register(providing::<Beta>("second")).unwrap();

    assert_eq!(registry.get("first").unwrap().id(), "first");
    assert!(registry.get("unknown").is_none());

    let ids: Vec<&str> = registry.descriptors().iter().map(|d| d.id()).collect();
    assert_eq!(ids, vec!["first", "second"]);
}

#[test]
fn test_resolve_orders_providers_before_dependents() {
    let mut registry = ComponentRegistry::new();
    // Registered most-dependent first; the plan must invert that.
    registry.register(providing::<Gamma>("gamma").depends_on::<Beta>()).unwrap();
    registry.register(providing::<Beta>("beta").depends_on::<Alpha>()).unwrap();
    registry.register(providing::<Alpha>("alpha")).unwrap();

    let resolution = registry.resolve(&empty_snapshot());
    assert_eq!(planned_ids(&resolution), vec!["alpha", "beta", "gamma"]);
}

#[test]
fn test_independent_components_keep_registration_order() {
    let mut registry = ComponentRegistry::new();
    registry.register(providing::<Beta>("b")).unwrap();
    registry.register(providing::<Alpha>("a")).unwrap();

    let resolution = registry.resolve(&empty_snapshot());
    assert_eq!(planned_ids(&resolution), vec!["b", "a"]);
}

#[test]
fn test_unmet_condition_excludes_component() {
    let mut registry = ComponentRegistry::new();
    registry.register(providing::<Alpha>("always")).unwrap();
    registry
        .register(providing::<Beta>("gated").with_condition(Condition::config_flag("feature.on")))
        .unwrap();

    let resolution = registry.resolve(&empty_snapshot());
    assert_eq!(planned_ids(&resolution), vec!["always"]);

    let report = &resolution.report;
    assert_eq!(report.len(), 2);
    assert!(report.get("always").unwrap().matched);
    let gated = report.get("gated").unwrap();
    assert!(!gated.matched);
    assert_eq!(gated.reason, "config key 'feature.on' is absent");
}

#[test]
fn test_met_condition_admits_component() {
    let mut registry = ComponentRegistry::new();
    registry
        .register(providing::<Beta>("gated").with_condition(Condition::config_flag("feature.on")))
        .unwrap();

    let resolution = registry.resolve(&snapshot_with(&[("feature.on", true.into())]));
    assert_eq!(planned_ids(&resolution), vec!["gated"]);
}

#[test]
fn test_missing_mandatory_dependency_fails() {
    let mut registry = ComponentRegistry::new();
    registry
        .register(providing::<Alpha>("alpha").with_condition(Condition::config_flag("alpha.on")))
        .unwrap();
    registry.register(providing::<Beta>("beta").depends_on::<Alpha>()).unwrap();

    let resolution = registry.resolve(&empty_snapshot());
    match resolution.plan.unwrap_err() {
        ComponentSystemError::MissingDependency {
            dependent,
            missing_type,
            registered,
        } => {
            assert_eq!(dependent, "beta");
            assert!(missing_type.contains("Alpha"));
            assert!(registered, "an excluded provider still counts as registered");
        }
        other => panic!("expected MissingDependency, got {other:?}"),
    }
}

#[test]
fn test_missing_unregistered_dependency_says_so() {
    let mut registry = ComponentRegistry::new();
    registry.register(providing::<Beta>("beta").depends_on::<Alpha>()).unwrap();

    let resolution = registry.resolve(&empty_snapshot());
    match resolution.plan.unwrap_err() {
        ComponentSystemError::MissingDependency { registered, .. } => assert!(!registered),
        other => panic!("expected MissingDependency, got {other:?}"),
    }
}

#[test]
fn test_optional_dependency_absence_is_tolerated() {
    let mut registry = ComponentRegistry::new();
    registry
        .register(providing::<Alpha>("alpha").with_condition(Condition::config_flag("alpha.on")))
        .unwrap();
    registry
        .register(providing::<Beta>("beta").depends_on_optional::<Alpha>())
        .unwrap();

    let resolution = registry.resolve(&empty_snapshot());
    assert_eq!(planned_ids(&resolution), vec!["beta"]);
}

#[test]
fn test_optional_edges_participate_in_cycles() {
    let mut registry = ComponentRegistry::new();
    registry
        .register(providing::<CLink>("c").depends_on_optional::<DLink>())
        .unwrap();
    registry.register(providing::<DLink>("d").depends_on::<CLink>()).unwrap();

    let resolution = registry.resolve(&empty_snapshot());
    match resolution.plan.unwrap_err() {
        ComponentSystemError::CyclicDependency { ids } => assert_eq!(ids, vec!["c", "d"]),
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn test_cycle_report_names_exact_participants() {
    let mut registry = ComponentRegistry::new();
    registry.register(providing::<CLink>("c").depends_on::<DLink>()).unwrap();
    registry.register(providing::<DLink>("d").depends_on::<CLink>()).unwrap();
    // Downstream of the cycle, but not on it.
    registry.register(providing::<ELink>("e").depends_on::<CLink>()).unwrap();

    let resolution = registry.resolve(&empty_snapshot());
    match resolution.plan.unwrap_err() {
        ComponentSystemError::CyclicDependency { ids } => assert_eq!(ids, vec!["c", "d"]),
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn test_two_eligible_providers_are_ambiguous() {
    let mut registry = ComponentRegistry::new();
    registry.register(providing::<Output>("plain")).unwrap();
    registry.register(providing::<Output>("json")).unwrap();

    let resolution = registry.resolve(&empty_snapshot());
    match resolution.plan.unwrap_err() {
        ComponentSystemError::AmbiguousProvider { type_name, ids } => {
            assert!(type_name.contains("Output"));
            assert_eq!(ids, vec!["plain", "json"]);
        }
        other => panic!("expected AmbiguousProvider, got {other:?}"),
    }
}

#[test]
fn test_fallback_yields_to_matched_primary() {
    let mut registry = ComponentRegistry::new();
    registry.register(providing::<Output>("plain").as_fallback()).unwrap();
    registry
        .register(providing::<Output>("json").with_condition(Condition::config_flag("output.json")))
        .unwrap();

    let resolution = registry.resolve(&snapshot_with(&[("output.json", true.into())]));
    assert_eq!(planned_ids(&resolution), vec!["json"]);

    let plain = resolution.report.get("plain").unwrap();
    assert!(!plain.matched);
    assert_eq!(plain.reason, "superseded by 'json'");
}

#[test]
fn test_fallback_stands_in_when_primary_is_excluded() {
    let mut registry = ComponentRegistry::new();
    registry.register(providing::<Output>("plain").as_fallback()).unwrap();
    registry
        .register(providing::<Output>("json").with_condition(Condition::config_flag("output.json")))
        .unwrap();

    let resolution = registry.resolve(&empty_snapshot());
    assert_eq!(planned_ids(&resolution), vec!["plain"]);

    let report = &resolution.report;
    assert!(report.get("plain").unwrap().matched);
    assert!(!report.get("json").unwrap().matched);
}

#[test]
fn test_competing_fallbacks_stay_ambiguous() {
    let mut registry = ComponentRegistry::new();
    registry.register(providing::<Output>("plain").as_fallback()).unwrap();
    registry.register(providing::<Output>("json").as_fallback()).unwrap();

    let resolution = registry.resolve(&empty_snapshot());
    assert!(matches!(
        resolution.plan.unwrap_err(),
        ComponentSystemError::AmbiguousProvider { .. }
    ));
}

#[test]
fn test_report_survives_failed_plan() {
    let mut registry = ComponentRegistry::new();
    registry.register(providing::<Alpha>("alpha")).unwrap();
    registry.register(providing::<Beta>("beta").depends_on::<Gamma>()).unwrap();

    let resolution = registry.resolve(&empty_snapshot());
    assert!(resolution.plan.is_err());
    assert_eq!(resolution.report.len(), 2);
    assert_eq!(resolution.report.matched().count(), 2);
    assert_eq!(resolution.report.excluded().count(), 0);
}

#[test]
fn test_resolve_empty_registry() {
    let registry = ComponentRegistry::new();
    let resolution = registry.resolve(&empty_snapshot());
    assert!(resolution.plan.unwrap().is_empty());
    assert!(resolution.report.is_empty());
}

#[test]
fn test_resolution_is_deterministic() {
    let mut registry = ComponentRegistry::new();
    registry.register(providing::<Gamma>("gamma").depends_on::<Beta>()).unwrap();
    registry.register(providing::<Beta>("beta").depends_on::<Alpha>()).unwrap();
    registry.register(providing::<Alpha>("alpha")).unwrap();
    registry.register(providing::<Output>("output")).unwrap();

    let snapshot = empty_snapshot();
    let first = planned_ids(&registry.resolve(&snapshot));
    for _ in 0..10 {
        assert_eq!(planned_ids(&registry.resolve(&snapshot)), first);
    }
}
