#![cfg(test)]

use std::sync::{Arc, Mutex};

use crate::component::{provider, ComponentDescriptor, Condition};
use crate::event::LifecycleEventKind;
use crate::Bootstrap;

// ===== DEMO COMPONENTS =====
//
// A small host-report application: a reporter renders host information
// through whichever renderer the environment selects, with telemetry as
// an optional extra.

pub struct HostInfo {
    pub hostname: String,
}

pub struct Telemetry {
    pub enabled: bool,
}

pub struct Renderer {
    pub format: &'static str,
}

pub struct Reporter {
    pub line: String,
}

pub fn host_info() -> ComponentDescriptor {
    ComponentDescriptor::new::<HostInfo>(
        "host-info",
        provider(|_| {
            Ok(HostInfo {
                hostname: "testhost".to_string(),
            })
        }),
    )
}

pub fn telemetry() -> ComponentDescriptor {
    ComponentDescriptor::new::<Telemetry>("telemetry", provider(|_| Ok(Telemetry { enabled: true })))
        .with_condition(Condition::config_flag("telemetry.enabled"))
}

/// Default renderer; yields to any other eligible `Renderer` provider.
pub fn plain_renderer() -> ComponentDescriptor {
    ComponentDescriptor::new::<Renderer>("plain-renderer", provider(|_| Ok(Renderer { format: "plain" })))
        .as_fallback()
}

pub fn json_renderer() -> ComponentDescriptor {
    ComponentDescriptor::new::<Renderer>("json-renderer", provider(|_| Ok(Renderer { format: "json" })))
        .with_condition(Condition::config_flag("output.json"))
}

pub fn reporter() -> ComponentDescriptor {
    ComponentDescriptor::new::<Reporter>(
        "reporter",
        provider(|deps| {
            let host = deps.require::<HostInfo>()?;
            let renderer = deps.require::<Renderer>()?;
            let telemetry = deps.get::<Telemetry>();
            let line = match renderer.format {
                "json" => format!(
                    "{{\"host\":\"{}\",\"telemetry\":{}}}",
                    host.hostname,
                    telemetry.is_some()
                ),
                _ => format!("host {} (telemetry: {})", host.hostname, telemetry.is_some()),
            };
            Ok(Reporter { line })
        }),
    )
    .depends_on::<HostInfo>()
    .depends_on::<Renderer>()
    .depends_on_optional::<Telemetry>()
}

/// Subscribe a recorder to every lifecycle event kind.
pub fn event_recorder(bootstrap: &mut Bootstrap) -> Arc<Mutex<Vec<&'static str>>> {
    let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    for kind in [
        LifecycleEventKind::Started,
        LifecycleEventKind::EnvironmentPrepared,
        LifecycleEventKind::Prepared,
        LifecycleEventKind::Ready,
        LifecycleEventKind::Failed,
    ] {
        let log = Arc::clone(&log);
        bootstrap.subscribe_fn(kind, move |event| {
            log.lock().unwrap().push(event.name());
            Ok(())
        });
    }
    log
}
