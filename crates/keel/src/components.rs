//! Demo component set: a small host report application.
//!
//! Exercises the engine end to end. The report renderer depends on a host
//! identity component and an output format, picks up uptime when procfs is
//! available, and the format provider is selected by configuration with a
//! plain-text fallback.

use log::info;

use keel_core::bootstrap::{Bootstrap, BoxError};
use keel_core::component::{provider, ComponentDescriptor, Condition};
use keel_core::event::LifecycleEventKind;

/// Basic host identity.
pub struct HostInfo {
    pub hostname: String,
}

/// Seconds since boot, read from procfs.
pub struct Uptime {
    pub seconds: u64,
}

/// Output selection shared by everything that renders.
pub struct OutputFormat {
    pub json: bool,
}

/// The assembled report, ready to print.
pub struct HostReport {
    pub rendered: String,
}

fn read_hostname() -> String {
    std::fs::read_to_string("/etc/hostname")
        .ok()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn read_uptime_seconds() -> Result<u64, BoxError> {
    let text = std::fs::read_to_string("/proc/uptime")?;
    let first = text
        .split_whitespace()
        .next()
        .ok_or("'/proc/uptime' is empty")?;
    let seconds: f64 = first.parse()?;
    Ok(seconds as u64)
}

pub fn host_info() -> ComponentDescriptor {
    ComponentDescriptor::new::<HostInfo>(
        "host-info",
        provider(|_| {
            Ok(HostInfo {
                hostname: read_hostname(),
            })
        }),
    )
}

pub fn uptime() -> ComponentDescriptor {
    ComponentDescriptor::new::<Uptime>(
        "uptime",
        provider(|_| {
            let seconds = read_uptime_seconds()?;
            Ok(Uptime { seconds })
        }),
    )
    .with_condition(Condition::capability("procfs"))
}

/// Plain text output; yields to any other eligible format provider.
pub fn plain_format() -> ComponentDescriptor {
    ComponentDescriptor::new::<OutputFormat>("plain-format", provider(|_| Ok(OutputFormat { json: false })))
        .as_fallback()
}

pub fn json_format() -> ComponentDescriptor {
    ComponentDescriptor::new::<OutputFormat>("json-format", provider(|_| Ok(OutputFormat { json: true })))
        .with_condition(Condition::config_flag("output.json"))
}

pub fn host_report() -> ComponentDescriptor {
    ComponentDescriptor::new::<HostReport>(
        "host-report",
        provider(|deps| {
            let host = deps.require::<HostInfo>()?;
            let format = deps.require::<OutputFormat>()?;
            let uptime = deps.get::<Uptime>();
            let rendered = if format.json {
                match &uptime {
                    Some(uptime) => format!(
                        "{{\"host\":\"{}\",\"uptime_seconds\":{}}}",
                        host.hostname, uptime.seconds
                    ),
                    None => format!("{{\"host\":\"{}\",\"uptime_seconds\":null}}", host.hostname),
                }
            } else {
                match &uptime {
                    Some(uptime) => format!("host {} has been up for {}s", host.hostname, uptime.seconds),
                    None => format!("host {}", host.hostname),
                }
            };
            Ok(HostReport { rendered })
        }),
    )
    .depends_on::<HostInfo>()
    .depends_on::<OutputFormat>()
    .depends_on_optional::<Uptime>()
}

/// Register the demo component set.
pub fn register_demo(bootstrap: &mut Bootstrap) -> keel_core::bootstrap::Result<()> {
    bootstrap.register(host_info())?;
    bootstrap.register(uptime())?;
    bootstrap.register(plain_format())?;
    bootstrap.register(json_format())?;
    bootstrap.register(host_report())?;
    Ok(())
}

/// Log every lifecycle event as it is published.
pub fn log_lifecycle(bootstrap: &mut Bootstrap) {
    for kind in [
        LifecycleEventKind::Started,
        LifecycleEventKind::EnvironmentPrepared,
        LifecycleEventKind::Prepared,
        LifecycleEventKind::Ready,
        LifecycleEventKind::Failed,
    ] {
        bootstrap.subscribe_fn(kind, |event| {
            info!("lifecycle: {}", event.name());
            Ok(())
        });
    }
}
