mod components; // Declare the demo components module

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand}; // Use clap for argument parsing

use keel_core::bootstrap::constants::{DEBUG_KEY, DEFAULT_CONFIG_FILE};
use keel_core::bootstrap::Bootstrap;
use keel_core::environment::{capability_fn, CapabilityProbe, ConfigMap, EnvironmentSources, SharedLibraryProbe};

/// Keel: a conditional component bootstrap engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Configuration file to load (JSON, TOML or YAML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override a configuration value; repeatable (KEY=VALUE)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Retain and print the startup condition report
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bootstrap the demo components and print the host report
    Run,
    /// Bootstrap, then print the startup condition report
    Report,
    /// List the registered component descriptors without running
    Components,
}

// The demo probe: "procfs" means a readable /proc/uptime; any other name
// is tried as a loadable shared library.
fn host_probe() -> impl CapabilityProbe {
    capability_fn(|name| match name {
        "procfs" => std::path::Path::new("/proc/uptime").exists(),
        other => SharedLibraryProbe.detect(other),
    })
}

fn parse_overrides(pairs: &[String], debug: bool) -> Result<ConfigMap, String> {
    let mut overrides = ConfigMap::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| format!("invalid --set '{}': expected KEY=VALUE", pair))?;
        // Values parse as JSON when they can (true, 8080, "text") and fall
        // back to a bare string otherwise.
        let value = serde_json::from_str::<serde_json::Value>(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        overrides.insert(key, value);
    }
    if debug {
        overrides.insert(DEBUG_KEY, true);
    }
    Ok(overrides)
}

fn list_components(bootstrap: &Bootstrap) {
    println!("Registered components ({}):", bootstrap.registry().len());
    for descriptor in bootstrap.registry().descriptors() {
        let marker = if descriptor.is_fallback() { " [fallback]" } else { "" };
        println!(
            "  - {}{} provides {} when {}; {} dependency(ies)",
            descriptor.id(),
            marker,
            descriptor.provides_name(),
            descriptor.condition().description(),
            descriptor.dependencies().len()
        );
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();

    let mut sources = EnvironmentSources::new().with_probe(host_probe());
    sources = match &args.config {
        Some(path) => sources.with_file(path.clone()),
        None => sources.with_optional_file(DEFAULT_CONFIG_FILE),
    };

    let mut bootstrap = Bootstrap::with_sources(sources);
    if let Err(e) = components::register_demo(&mut bootstrap) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    if matches!(args.command, Some(Commands::Components)) {
        list_components(&bootstrap);
        return ExitCode::SUCCESS;
    }

    components::log_lifecycle(&mut bootstrap);

    let wants_report = args.debug || matches!(args.command, Some(Commands::Report));
    let overrides = match parse_overrides(&args.set, wants_report) {
        Ok(overrides) => overrides,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match bootstrap.run(overrides).await {
        Ok(context) => {
            match args.command {
                Some(Commands::Report) => {
                    if let Some(report) = bootstrap.startup_report() {
                        println!("{}", report);
                    }
                }
                _ => {
                    match context.get::<components::HostReport>() {
                        Some(report) => println!("{}", report.rendered),
                        None => eprintln!("host report component missing from context"),
                    }
                    if args.debug {
                        if let Some(report) = bootstrap.startup_report() {
                            println!("{}", report);
                        }
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            // The report still helps diagnose a failed run when available.
            if let Some(report) = bootstrap.startup_report() {
                eprintln!("{}", report);
            }
            ExitCode::FAILURE
        }
    }
}
