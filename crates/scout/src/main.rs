use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use scout_apidemos::{Scenario, ScenarioReport};
use scout_appium::AppiumSession;
use scout_engine::{ConfigLoader, ScoutConfig, Session};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scout", version, about = "Run ApiDemos scenarios against an Appium server")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: ./scout.yaml, then ~/.scout/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Device name, overriding config and DEVICE_NAME
    #[arg(long, global = true)]
    device: Option<String>,

    /// Path to the app under test, overriding config and APP_PATH
    #[arg(long, global = true)]
    app: Option<String>,

    /// Appium server URL, overriding hostname/port from config
    #[arg(long, global = true)]
    server: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List available scenarios
    List,
    /// Run scenarios one after another, each in a fresh session
    Run {
        /// Scenario names (see `scout list`)
        scenarios: Vec<String>,

        /// Run every scenario
        #[arg(long, conflicts_with = "scenarios")]
        all: bool,

        /// Print reports as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

/// Filter used when RUST_LOG is unset: `--verbose` wins over the configured
/// `appium.log_level`.
fn default_filter(verbose: bool, log_level: &str) -> String {
    if verbose {
        return "debug".to_string();
    }
    match log_level.trim() {
        "" => "info".to_string(),
        level => level.to_lowercase(),
    }
}

fn init_tracing(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // stdout is reserved for reports
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn select(names: &[String], all: bool) -> anyhow::Result<Vec<Scenario>> {
    if all {
        return Ok(Scenario::ALL.to_vec());
    }
    if names.is_empty() {
        bail!("no scenarios given; pass scenario names or --all");
    }
    names
        .iter()
        .map(|name| name.parse::<Scenario>().map_err(anyhow::Error::from))
        .collect()
}

async fn load_config(args: &Args) -> anyhow::Result<ScoutConfig> {
    let config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigLoader::load_default().await?,
    };
    let config = ConfigLoader::apply_env(config);
    Ok(ConfigLoader::apply_overrides(
        config,
        args.device.clone(),
        args.app.clone(),
    ))
}

fn connect(config: &ScoutConfig, server: Option<&str>) -> anyhow::Result<AppiumSession> {
    let session = match server {
        Some(url) => AppiumSession::new(url, config.appium.capabilities.to_json_map()?),
        None => AppiumSession::from_config(&config.appium)?,
    };
    Ok(session)
}

async fn run_one(scenario: Scenario, config: &ScoutConfig, server: Option<&str>) -> ScenarioReport {
    let mut session = match connect(config, server) {
        Ok(session) => session,
        Err(e) => return ScenarioReport::failed(scenario, format!("Invalid session setup: {:#}", e)),
    };
    info!("Connecting to Appium at {}", session.server_url());
    if let Err(e) = session.launch().await {
        return ScenarioReport::failed(scenario, format!("Failed to launch session: {}", e));
    }

    let report = scenario.run(&mut session, config).await;

    if let Err(e) = session.close().await {
        warn!("Failed to close session after {}: {}", scenario, e);
    }
    report
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match &args.command {
        Command::List => {
            init_tracing(&default_filter(args.verbose, "info"));
            for scenario in Scenario::ALL {
                println!("{:<24}{}", scenario.name(), scenario.description());
            }
            Ok(())
        }
        Command::Run {
            scenarios,
            all,
            json,
        } => {
            let selected = select(scenarios, *all)?;
            let config = load_config(&args).await?;
            init_tracing(&default_filter(args.verbose, &config.appium.log_level));

            let mut reports = Vec::with_capacity(selected.len());
            for scenario in selected {
                reports.push(run_one(scenario, &config, args.server.as_deref()).await);
            }

            if *json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    println!("{}", report);
                }
            }

            let failed = reports.iter().filter(|r| !r.passed).count();
            if failed > 0 {
                bail!("{} of {} scenarios failed", failed, reports.len());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_requires_names_or_all() {
        assert!(select(&[], false).is_err());
        assert_eq!(select(&[], true).unwrap().len(), Scenario::ALL.len());
    }

    #[test]
    fn unknown_scenario_names_are_rejected() {
        let names = vec!["linkify".to_string(), "nope".to_string()];
        let err = select(&names, false).unwrap_err();
        assert_eq!(err.to_string(), "Unknown scenario: nope");
    }

    #[test]
    fn parses_run_with_global_overrides() {
        let args = Args::try_parse_from([
            "scout",
            "run",
            "linkify",
            "custom-view",
            "--device",
            "Pixel_7",
            "--server",
            "http://10.0.0.2:4723",
        ])
        .unwrap();
        assert_eq!(args.device.as_deref(), Some("Pixel_7"));
        assert_eq!(args.server.as_deref(), Some("http://10.0.0.2:4723"));
        match args.command {
            Command::Run { scenarios, all, .. } => {
                assert_eq!(scenarios, ["linkify", "custom-view"]);
                assert!(!all);
            }
            Command::List => panic!("expected run"),
        }
    }

    #[test]
    fn configured_log_level_is_the_default_filter() {
        let mut config = ScoutConfig::default();
        assert_eq!(default_filter(false, &config.appium.log_level), "info");
        config.appium.log_level = "WARN".into();
        assert_eq!(default_filter(false, &config.appium.log_level), "warn");
        assert_eq!(default_filter(true, &config.appium.log_level), "debug");
        assert_eq!(default_filter(false, " "), "info");
    }

    #[test]
    fn all_conflicts_with_names() {
        assert!(Args::try_parse_from(["scout", "run", "linkify", "--all"]).is_err());
    }
}
