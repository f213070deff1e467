//! cpideploy - Entry Point
//!
//! Resolves a content package on an integration tenant, lists its artifacts
//! and deploys the selected ones one after another.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{error, info, warn};

use cpi_deployer::app::console::ConsoleReporter;
use cpi_deployer::app::deployer::Deployer;
use cpi_deployer::http::client::HttpClient;
use cpi_deployer::logs::{init_logging, LogLevel};
use cpi_deployer::settings::Settings;
use cpi_deployer::target::PageTarget;
use cpi_deployer::utils::{parse_id_list, version_info};

const USAGE: &str = "\
Usage: cpideploy [--settings=<file>] (--url=<package page url> | --origin=<origin> --package=<name>)
                 [--artifacts=<id,id,...>] [--list] [--log-level=<level>] [--version]";

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in env::args().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    if cli_args.contains_key("help") {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("Failed to render version: {}", e),
        }
        return ExitCode::SUCCESS;
    }

    match run(&cli_args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every processed artifact deployed successfully
async fn run(cli_args: &HashMap<String, String>) -> anyhow::Result<bool> {
    let settings_path = cli_args
        .get("settings")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let settings = Settings::load(&settings_path)
        .await
        .with_context(|| format!("Unable to read settings file {}", settings_path.display()))?;

    // Initialize logging
    let mut log_options = settings.log_options();
    if let Some(level) = cli_args.get("log-level") {
        log_options.log_level = level.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let (origin, package_name) = resolve_target(cli_args, &settings)?;

    let http_client = Arc::new(
        HttpClient::new(settings.client_options(&origin)).context("Unable to build HTTP client")?,
    );
    let deployer = Arc::new(Deployer::new(http_client, Arc::new(ConsoleReporter::new())));

    info!("Package: {} on {}", package_name, origin);
    let session = match deployer.resolve_and_list(&package_name).await {
        Ok(session) => session,
        // Already reported by the console reporter
        Err(_) => return Ok(false),
    };

    if cli_args.contains_key("list") {
        return Ok(true);
    }

    let artifact_ids = match cli_args.get("artifacts") {
        Some(raw) => parse_id_list(raw),
        None => session.artifact_ids(),
    };
    if artifact_ids.is_empty() {
        info!("Nothing to deploy");
        return Ok(true);
    }

    let cancel = deployer.cancel_handle();
    let signal_task = tokio::spawn(async move {
        await_shutdown_signal().await;
        if cancel.cancel() {
            warn!("Cancellation requested, stopping after the current artifact...");
        }
    });

    let summary = deployer.start_batch(&artifact_ids).await?;
    signal_task.abort();

    Ok(summary.all_succeeded())
}

fn resolve_target(
    cli_args: &HashMap<String, String>,
    settings: &Settings,
) -> anyhow::Result<(String, String)> {
    if let Some(page_url) = cli_args.get("url") {
        let target = PageTarget::parse(page_url)?;
        return Ok((target.origin, target.package_name));
    }

    let origin = cli_args
        .get("origin")
        .cloned()
        .or_else(|| settings.tenant.origin.clone());

    match (origin, cli_args.get("package")) {
        (Some(origin), Some(package)) => Ok((origin, package.clone())),
        _ => bail!("A package page URL or an origin and package name are required\n{}", USAGE),
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                warn!("Unable to listen for SIGTERM: {}", e);
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Ctrl+C received");
                }
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received");
        }
    }
}
