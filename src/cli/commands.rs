//! CLI command implementations
//!
//! `start` boots the HTTP server and serves until the process is
//! stopped. `check` loads and validates a configuration file without
//! binding a socket, for use in deploy pipelines.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::addon::{AuthGate, ProvisionService};
use crate::config::Config;
use crate::http_server::{AddonState, HttpServer};
use crate::observability::{log_event, log_event_with_fields, Event, MetricsRegistry};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Start { config } => start(&config),
        Command::Check { config } => check(&config),
    }
}

/// Boot the provisioning server and serve until stopped
pub fn start(config_path: &Path) -> CliResult<()> {
    log_event(Event::StartupBegin);

    let config = Config::load(config_path)?;

    let port = config.http.port.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("base_url", config.control_plane.base_url.as_str()),
            ("port", port.as_str()),
            ("project", config.control_plane.project.as_str()),
        ],
    );

    let state = Arc::new(AddonState::new(
        ProvisionService::from_config(&config),
        AuthGate::new(&config.addon.secret),
        Arc::new(MetricsRegistry::new()),
    ));
    let server = HttpServer::new(config.http.clone(), state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Validate a configuration file and print the resolved settings
///
/// Secrets are never echoed; the output only confirms they are set.
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;

    let summary = json!({
        "http": {
            "host": config.http.host,
            "port": config.http.port,
        },
        "addon": {
            "config_url_var": config.addon.config_url_var,
            "secret_set": !config.addon.secret.is_empty(),
        },
        "control_plane": {
            "base_url": config.control_plane.base_url,
            "project": config.control_plane.project,
            "pricing_plan": config.control_plane.pricing_plan,
            "authorized_apps": config.control_plane.authorized_apps,
            "static_token": config.control_plane.access_token.is_some(),
        },
        "poll": {
            "max_attempts": config.poll.max_attempts,
            "interval_ms": config.poll.interval_ms,
        },
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_config(temp_dir: &TempDir) -> std::path::PathBuf {
        let config_path = temp_dir.path().join("herokusql.json");

        let config = json!({
            "addon": { "secret": "hunter2" },
            "control_plane": { "project": "acme-dbs" }
        });

        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    #[test]
    fn test_check_accepts_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        check(&config_path).unwrap();
    }

    #[test]
    fn test_check_rejects_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.json");

        let err = check(&missing).unwrap_err();
        assert_eq!(*err.code(), CliErrorCode::ConfigError);
    }

    #[test]
    fn test_check_rejects_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("herokusql.json");
        fs::write(&config_path, "{not json").unwrap();

        let err = check(&config_path).unwrap_err();
        assert_eq!(*err.code(), CliErrorCode::ConfigError);
    }

    #[test]
    fn test_start_rejects_missing_file_before_binding() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.json");

        let err = start(&missing).unwrap_err();
        assert_eq!(*err.code(), CliErrorCode::ConfigError);
    }
}
