//! ArgMatches → run configuration.

use clap::ArgMatches;
use hellotable::{Backend, ConnectOptions, Schema};
use std::time::Duration;

use crate::format::OutputMode;

/// Everything `main` needs to run the walkthrough.
pub struct RunConfig {
    pub options: ConnectOptions,
    pub schema: Schema,
    pub output: OutputMode,
}

fn string(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

/// Convert clap ArgMatches into a RunConfig.
///
/// `env` supplies the endpoint and token defaults; flags override it.
pub fn matches_to_config(
    matches: &ArgMatches,
    env: impl Fn(&str) -> Option<String>,
) -> Result<RunConfig, String> {
    let project = string(matches, "project").unwrap_or_default();
    let instance = string(matches, "instance").unwrap_or_default();
    let mut options = ConnectOptions::new(project, instance).with_env_lookup(env);

    options = match matches.get_one::<String>("backend").map(String::as_str) {
        Some("memory") => options.backend(Backend::Memory),
        _ => options.backend(Backend::Rest),
    };
    if let Some(endpoint) = string(matches, "admin-endpoint") {
        options = options.admin_endpoint(endpoint);
    }
    if let Some(endpoint) = string(matches, "data-endpoint") {
        options = options.data_endpoint(endpoint);
    }
    if let Some(token) = string(matches, "access-token") {
        options = options.access_token(token);
    }
    if let Some(profile) = string(matches, "app-profile") {
        options = options.app_profile_id(profile);
    }
    if let Some(raw) = matches.get_one::<String>("timeout-secs") {
        let secs = raw
            .parse::<u64>()
            .map_err(|e| format!("Invalid timeout: {}", e))?;
        options = options.timeout(Duration::from_secs(secs));
    }

    let defaults = Schema::default();
    let schema = Schema {
        table: string(matches, "table").unwrap_or(defaults.table),
        family: string(matches, "family").unwrap_or(defaults.family),
        column: string(matches, "column").unwrap_or(defaults.column),
    };

    let output = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    Ok(RunConfig {
        options,
        schema,
        output,
    })
}
