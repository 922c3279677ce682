//! Command-line definition.

use clap::{Arg, ArgAction, Command};

/// Build the clap command tree.
pub fn build_cli() -> Command {
    Command::new("hellotable")
        .about("Walk through the admin and data APIs of a managed wide-column store")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("project")
                .long("project")
                .value_name("ID")
                .default_value("")
                .hide_default_value(true)
                .help("The Google Cloud Platform project ID. Required."),
        )
        .arg(
            Arg::new("instance")
                .long("instance")
                .value_name("ID")
                .default_value("")
                .hide_default_value(true)
                .help("The Google Cloud Bigtable instance ID. Required."),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .value_parser(["rest", "memory"])
                .default_value("rest")
                .help("Service API or an in-process instance"),
        )
        .arg(
            Arg::new("table")
                .long("table")
                .default_value(hellotable::TABLE_NAME)
                .help("Table to create and delete"),
        )
        .arg(
            Arg::new("family")
                .long("family")
                .default_value(hellotable::COLUMN_FAMILY_NAME)
                .help("Column family holding the greetings"),
        )
        .arg(
            Arg::new("column")
                .long("column")
                .default_value(hellotable::COLUMN_NAME)
                .help("Column qualifier, also the row key prefix"),
        )
        .arg(
            Arg::new("admin-endpoint")
                .long("admin-endpoint")
                .value_name("URL")
                .help("Admin API base URL (env BIGTABLE_ADMIN_ENDPOINT)"),
        )
        .arg(
            Arg::new("data-endpoint")
                .long("data-endpoint")
                .value_name("URL")
                .help("Data API base URL (env BIGTABLE_DATA_ENDPOINT)"),
        )
        .arg(
            Arg::new("access-token")
                .long("access-token")
                .value_name("TOKEN")
                .help("OAuth2 bearer token (env GOOGLE_OAUTH_ACCESS_TOKEN)"),
        )
        .arg(
            Arg::new("app-profile")
                .long("app-profile")
                .value_name("ID")
                .help("App profile for data requests"),
        )
        .arg(
            Arg::new("timeout-secs")
                .long("timeout-secs")
                .value_name("SECS")
                .help("Per-request timeout in seconds"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the final report as JSON"),
        )
}
