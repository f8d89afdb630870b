use clap::{Arg, ArgAction, ArgMatches, Command};
use network_registry::DEFAULT_CHAIN_NETWORK;
use slot_viz::{DEFAULT_EXPLORER_URL, DEFAULT_ROWS_TO_SHOW};
use std::str::FromStr;

pub const NETWORK_FLAG: &str = "network";
pub const DASHBOARD_FLAG: &str = "dashboard";
pub const GROUP_FLAG: &str = "group";
pub const SLOT_VIZ_FILE_FLAG: &str = "slot-viz-file";
pub const ROWS_FLAG: &str = "rows";
pub const EXPLORER_URL_FLAG: &str = "explorer-url";
pub const DEBUG_LEVEL_FLAG: &str = "debug-level";
pub const LOG_FORMAT_FLAG: &str = "log-format";
pub const DISABLE_LOG_COLOR_FLAG: &str = "disable-log-color";

pub fn cli_app() -> Command {
    Command::new("beaconviz")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Sigma Prime <contact@sigmaprime.io>")
        .about(
            "Follows the slot visualization of a validator dashboard and logs the previous and \
             next duty of its validators at every slot.",
        )
        .arg(
            Arg::new(NETWORK_FLAG)
                .long(NETWORK_FLAG)
                .value_name("NAME")
                .action(ArgAction::Set)
                .default_value(DEFAULT_CHAIN_NETWORK.name)
                .help(
                    "Name of the network the dashboard belongs to. Unknown names fall back to \
                     the default network.",
                )
                .display_order(0),
        )
        .arg(
            Arg::new(DASHBOARD_FLAG)
                .long(DASHBOARD_FLAG)
                .value_name("ID")
                .action(ArgAction::Set)
                .required(true)
                .help("Numeric id of a private dashboard or the id of a public dashboard.")
                .display_order(0),
        )
        .arg(
            Arg::new(GROUP_FLAG)
                .long(GROUP_FLAG)
                .value_name("ID")
                .action(ArgAction::Set)
                .allow_negative_numbers(true)
                .default_value("-1")
                .help("Validator group to show. -1 shows all groups.")
                .display_order(0),
        )
        .arg(
            Arg::new(SLOT_VIZ_FILE_FLAG)
                .long(SLOT_VIZ_FILE_FLAG)
                .value_name("FILE")
                .action(ArgAction::Set)
                .required(true)
                .help(
                    "JSON file holding a slot visualization response of the dashboard API. It \
                     is read again at every slot.",
                )
                .display_order(0),
        )
        .arg(
            Arg::new(ROWS_FLAG)
                .long(ROWS_FLAG)
                .value_name("COUNT")
                .action(ArgAction::Set)
                .help(format!(
                    "Number of grid rows logged at debug level. Defaults to {}.",
                    DEFAULT_ROWS_TO_SHOW
                ))
                .display_order(0),
        )
        .arg(
            Arg::new(EXPLORER_URL_FLAG)
                .long(EXPLORER_URL_FLAG)
                .value_name("URL")
                .action(ArgAction::Set)
                .default_value(DEFAULT_EXPLORER_URL)
                .help("Base URL of the block explorer slot links point to.")
                .display_order(0),
        )
        .arg(
            Arg::new(DEBUG_LEVEL_FLAG)
                .long(DEBUG_LEVEL_FLAG)
                .value_name("LEVEL")
                .action(ArgAction::Set)
                .value_parser(["info", "debug", "trace", "warn", "error", "crit"])
                .default_value("info")
                .help("Specifies the verbosity level used when emitting logs to the terminal.")
                .display_order(0),
        )
        .arg(
            Arg::new(LOG_FORMAT_FLAG)
                .long(LOG_FORMAT_FLAG)
                .value_name("FORMAT")
                .action(ArgAction::Set)
                .value_parser(["terminal", "json"])
                .default_value("terminal")
                .help("Specifies the log format used when emitting logs to the terminal.")
                .display_order(0),
        )
        .arg(
            Arg::new(DISABLE_LOG_COLOR_FLAG)
                .long(DISABLE_LOG_COLOR_FLAG)
                .action(ArgAction::SetTrue)
                .help("Disables colored terminal logs.")
                .display_order(0),
        )
}

/// Parses the value of `name`, returning an error if it is absent or invalid.
pub fn parse_required<T>(matches: &ArgMatches, name: &'static str) -> Result<T, String>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    parse_optional(matches, name)?.ok_or_else(|| format!("{} not specified", name))
}

/// Parses the value of `name`, returning `None` if it is absent.
pub fn parse_optional<T>(matches: &ArgMatches, name: &'static str) -> Result<Option<T>, String>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    matches
        .get_one::<String>(name)
        .map(|value| {
            value
                .parse()
                .map_err(|e| format!("Unable to parse {}: {}", name, e))
        })
        .transpose()
}
