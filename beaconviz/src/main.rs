mod cli;

use crate::cli::*;
use dashboard_api::{DashboardId, FileSlotVizApi, GroupId, SlotVizApi};
use environment::{EnvironmentBuilder, LogFormat, LoggerConfig};
use network_registry::find_chain_network_by_name;
use slog::{debug, info, warn, Logger};
use slot_clock::{SlotClock, SystemTimeSlotClock};
use slot_viz::grid::present_rows;
use slot_viz::{
    AnimationCursor, Config, DutyFilters, SlotDetails, SlotPresentation, SlotVizProvider,
    WidgetState,
};
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

fn main() {
    // Enable backtraces unless a RUST_BACKTRACE value has already been explicitly provided.
    if std::env::var("RUST_BACKTRACE").is_err() {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    let matches = cli_app().get_matches();

    match run(&matches) {
        Ok(()) => exit(0),
        Err(e) => {
            eprintln!("Failed to run beaconviz: {}", e);
            exit(1)
        }
    }
}

fn run(matches: &clap::ArgMatches) -> Result<(), String> {
    let logger_config = LoggerConfig {
        debug_level: parse_required(matches, DEBUG_LEVEL_FLAG)?,
        log_format: parse_required::<LogFormat>(matches, LOG_FORMAT_FLAG)?,
        log_color: !matches.get_flag(DISABLE_LOG_COLOR_FLAG),
    };
    let environment = EnvironmentBuilder::new()
        .multi_threaded_tokio_runtime()?
        .initialize_logger(logger_config)?
        .build()?;
    let log = environment.log().clone();

    let network_name: String = parse_required(matches, NETWORK_FLAG)?;
    let network = find_chain_network_by_name(&network_name);
    if !network.name.eq_ignore_ascii_case(&network_name) {
        warn!(
            log,
            "Unknown network, using the default";
            "requested" => network_name,
            "network" => network.name,
        );
    }

    let dashboard_id: DashboardId = parse_required(matches, DASHBOARD_FLAG)?;
    let group_id: GroupId = parse_required(matches, GROUP_FLAG)?;
    let path: PathBuf = parse_required(matches, SLOT_VIZ_FILE_FLAG)?;
    let defaults = Config::default();
    let config = Config {
        rows_to_show: parse_optional(matches, ROWS_FLAG)?.unwrap_or(defaults.rows_to_show),
        explorer_url: parse_required(matches, EXPLORER_URL_FLAG)?,
        ..defaults
    };

    info!(
        log,
        "Starting beaconviz";
        "network" => network.name,
        "dashboard" => %dashboard_id,
        "group" => group_id,
        "file" => ?path,
    );

    let context = environment.core_context();
    let api = Arc::new(FileSlotVizApi::new(path, network.id));
    let provider = SlotVizProvider::new(
        api,
        SystemTimeSlotClock::new(),
        context.executor.clone(),
        config,
    );
    provider.start(dashboard_id, group_id);

    context.executor.spawn(
        log_view_changes(provider.clone(), context.log.clone()),
        "view_logger",
    );

    environment.block_until_ctrl_c()?;

    provider.stop();
    environment.shutdown();
    Ok(())
}

/// Logs the widget summary on every new view and the grid rows at debug level.
async fn log_view_changes<T: SlotClock + 'static, A: SlotVizApi>(
    provider: SlotVizProvider<T, A>,
    log: Logger,
) {
    let mut views = provider.subscribe();
    let filters = DutyFilters::default();
    let cursor = AnimationCursor::global();
    let config = provider.config().clone();
    let mut last_widget: Option<WidgetState> = None;

    loop {
        let view = views.borrow_and_update().clone();
        let widget = WidgetState::from_view(&view);

        if last_widget.as_ref() != Some(&widget) {
            let previous_link = view
                .previous_duty()
                .map(|slot| SlotDetails::new(view.network, slot).url(&config.explorer_url));
            info!(
                log,
                "Validator duties";
                "current_slot" => view.current_slot.as_u64(),
                "previous_duty" => widget.previous_icon.as_str(),
                "previous_color" => widget.previous_color,
                "previous_link" => previous_link,
                "next_duty" => widget.next_icon.as_str(),
                "next_duty_timestamp" => widget.next_duty_timestamp,
                "online" => view.online,
            );
            last_widget = Some(widget);
        }

        let rows = present_rows(
            &view.slots,
            &filters,
            cursor,
            config.slots_per_row,
            config.rows_to_show,
        );
        for row in rows {
            debug!(log, "Slot row"; "squares" => render_row(&row));
        }

        if views.changed().await.is_err() {
            return;
        }
    }
}

/// One `slot:color:icon` entry per square, `-` for empty parts.
fn render_row(row: &[SlotPresentation]) -> String {
    let or_dash = |s: &'static str| if s.is_empty() { "-" } else { s };
    row.iter()
        .map(|square| {
            format!(
                "{}:{}:{}",
                square.slot,
                or_dash(square.square_css[2]),
                or_dash(square.big_icon.as_str())
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}
