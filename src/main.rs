#![warn(clippy::complexity)]
#![warn(clippy::perf)]
#![warn(clippy::style)]
#![warn(clippy::suspicious)]
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use network_explorer::dataset::Dataset;
use network_explorer::filter::{FilterParams, TimeWindow};
use network_explorer::models::{ExplorerSettings, SlaColor, SlaSet};
use network_explorer::render::render;
use network_explorer::time::DepartureTime;

/// Filter connection legs and print the render output as JSON
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Legs table (CSV)
    #[arg(long, default_value = "result.csv")]
    legs: PathBuf,

    /// Nodes table (CSV)
    #[arg(long, default_value = "nodes.csv")]
    nodes: PathBuf,

    /// Settings file (JSON); built-in defaults when omitted
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Connection path to show; the first path in sort order when omitted
    #[arg(long)]
    path: Option<String>,

    /// Restrict to these origin codes
    #[arg(long, value_delimiter = ',')]
    origins: Vec<String>,

    /// Earliest departure (HH:MM) of a range window
    #[arg(long, requires = "to")]
    from: Option<DepartureTime>,

    /// Latest departure (HH:MM) of a range window
    #[arg(long, requires = "from")]
    to: Option<DepartureTime>,

    /// Hour-of-day window START-END, e.g. 18-6 for overnight
    #[arg(long, conflicts_with_all = ["from", "to"])]
    hours: Option<String>,

    /// SLA colors to keep
    #[arg(long, value_delimiter = ',')]
    sla: Vec<String>,

    /// Modes to keep
    #[arg(long, value_delimiter = ',')]
    modes: Vec<String>,

    /// Print only the metrics and dropped-leg summary
    #[arg(long)]
    summary: bool,
}

fn parse_hours(text: &str) -> Result<TimeWindow, String> {
    let (start, end) = text
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got '{text}'"))?;
    let start: u8 = start.trim().parse().map_err(|e| format!("bad start hour '{start}': {e}"))?;
    let end: u8 = end.trim().parse().map_err(|e| format!("bad end hour '{end}': {e}"))?;
    TimeWindow::hour_of_day(start, end).map_err(|e| e.to_string())
}

fn build_params(args: &Args, dataset: &Dataset) -> Result<FilterParams, String> {
    let path = match &args.path {
        Some(path) => path.clone(),
        None => dataset
            .paths()
            .first()
            .map(ToString::to_string)
            .ok_or("legs table has no connection paths")?,
    };

    let mut params = FilterParams::for_path(dataset, &path);

    if !args.origins.is_empty() {
        params = params.with_origins(args.origins.iter().cloned());
    }

    if let (Some(from), Some(to)) = (args.from, args.to) {
        params = params.with_time_window(TimeWindow::range(from, to).map_err(|e| e.to_string())?);
    } else if let Some(hours) = &args.hours {
        params = params.with_time_window(parse_hours(hours)?);
    }

    if !args.sla.is_empty() {
        let colors = args
            .sla
            .iter()
            .map(|s| s.parse::<SlaColor>().map_err(|e| e.to_string()))
            .collect::<Result<SlaSet, String>>()?;
        params = params.with_sla(colors);
    }

    if !args.modes.is_empty() {
        params = params.with_modes(args.modes.iter().map(String::as_str));
    }

    Ok(params)
}

fn run(args: &Args) -> Result<(), String> {
    let settings = match &args.settings {
        Some(path) => ExplorerSettings::load(path).map_err(|e| e.to_string())?,
        None => ExplorerSettings::default(),
    };

    let dataset = Dataset::load(&args.legs, &args.nodes).map_err(|e| e.to_string())?;
    let params = build_params(args, &dataset)?;
    let output = render(&dataset, &params, &settings);

    tracing::info!(
        path = params.path.as_deref().unwrap_or_default(),
        sla = %params.sla.unwrap_or_default().to_display_string(),
        legs = output.legs.len(),
        dropped = output.dropped_count(),
        risk = %output.metrics.format_risk_score(),
        "render pass complete"
    );

    let json = if args.summary {
        serde_json::to_string_pretty(&serde_json::json!({
            "metrics": output.metrics,
            "dropped": output.dropped,
            "view": output.view,
        }))
    } else {
        serde_json::to_string_pretty(&output)
    }
    .map_err(|e| format!("Failed to serialize render output: {e}"))?;

    println!("{json}");
    Ok(())
}

fn main() -> ExitCode {
    network_explorer::logging::init("network_explorer=info");

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
