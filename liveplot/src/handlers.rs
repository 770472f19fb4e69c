use crate::commands::{Cli, Commands};
use crate::output::{print_demo_summary, print_info, DemoSummary, WindowSummary};
use liveplot_agent::providers::{counter, heat_wave, sine_wave};
use liveplot_agent::{AgentError, CloseCallback, LivePlotAgent};
use liveplot_core::{
    load_settings_file, save_settings_file, AgentSettings, PlotOptions, WindowKey, WindowKind,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const MULTI_CHANNELS: usize = 3;
const MULTI_POINTS: usize = 64;
const HEATMAP_SIDE: usize = 8;

struct DemoOptions {
    windows: usize,
    kind: WindowKind,
    duration: Duration,
    refresh_seconds: Option<f64>,
    close_after: Option<Duration>,
    config: Option<PathBuf>,
    json: bool,
}

pub fn handle_command(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Demo {
            windows,
            kind,
            duration_seconds,
            refresh_seconds,
            close_after_seconds,
            config,
            json,
        } => run_demo(
            DemoOptions {
                windows,
                kind,
                duration: seconds(duration_seconds),
                refresh_seconds,
                close_after: close_after_seconds.map(seconds),
                config,
                json,
            },
            cli.verbose,
        ),
        Commands::Config { output } => handle_config(output),
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

fn handle_config(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = AgentSettings::default();
    match output {
        Some(path) => {
            save_settings_file(&path, &settings)?;
            print_info(&format!("Settings written to {}", path.display()));
        }
        None => print!("{}", settings.to_toml_string()?),
    }
    Ok(())
}

fn run_demo(options: DemoOptions, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = match &options.config {
        Some(path) => load_settings_file(path)?,
        None => AgentSettings::default(),
    };
    settings.verbose |= verbose;

    let (agent, board) = LivePlotAgent::headless(settings)?;
    let closed = Arc::new(AtomicUsize::new(0));
    let started = Instant::now();
    let deadline = started + options.duration;

    let mut keys = Vec::with_capacity(options.windows);
    for index in 0..options.windows {
        keys.push(open_demo_window(&agent, &options, index, &closed)?);
    }
    log::info!("opened {} {} window(s)", keys.len(), options.kind);

    let mut recycled_key = None;
    if let (Some(close_after), Some(first)) = (options.close_after, keys.first()) {
        thread::sleep(close_after.min(deadline.saturating_duration_since(Instant::now())));
        board.close(first);
        if wait_for_collection(&agent, first, deadline) {
            let replacement = open_demo_window(&agent, &options, keys.len(), &closed)?;
            log::info!("window {first} collected, replacement opened as {replacement}");
            recycled_key = Some(replacement.to_string());
        } else {
            log::warn!("window {first} was not collected before the demo ended");
        }
    }

    thread::sleep(deadline.saturating_duration_since(Instant::now()));

    let windows = board
        .records()
        .into_iter()
        .map(|(key, record)| WindowSummary {
            key: key.to_string(),
            kind: record.kind,
            title: record.title,
            legend: record.legend,
            incarnations: record.incarnations,
            rendered: record.rendered,
            rejected: record.rejected,
            open: record.open,
            last_values: record
                .last_frame
                .map(|frame| frame.last_values())
                .unwrap_or_default(),
        })
        .collect();
    let available_keys = agent
        .available_keys()
        .iter()
        .map(|key| key.to_string())
        .collect();
    let open_windows = agent.open_window_count();
    let elapsed_seconds = started.elapsed().as_secs_f64();
    agent.shutdown();

    let summary = DemoSummary {
        elapsed_seconds,
        windows,
        open_windows,
        recycled_key,
        available_keys,
        closed_callbacks: closed.load(Ordering::SeqCst),
    };
    print_demo_summary(&summary, options.json);
    Ok(())
}

fn wait_for_collection(agent: &LivePlotAgent, key: &WindowKey, deadline: Instant) -> bool {
    let pause = agent.settings().clock_interval();
    while Instant::now() < deadline {
        if agent.available_keys().contains(key) {
            return true;
        }
        thread::sleep(pause);
    }
    false
}

fn open_demo_window(
    agent: &LivePlotAgent,
    options: &DemoOptions,
    index: usize,
    closed: &Arc<AtomicUsize>,
) -> Result<WindowKey, AgentError> {
    let mut plot = PlotOptions::titled(format!("Demo {} #{}", options.kind, index + 1))
        .with_labels("sample", "value");
    if let Some(seconds) = options.refresh_seconds {
        plot = plot.with_refresh_interval(seconds);
    }
    let on_close = close_counter(closed, index);
    match options.kind {
        WindowKind::Single => agent.new_plot(counter(), Some(on_close), plot),
        WindowKind::Multi => {
            let labels = (1..=MULTI_CHANNELS).map(|c| format!("sine {c}")).collect();
            agent.new_multi_plot(
                sine_wave(MULTI_CHANNELS, MULTI_POINTS),
                Some(on_close),
                plot.with_channel_labels(labels),
            )
        }
        WindowKind::Heatmap => agent.new_heatmap(
            heat_wave(HEATMAP_SIDE, HEATMAP_SIDE),
            Some(on_close),
            plot.with_labels("column", "row"),
        ),
    }
}

fn close_counter(closed: &Arc<AtomicUsize>, index: usize) -> CloseCallback {
    let closed = closed.clone();
    Box::new(move || {
        closed.fetch_add(1, Ordering::SeqCst);
        log::info!("demo window #{} closed", index + 1);
    })
}
