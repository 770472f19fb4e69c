use liveplot_core::WindowKind;
use serde::Serialize;

pub fn print_info(message: &str) {
    println!("[LivePlot][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[LivePlot][ERROR]: {message}");
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowSummary {
    pub key: String,
    pub kind: WindowKind,
    pub title: String,
    pub legend: Vec<String>,
    pub incarnations: u32,
    pub rendered: u64,
    pub rejected: u64,
    pub open: bool,
    pub last_values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoSummary {
    pub elapsed_seconds: f64,
    pub windows: Vec<WindowSummary>,
    /// Windows the agent still believed open when the demo ended.
    pub open_windows: usize,
    /// Key handed to the replacement window, if one was opened.
    pub recycled_key: Option<String>,
    pub available_keys: Vec<String>,
    pub closed_callbacks: usize,
}

pub fn print_demo_summary(summary: &DemoSummary, json: bool) {
    if json {
        let text = serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string());
        println!("{text}");
        return;
    }
    print_info(&format!(
        "Demo finished after {:.2}s, {} windows:",
        summary.elapsed_seconds,
        summary.windows.len()
    ));
    for window in &summary.windows {
        let state = if window.open { "open" } else { "closed" };
        let values = window
            .last_values
            .iter()
            .map(|value| format!("{value:.3}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{} ({}) [{}] \"{}\": {} frames, {} rejected, {} incarnation(s), last [{}]",
            window.key,
            window.kind,
            state,
            window.title,
            window.rendered,
            window.rejected,
            window.incarnations,
            values
        );
        if !window.legend.is_empty() {
            println!("    legend: {}", window.legend.join(", "));
        }
    }
    println!("open windows: {}", summary.open_windows);
    if let Some(key) = &summary.recycled_key {
        println!("replacement window reused key {key}");
    }
    if summary.available_keys.is_empty() {
        println!("available keys: (none)");
    } else {
        println!("available keys: {}", summary.available_keys.join(", "));
    }
    println!("close callbacks fired: {}", summary.closed_callbacks);
}
