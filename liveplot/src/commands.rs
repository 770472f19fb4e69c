use clap::{Parser, Subcommand};
use liveplot_core::WindowKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liveplot", version, about = "Live plotting agent CLI")]
pub struct Cli {
    /// Log agent lifecycle events
    #[arg(long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open synthetic windows on the headless renderer and report what was drawn
    Demo {
        #[arg(long, default_value_t = 2)]
        windows: usize,
        #[arg(long, default_value = "single")]
        kind: WindowKind,
        #[arg(long, default_value_t = 3.0)]
        duration_seconds: f64,
        /// Per-window refresh interval; defaults to five clock ticks
        #[arg(long)]
        refresh_seconds: Option<f64>,
        /// Close the first window after this long and open a replacement
        #[arg(long)]
        close_after_seconds: Option<f64>,
        /// Agent settings file (.toml or .json)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Print the default agent settings, or write them to a file
    Config {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
