//! Controller side of the live-plot system: allocates window keys, runs one
//! provider thread per window, broadcasts data snapshots to the renderer and
//! folds its liveness reports back in.

mod agent;
mod broadcaster;
mod provider;
pub mod providers;
mod shared;
mod state_poller;

pub use agent::{AgentError, LivePlotAgent};
pub use provider::{CloseCallback, ProviderError};

pub use liveplot_core::{AgentSettings, Frame, PlotOptions, WindowKey, WindowKind};
