use crate::key::WindowKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multiplier applied to the clock tick when a plot does not name a refresh
/// interval.
pub const DEFAULT_REFRESH_TICKS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Single,
    Multi,
    Heatmap,
}

impl WindowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKind::Single => "single",
            WindowKind::Multi => "multi",
            WindowKind::Heatmap => "heatmap",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WindowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(WindowKind::Single),
            "multi" => Ok(WindowKind::Multi),
            "heatmap" => Ok(WindowKind::Heatmap),
            other => Err(format!("unknown window kind '{other}'")),
        }
    }
}

/// Display parameters supplied by the caller of `new_plot*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    pub title: String,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    /// Seconds between renderer pulls. `None` or a non-positive value falls back
    /// to five clock ticks.
    #[serde(default)]
    pub refresh_interval: Option<f64>,
    #[serde(default = "default_channel_count")]
    pub channel_count: usize,
    #[serde(default)]
    pub channel_labels: Option<Vec<String>>,
}

fn default_channel_count() -> usize {
    1
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            title: "Live Plotting Window".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            refresh_interval: None,
            channel_count: default_channel_count(),
            channel_labels: None,
        }
    }
}

impl PlotOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_refresh_interval(mut self, seconds: f64) -> Self {
        self.refresh_interval = Some(seconds);
        self
    }

    pub fn with_channels(mut self, channel_count: usize) -> Self {
        self.channel_count = channel_count;
        self
    }

    pub fn with_channel_labels(mut self, labels: Vec<String>) -> Self {
        self.channel_count = labels.len();
        self.channel_labels = Some(labels);
        self
    }

    /// Refresh interval with the clock-based fallback applied.
    pub fn effective_refresh_interval(&self, clock_interval_seconds: f64) -> f64 {
        match self.refresh_interval {
            Some(seconds) if seconds.is_finite() && seconds > 0.0 => seconds,
            _ => clock_interval_seconds * DEFAULT_REFRESH_TICKS,
        }
    }

    /// Legend label for a channel.
    pub fn channel_label(&self, index: usize) -> String {
        match self.channel_labels.as_ref().and_then(|labels| labels.get(index)) {
            Some(label) => format!("Channel {label}"),
            None => format!("Channel {}", index + 1),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DescriptorError {
    #[error("window {key}: {kind} plot needs at least one channel")]
    NoChannels { key: WindowKey, kind: WindowKind },
    #[error("window {key}: {labels} channel labels for {channels} channels")]
    LabelMismatch {
        key: WindowKey,
        labels: usize,
        channels: usize,
    },
    #[error("window {key}: invalid refresh interval {seconds}")]
    RefreshInterval { key: WindowKey, seconds: f64 },
}

/// Everything the renderer needs to build one window. Immutable once sent; a new
/// descriptor for the same key replaces the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDescriptor {
    pub key: WindowKey,
    pub kind: WindowKind,
    pub options: PlotOptions,
    /// Incarnation of `key` this window belongs to; echoed in liveness reports.
    #[serde(default)]
    pub generation: u64,
}

impl WindowDescriptor {
    /// Builds a descriptor with the refresh fallback resolved against the clock.
    pub fn new(
        key: WindowKey,
        kind: WindowKind,
        mut options: PlotOptions,
        clock_interval_seconds: f64,
    ) -> Self {
        options.refresh_interval = Some(options.effective_refresh_interval(clock_interval_seconds));
        Self {
            key,
            kind,
            options,
            generation: 0,
        }
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn refresh_interval(&self) -> f64 {
        self.options.refresh_interval.unwrap_or(0.0)
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        let seconds = self.refresh_interval();
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(DescriptorError::RefreshInterval {
                key: self.key.clone(),
                seconds,
            });
        }
        if self.kind != WindowKind::Heatmap && self.options.channel_count == 0 {
            return Err(DescriptorError::NoChannels {
                key: self.key.clone(),
                kind: self.kind,
            });
        }
        if let Some(labels) = &self.options.channel_labels {
            if labels.len() != self.options.channel_count {
                return Err(DescriptorError::LabelMismatch {
                    key: self.key.clone(),
                    labels: labels.len(),
                    channels: self.options.channel_count,
                });
            }
        }
        Ok(())
    }
}
