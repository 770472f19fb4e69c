//! Synthetic data providers for demos and tests.

use crate::provider::ProviderError;
use liveplot_core::Frame;
use std::collections::VecDeque;
use std::f64::consts::TAU;

/// Wraps a provider that cannot fail.
pub fn infallible<F>(mut produce: F) -> impl FnMut() -> Result<Frame, ProviderError> + Send + 'static
where
    F: FnMut() -> Frame + Send + 'static,
{
    move || -> Result<Frame, ProviderError> { Ok(produce()) }
}

/// Samples the counter keeps before dropping the oldest.
pub const COUNTER_HISTORY: usize = 1000;

/// Single channel counting up one per call: 0, 1, 2, ... Only the newest
/// [`COUNTER_HISTORY`] values are kept.
pub fn counter() -> impl FnMut() -> Result<Frame, ProviderError> + Send + 'static {
    let mut samples: VecDeque<f64> = VecDeque::with_capacity(COUNTER_HISTORY);
    let mut next: u64 = 0;
    move || -> Result<Frame, ProviderError> {
        if samples.len() == COUNTER_HISTORY {
            samples.pop_front();
        }
        samples.push_back(next as f64);
        next += 1;
        Ok(Frame::single(samples.iter().copied().collect()))
    }
}

/// `channels` phase-shifted sine waves of `points` samples, advancing one step
/// per call.
pub fn sine_wave(
    channels: usize,
    points: usize,
) -> impl FnMut() -> Result<Frame, ProviderError> + Send + 'static {
    let mut step: u64 = 0;
    move || -> Result<Frame, ProviderError> {
        let offset = step as f64 * 0.1;
        step += 1;
        let data = (0..channels)
            .map(|channel| {
                let phase = channel as f64 * TAU / channels.max(1) as f64;
                (0..points)
                    .map(|i| (offset + phase + i as f64 * TAU / points.max(1) as f64).sin())
                    .collect()
            })
            .collect();
        Ok(Frame::channels(data))
    }
}

/// A `rows` x `cols` ripple that drifts on every call.
pub fn heat_wave(
    rows: usize,
    cols: usize,
) -> impl FnMut() -> Result<Frame, ProviderError> + Send + 'static {
    let mut step: u64 = 0;
    move || -> Result<Frame, ProviderError> {
        let t = step as f64 * 0.2;
        step += 1;
        let mut values = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let x = c as f64 / cols.max(1) as f64;
                let y = r as f64 / rows.max(1) as f64;
                values.push(((x + t) * TAU).sin() * ((y - t) * TAU).cos());
            }
        }
        Ok(Frame::grid(rows, cols, values))
    }
}
