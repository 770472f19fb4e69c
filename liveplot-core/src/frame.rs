use serde::{Deserialize, Serialize};

/// Most recent value produced by a window's data provider.
///
/// The shape is chosen by the producer; the renderer decides whether it can
/// draw it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Frame {
    #[default]
    Empty,
    /// One sample vector per channel.
    Channels(Vec<Vec<f64>>),
    /// Row-major image data.
    Grid {
        rows: usize,
        cols: usize,
        values: Vec<f64>,
    },
}

impl Frame {
    pub fn single(samples: Vec<f64>) -> Self {
        Frame::Channels(vec![samples])
    }

    pub fn channels(channels: Vec<Vec<f64>>) -> Self {
        Frame::Channels(channels)
    }

    pub fn grid(rows: usize, cols: usize, values: Vec<f64>) -> Self {
        Frame::Grid { rows, cols, values }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Frame::Empty => true,
            Frame::Channels(channels) => channels.iter().all(|c| c.is_empty()),
            Frame::Grid { rows, cols, values } => *rows == 0 || *cols == 0 || values.is_empty(),
        }
    }

    pub fn channel_count(&self) -> usize {
        match self {
            Frame::Channels(channels) => channels.len(),
            Frame::Grid { .. } => 1,
            Frame::Empty => 0,
        }
    }

    /// Last sample of every channel, used for status lines.
    pub fn last_values(&self) -> Vec<f64> {
        match self {
            Frame::Channels(channels) => channels
                .iter()
                .filter_map(|c| c.last().copied())
                .collect(),
            Frame::Grid { values, .. } => values.last().copied().into_iter().collect(),
            Frame::Empty => Vec::new(),
        }
    }

    /// Approximate payload size in samples.
    pub fn sample_count(&self) -> usize {
        match self {
            Frame::Channels(channels) => channels.iter().map(Vec::len).sum(),
            Frame::Grid { values, .. } => values.len(),
            Frame::Empty => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness_covers_all_shapes() {
        assert!(Frame::Empty.is_empty());
        assert!(Frame::channels(vec![vec![], vec![]]).is_empty());
        assert!(Frame::grid(0, 4, Vec::new()).is_empty());
        assert!(!Frame::single(vec![1.0]).is_empty());
        assert!(!Frame::grid(1, 1, vec![2.0]).is_empty());
    }

    #[test]
    fn last_values_per_channel() {
        let frame = Frame::channels(vec![vec![1.0, 2.0], vec![], vec![5.0]]);
        assert_eq!(frame.last_values(), vec![2.0, 5.0]);
        assert_eq!(frame.sample_count(), 3);
        assert_eq!(frame.channel_count(), 3);
    }
}
