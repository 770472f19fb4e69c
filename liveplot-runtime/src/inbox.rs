use connection::{Connection, InProcessConnection};
use liveplot_core::{DataSnapshot, Frame, WindowKey};
use std::sync::Arc;

/// Renderer-side cache of the newest data mapping.
///
/// Every lookup first drains the Data channel, so whatever backlog the
/// broadcaster built up collapses to its most recent snapshot.
pub struct DataInbox {
    data: InProcessConnection<DataSnapshot>,
    latest: DataSnapshot,
    snapshots_seen: u64,
    empty: Arc<Frame>,
}

impl DataInbox {
    pub fn new(data: InProcessConnection<DataSnapshot>) -> Self {
        Self {
            data,
            latest: DataSnapshot::new(),
            snapshots_seen: 0,
            empty: Arc::new(Frame::Empty),
        }
    }

    /// Returns true if at least one new snapshot arrived.
    pub fn refresh(&mut self) -> bool {
        let mut fresh = false;
        while let Ok(Some(snapshot)) = self.data.try_recv() {
            self.latest = snapshot;
            self.snapshots_seen += 1;
            fresh = true;
        }
        fresh
    }

    /// Latest frame for `key`, or an empty frame when nothing has arrived yet.
    pub fn frame_for(&mut self, key: &WindowKey) -> Arc<Frame> {
        self.refresh();
        self.latest
            .get(key)
            .cloned()
            .unwrap_or_else(|| self.empty.clone())
    }

    pub fn snapshots_seen(&self) -> u64 {
        self.snapshots_seen
    }
}
