//! Renderer without a display, recording what would have been drawn.
//!
//! The shared [`HeadlessBoard`] is how tests and the CLI observe windows and
//! simulate a user closing one.

use crate::renderer::{PullFn, PullSchedule, RenderError, Renderer, Window};
use liveplot_core::{Frame, WindowDescriptor, WindowKey, WindowKind};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowRecord {
    pub kind: WindowKind,
    pub title: String,
    /// Legend entry per channel; empty for heatmaps.
    pub legend: Vec<String>,
    /// How many windows have been created under this key.
    pub incarnations: u32,
    pub rendered: u64,
    /// Frames whose shape did not fit the window.
    pub rejected: u64,
    pub last_frame: Option<Frame>,
    pub open: bool,
}

#[derive(Debug, Default)]
pub struct HeadlessBoard {
    records: Mutex<BTreeMap<WindowKey, WindowRecord>>,
    close_requests: Mutex<BTreeSet<WindowKey>>,
    failing_titles: Mutex<BTreeSet<String>>,
    pumps: AtomicU64,
}

impl HeadlessBoard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Simulates the user closing the window currently shown under `key`.
    pub fn close(&self, key: &WindowKey) {
        self.close_requests.lock().insert(key.clone());
    }

    /// Makes creation fail for every window with this title.
    pub fn fail_title(&self, title: impl Into<String>) {
        self.failing_titles.lock().insert(title.into());
    }

    pub fn record(&self, key: &WindowKey) -> Option<WindowRecord> {
        self.records.lock().get(key).cloned()
    }

    pub fn records(&self) -> BTreeMap<WindowKey, WindowRecord> {
        self.records.lock().clone()
    }

    pub fn rendered(&self, key: &WindowKey) -> u64 {
        self.record(key).map(|r| r.rendered).unwrap_or(0)
    }

    pub fn open_windows(&self) -> usize {
        self.records.lock().values().filter(|r| r.open).count()
    }

    pub fn pumps(&self) -> u64 {
        self.pumps.load(Ordering::Relaxed)
    }

    fn close_requested(&self, key: &WindowKey) -> bool {
        self.close_requests.lock().contains(key)
    }

    fn update_record(&self, key: &WindowKey, f: impl FnOnce(&mut WindowRecord)) {
        if let Some(record) = self.records.lock().get_mut(key) {
            f(record);
        }
    }
}

pub struct HeadlessRenderer {
    board: Arc<HeadlessBoard>,
}

impl HeadlessRenderer {
    pub fn new(board: Arc<HeadlessBoard>) -> Self {
        Self { board }
    }

    /// Factory suitable for handing to the renderer thread.
    pub fn factory(
        board: Arc<HeadlessBoard>,
    ) -> impl FnOnce() -> Result<HeadlessRenderer, RenderError> + Send + 'static {
        move || Ok(HeadlessRenderer::new(board))
    }
}

impl Renderer for HeadlessRenderer {
    type Window = HeadlessWindow;

    fn create(
        &mut self,
        descriptor: &WindowDescriptor,
        pull: PullFn,
    ) -> Result<HeadlessWindow, RenderError> {
        if self
            .board
            .failing_titles
            .lock()
            .contains(&descriptor.options.title)
        {
            return Err(RenderError::Backend(format!(
                "refused to open '{}'",
                descriptor.options.title
            )));
        }
        let key = descriptor.key.clone();
        let legend = match descriptor.kind {
            WindowKind::Heatmap => Vec::new(),
            WindowKind::Single | WindowKind::Multi => (0..descriptor.options.channel_count)
                .map(|channel| descriptor.options.channel_label(channel))
                .collect(),
        };
        self.board.close_requests.lock().remove(&key);
        {
            let mut records = self.board.records.lock();
            let incarnations = records.get(&key).map(|r| r.incarnations).unwrap_or(0) + 1;
            records.insert(
                key.clone(),
                WindowRecord {
                    kind: descriptor.kind,
                    title: descriptor.options.title.clone(),
                    legend,
                    incarnations,
                    rendered: 0,
                    rejected: 0,
                    last_frame: None,
                    open: true,
                },
            );
        }
        Ok(HeadlessWindow {
            key,
            kind: descriptor.kind,
            channel_count: descriptor.options.channel_count,
            schedule: PullSchedule::from_descriptor(pull, descriptor),
            board: self.board.clone(),
            open: true,
        })
    }

    fn pump_events(&mut self) {
        self.board.pumps.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct HeadlessWindow {
    key: WindowKey,
    kind: WindowKind,
    channel_count: usize,
    schedule: PullSchedule,
    board: Arc<HeadlessBoard>,
    open: bool,
}

impl HeadlessWindow {
    fn accepts(&self, frame: &Frame) -> bool {
        match (self.kind, frame) {
            (WindowKind::Single | WindowKind::Multi, Frame::Channels(channels)) => {
                channels.len() >= self.channel_count
            }
            (WindowKind::Heatmap, Frame::Grid { rows, cols, values }) => {
                rows.saturating_mul(*cols) == values.len()
            }
            _ => false,
        }
    }
}

impl Window for HeadlessWindow {
    fn is_open(&self) -> bool {
        self.open && !self.board.close_requested(&self.key)
    }

    fn render(&mut self, frame: &Frame) {
        if self.accepts(frame) {
            self.board.update_record(&self.key, |record| {
                record.rendered += 1;
                record.last_frame = Some(frame.clone());
            });
        } else {
            log::warn!(
                "window {}: {} frame does not fit a {} plot, skipping",
                self.key,
                frame.channel_count(),
                self.kind
            );
            self.board.update_record(&self.key, |record| record.rejected += 1);
        }
    }

    fn close(&mut self) {
        self.open = false;
        self.board.update_record(&self.key, |record| record.open = false);
    }

    fn update(&mut self, now: Instant) {
        if let Some(frame) = self.schedule.poll(now) {
            self.render(&frame);
        }
    }
}
