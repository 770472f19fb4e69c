use crate::inbox::DataInbox;
use crate::protocol::{ChannelSet, RendererEvent, TaskCommand};
use crate::renderer::{PullFn, RenderError, Renderer, Window};
use connection::{Connection, ConnectionError};
use liveplot_core::{LivenessReport, WindowDescriptor, WindowKey, WindowState};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Terminating,
    Terminated,
}

struct WindowSlot<W> {
    window: W,
    open: bool,
    generation: u64,
}

/// Cooperative loop that owns every window on the renderer thread.
pub struct RendererProcess<R: Renderer> {
    renderer: R,
    channels: ChannelSet,
    inbox: Rc<RefCell<DataInbox>>,
    windows: BTreeMap<WindowKey, WindowSlot<R::Window>>,
    /// Keys whose latest creation failed, with that creation's generation.
    failed: BTreeMap<WindowKey, u64>,
    clock: Duration,
    verbose: bool,
    state: ProcessState,
    ticks: u64,
}

impl<R: Renderer> RendererProcess<R> {
    pub fn new(renderer: R, channels: ChannelSet, clock: Duration, verbose: bool) -> Self {
        let inbox = Rc::new(RefCell::new(DataInbox::new(channels.data.clone())));
        Self {
            renderer,
            channels,
            inbox,
            windows: BTreeMap::new(),
            failed: BTreeMap::new(),
            clock,
            verbose,
            state: ProcessState::Running,
            ticks: 0,
        }
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_window_open(&self, key: &WindowKey) -> bool {
        self.windows.get(key).map(|slot| slot.open).unwrap_or(false)
    }

    /// Current state of every window ever created, plus keys whose creation
    /// failed (reported closed so they can be recycled).
    pub fn liveness(&self) -> LivenessReport {
        let mut report: LivenessReport = self
            .windows
            .iter()
            .map(|(key, slot)| (key.clone(), WindowState::new(slot.open, slot.generation)))
            .collect();
        for (key, generation) in &self.failed {
            report
                .entry(key.clone())
                .or_insert(WindowState::new(false, *generation));
        }
        report
    }

    /// One loop iteration without the clock sleep.
    pub fn step(&mut self) -> ProcessState {
        if self.state != ProcessState::Running {
            return self.state;
        }
        self.ticks += 1;
        self.sweep_closed();
        self.publish_liveness();
        self.handle_next_task();

        self.renderer.pump_events();
        let now = Instant::now();
        for slot in self.windows.values_mut() {
            if slot.open {
                slot.window.update(now);
            }
        }

        if self.state == ProcessState::Terminating {
            self.release_windows();
            self.state = ProcessState::Terminated;
            if self.verbose {
                log::info!("renderer loop stopped after {} ticks", self.ticks);
            }
        }
        self.state
    }

    pub fn run(mut self) -> ProcessState {
        if self.verbose {
            log::info!("renderer loop started (tick {:?})", self.clock);
        }
        while self.step() == ProcessState::Running {
            std::thread::sleep(self.clock);
        }
        self.state
    }

    fn sweep_closed(&mut self) {
        for (key, slot) in self.windows.iter_mut() {
            if slot.open && !slot.window.is_open() {
                slot.open = false;
                slot.window.close();
                if self.verbose {
                    log::info!("window {key} closed");
                }
            }
        }
    }

    fn publish_liveness(&mut self) {
        if self.windows.is_empty() && self.failed.is_empty() {
            return;
        }
        if !self.channels.state.is_empty() {
            return;
        }
        match self.channels.state.try_send(self.liveness()) {
            Ok(()) | Err(ConnectionError::Full) => {}
            Err(err) => log::warn!("liveness report dropped: {err}"),
        }
    }

    fn handle_next_task(&mut self) {
        match self.channels.task.try_recv() {
            Ok(Some(TaskCommand::Create(descriptor))) => {
                if self.verbose {
                    log::debug!("command received: create {} {}", descriptor.kind, descriptor.key);
                }
                self.create_window(descriptor);
            }
            Ok(Some(TaskCommand::Terminate)) => {
                if self.verbose {
                    log::info!("terminate received, stopping renderer loop");
                }
                self.state = ProcessState::Terminating;
            }
            Ok(None) => {}
            Err(err) => {
                log::warn!("task channel failed ({err}), stopping renderer loop");
                self.state = ProcessState::Terminating;
            }
        }
    }

    fn pull_fn(&self, key: &WindowKey) -> PullFn {
        let inbox = Rc::clone(&self.inbox);
        let key = key.clone();
        Box::new(move || inbox.borrow_mut().frame_for(&key))
    }

    fn create_window(&mut self, descriptor: WindowDescriptor) {
        let key = descriptor.key.clone();
        let generation = descriptor.generation;
        if let Some(mut previous) = self.windows.remove(&key) {
            if previous.open {
                previous.window.close();
            }
        }
        let pull = self.pull_fn(&key);
        let created = match descriptor.validate() {
            Ok(()) => self.renderer.create(&descriptor, pull),
            Err(err) => Err(RenderError::from(err)),
        };

        match created {
            Ok(window) => {
                self.failed.remove(&key);
                let slot = WindowSlot {
                    window,
                    open: true,
                    generation,
                };
                self.windows.insert(key, slot);
            }
            Err(err) => {
                log::warn!("window {key} could not be created: {err}");
                self.failed.insert(key.clone(), generation);
                let event = RendererEvent::CreateFailed {
                    key,
                    generation,
                    reason: err.to_string(),
                };
                if let Err(err) = self.channels.events.send(event) {
                    log::warn!("create failure not delivered: {err}");
                }
            }
        }
    }

    fn release_windows(&mut self) {
        for slot in self.windows.values_mut() {
            if slot.open {
                slot.open = false;
                slot.window.close();
            }
        }
        self.windows.clear();
    }
}
