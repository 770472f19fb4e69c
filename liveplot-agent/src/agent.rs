use crate::provider::{CloseCallback, ProviderError, ProviderThread};
use crate::shared::AgentShared;
use crate::{broadcaster, state_poller};
use connection::{Connection, ConnectionError};
use liveplot_core::{
    AgentSettings, Allocation, Frame, LivenessMap, PlotOptions, WindowDescriptor, WindowKey,
    WindowKind,
};
use liveplot_runtime::{
    spawn_renderer, ChannelSet, HeadlessBoard, HeadlessRenderer, RenderError, Renderer,
    RendererHandle, TaskCommand,
};
use parking_lot::Mutex;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum AgentError {
    #[error("agent has been shut down")]
    Inactive,
    #[error("data provider failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("{0}")]
    RendererStart(String),
    #[error("failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("task channel: {0}")]
    Channel(#[from] ConnectionError),
}

/// Owns the renderer thread and every provider feeding it.
///
/// Windows are opened from any thread through `&self`. Dropping the agent
/// shuts it down.
pub struct LivePlotAgent {
    shared: Arc<AgentShared>,
    renderer: Mutex<Option<RendererHandle>>,
}

impl LivePlotAgent {
    pub fn new<R, F>(settings: AgentSettings, factory: F) -> Result<Self, AgentError>
    where
        R: Renderer + 'static,
        F: FnOnce() -> Result<R, RenderError> + Send + 'static,
    {
        let settings = settings.normalized();
        let channels = ChannelSet::new(settings.data_capacity);
        let handle = spawn_renderer(
            channels.clone(),
            settings.clock_interval(),
            settings.verbose,
            factory,
        )
        .map_err(AgentError::RendererStart)?;
        if settings.verbose {
            log::info!("renderer started (clock {:?})", settings.clock_interval());
        }

        let agent = Self {
            shared: Arc::new(AgentShared::new(settings, channels)),
            renderer: Mutex::new(Some(handle)),
        };
        // On failure the partially started agent is dropped, which shuts it down.
        broadcaster::spawn(agent.shared.clone())?;
        state_poller::spawn(agent.shared.clone())?;
        Ok(agent)
    }

    /// Agent backed by the headless renderer, together with its board.
    pub fn headless(settings: AgentSettings) -> Result<(Self, Arc<HeadlessBoard>), AgentError> {
        let board = HeadlessBoard::new();
        let agent = Self::new(settings, HeadlessRenderer::factory(board.clone()))?;
        Ok((agent, board))
    }

    pub fn new_plot<F>(
        &self,
        provider: F,
        on_close: Option<CloseCallback>,
        options: PlotOptions,
    ) -> Result<WindowKey, AgentError>
    where
        F: FnMut() -> Result<Frame, ProviderError> + Send + 'static,
    {
        self.open_window(WindowKind::Single, provider, on_close, options)
    }

    pub fn new_multi_plot<F>(
        &self,
        provider: F,
        on_close: Option<CloseCallback>,
        options: PlotOptions,
    ) -> Result<WindowKey, AgentError>
    where
        F: FnMut() -> Result<Frame, ProviderError> + Send + 'static,
    {
        self.open_window(WindowKind::Multi, provider, on_close, options)
    }

    pub fn new_heatmap<F>(
        &self,
        provider: F,
        on_close: Option<CloseCallback>,
        options: PlotOptions,
    ) -> Result<WindowKey, AgentError>
    where
        F: FnMut() -> Result<Frame, ProviderError> + Send + 'static,
    {
        self.open_window(WindowKind::Heatmap, provider, on_close, options)
    }

    fn open_window<F>(
        &self,
        kind: WindowKind,
        mut provider: F,
        on_close: Option<CloseCallback>,
        options: PlotOptions,
    ) -> Result<WindowKey, AgentError>
    where
        F: FnMut() -> Result<Frame, ProviderError> + Send + 'static,
    {
        if !self.shared.is_active() {
            return Err(AgentError::Inactive);
        }
        // The first frame is fetched before a key is taken so a failing
        // provider leaves no trace.
        let seed = provider()?;

        let shared = &self.shared;
        let Allocation { key, generation } = shared.allocator.lock().allocate();
        shared.data.seed(&key, generation, seed);
        shared.liveness.mark(&key, true);

        let descriptor = WindowDescriptor::new(
            key.clone(),
            kind,
            options,
            shared.settings.clock_interval_seconds,
        )
        .with_generation(generation);
        let refresh = Duration::try_from_secs_f64(descriptor.refresh_interval())
            .unwrap_or_else(|_| shared.settings.clock_interval());

        let spawned = ProviderThread::new(
            shared.clone(),
            key.clone(),
            generation,
            refresh,
            provider,
            on_close,
        )
        .spawn();
        if let Err(err) = spawned {
            self.abandon(&key);
            return Err(err.into());
        }

        if let Err(err) = shared.channels.task.send(TaskCommand::Create(descriptor)) {
            self.abandon(&key);
            return Err(err.into());
        }
        if shared.settings.verbose {
            log::info!("queued {kind} window {key}");
        }
        Ok(key)
    }

    /// Undoes a half-finished `open_window` so the key becomes recyclable.
    fn abandon(&self, key: &WindowKey) {
        self.shared.allocator.lock().release_pending(key);
        self.shared.liveness.mark(key, false);
        self.shared.data.retire(key);
    }

    /// Stops every thread and releases the renderer. Safe to call repeatedly.
    ///
    /// Close callbacks are not invoked for windows still open at shutdown.
    pub fn shutdown(&self) {
        if !self.shared.deactivate() {
            return;
        }
        let shared = &self.shared;
        let verbose = shared.settings.verbose;
        if let Err(err) = shared.channels.task.send(TaskCommand::Terminate) {
            log::warn!("terminate command not delivered: {err}");
        }
        if verbose {
            log::info!("terminate command sent");
        }

        let grace = shared.settings.shutdown_grace();
        thread::sleep(grace);

        let flushed = shared.channels.flush();
        if verbose {
            log::info!("flushed {flushed} queued messages");
        }

        let Some(mut handle) = self.renderer.lock().take() else {
            return;
        };
        if !handle.reap() {
            // The flush may have swallowed the first terminate.
            if let Err(err) = shared.channels.task.send(TaskCommand::Terminate) {
                log::warn!("second terminate command not delivered: {err}");
            }
            log::warn!("renderer still running after {grace:?}, leaving it detached");
        } else if verbose {
            log::info!("renderer stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.shared.is_active()
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.shared.settings
    }

    /// Liveness as the agent currently believes it.
    pub fn liveness(&self) -> Arc<LivenessMap> {
        self.shared.liveness.snapshot()
    }

    pub fn is_open(&self, key: &WindowKey) -> bool {
        self.shared.liveness.get(key).unwrap_or(false)
    }

    /// Windows the agent currently believes to be open.
    pub fn open_window_count(&self) -> usize {
        self.shared.liveness.open_count()
    }

    /// Keys that the next window may reuse.
    pub fn available_keys(&self) -> Vec<WindowKey> {
        self.shared.allocator.lock().available()
    }

    pub fn frame(&self, key: &WindowKey) -> Option<Arc<Frame>> {
        self.shared.data.frame(key)
    }

    /// Number of provider threads still running.
    pub fn provider_threads(&self) -> usize {
        self.shared.provider_threads.load(Ordering::Acquire)
    }

    pub fn renderer_finished(&self) -> bool {
        self.renderer
            .lock()
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(true)
    }
}

impl Drop for LivePlotAgent {
    fn drop(&mut self) {
        self.shutdown();
    }
}
