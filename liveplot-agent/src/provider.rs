use crate::shared::AgentShared;
use liveplot_core::{Frame, WindowKey};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Source(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    pub fn msg(message: impl Into<String>) -> Self {
        ProviderError::Message(message.into())
    }
}

/// Invoked once when the agent observes the window closed.
pub type CloseCallback = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProviderExit {
    Closed,
    Superseded,
    ProviderFailed,
    Shutdown,
}

/// Keeps the running-thread counter honest even if the provider panics.
struct RunningGuard(Arc<AgentShared>);

impl RunningGuard {
    fn new(shared: Arc<AgentShared>) -> Self {
        shared.provider_threads.fetch_add(1, Ordering::AcqRel);
        Self(shared)
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.provider_threads.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Polls one provider for one window incarnation.
pub(crate) struct ProviderThread<F> {
    shared: Arc<AgentShared>,
    key: WindowKey,
    generation: u64,
    refresh: Duration,
    provider: F,
    on_close: Option<CloseCallback>,
}

impl<F> ProviderThread<F>
where
    F: FnMut() -> Result<Frame, ProviderError> + Send + 'static,
{
    pub(crate) fn new(
        shared: Arc<AgentShared>,
        key: WindowKey,
        generation: u64,
        refresh: Duration,
        provider: F,
        on_close: Option<CloseCallback>,
    ) -> Self {
        Self {
            shared,
            key,
            generation,
            refresh,
            provider,
            on_close,
        }
    }

    pub(crate) fn spawn(self) -> std::io::Result<thread::JoinHandle<()>> {
        let guard = RunningGuard::new(self.shared.clone());
        thread::Builder::new()
            .name(format!("liveplot-provider-{}", self.key))
            .spawn(move || {
                let _guard = guard;
                let shared = self.shared.clone();
                let key = self.key.clone();
                let exit = self.run();
                if shared.settings.verbose {
                    log::info!("provider thread for window {key} exiting ({exit:?})");
                }
            })
    }

    fn run(mut self) -> ProviderExit {
        let started = Instant::now();
        let warmup = self.shared.settings.warmup();
        // Liveness is unknown until the renderer's first report, so pull blindly.
        while started.elapsed() < warmup {
            if let Some(exit) = self.interrupted() {
                return exit;
            }
            if !self.pull() {
                return ProviderExit::ProviderFailed;
            }
            thread::sleep(self.refresh);
        }

        let idle = self.shared.settings.clock_interval();
        loop {
            if let Some(exit) = self.interrupted() {
                return exit;
            }
            match self.shared.liveness.get(&self.key) {
                Some(true) => {
                    if !self.pull() {
                        return ProviderExit::ProviderFailed;
                    }
                    thread::sleep(self.refresh);
                }
                Some(false) => return self.finish(ProviderExit::Closed),
                None => thread::sleep(idle),
            }
        }
    }

    fn interrupted(&mut self) -> Option<ProviderExit> {
        if !self.shared.is_active() {
            return Some(ProviderExit::Shutdown);
        }
        if !self.shared.data.is_current(&self.key, self.generation) {
            return Some(self.finish(ProviderExit::Superseded));
        }
        None
    }

    fn pull(&mut self) -> bool {
        match (self.provider)() {
            Ok(frame) => {
                self.shared.data.publish(&self.key, self.generation, frame);
                true
            }
            Err(err) => {
                log::error!("provider for window {} failed: {err}", self.key);
                false
            }
        }
    }

    fn finish(&mut self, exit: ProviderExit) -> ProviderExit {
        if let Some(on_close) = self.on_close.take() {
            on_close();
        }
        exit
    }
}
