use liveplot_core::{DescriptorError, Frame, WindowDescriptor, WindowKind};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Non-blocking read of the freshest frame for one window. Lives on the
/// renderer thread only.
pub type PullFn = Box<dyn FnMut() -> Arc<Frame>>;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("{0} windows are not supported by this renderer")]
    Unsupported(WindowKind),
    #[error("renderer error: {0}")]
    Backend(String),
}

/// Display toolkit boundary. Implementations are created and used on the
/// renderer thread, so they need not be `Send`.
pub trait Renderer {
    type Window: Window;

    fn create(
        &mut self,
        descriptor: &WindowDescriptor,
        pull: PullFn,
    ) -> Result<Self::Window, RenderError>;

    /// Processes pending toolkit events once per tick.
    fn pump_events(&mut self) {}
}

pub trait Window {
    fn is_open(&self) -> bool;
    fn render(&mut self, frame: &Frame);
    /// Releases toolkit resources. Called once, after `is_open` turned false or
    /// when the renderer shuts down.
    fn close(&mut self);
    /// Called every tick while the window is open.
    fn update(&mut self, now: Instant);
}

const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Pull function plus the refresh cadence of one window.
pub struct PullSchedule {
    pull: PullFn,
    interval: Duration,
    next_due: Option<Instant>,
}

impl PullSchedule {
    pub fn new(pull: PullFn, interval: Duration) -> Self {
        Self {
            pull,
            interval,
            next_due: None,
        }
    }

    pub fn from_descriptor(pull: PullFn, descriptor: &WindowDescriptor) -> Self {
        let interval =
            Duration::try_from_secs_f64(descriptor.refresh_interval()).unwrap_or(MAX_INTERVAL);
        Self::new(pull, interval.min(MAX_INTERVAL))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Pulls when the interval has elapsed. Empty frames are skipped.
    pub fn poll(&mut self, now: Instant) -> Option<Arc<Frame>> {
        if let Some(due) = self.next_due {
            if now < due {
                return None;
            }
        }
        self.next_due = Some(now.checked_add(self.interval).unwrap_or(now + MAX_INTERVAL));
        let frame = (self.pull)();
        if frame.is_empty() {
            None
        } else {
            Some(frame)
        }
    }
}
