mod rt_thread;
pub mod headless;
pub mod inbox;
pub mod process;
pub mod protocol;
pub mod renderer;

pub use headless::{HeadlessBoard, HeadlessRenderer, HeadlessWindow, WindowRecord};
pub use inbox::DataInbox;
pub use process::{ProcessState, RendererProcess};
pub use protocol::{ChannelSet, RendererEvent, TaskCommand};
pub use renderer::{PullFn, PullSchedule, RenderError, Renderer, Window};

use rt_thread::RendererThread;
use std::thread::JoinHandle;
use std::time::Duration;

/// Join handle of the renderer thread.
#[derive(Debug)]
pub struct RendererHandle {
    thread: Option<JoinHandle<()>>,
}

impl RendererHandle {
    pub fn is_finished(&self) -> bool {
        self.thread
            .as_ref()
            .map(|thread| thread.is_finished())
            .unwrap_or(true)
    }

    /// Joins the thread if it has already exited; otherwise leaves it detached
    /// and returns false.
    pub fn reap(&mut self) -> bool {
        if !self.is_finished() {
            return false;
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("renderer thread panicked");
            }
        }
        true
    }
}

/// Starts the renderer loop on its own thread.
///
/// `factory` runs on that thread, so the renderer it builds never has to be
/// `Send`. A factory error is returned here and no loop is started.
pub fn spawn_renderer<R, F>(
    channels: ChannelSet,
    clock: Duration,
    verbose: bool,
    factory: F,
) -> Result<RendererHandle, String>
where
    R: Renderer + 'static,
    F: FnOnce() -> Result<R, RenderError> + Send + 'static,
{
    let thread = RendererThread::spawn(
        move || factory().map_err(|err| format!("Failed to start renderer: {err}")),
        move |renderer: R| {
            let state = RendererProcess::new(renderer, channels, clock, verbose).run();
            if verbose {
                log::info!("renderer thread exiting ({state:?})");
            }
        },
    )?;
    Ok(RendererHandle {
        thread: Some(thread),
    })
}
