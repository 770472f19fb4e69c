use crate::shared::AgentShared;
use connection::Connection;
use liveplot_runtime::RendererEvent;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub(crate) fn spawn(shared: Arc<AgentShared>) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("liveplot-state".to_string())
        .spawn(move || run(&shared))
}

fn run(shared: &AgentShared) {
    let period = shared.settings.state_poll_interval();
    while shared.is_active() {
        poll_once(shared);
        nap(shared, period);
    }
    if shared.settings.verbose {
        log::info!("state poller stopped");
    }
}

/// Sleeps for `period` in clock-sized slices so shutdown is noticed early.
fn nap(shared: &AgentShared, period: Duration) {
    let slice = shared.settings.clock_interval().max(Duration::from_millis(1));
    let deadline = Instant::now() + period;
    while shared.is_active() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(slice.min(deadline - now));
    }
}

/// Applies pending renderer events and the latest liveness report, then
/// discards the data of windows that just closed.
pub(crate) fn poll_once(shared: &AgentShared) -> bool {
    apply_events(shared);

    let report = match shared.channels.state.try_recv_latest() {
        Ok(Some(report)) => report,
        Ok(None) => return false,
        Err(err) => {
            log::warn!("liveness channel failed: {err}");
            return false;
        }
    };

    // The allocator stays locked until the closed windows are cleared, so a
    // recyclable key never still carries its old data.
    let mut allocator = shared.allocator.lock();
    let observation = allocator.observe(&report);
    shared.liveness.replace(allocator.overlay(&report));
    for key in &observation.newly_closed {
        if shared.data.retire(key) && shared.settings.verbose {
            log::info!("cleaning data for window {key}");
        }
    }
    true
}

fn apply_events(shared: &AgentShared) {
    loop {
        match shared.channels.events.try_recv() {
            Ok(Some(RendererEvent::CreateFailed {
                key,
                generation,
                reason,
            })) => {
                log::warn!("renderer could not open window {key}: {reason}");
                let mut allocator = shared.allocator.lock();
                // A newer window may already own the key again.
                if allocator.generation(&key) == Some(generation) {
                    allocator.release_pending(&key);
                    shared.liveness.mark(&key, false);
                }
            }
            Ok(None) => break,
            Err(err) => {
                log::warn!("renderer event channel failed: {err}");
                break;
            }
        }
    }
}
