use crate::shared::AgentShared;
use connection::{Connection, ConnectionError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const SEND_SLICE: Duration = Duration::from_millis(50);

pub(crate) fn spawn(shared: Arc<AgentShared>) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("liveplot-broadcast".to_string())
        .spawn(move || run(&shared))
}

/// Pushes a snapshot of the data store whenever it changed and a window is
/// live. Exits once the agent is deactivated.
fn run(shared: &AgentShared) {
    let pause = shared
        .settings
        .broadcast_interval()
        .max(Duration::from_millis(1));
    let mut last_sent: Option<u64> = None;
    while shared.is_active() {
        let version = shared.data.version();
        if last_sent != Some(version) && shared.liveness.any_open() && publish(shared) {
            last_sent = Some(version);
        }
        thread::sleep(pause);
    }
    if shared.settings.verbose {
        log::info!("broadcaster stopped");
    }
}

/// Blocks while the data channel is full, re-checking the active flag between
/// attempts. Each retry sends a fresh snapshot.
fn publish(shared: &AgentShared) -> bool {
    while shared.is_active() {
        match shared.channels.data.send_timeout(shared.data.snapshot(), SEND_SLICE) {
            Ok(()) => return true,
            Err(ConnectionError::Timeout) | Err(ConnectionError::Full) => continue,
            Err(err) => {
                log::warn!("data broadcast failed: {err}");
                return false;
            }
        }
    }
    false
}
