use std::sync::mpsc;
use std::thread;

pub(crate) const RENDERER_THREAD_NAME: &str = "liveplot-renderer";

pub(crate) struct RendererThread;

impl RendererThread {
    /// Runs `prepare` on a fresh thread and only then `body`.
    ///
    /// The caller blocks until `prepare` has reported, so toolkit setup errors
    /// surface here instead of inside a detached thread. The prepared value never
    /// leaves the new thread.
    pub(crate) fn spawn<T, P, F>(prepare: P, body: F) -> Result<thread::JoinHandle<()>, String>
    where
        P: FnOnce() -> Result<T, String> + Send + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        let (status_tx, status_rx) = mpsc::sync_channel(1);
        let handle = thread::Builder::new()
            .name(RENDERER_THREAD_NAME.to_string())
            .spawn(move || {
                let prepared = match prepare() {
                    Ok(value) => value,
                    Err(err) => {
                        let _ = status_tx.send(Err(err));
                        return;
                    }
                };
                let _ = status_tx.send(Ok(()));
                body(prepared);
            })
            .map_err(|err| format!("Failed to spawn renderer thread: {err}"))?;

        match status_rx.recv() {
            Ok(Ok(())) => Ok(handle),
            Ok(Err(err)) => {
                let _ = handle.join();
                Err(err)
            }
            Err(_) => {
                let _ = handle.join();
                Err("Renderer thread failed to report status".to_string())
            }
        }
    }
}
