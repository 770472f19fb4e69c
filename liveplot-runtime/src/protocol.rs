use connection::{Connection, ConnectionConfig, InProcessConnection};
use liveplot_core::{DataSnapshot, LivenessReport, WindowDescriptor, WindowKey};

/// Agent → renderer commands, drained one per loop tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskCommand {
    Create(WindowDescriptor),
    Terminate,
}

/// Renderer → agent notifications that are not liveness reports.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererEvent {
    CreateFailed {
        key: WindowKey,
        generation: u64,
        reason: String,
    },
}

/// The channels between the agent and the renderer thread. Cloning hands out
/// another pair of endpoints onto the same queues.
#[derive(Debug, Clone)]
pub struct ChannelSet {
    pub task: InProcessConnection<TaskCommand>,
    /// Holds at most one report; the renderer skips a tick while it is full.
    pub state: InProcessConnection<LivenessReport>,
    /// Bounded so a stalled renderer applies backpressure to the broadcaster.
    pub data: InProcessConnection<DataSnapshot>,
    pub events: InProcessConnection<RendererEvent>,
}

impl ChannelSet {
    pub fn new(data_capacity: usize) -> Self {
        Self {
            task: InProcessConnection::new(&ConnectionConfig::unbounded()),
            state: InProcessConnection::new(&ConnectionConfig::bounded(1)),
            data: InProcessConnection::new(&ConnectionConfig::bounded(data_capacity)),
            events: InProcessConnection::new(&ConnectionConfig::unbounded()),
        }
    }

    /// Discards everything still queued on every channel.
    pub fn flush(&self) -> usize {
        self.task.drain() + self.state.drain() + self.data.drain() + self.events.drain()
    }
}
