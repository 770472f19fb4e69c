use liveplot_core::{AgentSettings, DataStore, KeyAllocator, LivenessView};
use liveplot_runtime::ChannelSet;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// State shared by the controller and its background threads.
pub(crate) struct AgentShared {
    pub(crate) settings: AgentSettings,
    pub(crate) channels: ChannelSet,
    pub(crate) data: DataStore,
    pub(crate) liveness: LivenessView,
    pub(crate) allocator: Mutex<KeyAllocator>,
    pub(crate) provider_threads: AtomicUsize,
    active: AtomicBool,
}

impl AgentShared {
    pub(crate) fn new(settings: AgentSettings, channels: ChannelSet) -> Self {
        Self {
            settings,
            channels,
            data: DataStore::new(),
            liveness: LivenessView::new(),
            allocator: Mutex::new(KeyAllocator::new()),
            provider_threads: AtomicUsize::new(0),
            active: AtomicBool::new(true),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Clears the active flag, returning whether it was still set.
    pub(crate) fn deactivate(&self) -> bool {
        self.active.swap(false, Ordering::AcqRel)
    }
}
