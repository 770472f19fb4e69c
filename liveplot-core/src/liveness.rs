use crate::key::WindowKey;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Open/closed flag per window, as the agent believes it.
pub type LivenessMap = BTreeMap<WindowKey, bool>;

/// Renderer's view of one window: whether it is open, and which incarnation
/// of the key it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    pub open: bool,
    pub generation: u64,
}

impl WindowState {
    pub fn new(open: bool, generation: u64) -> Self {
        Self { open, generation }
    }
}

/// Full report sent on the State channel.
pub type LivenessReport = BTreeMap<WindowKey, WindowState>;

/// Agent-side view of the latest liveness report.
///
/// The map behind the pointer is never mutated in place: writers build a new map
/// and swap the pointer, so readers always hold a complete report.
#[derive(Debug, Default)]
pub struct LivenessView {
    current: RwLock<Arc<LivenessMap>>,
}

impl LivenessView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<LivenessMap> {
        self.current.read().clone()
    }

    pub fn get(&self, key: &WindowKey) -> Option<bool> {
        self.current.read().get(key).copied()
    }

    /// Swaps in a whole new report and hands back the previous one.
    pub fn replace(&self, map: LivenessMap) -> Arc<LivenessMap> {
        std::mem::replace(&mut *self.current.write(), Arc::new(map))
    }

    /// Copy-on-write update of a single key.
    pub fn mark(&self, key: &WindowKey, open: bool) {
        let mut current = self.current.write();
        if current.get(key) == Some(&open) {
            return;
        }
        let mut next = LivenessMap::clone(&current);
        next.insert(key.clone(), open);
        *current = Arc::new(next);
    }

    pub fn any_open(&self) -> bool {
        self.current.read().values().any(|open| *open)
    }

    pub fn open_count(&self) -> usize {
        self.current.read().values().filter(|open| **open).count()
    }
}
