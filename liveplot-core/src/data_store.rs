use crate::frame::Frame;
use crate::key::WindowKey;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Full data mapping as carried on the Data channel.
pub type DataSnapshot = HashMap<WindowKey, Arc<Frame>>;

#[derive(Debug, Clone)]
struct Slot {
    generation: u64,
    frame: Arc<Frame>,
    retired: bool,
}

/// Latest frame per window key.
///
/// Each key has exactly one writer (the provider thread of its current
/// generation); whole-map reads copy `Arc`s, never frames.
#[derive(Debug, Default)]
pub struct DataStore {
    slots: DashMap<WindowKey, Slot>,
    version: AtomicU64,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation for `key`, replacing whatever was there.
    pub fn seed(&self, key: &WindowKey, generation: u64, frame: Frame) {
        self.slots.insert(
            key.clone(),
            Slot {
                generation,
                frame: Arc::new(frame),
                retired: false,
            },
        );
        self.bump();
    }

    /// Stores a frame if `generation` still owns the key. Returns false when the
    /// writer has been superseded or the slot was garbage collected.
    pub fn publish(&self, key: &WindowKey, generation: u64, frame: Frame) -> bool {
        let Some(mut slot) = self.slots.get_mut(key) else {
            return false;
        };
        if slot.generation != generation || slot.retired {
            return false;
        }
        slot.frame = Arc::new(frame);
        drop(slot);
        self.bump();
        true
    }

    /// Clears the frame of a closed window and refuses further writes until the
    /// key is seeded again.
    pub fn retire(&self, key: &WindowKey) -> bool {
        let Some(mut slot) = self.slots.get_mut(key) else {
            return false;
        };
        slot.frame = Arc::new(Frame::Empty);
        slot.retired = true;
        drop(slot);
        self.bump();
        true
    }

    pub fn is_current(&self, key: &WindowKey, generation: u64) -> bool {
        self.slots
            .get(key)
            .map(|slot| slot.generation == generation)
            .unwrap_or(false)
    }

    pub fn is_retired(&self, key: &WindowKey) -> bool {
        self.slots.get(key).map(|slot| slot.retired).unwrap_or(false)
    }

    pub fn frame(&self, key: &WindowKey) -> Option<Arc<Frame>> {
        self.slots.get(key).map(|slot| slot.frame.clone())
    }

    pub fn snapshot(&self) -> DataSnapshot {
        self.slots
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().frame.clone()))
            .collect()
    }

    /// Increases on every write; the broadcaster publishes only when it moves.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn bump(&self) {
        self.version.fetch_add(1, Ordering::AcqRel);
    }
}
