use crate::key::WindowKey;
use crate::liveness::{LivenessMap, LivenessReport};
use std::collections::{BTreeMap, BTreeSet};

/// Hands out window keys, recycling the keys of closed windows.
///
/// Every allocation starts a new generation of its key. A key is pending until
/// a liveness report carrying that generation arrives, open or closed. Report
/// entries from an older generation describe a window that no longer owns the
/// key and are ignored, so a lagging report can neither recycle nor close a
/// window the renderer has not created yet.
#[derive(Debug, Default, Clone)]
pub struct KeyAllocator {
    next_index: u64,
    last_generation: u64,
    available: BTreeSet<u64>,
    pending: BTreeSet<u64>,
    generations: BTreeMap<u64, u64>,
}

/// A freshly handed out key and the generation it was handed out under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub key: WindowKey,
    pub generation: u64,
}

/// Outcome of feeding one liveness report to the allocator.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Keys that are closed in this report and were not recyclable before it.
    pub newly_closed: Vec<WindowKey>,
    /// Pending keys that the report showed for the first time.
    pub confirmed: Vec<WindowKey>,
}

impl KeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the smallest recyclable key unless it sits right behind the
    /// sequential frontier, otherwise mints a fresh one.
    ///
    /// The frontier guard means the most recently minted key is never reused;
    /// it is a heuristic against reports that lag a fast close, not a proof.
    pub fn allocate(&mut self) -> Allocation {
        let reuse = self
            .available
            .first()
            .copied()
            .filter(|candidate| self.next_index.saturating_sub(*candidate) > 1);
        let index = match reuse {
            Some(index) => {
                self.available.remove(&index);
                index
            }
            None => {
                let index = self.next_index;
                self.next_index += 1;
                index
            }
        };
        self.last_generation += 1;
        self.generations.insert(index, self.last_generation);
        self.pending.insert(index);
        Allocation {
            key: WindowKey::from_index(index),
            generation: self.last_generation,
        }
    }

    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Generation of the latest allocation of `key`.
    pub fn generation(&self, key: &WindowKey) -> Option<u64> {
        key.index()
            .and_then(|index| self.generations.get(&index))
            .copied()
    }

    pub fn available(&self) -> Vec<WindowKey> {
        self.available
            .iter()
            .copied()
            .map(WindowKey::from_index)
            .collect()
    }

    pub fn is_pending(&self, key: &WindowKey) -> bool {
        key.index()
            .map(|index| self.pending.contains(&index))
            .unwrap_or(false)
    }

    /// Drops a key from the pending set, e.g. after its creation failed.
    ///
    /// Reports of any generation are trusted for the key afterwards, so the
    /// closed entry of an earlier window recycles it again.
    pub fn release_pending(&mut self, key: &WindowKey) {
        if let Some(index) = key.index() {
            self.pending.remove(&index);
            self.generations.remove(&index);
        }
    }

    /// Recomputes the recyclable set from a fresh report.
    pub fn observe(&mut self, report: &LivenessReport) -> Observation {
        let mut observation = Observation::default();
        let mut closed = BTreeSet::new();
        for (key, state) in report {
            let Some(index) = key.index() else {
                continue;
            };
            if self.is_stale(index, state.generation) {
                continue;
            }
            if self.pending.remove(&index) {
                observation.confirmed.push(key.clone());
            }
            if !state.open {
                closed.insert(index);
                if !self.available.contains(&index) {
                    observation.newly_closed.push(key.clone());
                }
            }
        }
        self.available = closed;
        observation
    }

    /// Open/closed view of `report` as the agent should believe it: stale
    /// entries and keys still pending read as open. Call after `observe`.
    pub fn overlay(&self, report: &LivenessReport) -> LivenessMap {
        let mut effective: LivenessMap = report
            .iter()
            .map(|(key, state)| {
                let stale = key
                    .index()
                    .map(|index| self.is_stale(index, state.generation))
                    .unwrap_or(false);
                (key.clone(), state.open || stale)
            })
            .collect();
        for index in &self.pending {
            effective.insert(WindowKey::from_index(*index), true);
        }
        effective
    }

    fn is_stale(&self, index: u64, generation: u64) -> bool {
        self.generations
            .get(&index)
            .map(|current| generation < *current)
            .unwrap_or(false)
    }
}
