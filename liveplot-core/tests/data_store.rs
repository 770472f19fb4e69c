use liveplot_core::{DataStore, Frame, LivenessView, WindowKey};
use std::sync::Arc;
use std::thread;

#[test]
fn publish_requires_current_generation() {
    let store = DataStore::new();
    let key = WindowKey::from_index(0);
    store.seed(&key, 1, Frame::single(vec![1.0]));
    assert!(store.publish(&key, 1, Frame::single(vec![2.0])));
    assert!(!store.publish(&key, 7, Frame::single(vec![3.0])));
    assert_eq!(*store.frame(&key).unwrap(), Frame::single(vec![2.0]));
}

#[test]
fn retired_slot_stays_empty_until_reseeded() {
    let store = DataStore::new();
    let key = WindowKey::from_index(3);
    store.seed(&key, 1, Frame::grid(2, 2, vec![1.0; 4]));
    assert!(store.retire(&key));
    assert!(store.frame(&key).unwrap().is_empty());
    assert!(!store.publish(&key, 1, Frame::single(vec![9.0])));
    assert!(store.frame(&key).unwrap().is_empty());

    store.seed(&key, 2, Frame::single(vec![4.0]));
    assert!(!store.is_retired(&key));
    assert!(store.is_current(&key, 2));
    assert!(!store.is_current(&key, 1));
}

#[test]
fn version_moves_on_every_write() {
    let store = DataStore::new();
    let key = WindowKey::from_index(0);
    let start = store.version();
    store.seed(&key, 1, Frame::Empty);
    store.publish(&key, 1, Frame::single(vec![1.0]));
    assert_eq!(store.version(), start + 2);
    assert!(!store.publish(&WindowKey::from_index(9), 1, Frame::Empty));
    assert_eq!(store.version(), start + 2);
}

#[test]
fn snapshot_reads_while_providers_write() {
    let store = Arc::new(DataStore::new());
    for index in 0..4 {
        store.seed(&WindowKey::from_index(index), 1, Frame::Empty);
    }
    let writers: Vec<_> = (0..4)
        .map(|index| {
            let store = store.clone();
            thread::spawn(move || {
                let key = WindowKey::from_index(index);
                for value in 0..500 {
                    store.publish(&key, 1, Frame::single(vec![value as f64]));
                }
            })
        })
        .collect();
    for _ in 0..200 {
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 4);
    }
    for writer in writers {
        writer.join().unwrap();
    }
    for index in 0..4 {
        let frame = store.frame(&WindowKey::from_index(index)).unwrap();
        assert_eq!(frame.last_values(), vec![499.0]);
    }
}

#[test]
fn liveness_view_swaps_whole_maps() {
    let view = LivenessView::new();
    let key = WindowKey::from_index(0);
    assert_eq!(view.get(&key), None);
    view.mark(&key, true);
    let before = view.snapshot();
    assert!(view.any_open());

    let mut next = liveplot_core::LivenessMap::new();
    next.insert(key.clone(), false);
    let previous = view.replace(next);
    assert_eq!(previous.get(&key), Some(&true));
    // Readers holding the old snapshot keep a complete map.
    assert_eq!(before.get(&key), Some(&true));
    assert_eq!(view.get(&key), Some(false));
    assert_eq!(view.open_count(), 0);
}
