use liveplot_core::{KeyAllocator, LivenessReport, WindowKey, WindowState};

/// Report in which every listed window carries its latest generation.
fn report(allocator: &KeyAllocator, entries: &[(u64, bool)]) -> LivenessReport {
    entries
        .iter()
        .map(|(index, open)| {
            let key = WindowKey::from_index(*index);
            let generation = allocator.generation(&key).unwrap_or(0);
            (key, WindowState::new(*open, generation))
        })
        .collect()
}

fn allocator_with_open_windows(count: u64) -> KeyAllocator {
    let mut allocator = KeyAllocator::new();
    for _ in 0..count {
        allocator.allocate();
    }
    let all_open: Vec<(u64, bool)> = (0..count).map(|i| (i, true)).collect();
    let report = report(&allocator, &all_open);
    allocator.observe(&report);
    allocator
}

fn observe(allocator: &mut KeyAllocator, entries: &[(u64, bool)]) -> liveplot_core::Observation {
    let report = report(allocator, entries);
    allocator.observe(&report)
}

#[test]
fn mints_sequential_keys_with_rising_generations() {
    let mut allocator = KeyAllocator::new();
    let first = allocator.allocate();
    let second = allocator.allocate();
    let third = allocator.allocate();
    assert_eq!(first.key.as_str(), "0");
    assert_eq!(second.key.as_str(), "1");
    assert_eq!(third.key.as_str(), "2");
    assert!(first.generation < second.generation && second.generation < third.generation);
    assert_eq!(allocator.next_index(), 3);
}

#[test]
fn recycles_closed_key_behind_frontier() {
    let mut allocator = allocator_with_open_windows(3);
    let observation = observe(&mut allocator, &[(0, true), (1, false), (2, true)]);
    assert_eq!(observation.newly_closed, vec![WindowKey::from_index(1)]);
    assert_eq!(allocator.available(), vec![WindowKey::from_index(1)]);

    let before = allocator.generation(&WindowKey::from_index(1));
    let reused = allocator.allocate();
    assert_eq!(reused.key.as_str(), "1");
    assert!(Some(reused.generation) > before);
    assert!(allocator.available().is_empty());
}

#[test]
fn does_not_reuse_key_adjacent_to_frontier() {
    let mut allocator = allocator_with_open_windows(3);
    observe(&mut allocator, &[(0, true), (1, true), (2, false)]);
    assert_eq!(allocator.allocate().key.as_str(), "3");
}

#[test]
fn reuses_smallest_key_first_and_never_twice() {
    let mut allocator = allocator_with_open_windows(4);
    observe(&mut allocator, &[(0, false), (1, false), (2, true), (3, true)]);
    assert_eq!(allocator.allocate().key.as_str(), "0");
    assert_eq!(allocator.allocate().key.as_str(), "1");
    assert_eq!(allocator.allocate().key.as_str(), "4");
}

#[test]
fn older_generation_cannot_recycle_pending_key() {
    let mut allocator = allocator_with_open_windows(3);
    let lagging = report(&allocator, &[(0, true), (1, false), (2, true)]);
    allocator.observe(&lagging);
    let reused = allocator.allocate();
    assert!(allocator.is_pending(&reused.key));

    // The renderer has not processed the create yet: key 1 still shows the
    // closed window of the previous generation.
    let observation = allocator.observe(&lagging);
    assert!(observation.newly_closed.is_empty());
    assert!(observation.confirmed.is_empty());
    assert!(allocator.available().is_empty());
    assert_eq!(allocator.overlay(&lagging).get(&reused.key), Some(&true));
    assert_eq!(allocator.allocate().key.as_str(), "3");

    let observation = observe(&mut allocator, &[(0, true), (1, true), (2, true), (3, true)]);
    assert_eq!(observation.confirmed.len(), 2);
    assert!(observation.confirmed.contains(&reused.key));
    assert!(!allocator.is_pending(&reused.key));
}

#[test]
fn window_closed_before_its_first_report_is_collected() {
    let mut allocator = allocator_with_open_windows(1);
    let quick = allocator.allocate();
    assert!(allocator.is_pending(&quick.key));

    // The first report that mentions the new window already shows it closed.
    let observation = observe(&mut allocator, &[(0, true), (1, false)]);
    assert_eq!(observation.confirmed, vec![quick.key.clone()]);
    assert_eq!(observation.newly_closed, vec![quick.key.clone()]);
    assert!(!allocator.is_pending(&quick.key));
    assert_eq!(allocator.available(), vec![quick.key.clone()]);

    let report = report(&allocator, &[(0, true), (1, false)]);
    assert_eq!(allocator.overlay(&report).get(&quick.key), Some(&false));
}

#[test]
fn recycled_key_closed_before_its_first_report_is_collected() {
    let mut allocator = allocator_with_open_windows(3);
    observe(&mut allocator, &[(0, false), (1, true), (2, true)]);
    let reused = allocator.allocate();
    assert_eq!(reused.key.as_str(), "0");

    let observation = observe(&mut allocator, &[(0, false), (1, true), (2, true)]);
    assert_eq!(observation.newly_closed, vec![reused.key.clone()]);
    assert_eq!(allocator.available(), vec![reused.key]);
}

#[test]
fn closure_is_reported_once() {
    let mut allocator = allocator_with_open_windows(2);
    assert_eq!(observe(&mut allocator, &[(0, false), (1, true)]).newly_closed.len(), 1);
    assert!(observe(&mut allocator, &[(0, false), (1, true)]).newly_closed.is_empty());
}

#[test]
fn released_key_becomes_recyclable_on_next_report() {
    let mut allocator = allocator_with_open_windows(3);
    let lagging = report(&allocator, &[(0, false), (1, true), (2, true)]);
    allocator.observe(&lagging);
    let reused = allocator.allocate();
    assert_eq!(reused.key.as_str(), "0");
    allocator.release_pending(&reused.key);
    assert_eq!(allocator.generation(&reused.key), None);

    let observation = allocator.observe(&lagging);
    assert_eq!(observation.newly_closed, vec![reused.key.clone()]);
    assert_eq!(allocator.available(), vec![reused.key]);
}

#[test]
fn pending_keys_missing_from_report_are_overlaid_open() {
    let mut allocator = KeyAllocator::new();
    let allocation = allocator.allocate();
    let overlaid = allocator.overlay(&LivenessReport::new());
    assert_eq!(overlaid.get(&allocation.key), Some(&true));
}
