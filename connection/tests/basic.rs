use connection::{Connection, ConnectionConfig, ConnectionError, ConnectionKind, InProcessConnection};
use std::time::Duration;

fn create_connection(kind: ConnectionKind, queue_capacity: usize) -> InProcessConnection<i32> {
    let config = ConnectionConfig {
        kind,
        queue_capacity,
    };
    InProcessConnection::new(&config)
}

#[test]
fn config_default_is_unbounded_with_reasonable_capacity() {
    let config = ConnectionConfig::default();
    assert!(matches!(config.kind, ConnectionKind::Unbounded));
    assert_eq!(config.queue_capacity, 1024);
}

#[test]
fn unbounded_send_recv() {
    let conn = create_connection(ConnectionKind::Unbounded, 1024);
    assert!(conn.try_recv().unwrap().is_none());
    conn.send(42).unwrap();
    assert_eq!(conn.try_recv().unwrap(), Some(42));
    assert!(conn.try_recv().unwrap().is_none());
    assert_eq!(conn.capacity(), None);
}

#[test]
fn bounded_is_fifo() {
    let conn = create_connection(ConnectionKind::Bounded, 4);
    conn.send(1).unwrap();
    conn.send(2).unwrap();
    conn.send(3).unwrap();
    assert_eq!(conn.len(), 3);
    assert_eq!(conn.try_recv().unwrap(), Some(1));
    assert_eq!(conn.try_recv().unwrap(), Some(2));
    assert_eq!(conn.try_recv().unwrap(), Some(3));
    assert!(conn.is_empty());
}

#[test]
fn bounded_respects_capacity() {
    let conn = create_connection(ConnectionKind::Bounded, 1);
    conn.try_send(10).unwrap();
    assert_eq!(conn.try_send(11), Err(ConnectionError::Full));
    assert_eq!(conn.try_recv().unwrap(), Some(10));
}

#[test]
fn bounded_clamps_zero_capacity_to_one() {
    let conn = create_connection(ConnectionKind::Bounded, 0);
    assert_eq!(conn.capacity(), Some(1));
    conn.try_send(10).unwrap();
    assert!(conn.try_send(11).is_err());
}

#[test]
fn send_timeout_reports_saturation() {
    let conn = InProcessConnection::bounded(1);
    conn.send(1).unwrap();
    let err = conn.send_timeout(2, Duration::from_millis(5)).unwrap_err();
    assert_eq!(err, ConnectionError::Timeout);
}

#[test]
fn clones_share_the_same_queue() {
    let producer = InProcessConnection::unbounded();
    let consumer = producer.clone();
    producer.send(5).unwrap();
    assert_eq!(consumer.try_recv().unwrap(), Some(5));
}

#[test]
fn latest_keeps_only_newest_value() {
    let conn = InProcessConnection::bounded(8);
    for value in 0..8 {
        conn.send(value).unwrap();
    }
    assert_eq!(conn.try_recv_latest().unwrap(), Some(7));
    assert!(conn.is_empty());
    assert_eq!(conn.try_recv_latest().unwrap(), None);
}

#[test]
fn drain_discards_everything() {
    let conn = InProcessConnection::unbounded();
    conn.send(1).unwrap();
    conn.send(2).unwrap();
    assert_eq!(conn.drain(), 2);
    assert!(conn.is_empty());
}
