use crossbeam_channel::{
    self as channel, Receiver, SendTimeoutError, Sender, TryRecvError,
    TrySendError,
};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    Unbounded,
    Bounded,
}

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub kind: ConnectionKind,
    /// Only meaningful for `Bounded`; zero is clamped to one.
    pub queue_capacity: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            kind: ConnectionKind::Unbounded,
            queue_capacity: 1024,
        }
    }
}

impl ConnectionConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn bounded(queue_capacity: usize) -> Self {
        Self {
            kind: ConnectionKind::Bounded,
            queue_capacity,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("send failed")]
    SendFailed,
    #[error("receive failed")]
    RecvFailed,
    #[error("queue full")]
    Full,
    #[error("timed out")]
    Timeout,
}

/// One logical channel. Both endpoints live behind the same handle so either side
/// (and a shutdown flush) can reach the queue.
pub trait Connection<T>: Send + Sync {
    /// Blocks while a bounded queue is full.
    fn send(&self, value: T) -> Result<(), ConnectionError>;
    fn try_send(&self, value: T) -> Result<(), ConnectionError>;
    fn send_timeout(&self, value: T, timeout: Duration) -> Result<(), ConnectionError>;
    fn try_recv(&self) -> Result<Option<T>, ConnectionError>;
    fn len(&self) -> usize;
    fn capacity(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pops everything currently queued and keeps only the newest value.
    fn try_recv_latest(&self) -> Result<Option<T>, ConnectionError> {
        let mut latest = None;
        while let Some(value) = self.try_recv()? {
            latest = Some(value);
        }
        Ok(latest)
    }

    /// Discards queued values, returning how many were dropped.
    fn drain(&self) -> usize {
        let mut dropped = 0;
        while let Ok(Some(_)) = self.try_recv() {
            dropped += 1;
        }
        dropped
    }
}

#[derive(Debug)]
pub struct InProcessConnection<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> Clone for InProcessConnection<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
        }
    }
}

impl<T> InProcessConnection<T> {
    pub fn new(config: &ConnectionConfig) -> Self {
        let (sender, receiver) = match config.kind {
            ConnectionKind::Unbounded => channel::unbounded(),
            ConnectionKind::Bounded => channel::bounded(config.queue_capacity.max(1)),
        };
        Self { sender, receiver }
    }

    pub fn unbounded() -> Self {
        Self::new(&ConnectionConfig::unbounded())
    }

    pub fn bounded(queue_capacity: usize) -> Self {
        Self::new(&ConnectionConfig::bounded(queue_capacity))
    }
}

impl<T: Send> Connection<T> for InProcessConnection<T> {
    fn send(&self, value: T) -> Result<(), ConnectionError> {
        self.sender
            .send(value)
            .map_err(|_| ConnectionError::SendFailed)
    }

    fn try_send(&self, value: T) -> Result<(), ConnectionError> {
        match self.sender.try_send(value) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(ConnectionError::Full),
            Err(TrySendError::Disconnected(_)) => Err(ConnectionError::SendFailed),
        }
    }

    fn send_timeout(&self, value: T, timeout: Duration) -> Result<(), ConnectionError> {
        match self.sender.send_timeout(value, timeout) {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => Err(ConnectionError::Timeout),
            Err(SendTimeoutError::Disconnected(_)) => Err(ConnectionError::SendFailed),
        }
    }

    fn try_recv(&self) -> Result<Option<T>, ConnectionError> {
        match self.receiver.try_recv() {
            Ok(value) => Ok(Some(value)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ConnectionError::RecvFailed),
        }
    }

    fn len(&self) -> usize {
        self.receiver.len()
    }

    fn capacity(&self) -> Option<usize> {
        self.sender.capacity()
    }
}
