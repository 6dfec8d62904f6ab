//! Connection state holder
//!
//! Wraps a `tokio::sync::watch` channel. Mutation is crate-private so the
//! [`SyncEngine`](super::engine::SyncEngine) is the only writer; everyone
//! else gets snapshots or a receiver.

use calsync_domain::ConnectionState;
use tokio::sync::watch;

/// Single-writer, many-reader connection state
#[derive(Debug)]
pub struct ConnectionHandle {
    tx: watch::Sender<ConnectionState>,
}

impl ConnectionHandle {
    pub fn new(initial: ConnectionState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Current state
    pub fn snapshot(&self) -> ConnectionState {
        self.tx.borrow().clone()
    }

    /// Read-only receiver notified on every change
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.tx.subscribe()
    }

    /// Replace the whole state, notifying observers.
    pub(crate) fn replace(&self, state: ConnectionState) {
        self.tx.send_replace(state);
    }

    /// Apply `f` in place and return the resulting state.
    pub(crate) fn update<F>(&self, f: F) -> ConnectionState
    where
        F: FnOnce(&mut ConnectionState),
    {
        self.tx.send_modify(f);
        self.snapshot()
    }
}

impl Default for ConnectionHandle {
    fn default() -> Self {
        Self::new(ConnectionState::default())
    }
}
