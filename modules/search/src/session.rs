//! Last query wins: a new query of a client session supersedes the one still running.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

#[derive(Debug, Default)]
struct Inner {
    next: u64,
    sessions: HashMap<String, Current>,
}

#[derive(Debug)]
struct Current {
    sequence: u64,
    token: CancellationToken,
}

/// Tracks the current query of each client session.
#[derive(Clone, Debug, Default)]
pub struct Sessions {
    inner: Arc<Mutex<Inner>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new query for a session, cancelling the one before.
    pub fn begin(&self, session: &str) -> Ticket {
        let token = CancellationToken::new();

        let mut inner = self.inner.lock();
        inner.next += 1;
        let sequence = inner.next;

        let current = Current {
            sequence,
            token: token.clone(),
        };
        if let Some(previous) = inner.sessions.insert(session.to_string(), current) {
            log::debug!(
                "session {session}: query {} superseded by {sequence}",
                previous.sequence
            );
            previous.token.cancel();
        }

        Ticket {
            sessions: self.clone(),
            session: session.to_string(),
            sequence,
            token,
        }
    }

    /// Number of sessions with a running query.
    pub fn len(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_current(&self, session: &str, sequence: u64) -> bool {
        self.inner
            .lock()
            .sessions
            .get(session)
            .is_some_and(|current| current.sequence == sequence)
    }

    fn finish(&self, session: &str, sequence: u64) {
        let mut inner = self.inner.lock();
        if inner
            .sessions
            .get(session)
            .is_some_and(|current| current.sequence == sequence)
        {
            inner.sessions.remove(session);
        }
    }
}

/// A running query of a session. Dropping it ends the query.
#[derive(Debug)]
pub struct Ticket {
    sessions: Sessions,
    session: String,
    sequence: u64,
    token: CancellationToken,
}

impl Ticket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Check if no newer query of the same session was started.
    pub fn is_current(&self) -> bool {
        !self.token.is_cancelled() && self.sessions.is_current(&self.session, self.sequence)
    }

    /// Resolves once the query got superseded.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.sessions.finish(&self.session, self.sequence);
    }
}
