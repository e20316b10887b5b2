//! SSE session registry.
//!
//! Each `GET /sse` connection owns one session. The registry maps the
//! session id to the sending half of an unbounded channel whose receiving
//! half feeds that connection's event stream. Dropping the [`SessionGuard`]
//! that travels with the stream removes the entry, so a client disconnect
//! is all it takes to close a session.

use crate::error::{SessionError, SessionResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Opaque session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Events pushed onto a session's SSE stream.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A serialized JSON-RPC message.
    JsonRpc(String),
}

/// Sending half of a session's stream.
pub type SessionSender = mpsc::UnboundedSender<SessionEvent>;

/// Receiving half of a session's stream.
pub type SessionReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// A registered session.
#[derive(Debug)]
struct Session {
    sender: SessionSender,
    created_at: DateTime<Utc>,
}

/// Process-wide session registry.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session.
    ///
    /// The returned guard must live exactly as long as the stream that
    /// drains the receiver.
    pub fn open(self: &Arc<Self>) -> (SessionId, SessionReceiver, SessionGuard) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = SessionId::generate();

        let session = Session {
            sender,
            created_at: Utc::now(),
        };
        let active = {
            let mut sessions = self.sessions.lock();
            sessions.insert(id.clone(), session);
            sessions.len()
        };
        info!("Session started: {} (active: {})", id, active);

        let guard = SessionGuard {
            registry: Arc::downgrade(self),
            id: id.clone(),
        };
        (id, receiver, guard)
    }

    /// Remove a session. Returns whether it was present.
    pub fn close(&self, id: &SessionId) -> bool {
        let removed = self.sessions.lock().remove(id);
        match removed {
            Some(session) => {
                let lifetime = Utc::now() - session.created_at;
                info!(
                    "Session closed: {} (open for {}s)",
                    id,
                    lifetime.num_seconds()
                );
                true
            }
            None => false,
        }
    }

    /// Look up the sender for a session.
    pub fn lookup(&self, id: &str) -> SessionResult<SessionSender> {
        self.sessions
            .lock()
            .get(&SessionId(id.to_string()))
            .map(|s| s.sender.clone())
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Push an event onto a session's stream.
    ///
    /// A dropped receiver means the client went away; the session is
    /// removed and `Closed` is returned.
    pub fn send(&self, id: &str, event: SessionEvent) -> SessionResult<()> {
        let sender = self.lookup(id)?;
        if sender.send(event).is_err() {
            warn!("Session {} stream dropped mid-write, closing", id);
            self.close(&SessionId(id.to_string()));
            return Err(SessionError::Closed(id.to_string()));
        }
        debug!("Queued event for session {}", id);
        Ok(())
    }

    /// Drop every session's sender so that all open streams end.
    ///
    /// Used on shutdown; otherwise long-lived SSE connections would keep
    /// the server from draining.
    pub fn close_all(&self) -> usize {
        let drained: Vec<SessionId> = self.sessions.lock().drain().map(|(id, _)| id).collect();
        for id in &drained {
            info!("Session closed on shutdown: {}", id);
        }
        drained.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.lock().contains_key(&SessionId(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

/// Closes its session when dropped.
#[derive(Debug)]
pub struct SessionGuard {
    registry: Weak<SessionRegistry>,
    id: SessionId,
}

impl SessionGuard {
    pub fn id(&self) -> &SessionId {
        &self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.close(&self.id);
        }
    }
}
