use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of an alignment session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Open,
    Closed,
}

/// Reference to a session returned by `SessionRegistry::start_session`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHandle(pub Uuid);

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An administrator-defined topic scope under which interviews are conducted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentSession {
    /// Unique session identifier
    pub id: Uuid,

    /// Alignment topic (trimmed, never empty)
    pub topic: String,

    /// Open until closed by the administrator or superseded
    pub status: SessionStatus,

    /// When the session was started
    pub created_at: DateTime<Utc>,

    /// When the session was closed, if it has been
    pub closed_at: Option<DateTime<Utc>>,
}

impl AlignmentSession {
    pub(crate) fn open(topic: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic,
            status: SessionStatus::Open,
            created_at: Utc::now(),
            closed_at: None,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle(self.id)
    }

    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }

    /// Transition to `Closed`. Returns false if it was already closed.
    pub(crate) fn close(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.status = SessionStatus::Closed;
        self.closed_at = Some(Utc::now());
        true
    }
}
