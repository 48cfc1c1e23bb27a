use super::session::{AlignmentSession, SessionHandle};
use crate::error::{FacilitatorError, Result};
use std::collections::VecDeque;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Superseded sessions kept for lookup; older ones are forgotten
pub const MAX_SUPERSEDED_SESSIONS: usize = 32;

#[derive(Debug, Default)]
struct RegistryState {
    /// Most recently started session, open or closed
    current: Option<AlignmentSession>,

    /// Recently superseded sessions, oldest first
    superseded: VecDeque<AlignmentSession>,
}

/// Process-wide holder of the single current alignment session
///
/// All mutation happens under one write lock, so readers only ever see a
/// session before or after a transition, never in between.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    state: RwLock<RegistryState>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session, closing the currently open one if any
    pub async fn start_session(&self, topic: &str) -> Result<SessionHandle> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(FacilitatorError::EmptyTopic);
        }

        let session = AlignmentSession::open(topic.to_string());
        let handle = session.handle();

        let mut state = self.state.write().await;
        if let Some(mut previous) = state.current.take() {
            if previous.close() {
                info!(
                    "Alignment session {} ('{}') superseded by {}",
                    previous.id, previous.topic, handle
                );
            }
            state.superseded.push_back(previous);
            if state.superseded.len() > MAX_SUPERSEDED_SESSIONS {
                if let Some(dropped) = state.superseded.pop_front() {
                    debug!("Forgetting superseded session {}", dropped.id);
                }
            }
        }
        state.current = Some(session);

        info!("Started alignment session {} with topic: {}", handle, topic);
        Ok(handle)
    }

    /// The currently open session
    pub async fn get_active_session(&self) -> Result<AlignmentSession> {
        let state = self.state.read().await;
        match &state.current {
            Some(session) if session.is_open() => Ok(session.clone()),
            _ => Err(FacilitatorError::NoActiveSession),
        }
    }

    /// Snapshot of the current session or a recently superseded one
    pub async fn lookup(&self, handle: SessionHandle) -> Result<AlignmentSession> {
        let state = self.state.read().await;
        state
            .current
            .iter()
            .chain(state.superseded.iter())
            .find(|s| s.id == handle.id())
            .cloned()
            .ok_or(FacilitatorError::UnknownSession(handle.id()))
    }

    /// Close the current session. A no-op when nothing is open.
    pub async fn close_session(&self) -> Option<AlignmentSession> {
        let mut state = self.state.write().await;
        let session = state.current.as_mut()?;
        if !session.close() {
            return None;
        }

        info!("Closed alignment session {} ('{}')", session.id, session.topic);
        Some(session.clone())
    }

    /// Most recently started session regardless of status
    pub async fn current(&self) -> Option<AlignmentSession> {
        self.state.read().await.current.clone()
    }
}
