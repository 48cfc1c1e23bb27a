use super::transcript::{InterviewTranscript, TranscriptStatus, Turn};
use crate::error::{FacilitatorError, Result};
use crate::gateway::LanguageModelGateway;
use crate::session::AlignmentSession;
use crate::store::TranscriptStore;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

/// Asked when the model returns nothing usable
pub const FALLBACK_QUESTION: &str =
    "Could you tell me more about that, and why it matters to you?";

/// Result of submitting one answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InterviewStep {
    /// The interview continues with this question
    NextQuestion { question: String },

    /// The last turn was recorded and the transcript persisted
    Completed { record_id: String },
}

/// One bounded-turn interview
///
/// `&mut self` on `submit_answer` serializes turns; callers sharing an
/// interview across tasks wrap it in a mutex.
#[derive(Debug, Clone)]
pub struct Interview {
    transcript: InterviewTranscript,

    /// Question awaiting an answer; `None` once completed
    pending_question: Option<String>,
}

impl Interview {
    /// Start an interview under an open session and fetch the opening question.
    ///
    /// `max_turns` below one is raised to one.
    pub async fn begin(
        session: &AlignmentSession,
        gateway: &dyn LanguageModelGateway,
        max_turns: usize,
    ) -> Result<Self> {
        if !session.is_open() {
            return Err(FacilitatorError::SessionClosed(session.id));
        }

        let transcript =
            InterviewTranscript::new(session.id, session.topic.clone(), max_turns.max(1));
        let question = non_empty_or_fallback(gateway.ask_opening_question(&session.topic).await?);

        info!(
            "Interview {} started for session {} (topic: {})",
            transcript.id, session.id, session.topic
        );

        Ok(Self {
            transcript,
            pending_question: Some(question),
        })
    }

    /// Record an answer to the pending question.
    ///
    /// Nothing is mutated unless the gateway (or, on the final turn, the store)
    /// call succeeds.
    pub async fn submit_answer(
        &mut self,
        answer: &str,
        gateway: &dyn LanguageModelGateway,
        store: &dyn TranscriptStore,
    ) -> Result<InterviewStep> {
        let question = match (&self.pending_question, self.transcript.status) {
            (Some(question), TranscriptStatus::InProgress) => question.clone(),
            _ => return Err(FacilitatorError::AlreadyCompleted(self.transcript.id.clone())),
        };

        // Stored verbatim; only the emptiness check ignores whitespace
        if answer.trim().is_empty() {
            return Err(FacilitatorError::EmptyAnswer);
        }

        let mut turns = self.transcript.turns.clone();
        turns.push(Turn::new(question, answer));

        if turns.len() >= self.transcript.max_turns {
            let mut completed = self.transcript.clone();
            completed.turns = turns;
            completed.status = TranscriptStatus::Completed;
            completed.completed_at = Some(Utc::now());

            let record_id = store.save(&completed)?;
            info!(
                "Interview {} completed after {} turns",
                completed.id,
                completed.turn_count()
            );

            self.transcript = completed;
            self.pending_question = None;
            return Ok(InterviewStep::Completed { record_id });
        }

        let next = gateway
            .ask_next_question(&self.transcript.topic, &turns)
            .await?;
        let next = non_empty_or_fallback(next);

        self.transcript.turns = turns;
        self.pending_question = Some(next.clone());

        info!(
            "Interview {} turn {}/{} recorded",
            self.transcript.id,
            self.transcript.turn_count(),
            self.transcript.max_turns
        );

        Ok(InterviewStep::NextQuestion { question: next })
    }

    pub fn id(&self) -> &str {
        &self.transcript.id
    }

    pub fn transcript(&self) -> &InterviewTranscript {
        &self.transcript
    }

    pub fn pending_question(&self) -> Option<&str> {
        self.pending_question.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.transcript.is_completed()
    }
}

fn non_empty_or_fallback(question: String) -> String {
    let question = question.trim();
    if question.is_empty() {
        warn!("Language model returned an empty question, using fallback");
        FALLBACK_QUESTION.to_string()
    } else {
        question.to_string()
    }
}
