use thiserror::Error;

use crate::gateway::GatewayError;

pub type Result<T> = std::result::Result<T, FacilitatorError>;

/// Every failure the facilitator surfaces to its callers
#[derive(Error, Debug)]
pub enum FacilitatorError {
    #[error("No active alignment session. Start a session first.")]
    NoActiveSession,

    #[error("Alignment session {0} is closed and cannot accept new interviews")]
    SessionClosed(uuid::Uuid),

    #[error("Alignment session {0} not found")]
    UnknownSession(uuid::Uuid),

    #[error("Interview {0} is already complete")]
    AlreadyCompleted(String),

    #[error("Interview {0} not found")]
    UnknownInterview(String),

    #[error("Transcript {0} not found")]
    UnknownTranscript(String),

    #[error("No interview transcripts found. Please conduct some interviews first.")]
    NoTranscripts,

    #[error("No interviews found for topic: {topic}")]
    NoMatchingTranscripts { topic: String },

    #[error("Topic cannot be empty")]
    EmptyTopic,

    #[error("Answer cannot be empty")]
    EmptyAnswer,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Summarizing transcript {transcript_id} failed: {source}")]
    SummarizationFailed {
        transcript_id: String,
        #[source]
        source: GatewayError,
    },

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl FacilitatorError {
    /// Stable machine-readable name, used in API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoActiveSession => "no_active_session",
            Self::SessionClosed(_) => "session_closed",
            Self::UnknownSession(_) => "unknown_session",
            Self::AlreadyCompleted(_) => "already_completed",
            Self::UnknownInterview(_) => "unknown_interview",
            Self::UnknownTranscript(_) => "unknown_transcript",
            Self::NoTranscripts => "no_transcripts",
            Self::NoMatchingTranscripts { .. } => "no_matching_transcripts",
            Self::EmptyTopic => "empty_topic",
            Self::EmptyAnswer => "empty_answer",
            Self::Gateway(_) => "gateway_error",
            Self::SummarizationFailed { .. } => "summarization_failed",
            Self::Storage(_) => "storage_error",
        }
    }
}
