use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Process-wide tie-breaker for transcripts created within the same microsecond
static TRANSCRIPT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a timestamp-derived transcript identifier.
///
/// Format: `interview_YYYY-MM-DD_HH-MM-SS-ffffff_NNNNNN`. Lexical order matches
/// creation order within a process.
pub fn new_transcript_id(now: DateTime<Utc>) -> String {
    let seq = TRANSCRIPT_SEQUENCE.fetch_add(1, Ordering::SeqCst) % 1_000_000;
    format!("interview_{}_{:06}", now.format("%Y-%m-%d_%H-%M-%S-%6f"), seq)
}

/// One question/answer pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

impl Turn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptStatus {
    InProgress,
    Completed,
}

/// The record of one interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewTranscript {
    /// Timestamp-derived identifier, also the persisted record key
    pub id: String,

    /// Session the interview was started under
    pub session_id: Uuid,

    /// Copy of the session topic at interview start
    pub topic: String,

    /// Question/answer pairs in the order they happened
    pub turns: Vec<Turn>,

    /// Configured turn bound
    pub max_turns: usize,

    pub status: TranscriptStatus,

    pub created_at: DateTime<Utc>,

    pub completed_at: Option<DateTime<Utc>>,
}

impl InterviewTranscript {
    pub fn new(session_id: Uuid, topic: impl Into<String>, max_turns: usize) -> Self {
        let created_at = Utc::now();
        Self {
            id: new_transcript_id(created_at),
            session_id,
            topic: topic.into(),
            turns: Vec::new(),
            max_turns,
            status: TranscriptStatus::InProgress,
            created_at,
            completed_at: None,
        }
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn is_completed(&self) -> bool {
        self.status == TranscriptStatus::Completed
    }

    /// Plain-text rendering fed to the language model
    pub fn conversation_text(&self) -> String {
        render_conversation(&self.topic, &self.turns)
    }
}

/// Render a topic and its turns as an interviewer/employee dialogue
pub fn render_conversation(topic: &str, turns: &[Turn]) -> String {
    let mut text = format!("Topic: {}\n", topic);
    for turn in turns {
        text.push_str(&format!(
            "\nInterviewer: {}\nEmployee: {}\n",
            turn.question, turn.answer
        ));
    }
    text
}
