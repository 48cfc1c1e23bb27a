//! Interview session state machine
//!
//! An `Interview` drives one bounded-turn question/answer exchange:
//! `begin` fetches the opening question, each `submit_answer` records a turn,
//! and the turn that reaches `max_turns` completes and persists the transcript.

mod interview;
mod transcript;

pub use interview::{Interview, InterviewStep, FALLBACK_QUESTION};
pub use transcript::{
    new_transcript_id, render_conversation, InterviewTranscript, TranscriptStatus, Turn,
};
