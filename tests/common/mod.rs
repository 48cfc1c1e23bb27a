// Shared helpers for integration tests: a scripted language model and
// builders for stores and transcripts.

#![allow(dead_code)]

use alignment_facilitator::{
    Facilitator, GatewayError, InterviewTranscript, JsonFileStore, LanguageModelGateway,
    TranscriptStatus, Turn,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Deterministic gateway that records what it was asked
#[derive(Default)]
pub struct ScriptedGateway {
    /// Return blank text for every question
    pub empty_questions: AtomicBool,
    /// Fail the next `ask_next_question` call once
    pub fail_next_question: AtomicBool,
    /// Fail every `summarize` call
    pub fail_summaries: AtomicBool,
    /// Fail every `synthesize` call
    pub fail_synthesis: AtomicBool,
    /// Sleep inside `ask_next_question` so concurrent callers overlap
    pub slow_questions: AtomicBool,
    /// Turn histories passed to `ask_next_question`, in call order
    pub histories: Mutex<Vec<Vec<Turn>>>,
    /// Topics passed to `summarize`, in call order
    pub summarized_topics: Mutex<Vec<String>>,
    pub synthesize_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl LanguageModelGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn ask_opening_question(&self, topic: &str) -> Result<String, GatewayError> {
        if self.empty_questions.load(Ordering::SeqCst) {
            return Ok("   ".to_string());
        }
        Ok(format!("What does '{}' mean to you?", topic))
    }

    async fn ask_next_question(&self, _topic: &str, turns: &[Turn]) -> Result<String, GatewayError> {
        if self.fail_next_question.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::new("HTTP 429: rate limited"));
        }
        self.histories.lock().unwrap().push(turns.to_vec());
        if self.slow_questions.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if self.empty_questions.load(Ordering::SeqCst) {
            return Ok(String::new());
        }
        Ok(format!("Question {}", turns.len() + 1))
    }

    async fn summarize(&self, topic: &str, turns: &[Turn]) -> Result<String, GatewayError> {
        if self.fail_summaries.load(Ordering::SeqCst) {
            return Err(GatewayError::new("HTTP 500: upstream error"));
        }
        self.summarized_topics.lock().unwrap().push(topic.to_string());
        let answers: Vec<&str> = turns.iter().map(|t| t.answer.as_str()).collect();
        Ok(format!("{}: {}", topic, answers.join(", ")))
    }

    async fn synthesize(&self, summaries: &[String]) -> Result<String, GatewayError> {
        self.synthesize_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_synthesis.load(Ordering::SeqCst) {
            return Err(GatewayError::new("HTTP 503: overloaded"));
        }
        Ok(format!("Report over {} summaries", summaries.len()))
    }

    async fn compare(&self, topic_summaries: &[(String, String)]) -> Result<String, GatewayError> {
        let topics: Vec<&str> = topic_summaries.iter().map(|(t, _)| t.as_str()).collect();
        Ok(format!("Comparison of {}", topics.join(" vs ")))
    }
}

pub fn temp_store() -> (TempDir, Arc<JsonFileStore>) {
    let dir = TempDir::new().expect("temp dir");
    let store = Arc::new(JsonFileStore::new(dir.path()).expect("store"));
    (dir, store)
}

pub fn facilitator(max_turns: usize) -> (TempDir, Arc<ScriptedGateway>, Arc<JsonFileStore>, Facilitator) {
    let (dir, store) = temp_store();
    let gateway = ScriptedGateway::new();
    let facilitator = Facilitator::new(gateway.clone(), store.clone(), max_turns);
    (dir, gateway, store, facilitator)
}

/// A transcript already in the `Completed` state, ready to save
pub fn completed_transcript(topic: &str, answers: &[&str]) -> InterviewTranscript {
    let mut transcript = InterviewTranscript::new(uuid::Uuid::new_v4(), topic, answers.len());
    transcript.turns = answers
        .iter()
        .enumerate()
        .map(|(i, answer)| Turn::new(format!("Question {}", i + 1), *answer))
        .collect();
    transcript.status = TranscriptStatus::Completed;
    transcript.completed_at = Some(Utc::now());
    transcript
}
