use crate::interview::InterviewTranscript;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Aggregate figures over stored transcripts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptStats {
    /// Number of stored interviews
    pub total_interviews: usize,

    /// Question/answer pairs across all interviews
    pub total_turns: usize,

    /// Mean turns per interview, rounded to 2 decimals
    pub average_turns: f64,

    /// Distinct topics, sorted
    pub topics: Vec<String>,
}

impl TranscriptStats {
    pub fn from_transcripts(transcripts: &[InterviewTranscript]) -> Self {
        if transcripts.is_empty() {
            return Self::default();
        }

        let total_turns: usize = transcripts.iter().map(|t| t.turn_count()).sum();
        let average = total_turns as f64 / transcripts.len() as f64;
        let topics: BTreeSet<String> = transcripts.iter().map(|t| t.topic.clone()).collect();

        Self {
            total_interviews: transcripts.len(),
            total_turns,
            average_turns: (average * 100.0).round() / 100.0,
            topics: topics.into_iter().collect(),
        }
    }
}
