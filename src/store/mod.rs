//! Transcript persistence
//!
//! Completed interviews are handed to a `TranscriptStore` exactly once. The
//! report synthesizer reads them back in store order.

mod file;
mod stats;

pub use file::{JsonFileStore, StoredTranscript, FILE_VERSION};
pub use stats::TranscriptStats;

use crate::interview::InterviewTranscript;
use anyhow::Result;

/// Storage for completed interview transcripts
pub trait TranscriptStore: Send + Sync {
    /// Persist a completed transcript, returning its record id
    fn save(&self, transcript: &InterviewTranscript) -> Result<String>;

    /// Every persisted transcript, in creation order
    fn list_completed(&self) -> Result<Vec<InterviewTranscript>>;

    fn load(&self, id: &str) -> Result<Option<InterviewTranscript>>;

    fn contains(&self, id: &str) -> bool;

    /// Remove a record. Returns false if it did not exist.
    fn delete(&self, id: &str) -> Result<bool>;

    fn stats(&self) -> Result<TranscriptStats> {
        Ok(TranscriptStats::from_transcripts(&self.list_completed()?))
    }
}
