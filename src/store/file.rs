use super::TranscriptStore;
use crate::interview::InterviewTranscript;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const FILE_VERSION: &str = "1.0";

/// On-disk record: the transcript plus save metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredTranscript {
    #[serde(flatten)]
    pub transcript: InterviewTranscript,
    pub saved_at: DateTime<Utc>,
    pub file_version: String,
}

/// One pretty-printed JSON file per transcript, named `<id>.json`
///
/// Ids are timestamp-derived, so filename order is creation order.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create transcript directory {:?}", dir))?;

        info!("Transcript store at {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for a record id, or `None` if the id could escape the directory
    fn record_path(&self, id: &str) -> Option<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| self.dir.join(format!("{}.json", id)))
    }

    fn read_record(path: &Path) -> Result<InterviewTranscript> {
        let data =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let record: StoredTranscript =
            serde_json::from_str(&data).with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(record.transcript)
    }
}

impl TranscriptStore for JsonFileStore {
    fn save(&self, transcript: &InterviewTranscript) -> Result<String> {
        if !transcript.is_completed() {
            anyhow::bail!("Refusing to save interview {} before it is complete", transcript.id);
        }

        let path = self
            .record_path(&transcript.id)
            .with_context(|| format!("Invalid transcript id: {}", transcript.id))?;

        let record = StoredTranscript {
            transcript: transcript.clone(),
            saved_at: Utc::now(),
            file_version: FILE_VERSION.to_string(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;

        info!("Saved interview transcript to {:?}", path);
        Ok(transcript.id.clone())
    }

    fn list_completed(&self) -> Result<Vec<InterviewTranscript>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read transcript directory {:?}", self.dir))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut transcripts = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::read_record(&path) {
                Ok(transcript) if transcript.is_completed() => transcripts.push(transcript),
                Ok(transcript) => {
                    warn!("Skipping incomplete transcript {} in {:?}", transcript.id, path);
                }
                Err(e) => {
                    warn!("Skipping corrupted file {:?}: {:#}", path, e);
                }
            }
        }

        Ok(transcripts)
    }

    fn load(&self, id: &str) -> Result<Option<InterviewTranscript>> {
        match self.record_path(id) {
            Some(path) if path.exists() => Self::read_record(&path).map(Some),
            _ => Ok(None),
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.record_path(id).is_some_and(|path| path.is_file())
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let Some(path) = self.record_path(id).filter(|p| p.is_file()) else {
            warn!("Transcript {} not found, nothing to delete", id);
            return Ok(false);
        };

        fs::remove_file(&path).with_context(|| format!("Failed to delete {:?}", path))?;
        info!("Deleted interview transcript {:?}", path);
        Ok(true)
    }
}
