use crate::config::Config;
use crate::error::{FacilitatorError, Result};
use crate::gateway::{LanguageModelGateway, OfflineGateway, OpenAiGateway};
use crate::interview::{Interview, InterviewStep, InterviewTranscript, TranscriptStatus, Turn};
use crate::report::{AlignmentReport, ReportSynthesizer};
use crate::session::{AlignmentSession, SessionHandle, SessionRegistry};
use crate::store::{JsonFileStore, TranscriptStats, TranscriptStore};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

/// Snapshot of an interview for display, in flight or completed
#[derive(Debug, Clone, Serialize)]
pub struct InterviewView {
    pub interview_id: String,
    pub session_id: Uuid,
    pub topic: String,
    pub status: TranscriptStatus,
    pub turn_count: usize,
    pub max_turns: usize,
    pub question: Option<String>,
    pub turns: Vec<Turn>,
}

impl From<&Interview> for InterviewView {
    fn from(interview: &Interview) -> Self {
        let t = interview.transcript();
        Self {
            interview_id: t.id.clone(),
            session_id: t.session_id,
            topic: t.topic.clone(),
            status: t.status,
            turn_count: t.turn_count(),
            max_turns: t.max_turns,
            question: interview.pending_question().map(str::to_string),
            turns: t.turns.clone(),
        }
    }
}

impl From<InterviewTranscript> for InterviewView {
    fn from(t: InterviewTranscript) -> Self {
        Self {
            interview_id: t.id,
            session_id: t.session_id,
            topic: t.topic,
            status: t.status,
            turn_count: t.turns.len(),
            max_turns: t.max_turns,
            question: None,
            turns: t.turns,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FacilitatorStats {
    #[serde(flatten)]
    pub transcripts: TranscriptStats,
    pub session_active: bool,
    pub current_topic: Option<String>,
    pub interviews_in_progress: usize,
    pub gateway_online: bool,
}

/// Entry point for every user-facing operation
///
/// Owns the session registry and the in-flight interviews. Each interview
/// sits behind its own mutex so answers to one interview are applied one at a
/// time while different interviews proceed independently.
pub struct Facilitator {
    registry: SessionRegistry,
    interviews: RwLock<HashMap<String, Arc<Mutex<Interview>>>>,
    gateway: Arc<dyn LanguageModelGateway>,
    store: Arc<dyn TranscriptStore>,
    synthesizer: ReportSynthesizer,
    max_turns: usize,
}

impl Facilitator {
    pub fn new(
        gateway: Arc<dyn LanguageModelGateway>,
        store: Arc<dyn TranscriptStore>,
        max_turns: usize,
    ) -> Self {
        Self {
            registry: SessionRegistry::new(),
            interviews: RwLock::new(HashMap::new()),
            synthesizer: ReportSynthesizer::new(Arc::clone(&gateway), Arc::clone(&store)),
            gateway,
            store,
            max_turns: max_turns.max(1),
        }
    }

    /// Build the store and gateway described by the configuration.
    ///
    /// Without an API key the facilitator runs with the offline gateway.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(JsonFileStore::new(&cfg.storage.transcripts_path)?);

        let gateway: Arc<dyn LanguageModelGateway> = match cfg.api_key() {
            Some(key) => Arc::new(OpenAiGateway::new(&cfg.gateway, key)?),
            None => {
                warn!(
                    "{} is not set; running without a language model (interviews and reports are unavailable)",
                    cfg.gateway.api_key_env
                );
                Arc::new(OfflineGateway::new(cfg.gateway.api_key_env.clone()))
            }
        };

        Ok(Self::new(gateway, store, cfg.interview.max_turns))
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn gateway_online(&self) -> bool {
        self.gateway.is_online()
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    pub async fn start_session(&self, topic: &str) -> Result<AlignmentSession> {
        let handle = self.registry.start_session(topic).await?;
        self.registry.lookup(handle).await
    }

    pub async fn active_session(&self) -> Result<AlignmentSession> {
        self.registry.get_active_session().await
    }

    pub async fn session(&self, handle: SessionHandle) -> Result<AlignmentSession> {
        self.registry.lookup(handle).await
    }

    pub async fn close_session(&self) -> Option<AlignmentSession> {
        self.registry.close_session().await
    }

    // ------------------------------------------------------------------
    // Interviews
    // ------------------------------------------------------------------

    /// Begin an interview under the given session, or the active one
    pub async fn begin_interview(&self, session: Option<SessionHandle>) -> Result<InterviewView> {
        let session = match session {
            Some(handle) => self.registry.lookup(handle).await?,
            None => self.registry.get_active_session().await?,
        };

        let interview = Interview::begin(&session, self.gateway.as_ref(), self.max_turns).await?;
        let view = InterviewView::from(&interview);

        self.interviews
            .write()
            .await
            .insert(view.interview_id.clone(), Arc::new(Mutex::new(interview)));

        Ok(view)
    }

    pub async fn submit_answer(&self, interview_id: &str, answer: &str) -> Result<InterviewStep> {
        let interview = self.find_interview(interview_id).await?;
        let mut interview = interview.lock().await;

        let step = interview
            .submit_answer(answer, self.gateway.as_ref(), self.store.as_ref())
            .await?;

        if interview.is_completed() {
            self.interviews.write().await.remove(interview_id);
        }

        Ok(step)
    }

    /// In-flight state, or the stored record once the interview has completed
    pub async fn interview(&self, interview_id: &str) -> Result<InterviewView> {
        let in_flight = self.interviews.read().await.get(interview_id).cloned();
        if let Some(interview) = in_flight {
            let interview = interview.lock().await;
            return Ok(InterviewView::from(&*interview));
        }

        self.store
            .load(interview_id)?
            .map(InterviewView::from)
            .ok_or_else(|| FacilitatorError::UnknownInterview(interview_id.to_string()))
    }

    /// Drop an in-progress interview without saving it
    pub async fn abandon_interview(&self, interview_id: &str) -> Result<()> {
        match self.interviews.write().await.remove(interview_id) {
            Some(_) => {
                info!("Interview {} abandoned", interview_id);
                Ok(())
            }
            None => Err(self.missing_interview(interview_id)),
        }
    }

    async fn find_interview(&self, interview_id: &str) -> Result<Arc<Mutex<Interview>>> {
        let interviews = self.interviews.read().await;
        interviews
            .get(interview_id)
            .cloned()
            .ok_or_else(|| self.missing_interview(interview_id))
    }

    /// Completed interviews leave the in-flight map but stay in the store
    fn missing_interview(&self, interview_id: &str) -> FacilitatorError {
        if self.store.contains(interview_id) {
            FacilitatorError::AlreadyCompleted(interview_id.to_string())
        } else {
            FacilitatorError::UnknownInterview(interview_id.to_string())
        }
    }

    // ------------------------------------------------------------------
    // Transcripts and reports
    // ------------------------------------------------------------------

    pub fn transcripts(&self) -> Result<Vec<InterviewTranscript>> {
        Ok(self.store.list_completed()?)
    }

    pub fn transcript(&self, id: &str) -> Result<InterviewTranscript> {
        self.store
            .load(id)?
            .ok_or_else(|| FacilitatorError::UnknownTranscript(id.to_string()))
    }

    pub fn delete_transcript(&self, id: &str) -> Result<()> {
        if self.store.delete(id)? {
            Ok(())
        } else {
            Err(FacilitatorError::UnknownTranscript(id.to_string()))
        }
    }

    pub async fn generate_report(&self, topic: Option<&str>) -> Result<AlignmentReport> {
        self.synthesizer.generate_report(topic).await
    }

    pub async fn generate_comparative_report(&self, topics: &[String]) -> Result<AlignmentReport> {
        self.synthesizer.generate_comparative_report(topics).await
    }

    pub async fn statistics(&self) -> Result<FacilitatorStats> {
        let transcripts = self.store.stats()?;
        let current = self.registry.get_active_session().await.ok();

        Ok(FacilitatorStats {
            transcripts,
            session_active: current.is_some(),
            current_topic: current.map(|s| s.topic),
            interviews_in_progress: self.interviews.read().await.len(),
            gateway_online: self.gateway.is_online(),
        })
    }
}
