use super::report::{AlignmentReport, ReportScope, TranscriptSummary};
use crate::error::{FacilitatorError, Result};
use crate::gateway::{GatewayError, LanguageModelGateway};
use crate::interview::InterviewTranscript;
use crate::store::TranscriptStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Map-then-reduce summarization over stored transcripts
///
/// Holds no state of its own; every report is regenerated from the store.
pub struct ReportSynthesizer {
    gateway: Arc<dyn LanguageModelGateway>,
    store: Arc<dyn TranscriptStore>,
}

impl ReportSynthesizer {
    pub fn new(gateway: Arc<dyn LanguageModelGateway>, store: Arc<dyn TranscriptStore>) -> Self {
        Self { gateway, store }
    }

    /// Report over all transcripts, or those whose topic contains `topic`
    pub async fn generate_report(&self, topic: Option<&str>) -> Result<AlignmentReport> {
        let topic = topic.map(str::trim).filter(|t| !t.is_empty());
        let scope = match topic {
            Some(t) => ReportScope::Topic(t.to_string()),
            None => ReportScope::All,
        };

        let mut transcripts = self.load_transcripts()?;
        if let Some(filter) = topic {
            transcripts.retain(|t| matches_topic(&t.topic, filter));
            if transcripts.is_empty() {
                return Err(FacilitatorError::NoMatchingTranscripts {
                    topic: filter.to_string(),
                });
            }
        }

        info!(
            "Generating alignment report over {} transcripts ({})",
            transcripts.len(),
            scope.label()
        );

        let summaries = self.map_phase(&transcripts).await?;
        let texts: Vec<String> = summaries.iter().map(|s| s.summary.clone()).collect();
        let final_report = non_empty_report(self.gateway.synthesize(&texts).await?)?;

        info!("Alignment report generated for {} interviews", transcripts.len());

        Ok(AlignmentReport {
            scope,
            total_interviews: transcripts.len(),
            per_transcript_summaries: summaries,
            final_report,
            generated_at: Utc::now(),
        })
    }

    /// Summarize each topic group separately, then compare the groups
    pub async fn generate_comparative_report(&self, topics: &[String]) -> Result<AlignmentReport> {
        let topics: Vec<String> = topics
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if topics.is_empty() {
            return Err(FacilitatorError::EmptyTopic);
        }

        let transcripts = self.load_transcripts()?;

        let groups: Vec<(String, Vec<InterviewTranscript>)> = topics
            .iter()
            .map(|topic| {
                let group = transcripts
                    .iter()
                    .filter(|t| matches_topic(&t.topic, topic))
                    .cloned()
                    .collect::<Vec<_>>();
                (topic.clone(), group)
            })
            .filter(|(topic, group)| {
                if group.is_empty() {
                    warn!("No interviews found for topic '{}', leaving it out", topic);
                }
                !group.is_empty()
            })
            .collect();

        if groups.is_empty() {
            return Err(FacilitatorError::NoMatchingTranscripts {
                topic: topics.join(", "),
            });
        }

        let mut topic_summaries = Vec::with_capacity(groups.len());
        let mut total_interviews = 0;
        for (topic, group) in &groups {
            let summaries = self.map_phase(group).await?;
            let texts: Vec<String> = summaries.into_iter().map(|s| s.summary).collect();
            let combined = non_empty_report(self.gateway.synthesize(&texts).await?)?;

            total_interviews += group.len();
            topic_summaries.push(TranscriptSummary {
                source: topic.clone(),
                topic: topic.clone(),
                summary: combined,
            });
        }

        let pairs: Vec<(String, String)> = topic_summaries
            .iter()
            .map(|s| (s.topic.clone(), s.summary.clone()))
            .collect();
        let final_report = non_empty_report(self.gateway.compare(&pairs).await?)?;

        info!("Comparative report generated for {} topics", topic_summaries.len());

        Ok(AlignmentReport {
            scope: ReportScope::Comparison(topics),
            total_interviews,
            per_transcript_summaries: topic_summaries,
            final_report,
            generated_at: Utc::now(),
        })
    }

    fn load_transcripts(&self) -> Result<Vec<InterviewTranscript>> {
        let transcripts = self.store.list_completed()?;
        if transcripts.is_empty() {
            return Err(FacilitatorError::NoTranscripts);
        }
        Ok(transcripts)
    }

    /// One summarize call per transcript, in order; the first failure aborts
    async fn map_phase(&self, transcripts: &[InterviewTranscript]) -> Result<Vec<TranscriptSummary>> {
        let mut summaries = Vec::with_capacity(transcripts.len());
        for transcript in transcripts {
            let summary = self
                .gateway
                .summarize(&transcript.topic, &transcript.turns)
                .await
                .map_err(|source| FacilitatorError::SummarizationFailed {
                    transcript_id: transcript.id.clone(),
                    source,
                })?;

            summaries.push(TranscriptSummary {
                source: transcript.id.clone(),
                topic: transcript.topic.clone(),
                summary,
            });
        }
        Ok(summaries)
    }
}

fn matches_topic(topic: &str, filter: &str) -> bool {
    topic.to_lowercase().contains(&filter.to_lowercase())
}

fn non_empty_report(text: String) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(GatewayError::new("Language model returned an empty report").into());
    }
    Ok(text.to_string())
}
