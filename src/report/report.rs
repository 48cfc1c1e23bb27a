use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which transcripts a report covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ReportScope {
    /// Every stored transcript
    All,
    /// Transcripts whose topic contains this text, case-insensitively
    Topic(String),
    /// One group per topic filter, compared against each other
    Comparison(Vec<String>),
}

impl ReportScope {
    pub fn label(&self) -> String {
        match self {
            Self::All => "Various topics".to_string(),
            Self::Topic(topic) => topic.clone(),
            Self::Comparison(topics) => format!("Comparative analysis: {}", topics.join(", ")),
        }
    }
}

/// Map-phase output for one transcript (or one topic group in a comparison)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSummary {
    /// Transcript id, or the topic filter for comparison groups
    pub source: String,
    pub topic: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub scope: ReportScope,
    pub total_interviews: usize,
    /// In store enumeration order
    pub per_transcript_summaries: Vec<TranscriptSummary>,
    pub final_report: String,
    pub generated_at: DateTime<Utc>,
}

impl AlignmentReport {
    pub fn to_markdown(&self) -> String {
        let mut md = String::from("# Company Alignment Report\n\n");
        md.push_str(&format!("**Topic:** {}  \n", self.scope.label()));
        md.push_str(&format!("**Interviews analyzed:** {}  \n", self.total_interviews));
        md.push_str(&format!(
            "**Generated:** {}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        md.push_str("## Executive Summary\n\n");
        md.push_str(self.final_report.trim());
        md.push_str("\n\n");

        md.push_str("## Interview Summaries\n\n");
        for (i, item) in self.per_transcript_summaries.iter().enumerate() {
            md.push_str(&format!("### {}. {} ({})\n\n", i + 1, item.topic, item.source));
            md.push_str(item.summary.trim());
            md.push_str("\n\n");
        }

        md.push_str("---\n*Generated by Alignment Facilitator*\n");
        md
    }
}
