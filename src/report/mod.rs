//! Alignment report generation
//!
//! - Map phase: one summary per stored transcript
//! - Reduce phase: one synthesis over all summaries (themes, consensus,
//!   misalignments, recommendations)

mod report;
mod synthesizer;

pub use report::{AlignmentReport, ReportScope, TranscriptSummary};
pub use synthesizer::ReportSynthesizer;
