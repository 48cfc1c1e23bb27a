pub mod config;
pub mod error;
pub mod facilitator;
pub mod gateway;
pub mod http;
pub mod interview;
pub mod report;
pub mod session;
pub mod store;

pub use config::Config;
pub use error::{FacilitatorError, Result};
pub use facilitator::{Facilitator, FacilitatorStats, InterviewView};
pub use gateway::{GatewayError, LanguageModelGateway, OfflineGateway, OpenAiGateway};
pub use http::{create_router, AppState};
pub use interview::{Interview, InterviewStep, InterviewTranscript, TranscriptStatus, Turn};
pub use report::{AlignmentReport, ReportScope, ReportSynthesizer, TranscriptSummary};
pub use session::{AlignmentSession, SessionHandle, SessionRegistry, SessionStatus};
pub use store::{JsonFileStore, TranscriptStats, TranscriptStore};
