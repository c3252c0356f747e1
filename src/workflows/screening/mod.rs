//! Candidate screening workflow: relevance ranking over the loaded resume
//! pool plus the gated interview sequence for eligible candidates.

pub mod collaborators;
mod config;
pub mod domain;
pub mod gate;
pub mod ranking;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use collaborators::{
    CandidateNotifier, CannedQuestionBank, CaptureError, ExtractionError, LogNotifier,
    NotifyError, QuestionGenerator, QuestionServiceError, SpeechChannel, TextExtractor,
    TranscriptOnlySpeech,
};
pub use config::ScreeningConfig;
pub use domain::{
    CandidateDocument, CandidateId, CandidateSession, DocumentSet, GateStage, RankedCandidate,
    RankingResult, RequirementCatalog, RequirementProfile, SessionView,
};
pub use gate::{GateError, VerbalVerdict};
pub use ranking::{InputError, RankingEngine};
pub use router::screening_router;
pub use service::{ScreeningError, ScreeningService};
pub use store::{ingest, IngestionFailure, IngestionReport};
