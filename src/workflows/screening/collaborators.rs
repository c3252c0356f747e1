//! Interfaces to the external collaborators the pipeline delegates to, plus
//! the default implementations wired into the shell. Real transports (e-mail,
//! microphone capture, a generative provider) live outside this crate.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use super::domain::CandidateId;

/// Outbound notification hook for the eligible set (e.g. an e-mail adapter).
/// Fire-and-forget from the pipeline's perspective; failures are logged by
/// the caller, never folded into ranking results.
pub trait CandidateNotifier: Send + Sync {
    fn notify(&self, eligible: &[CandidateId]) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Text-to-speech prompt delivery plus speech-to-text answer capture.
pub trait SpeechChannel: Send + Sync {
    /// Delivers the question to the candidate. May block until spoken.
    fn prompt(&self, text: &str);

    /// Listens for the candidate's answer and transcribes it. May block for
    /// unbounded wall-clock time; abandoning the call is safe because no
    /// session transition happens until the transcript is submitted.
    fn capture_answer(&self) -> Result<String, CaptureError>;
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("could not understand audio")]
    Unrecognized,
}

/// Generative provider for the final-stage interview question.
pub trait QuestionGenerator: Send + Sync {
    fn generate_question(&self, role_context: &str) -> Result<String, QuestionServiceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionServiceError {
    #[error("question service unavailable: {0}")]
    Unavailable(String),
}

/// Turns a stored document location into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, location: &str) -> Result<String, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("could not read document: {0}")]
    Unreadable(String),
}

/// Notifier that only records the outcome in the log stream.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl CandidateNotifier for LogNotifier {
    fn notify(&self, eligible: &[CandidateId]) -> Result<(), NotifyError> {
        info!(count = eligible.len(), "notifying eligible candidates");
        Ok(())
    }
}

/// Speech channel for deployments without a microphone: the prompt is logged
/// and callers submit transcripts directly instead of capturing audio here.
#[derive(Debug, Default)]
pub struct TranscriptOnlySpeech;

impl SpeechChannel for TranscriptOnlySpeech {
    fn prompt(&self, text: &str) {
        info!(question = text, "verbal prompt issued");
    }

    fn capture_answer(&self) -> Result<String, CaptureError> {
        Err(CaptureError::Unrecognized)
    }
}

/// Rotating bank of fallback interview questions used when no generative
/// provider is configured.
#[derive(Debug)]
pub struct CannedQuestionBank {
    questions: Vec<String>,
    cursor: AtomicUsize,
}

impl CannedQuestionBank {
    pub fn new(questions: Vec<String>) -> Self {
        Self {
            questions,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl Default for CannedQuestionBank {
    fn default() -> Self {
        Self::new(vec![
            "Explain the difference between a list and a tuple in Python.".to_string(),
            "How would you expose a database-backed resource through a REST API?".to_string(),
            "Walk through how you would find and fix a slow SQL query.".to_string(),
        ])
    }
}

impl QuestionGenerator for CannedQuestionBank {
    fn generate_question(&self, role_context: &str) -> Result<String, QuestionServiceError> {
        if self.questions.is_empty() {
            return Err(QuestionServiceError::Unavailable(
                "question bank is empty".to_string(),
            ));
        }

        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.questions.len();
        Ok(format!(
            "Interview question for a {role_context}: {}",
            self.questions[index]
        ))
    }
}
