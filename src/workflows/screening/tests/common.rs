use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::workflows::screening::collaborators::{
    CandidateNotifier, CaptureError, NotifyError, QuestionGenerator, QuestionServiceError,
    SpeechChannel,
};
use crate::workflows::screening::{
    CandidateDocument, CandidateId, DocumentSet, RequirementCatalog, ScreeningConfig,
    ScreeningService,
};

pub(super) fn document(id: &str, text: &str) -> CandidateDocument {
    CandidateDocument {
        id: CandidateId(id.to_string()),
        text: text.to_string(),
    }
}

pub(super) fn sample_documents() -> DocumentSet {
    DocumentSet::new(vec![
        document("A.pdf", "python sql apis"),
        document("B.pdf", "html css javascript"),
    ])
}

pub(super) fn screening_config() -> ScreeningConfig {
    ScreeningConfig::default()
}

pub(super) fn build_service() -> (
    ScreeningService<MemoryNotifier, ScriptedSpeech, StaticQuestions>,
    Arc<MemoryNotifier>,
    Arc<ScriptedSpeech>,
) {
    let notifier = Arc::new(MemoryNotifier::default());
    let speech = Arc::new(ScriptedSpeech::default());
    let service = ScreeningService::new(
        notifier.clone(),
        speech.clone(),
        Arc::new(StaticQuestions::default()),
        RequirementCatalog::standard(),
        screening_config(),
    );
    (service, notifier, speech)
}

/// Service preloaded with the sample pool and ranked so that "A.pdf" holds a
/// session at the `Screened` stage.
pub(super) fn ranked_service() -> (
    ScreeningService<MemoryNotifier, ScriptedSpeech, StaticQuestions>,
    Arc<MemoryNotifier>,
    Arc<ScriptedSpeech>,
) {
    let (service, notifier, speech) = build_service();
    service.load_documents(sample_documents());
    service
        .rank("Python Developer")
        .expect("sample pool ranks cleanly");
    (service, notifier, speech)
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    events: Mutex<Vec<Vec<CandidateId>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<Vec<CandidateId>> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl CandidateNotifier for MemoryNotifier {
    fn notify(&self, eligible: &[CandidateId]) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(eligible.to_vec());
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl CandidateNotifier for FailingNotifier {
    fn notify(&self, _eligible: &[CandidateId]) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp offline".to_string()))
    }
}

/// Speech channel that records prompts and replays scripted transcripts; an
/// exhausted script reports an unrecognized capture.
#[derive(Default)]
pub(super) struct ScriptedSpeech {
    prompts: Mutex<Vec<String>>,
    answers: Mutex<VecDeque<Result<String, CaptureError>>>,
}

impl ScriptedSpeech {
    pub(super) fn push_answer(&self, answer: Result<String, CaptureError>) {
        self.answers
            .lock()
            .expect("speech mutex poisoned")
            .push_back(answer);
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("speech mutex poisoned").clone()
    }
}

impl SpeechChannel for ScriptedSpeech {
    fn prompt(&self, text: &str) {
        self.prompts
            .lock()
            .expect("speech mutex poisoned")
            .push(text.to_string());
    }

    fn capture_answer(&self) -> Result<String, CaptureError> {
        self.answers
            .lock()
            .expect("speech mutex poisoned")
            .pop_front()
            .unwrap_or(Err(CaptureError::Unrecognized))
    }
}

pub(super) struct StaticQuestions {
    question: String,
}

impl Default for StaticQuestions {
    fn default() -> Self {
        Self {
            question: "Describe a Python service you have shipped.".to_string(),
        }
    }
}

impl QuestionGenerator for StaticQuestions {
    fn generate_question(&self, _role_context: &str) -> Result<String, QuestionServiceError> {
        Ok(self.question.clone())
    }
}

pub(super) struct FailingQuestions;

impl QuestionGenerator for FailingQuestions {
    fn generate_question(&self, _role_context: &str) -> Result<String, QuestionServiceError> {
        Err(QuestionServiceError::Unavailable(
            "completion endpoint timed out".to_string(),
        ))
    }
}
