use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use super::collaborators::{
    CandidateNotifier, CaptureError, QuestionGenerator, QuestionServiceError, SpeechChannel,
};
use super::config::ScreeningConfig;
use super::domain::{
    CandidateId, CandidateSession, DocumentSet, GateStage, RankingResult, RequirementCatalog,
    SessionView,
};
use super::gate::{GateError, VerbalVerdict};
use super::ranking::{InputError, RankingEngine};

/// Mutable pipeline state: the loaded pool plus live sessions. One mutex
/// guards both so that document replacement is atomic with session
/// invalidation and load/rank/transition calls are serialized.
struct PipelineState {
    documents: DocumentSet,
    sessions: BTreeMap<CandidateId, CandidateSession>,
}

/// Facade composing the document store, ranking engine, and gate state
/// machine with the external collaborators.
pub struct ScreeningService<N, S, Q> {
    notifier: Arc<N>,
    speech: Arc<S>,
    questions: Arc<Q>,
    catalog: RequirementCatalog,
    config: ScreeningConfig,
    engine: RankingEngine,
    state: Mutex<PipelineState>,
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Gate(#[from] GateError),
    /// The speech collaborator could not transcribe the answer. Transient;
    /// the session stays at `VerbalPending` for another attempt.
    #[error("could not understand audio")]
    AnswerUnrecognized,
    #[error(transparent)]
    Question(#[from] QuestionServiceError),
    #[error("no active session for candidate '{0}'")]
    UnknownSession(String),
}

impl<N, S, Q> ScreeningService<N, S, Q>
where
    N: CandidateNotifier + 'static,
    S: SpeechChannel + 'static,
    Q: QuestionGenerator + 'static,
{
    pub fn new(
        notifier: Arc<N>,
        speech: Arc<S>,
        questions: Arc<Q>,
        catalog: RequirementCatalog,
        config: ScreeningConfig,
    ) -> Self {
        let engine = RankingEngine::new(config.eligibility_threshold);
        Self {
            notifier,
            speech,
            questions,
            catalog,
            config,
            engine,
            state: Mutex::new(PipelineState {
                documents: DocumentSet::empty(),
                sessions: BTreeMap::new(),
            }),
        }
    }

    pub fn catalog(&self) -> &RequirementCatalog {
        &self.catalog
    }

    /// Replaces the candidate pool wholesale and discards every live session;
    /// eligibility is scoped to one requirement/document-set pairing. Returns
    /// the number of documents now loaded.
    pub fn load_documents(&self, documents: DocumentSet) -> usize {
        let mut state = self.lock_state();
        let count = documents.len();
        state.documents = documents;
        state.sessions.clear();
        info!(count, "document set replaced");
        count
    }

    /// Ranks the pool against the selected job description, admits eligible
    /// candidates into the gate at `Screened`, and notifies the eligible set
    /// exactly once. Notifier failures are logged, never propagated.
    pub fn rank(&self, requirement_label: &str) -> Result<RankingResult, ScreeningError> {
        let requirement = self
            .catalog
            .find(requirement_label)
            .ok_or(InputError::MissingRequirement)?;

        let mut state = self.lock_state();
        let result = self.engine.rank(requirement, &state.documents)?;

        // A fresh ranking restarts every session: a requirement change
        // invalidates earlier eligibility decisions.
        let eligible = result.eligible();
        state.sessions = eligible
            .iter()
            .map(|id| (id.clone(), CandidateSession::new(id.clone())))
            .collect();
        drop(state);

        info!(
            requirement = requirement_label,
            candidates = result.ranked.len(),
            eligible = eligible.len(),
            "ranking complete"
        );

        if !eligible.is_empty() {
            if let Err(error) = self.notifier.notify(&eligible) {
                warn!(%error, "failed to notify eligible candidates");
            }
        }

        Ok(result)
    }

    /// Current session view for one candidate.
    pub fn session(&self, candidate_id: &str) -> Result<SessionView, ScreeningError> {
        let state = self.lock_state();
        let session = Self::find(&state, candidate_id)?;
        Ok(session.status_view())
    }

    /// Opens the verbal check and delivers the configured question through
    /// the speech collaborator. Returns the question text.
    pub fn begin_verbal_check(&self, candidate_id: &str) -> Result<String, ScreeningError> {
        {
            let mut state = self.lock_state();
            let session = Self::find_mut(&mut state, candidate_id)?;
            session.begin_verbal_check()?;
        }

        // Prompt delivery may block; hold no lock while speaking.
        self.speech.prompt(&self.config.verbal_question);
        Ok(self.config.verbal_question.clone())
    }

    /// Captures a spoken answer through the speech collaborator and judges
    /// it. An unrecognized capture leaves the stage at `VerbalPending`.
    pub fn capture_verbal_answer(
        &self,
        candidate_id: &str,
    ) -> Result<VerbalVerdict, ScreeningError> {
        {
            let state = self.lock_state();
            let session = Self::find(&state, candidate_id)?;
            if session.stage() != GateStage::VerbalPending {
                return Err(GateError::InvalidStageTransition {
                    stage: session.stage(),
                    attempted: "submit verbal answer",
                }
                .into());
            }
        }

        let recognized = match self.speech.capture_answer() {
            Ok(text) => text,
            Err(CaptureError::Unrecognized) => return Err(ScreeningError::AnswerUnrecognized),
        };

        self.submit_verbal_answer(candidate_id, &recognized)
    }

    /// Judges an already-transcribed answer against the expected fragment.
    pub fn submit_verbal_answer(
        &self,
        candidate_id: &str,
        recognized_text: &str,
    ) -> Result<VerbalVerdict, ScreeningError> {
        let mut state = self.lock_state();
        let session = Self::find_mut(&mut state, candidate_id)?;
        let verdict =
            session.submit_verbal_answer(recognized_text, &self.config.expected_answer_fragment)?;
        info!(
            candidate = candidate_id,
            verdict = verdict.label(),
            "verbal answer judged"
        );
        Ok(verdict)
    }

    /// Unlocks the final stage and requests a generated interview question.
    ///
    /// The stage transition lands only after the generator succeeds, so a
    /// collaborator failure leaves the session at `VerbalPassed` and the call
    /// can simply be retried. The session then waits at `FinalPending` until
    /// `complete_final_stage` records the question actually delivered.
    pub fn begin_final_stage(&self, candidate_id: &str) -> Result<String, ScreeningError> {
        {
            let state = self.lock_state();
            let session = Self::find(&state, candidate_id)?;
            session.check_final_unlock()?;
        }

        // Generation may block for unbounded time; hold no lock meanwhile.
        let question = self.questions.generate_question(&self.config.role_context)?;

        let mut state = self.lock_state();
        let session = Self::find_mut(&mut state, candidate_id)?;
        session.begin_final_stage()?;
        info!(candidate = candidate_id, "final stage unlocked");
        Ok(question)
    }

    /// Records the question actually delivered and closes the session.
    pub fn complete_final_stage(
        &self,
        candidate_id: &str,
        question_text: &str,
    ) -> Result<SessionView, ScreeningError> {
        let mut state = self.lock_state();
        let session = Self::find_mut(&mut state, candidate_id)?;
        session.complete_final_stage(question_text.to_string())?;
        info!(candidate = candidate_id, "final stage complete");
        Ok(session.status_view())
    }

    fn lock_state(&self) -> MutexGuard<'_, PipelineState> {
        // A poisoned lock means another holder panicked; the state itself is
        // still structurally valid, so recover the guard.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn find<'a>(
        state: &'a PipelineState,
        candidate_id: &str,
    ) -> Result<&'a CandidateSession, ScreeningError> {
        state
            .sessions
            .get(&CandidateId(candidate_id.to_string()))
            .ok_or_else(|| ScreeningError::UnknownSession(candidate_id.to_string()))
    }

    fn find_mut<'a>(
        state: &'a mut PipelineState,
        candidate_id: &str,
    ) -> Result<&'a mut CandidateSession, ScreeningError> {
        state
            .sessions
            .get_mut(&CandidateId(candidate_id.to_string()))
            .ok_or_else(|| ScreeningError::UnknownSession(candidate_id.to_string()))
    }
}
