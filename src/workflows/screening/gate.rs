//! Stage transitions for a candidate evaluation session.
//!
//! Every transition checks its precondition first and mutates the session
//! only on success, so a rejected call leaves the session exactly as it was.

use serde::{Deserialize, Serialize};

use super::domain::{CandidateSession, GateStage};

/// Pass/fail verdict for the verbal knowledge check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerbalVerdict {
    Passed,
    Failed,
}

impl VerbalVerdict {
    pub const fn label(self) -> &'static str {
        match self {
            VerbalVerdict::Passed => "passed",
            VerbalVerdict::Failed => "failed",
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// A candidate tried to reach the final stage without a passed verbal
    /// check. Always a caller bug when raised through a correct front end.
    #[error("final stage requires a passed verbal check (current stage: {stage})")]
    GateViolation { stage: GateStage },
    /// A transition was attempted from a terminal or mismatched stage.
    #[error("cannot {attempted} from stage {stage}")]
    InvalidStageTransition {
        stage: GateStage,
        attempted: &'static str,
    },
}

impl CandidateSession {
    /// Opens the verbal knowledge check, or reopens it after a failed attempt.
    pub fn begin_verbal_check(&mut self) -> Result<(), GateError> {
        match self.stage() {
            GateStage::Screened | GateStage::VerbalFailed => {
                self.set_stage(GateStage::VerbalPending);
                Ok(())
            }
            stage => Err(GateError::InvalidStageTransition {
                stage,
                attempted: "begin verbal check",
            }),
        }
    }

    /// Judges a recognized answer against the expected fragment.
    ///
    /// The comparison is case-insensitive containment. An empty expected
    /// fragment never matches, so a misconfigured blank answer key cannot
    /// wave every candidate through.
    pub fn submit_verbal_answer(
        &mut self,
        recognized_text: &str,
        expected_fragment: &str,
    ) -> Result<VerbalVerdict, GateError> {
        if self.stage() != GateStage::VerbalPending {
            return Err(GateError::InvalidStageTransition {
                stage: self.stage(),
                attempted: "submit verbal answer",
            });
        }

        let answer = recognized_text.to_lowercase();
        let expected = expected_fragment.to_lowercase();
        if !expected.is_empty() && answer.contains(&expected) {
            self.set_stage(GateStage::VerbalPassed);
            Ok(VerbalVerdict::Passed)
        } else {
            self.set_stage(GateStage::VerbalFailed);
            Ok(VerbalVerdict::Failed)
        }
    }

    /// Precondition for unlocking the final stage, without taking the
    /// transition. Lets callers validate before a blocking collaborator call.
    pub fn check_final_unlock(&self) -> Result<(), GateError> {
        match self.stage() {
            GateStage::VerbalPassed => Ok(()),
            stage @ (GateStage::FinalPending | GateStage::FinalComplete) => {
                Err(GateError::InvalidStageTransition {
                    stage,
                    attempted: "begin final stage",
                })
            }
            stage => Err(GateError::GateViolation { stage }),
        }
    }

    /// Unlocks the final interview-question stage. Requires a passed verbal
    /// check; skipping ahead from any earlier stage is a gate violation.
    pub fn begin_final_stage(&mut self) -> Result<(), GateError> {
        self.check_final_unlock()?;
        self.set_stage(GateStage::FinalPending);
        Ok(())
    }

    /// Records the question actually delivered and closes the session. The
    /// stage is terminal; repeat calls are rejected and the recorded question
    /// is left untouched.
    pub fn complete_final_stage(&mut self, question_text: String) -> Result<(), GateError> {
        if self.stage() != GateStage::FinalPending {
            return Err(GateError::InvalidStageTransition {
                stage: self.stage(),
                attempted: "complete final stage",
            });
        }

        self.record_final_question(question_text);
        self.set_stage(GateStage::FinalComplete);
        Ok(())
    }
}
