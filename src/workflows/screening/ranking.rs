use super::domain::{DocumentSet, RankedCandidate, RankingResult, RequirementProfile};
use super::scoring;

/// Raised when ranking is requested with unusable input. The caller must fix
/// the input; retrying as-is cannot succeed.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("no candidate documents loaded")]
    EmptyCandidateSet,
    #[error("no job description selected")]
    MissingRequirement,
}

/// Orders the candidate pool by relevance and applies the eligibility
/// threshold. Stateless apart from the configured threshold.
pub struct RankingEngine {
    threshold: f32,
}

impl RankingEngine {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Scores every document against the requirement over the shared corpus,
    /// sorts descending, and flags eligibility at `score >= threshold`.
    pub fn rank(
        &self,
        requirement: &RequirementProfile,
        documents: &DocumentSet,
    ) -> Result<RankingResult, InputError> {
        if documents.is_empty() {
            return Err(InputError::EmptyCandidateSet);
        }

        let texts: Vec<&str> = documents
            .documents()
            .iter()
            .map(|document| document.text.as_str())
            .collect();
        let scores = scoring::relevance_scores(&requirement.keywords, &texts);

        let mut ranked: Vec<RankedCandidate> = documents
            .documents()
            .iter()
            .zip(scores)
            .map(|(document, score)| RankedCandidate {
                candidate_id: document.id.clone(),
                score,
                eligible: score >= self.threshold,
            })
            .collect();

        // Stable sort keeps the original load order on exact ties.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(RankingResult {
            requirement_label: requirement.label.clone(),
            threshold: self.threshold,
            ranked,
        })
    }
}
