use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for screened candidates (typically the source file name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracted plain text for one submitted document. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub id: CandidateId,
    pub text: String,
}

/// The current candidate pool.
///
/// Replaced wholesale on every load, never patched. Insertion order is
/// preserved and doubles as the tie-break order during ranking; a repeated
/// identifier overwrites the earlier text while keeping its original position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSet {
    documents: Vec<CandidateDocument>,
    loaded_at: DateTime<Utc>,
}

impl DocumentSet {
    pub fn new(documents: Vec<CandidateDocument>) -> Self {
        let mut deduplicated: Vec<CandidateDocument> = Vec::with_capacity(documents.len());
        for document in documents {
            match deduplicated.iter_mut().find(|existing| existing.id == document.id) {
                Some(existing) => existing.text = document.text,
                None => deduplicated.push(document),
            }
        }

        Self {
            documents: deduplicated,
            loaded_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[CandidateDocument] {
        &self.documents
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// A job description reduced to its label and keyword text. Read-only input
/// to scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementProfile {
    pub label: String,
    pub keywords: String,
}

/// Catalog of job descriptions offered for selection. Externally supplied;
/// the standard catalog mirrors the postings the assistant ships with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementCatalog {
    profiles: Vec<RequirementProfile>,
}

impl RequirementCatalog {
    pub fn new(profiles: Vec<RequirementProfile>) -> Self {
        Self { profiles }
    }

    pub fn standard() -> Self {
        let entry = |label: &str, keywords: &str| RequirementProfile {
            label: label.to_string(),
            keywords: keywords.to_string(),
        };

        Self::new(vec![
            entry("Python Developer", "Python, ML, APIs, SQL"),
            entry("Frontend Developer", "HTML, CSS, JavaScript, React"),
            entry(
                "Data Scientist",
                "Python, Statistics, Machine Learning, Data Visualization",
            ),
            entry(
                "Project Manager",
                "Leadership, Communication, Planning, Agile",
            ),
        ])
    }

    pub fn profiles(&self) -> &[RequirementProfile] {
        &self.profiles
    }

    pub fn find(&self, label: &str) -> Option<&RequirementProfile> {
        self.profiles.iter().find(|profile| profile.label == label)
    }
}

/// One candidate's position in a ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub candidate_id: CandidateId,
    pub score: f32,
    pub eligible: bool,
}

/// Output of a ranking pass: every candidate ordered by descending relevance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub requirement_label: String,
    pub threshold: f32,
    pub ranked: Vec<RankedCandidate>,
}

impl RankingResult {
    /// Eligible identifiers in ranked order.
    pub fn eligible(&self) -> Vec<CandidateId> {
        self.ranked
            .iter()
            .filter(|candidate| candidate.eligible)
            .map(|candidate| candidate.candidate_id.clone())
            .collect()
    }
}

/// Stages of the gated evaluation sequence, in progression order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateStage {
    Screened,
    VerbalPending,
    VerbalPassed,
    VerbalFailed,
    FinalPending,
    FinalComplete,
}

impl GateStage {
    pub const fn label(self) -> &'static str {
        match self {
            GateStage::Screened => "screened",
            GateStage::VerbalPending => "verbal_pending",
            GateStage::VerbalPassed => "verbal_passed",
            GateStage::VerbalFailed => "verbal_failed",
            GateStage::FinalPending => "final_pending",
            GateStage::FinalComplete => "final_complete",
        }
    }
}

impl fmt::Display for GateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Evaluation session for one eligible candidate.
///
/// Created when ranking finds the candidate eligible and discarded whenever
/// the document set is replaced. Only the transition methods in the gate
/// module mutate the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSession {
    candidate_id: CandidateId,
    stage: GateStage,
    final_question: Option<String>,
    created_at: DateTime<Utc>,
}

impl CandidateSession {
    pub fn new(candidate_id: CandidateId) -> Self {
        Self {
            candidate_id,
            stage: GateStage::Screened,
            final_question: None,
            created_at: Utc::now(),
        }
    }

    pub fn candidate_id(&self) -> &CandidateId {
        &self.candidate_id
    }

    pub fn stage(&self) -> GateStage {
        self.stage
    }

    pub fn final_question(&self) -> Option<&str> {
        self.final_question.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status_view(&self) -> SessionView {
        SessionView {
            candidate_id: self.candidate_id.clone(),
            stage: self.stage.label(),
            final_question: self.final_question.clone(),
        }
    }

    pub(crate) fn set_stage(&mut self, stage: GateStage) {
        self.stage = stage;
    }

    pub(crate) fn record_final_question(&mut self, question: String) {
        self.final_question = Some(question);
    }
}

/// Sanitized representation of a session for API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub candidate_id: CandidateId,
    pub stage: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_question: Option<String>,
}
