use serde::{Deserialize, Serialize};

/// Pipeline configuration: the eligibility cut-off and the verbal-check
/// script. The defaults reproduce the assistant's stock behavior; deployments
/// override them through the application configuration surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Minimum relevance score for eligibility; a score exactly at the
    /// threshold qualifies.
    pub eligibility_threshold: f32,
    /// Question spoken to the candidate during the verbal check.
    pub verbal_question: String,
    /// Fragment the recognized answer must contain (case-insensitive).
    pub expected_answer_fragment: String,
    /// Role description handed to the question generator for the final stage.
    pub role_context: String,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            eligibility_threshold: 0.2,
            verbal_question: "What is Python?".to_string(),
            expected_answer_fragment: "python is programming language".to_string(),
            role_context: "Python developer".to_string(),
        }
    }
}
