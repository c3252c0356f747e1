//! Candidate evaluation pipeline for the smart recruitment assistant.
//!
//! The crate ranks extracted resume text against a selected job description,
//! partitions candidates by an eligibility threshold, and drives eligible
//! candidates through a gated interview sequence (verbal knowledge check,
//! then a generated final interview question). Presentation, text extraction,
//! speech, and generative-question providers are external collaborators
//! behind the traits in [`workflows::screening::collaborators`].

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
