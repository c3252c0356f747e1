//! Document ingestion: extraction of every location into plain text, with
//! per-document failures reported individually instead of aborting the batch.

use std::path::Path;

use serde::Serialize;
use tracing::warn;

use super::collaborators::TextExtractor;
use super::domain::{CandidateDocument, CandidateId, DocumentSet};

/// One document that could not be extracted. Ingestion continues past it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionFailure {
    pub identifier: String,
    pub reason: String,
}

/// Outcome of an ingestion pass: everything that extracted cleanly, plus the
/// failures to surface back to the operator.
#[derive(Debug)]
pub struct IngestionReport {
    pub documents: DocumentSet,
    pub failures: Vec<IngestionFailure>,
}

/// Extracts every location into plain text, keyed by file name.
pub fn ingest<E: TextExtractor>(extractor: &E, locations: &[String]) -> IngestionReport {
    let mut documents = Vec::with_capacity(locations.len());
    let mut failures = Vec::new();

    for location in locations {
        let identifier = file_name(location);
        match extractor.extract(location) {
            Ok(text) => documents.push(CandidateDocument {
                id: CandidateId(identifier),
                text,
            }),
            Err(error) => {
                warn!(document = identifier.as_str(), %error, "skipping unreadable document");
                failures.push(IngestionFailure {
                    identifier,
                    reason: error.to_string(),
                });
            }
        }
    }

    IngestionReport {
        documents: DocumentSet::new(documents),
        failures,
    }
}

fn file_name(location: &str) -> String {
    Path::new(location)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| location.to_string())
}
