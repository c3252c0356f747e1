//! Bag-of-words relevance scoring over the live candidate pool.
//!
//! Term weights are TF-IDF computed over the requirement text plus the full
//! current candidate set, so a term's weight reflects its distinctiveness
//! within this pool rather than a fixed external corpus. Scores must be
//! recomputed whenever the pool or the requirement changes; there is no
//! incremental update.

use std::collections::{BTreeMap, BTreeSet};

/// Common English words stripped before weighting.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "could", "did", "do",
    "does", "for", "from", "had", "has", "have", "he", "her", "his", "if", "in", "into", "is",
    "it", "its", "may", "no", "not", "of", "on", "or", "our", "she", "should", "so", "than",
    "that", "the", "their", "them", "then", "these", "they", "this", "those", "to", "too", "was",
    "we", "were", "will", "with", "would", "you", "your",
];

/// Case-folds and splits text into terms of at least two alphanumeric
/// characters, dropping stop words.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|term| term.chars().count() >= 2 && !STOP_WORDS.contains(&term.as_str()))
        .collect()
}

/// Scores every candidate text against the requirement text.
///
/// Returns one cosine similarity in [0, 1] per candidate, in input order.
/// Empty candidate text scores 0.0; a requirement that yields no terms scores
/// every candidate 0.0. Never fails.
pub fn relevance_scores(requirement_text: &str, candidate_texts: &[&str]) -> Vec<f32> {
    let requirement_terms = tokenize(requirement_text);
    if requirement_terms.is_empty() {
        return vec![0.0; candidate_texts.len()];
    }

    let candidate_terms: Vec<Vec<String>> =
        candidate_texts.iter().copied().map(tokenize).collect();

    // Smooth document frequencies over the requirement + candidate corpus.
    let corpus_size = candidate_terms.len() + 1;
    let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
    for terms in std::iter::once(&requirement_terms).chain(&candidate_terms) {
        let unique: BTreeSet<&String> = terms.iter().collect();
        for term in unique {
            *document_frequency.entry(term.clone()).or_insert(0) += 1;
        }
    }

    let requirement_vector = weighted_vector(&requirement_terms, &document_frequency, corpus_size);

    candidate_terms
        .iter()
        .map(|terms| {
            let candidate_vector = weighted_vector(terms, &document_frequency, corpus_size);
            cosine(&requirement_vector, &candidate_vector)
        })
        .collect()
}

/// L2-normalized TF-IDF vector for one document.
fn weighted_vector(
    terms: &[String],
    document_frequency: &BTreeMap<String, usize>,
    corpus_size: usize,
) -> BTreeMap<String, f32> {
    let mut counts: BTreeMap<&str, f32> = BTreeMap::new();
    for term in terms {
        *counts.entry(term.as_str()).or_insert(0.0) += 1.0;
    }

    let mut vector = BTreeMap::new();
    let mut squared_norm = 0.0_f32;
    for (term, count) in counts {
        let frequency = document_frequency.get(term).copied().unwrap_or(0) as f32;
        let idf = ((1.0 + corpus_size as f32) / (1.0 + frequency)).ln() + 1.0;
        let weight = count * idf;
        squared_norm += weight * weight;
        vector.insert(term.to_string(), weight);
    }

    if squared_norm > 0.0 {
        let norm = squared_norm.sqrt();
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }

    vector
}

/// Both vectors are L2-normalized, so the dot product is the cosine
/// similarity. Clamped to guard against rounding drift.
fn cosine(left: &BTreeMap<String, f32>, right: &BTreeMap<String, f32>) -> f32 {
    let dot: f32 = left
        .iter()
        .filter_map(|(term, weight)| right.get(term).map(|other| weight * other))
        .sum();
    dot.clamp(0.0, 1.0)
}
