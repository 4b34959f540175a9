//! Per-kind weighted similarity between two change records.

use relnote_core::{BreakingChange, BugFix, DocumentationChange, Feature, Improvement};
use serde::Serialize;

use crate::text::{array_similarity, text_similarity};

/// Component scores for one pair of records, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityScore {
    pub overall: f64,
    pub title: f64,
    pub description: f64,
    pub metadata: f64,
}

fn exact_match(a: &str, b: &str) -> f64 {
    if a == b { 1.0 } else { 0.0 }
}

pub fn breaking_change_similarity(a: &BreakingChange, b: &BreakingChange) -> SimilarityScore {
    let title = text_similarity(&a.title, &b.title);
    let description = text_similarity(&a.description, &b.description);
    let apis = array_similarity(&a.affected_apis, &b.affected_apis);
    SimilarityScore {
        overall: title * 0.4 + description * 0.4 + apis * 0.2,
        title,
        description,
        metadata: apis,
    }
}

pub fn feature_similarity(a: &Feature, b: &Feature) -> SimilarityScore {
    let title = text_similarity(&a.title, &b.title);
    let description = text_similarity(&a.description, &b.description);
    let benefits = array_similarity(&a.benefits, &b.benefits);
    let artifacts = array_similarity(&a.artifacts, &b.artifacts);
    SimilarityScore {
        overall: title * 0.3 + description * 0.3 + benefits * 0.2 + artifacts * 0.2,
        title,
        description,
        metadata: (benefits + artifacts) / 2.0,
    }
}

/// 1.0 for the same issue, 0.0 for different issues, 0.5 when either is unknown.
pub fn issue_similarity(a: &BugFix, b: &BugFix) -> f64 {
    match (a.issue(), b.issue()) {
        (Some(x), Some(y)) => exact_match(x, y),
        _ => 0.5,
    }
}

pub fn bug_fix_similarity(a: &BugFix, b: &BugFix) -> SimilarityScore {
    let title = text_similarity(&a.title, &b.title);
    let description = text_similarity(&a.description, &b.description);
    let components = array_similarity(&a.affected_components, &b.affected_components);
    let issue = issue_similarity(a, b);
    SimilarityScore {
        overall: title * 0.3 + description * 0.3 + components * 0.2 + issue * 0.2,
        title,
        description,
        metadata: (components + issue) / 2.0,
    }
}

fn typed_similarity(title: f64, description: f64, type_match: f64) -> SimilarityScore {
    SimilarityScore {
        overall: title * 0.4 + description * 0.4 + type_match * 0.2,
        title,
        description,
        metadata: type_match,
    }
}

pub fn improvement_similarity(a: &Improvement, b: &Improvement) -> SimilarityScore {
    typed_similarity(
        text_similarity(&a.title, &b.title),
        text_similarity(&a.description, &b.description),
        exact_match(&a.improvement_type, &b.improvement_type),
    )
}

pub fn documentation_similarity(a: &DocumentationChange, b: &DocumentationChange) -> SimilarityScore {
    typed_similarity(
        text_similarity(&a.title, &b.title),
        text_similarity(&a.description, &b.description),
        exact_match(&a.doc_type, &b.doc_type),
    )
}
