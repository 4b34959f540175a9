//! Binds each change kind to its similarity function and merge strategy.

use relnote_core::{BreakingChange, BugFix, ChangeRecord, DocumentationChange, Feature, Improvement};

use crate::merge;
use crate::scoring::{self, SimilarityScore};

/// A change record that can be scored against and merged with its own kind.
pub trait DedupStrategy: ChangeRecord + Clone {
    fn similarity(&self, other: &Self) -> SimilarityScore;

    /// Collapse a duplicate group into one record. `group` is non-empty.
    fn merge(group: &[&Self]) -> Self;
}

impl DedupStrategy for BreakingChange {
    fn similarity(&self, other: &Self) -> SimilarityScore {
        scoring::breaking_change_similarity(self, other)
    }

    fn merge(group: &[&Self]) -> Self {
        merge::merge_breaking_changes(group)
    }
}

impl DedupStrategy for Feature {
    fn similarity(&self, other: &Self) -> SimilarityScore {
        scoring::feature_similarity(self, other)
    }

    fn merge(group: &[&Self]) -> Self {
        merge::merge_features(group)
    }
}

impl DedupStrategy for BugFix {
    fn similarity(&self, other: &Self) -> SimilarityScore {
        scoring::bug_fix_similarity(self, other)
    }

    fn merge(group: &[&Self]) -> Self {
        merge::merge_bug_fixes(group)
    }
}

impl DedupStrategy for Improvement {
    fn similarity(&self, other: &Self) -> SimilarityScore {
        scoring::improvement_similarity(self, other)
    }

    fn merge(group: &[&Self]) -> Self {
        merge::merge_improvements(group)
    }
}

impl DedupStrategy for DocumentationChange {
    fn similarity(&self, other: &Self) -> SimilarityScore {
        scoring::documentation_similarity(self, other)
    }

    fn merge(group: &[&Self]) -> Self {
        merge::merge_documentation(group)
    }
}
