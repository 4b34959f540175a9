//! Threshold-tiered clustering of change records.
//!
//! A single ordered pass: each unprocessed item is compared against every
//! later unprocessed item. Definite matches are merged first, likely matches
//! only when no definite match exists, and uncertain matches are flagged for
//! review without being merged.

use relnote_core::{ChangeId, ChangeRecord, DedupThresholds, SuggestedAction};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::scoring::SimilarityScore;

pub const DEFINITE_MERGE_REASON: &str = "High similarity (>90%) - automatic merge";
pub const LIKELY_MERGE_REASON: &str = "Moderate similarity (70-90%) - automatic merge";
pub const UNCERTAIN_REASON: &str = "Moderate similarity (50-70%) - requires manual review";

/// Tier a pairwise score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimilarityTier {
    Definite,
    Likely,
    Uncertain,
    Unrelated,
}

impl SimilarityTier {
    pub fn classify(overall: f64, thresholds: &DedupThresholds) -> Self {
        if overall >= thresholds.definite {
            Self::Definite
        } else if overall >= thresholds.duplicate {
            Self::Likely
        } else if overall >= thresholds.uncertain {
            Self::Uncertain
        } else {
            Self::Unrelated
        }
    }
}

/// Audit entry for one automatic merge.
#[derive(Debug, Clone, Serialize)]
pub struct MergeRecord<T> {
    pub result: T,
    pub sources: Vec<T>,
    /// Overall score of each merged-in item against the group's first item.
    pub similarities: Vec<f64>,
    pub reason: String,
}

/// Suspected duplicates left unmerged for a human to decide.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UncertainGroup<T> {
    pub items: Vec<T>,
    pub similarity: f64,
    pub reason: String,
    pub suggested_action: SuggestedAction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupStatistics {
    pub total_processed: usize,
    pub duplicates_removed: usize,
    /// Sum of uncertain group sizes.
    pub uncertain_items: usize,
    pub final_count: usize,
    pub effectiveness: f64,
}

impl DedupStatistics {
    pub fn new(total_processed: usize, final_count: usize, uncertain_items: usize) -> Self {
        let duplicates_removed = total_processed - final_count;
        let effectiveness = if total_processed > 0 {
            duplicates_removed as f64 / total_processed as f64
        } else {
            0.0
        };
        Self {
            total_processed,
            duplicates_removed,
            uncertain_items,
            final_count,
            effectiveness,
        }
    }
}

/// Outcome of deduplicating one kind of change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupResult<T> {
    pub items: Vec<T>,
    pub merged_items: Vec<MergeRecord<T>>,
    pub uncertain_duplicates: Vec<UncertainGroup<T>>,
    pub statistics: DedupStatistics,
}

impl<T> Default for DedupResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            merged_items: Vec::new(),
            uncertain_duplicates: Vec::new(),
            statistics: DedupStatistics::default(),
        }
    }
}

/// Review suggestion derived from a single match score.
pub fn suggested_action(score: &SimilarityScore) -> SuggestedAction {
    if score.overall > 0.6 || score.title > 0.8 || score.metadata > 0.8 {
        SuggestedAction::Merge
    } else if score.overall < 0.3 {
        SuggestedAction::KeepSeparate
    } else {
        SuggestedAction::NeedsClarification
    }
}

struct Match<'a, T> {
    item: &'a T,
    score: SimilarityScore,
}

/// Partition `items` into kept, merged, and flagged groups.
///
/// `similarity` scores a pair; `merge` collapses a group (first element is
/// the item that opened the group) into one record.
pub fn cluster<T, S, M>(items: &[T], thresholds: &DedupThresholds, similarity: S, merge: M) -> DedupResult<T>
where
    T: ChangeRecord + Clone,
    S: Fn(&T, &T) -> SimilarityScore,
    M: Fn(&[&T]) -> T,
{
    let mut result = DedupResult::default();
    let mut processed: HashSet<&ChangeId> = HashSet::new();

    for (i, current) in items.iter().enumerate() {
        if processed.contains(current.id()) {
            continue;
        }

        let matches: Vec<Match<'_, T>> = items[i + 1..]
            .iter()
            .filter(|candidate| !processed.contains(candidate.id()))
            .map(|candidate| Match { item: candidate, score: similarity(current, candidate) })
            .filter(|m| m.score.overall >= thresholds.uncertain)
            .collect();

        if matches.is_empty() {
            result.items.push(current.clone());
            processed.insert(current.id());
            continue;
        }

        let (mut definite, mut likely, mut uncertain) = (Vec::new(), Vec::new(), Vec::new());
        for m in matches {
            match SimilarityTier::classify(m.score.overall, thresholds) {
                SimilarityTier::Definite => definite.push(m),
                SimilarityTier::Likely => likely.push(m),
                SimilarityTier::Uncertain => uncertain.push(m),
                SimilarityTier::Unrelated => {}
            }
        }

        let merge_tier = if !definite.is_empty() {
            Some((definite, DEFINITE_MERGE_REASON))
        } else if !likely.is_empty() {
            Some((likely, LIKELY_MERGE_REASON))
        } else {
            None
        };

        if let Some((group, reason)) = merge_tier {
            let members: Vec<&T> = std::iter::once(current).chain(group.iter().map(|m| m.item)).collect();
            let merged = merge(&members);
            debug!(
                kind = %T::KIND,
                primary = %current.id(),
                size = members.len(),
                reason,
                "merged duplicate group"
            );
            for &member in &members {
                processed.insert(member.id());
            }
            result.merged_items.push(MergeRecord {
                result: merged.clone(),
                sources: members.into_iter().cloned().collect(),
                similarities: group.iter().map(|m| m.score.overall).collect(),
                reason: reason.to_string(),
            });
            result.items.push(merged);
        } else {
            // Only the opening item is settled; the uncertain matches get their own turn.
            let max_similarity = uncertain.iter().map(|m| m.score.overall).fold(f64::MIN, f64::max);
            let action = suggested_action(&uncertain[0].score);
            debug!(
                kind = %T::KIND,
                primary = %current.id(),
                size = uncertain.len() + 1,
                similarity = max_similarity,
                ?action,
                "flagged uncertain duplicates"
            );
            result.uncertain_duplicates.push(UncertainGroup {
                items: std::iter::once(current).chain(uncertain.iter().map(|m| m.item)).cloned().collect(),
                similarity: max_similarity,
                reason: UNCERTAIN_REASON.to_string(),
                suggested_action: action,
            });
            result.items.push(current.clone());
            processed.insert(current.id());
        }
    }

    let uncertain_items = result.uncertain_duplicates.iter().map(|g| g.items.len()).sum();
    result.statistics = DedupStatistics::new(items.len(), result.items.len(), uncertain_items);
    result
}
