//! Aggregate deduplication metadata across change kinds.

use relnote_core::{ChangeKind, ChangeRecord, DeduplicationMetadata, UncertainDuplicateInfo, UncertainItemRef};

use crate::classifier::{DedupResult, DedupStatistics};

/// Statistics and review groups of one kind, detached from the item type.
#[derive(Debug, Clone)]
pub struct KindSummary {
    pub kind: ChangeKind,
    pub statistics: DedupStatistics,
    pub uncertain: Vec<UncertainDuplicateInfo>,
}

impl<T: ChangeRecord> DedupResult<T> {
    pub fn summary(&self) -> KindSummary {
        let uncertain = self
            .uncertain_duplicates
            .iter()
            .map(|group| UncertainDuplicateInfo {
                change_type: T::KIND.label().to_string(),
                item_count: group.items.len(),
                similarity: group.similarity,
                suggested_action: group.suggested_action,
                items: group
                    .items
                    .iter()
                    .map(|item| UncertainItemRef {
                        id: item.id().clone(),
                        title: item.title().to_string(),
                        source: item.source().to_string(),
                    })
                    .collect(),
            })
            .collect();
        KindSummary { kind: T::KIND, statistics: self.statistics, uncertain }
    }
}

/// Sum counts across kinds; effectiveness is the mean of per-kind effectiveness.
pub fn build_metadata(summaries: &[KindSummary]) -> DeduplicationMetadata {
    let original_count = summaries.iter().map(|s| s.statistics.total_processed).sum();
    let duplicates_removed = summaries.iter().map(|s| s.statistics.duplicates_removed).sum();
    let effectiveness = if summaries.is_empty() {
        0.0
    } else {
        summaries.iter().map(|s| s.statistics.effectiveness).sum::<f64>() / summaries.len() as f64
    };
    DeduplicationMetadata {
        original_count,
        duplicates_removed,
        uncertain_duplicates: summaries.iter().flat_map(|s| s.uncertain.iter().cloned()).collect(),
        effectiveness,
    }
}

const UNCERTAIN_RATIO_TRIGGER: f64 = 0.2;
const UNCERTAIN_PENALTY: f64 = 0.3;
const EFFECTIVENESS_TRIGGER: f64 = 0.1;
const EFFECTIVENESS_BOOST: f64 = 1.05;
const MIN_CONFIDENCE: f64 = 0.1;

/// Extraction confidence adjusted for how the dedup pass went.
///
/// Many uncertain groups relative to the input lower confidence; an
/// effective pass raises it slightly. Result is clamped to `[0.1, 1.0]`.
pub fn adjusted_confidence(base: f64, metadata: &DeduplicationMetadata) -> f64 {
    let mut confidence = base;
    let uncertain_ratio = metadata.uncertain_duplicates.len() as f64 / metadata.original_count.max(1) as f64;
    if uncertain_ratio > UNCERTAIN_RATIO_TRIGGER {
        confidence *= 1.0 - uncertain_ratio * UNCERTAIN_PENALTY;
    }
    if metadata.effectiveness > EFFECTIVENESS_TRIGGER {
        confidence *= EFFECTIVENESS_BOOST;
    }
    confidence.clamp(MIN_CONFIDENCE, 1.0)
}
