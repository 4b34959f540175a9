//! Dedup orchestrator. Runs the classifier once per change kind.

use relnote_core::{
    BreakingChange, BugFix, ChangeKind, DedupConfig, DedupThresholds, DeduplicationMetadata, DocumentationChange,
    ExtractedChanges, Feature, Improvement, Result,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::classifier::{cluster, DedupResult};
use crate::metadata::{adjusted_confidence, build_metadata, KindSummary};
use crate::strategy::DedupStrategy;

/// The deduplication engine. Stateless apart from its thresholds.
#[derive(Debug, Clone, Default)]
pub struct DedupEngine {
    config: DedupConfig,
}

impl DedupEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DedupConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn thresholds(&self) -> &DedupThresholds {
        &self.config.thresholds
    }

    /// Deduplicate one kind of change.
    pub fn deduplicate<T: DedupStrategy>(&self, items: &[T]) -> DedupResult<T> {
        let result = cluster(items, &self.config.thresholds, T::similarity, T::merge);
        let stats = &result.statistics;
        info!(
            kind = %T::KIND,
            processed = stats.total_processed,
            removed = stats.duplicates_removed,
            uncertain = stats.uncertain_items,
            remaining = stats.final_count,
            "dedup pass complete"
        );
        result
    }

    pub fn deduplicate_breaking_changes(&self, changes: &[BreakingChange]) -> DedupResult<BreakingChange> {
        self.deduplicate(changes)
    }

    pub fn deduplicate_features(&self, features: &[Feature]) -> DedupResult<Feature> {
        self.deduplicate(features)
    }

    pub fn deduplicate_bug_fixes(&self, bug_fixes: &[BugFix]) -> DedupResult<BugFix> {
        self.deduplicate(bug_fixes)
    }

    pub fn deduplicate_improvements(&self, improvements: &[Improvement]) -> DedupResult<Improvement> {
        self.deduplicate(improvements)
    }

    pub fn deduplicate_documentation(&self, documentation: &[DocumentationChange]) -> DedupResult<DocumentationChange> {
        self.deduplicate(documentation)
    }

    /// Run all five kinds independently.
    pub fn deduplicate_all(&self, changes: &ExtractedChanges) -> DedupReport {
        DedupReport {
            breaking_changes: self.deduplicate_breaking_changes(&changes.breaking_changes),
            features: self.deduplicate_features(&changes.new_features),
            bug_fixes: self.deduplicate_bug_fixes(&changes.bug_fixes),
            improvements: self.deduplicate_improvements(&changes.improvements),
            documentation: self.deduplicate_documentation(&changes.documentation),
        }
    }

    /// Replace every kind's items with their deduplicated form and record the
    /// outcome in the extraction metadata.
    pub fn deduplicate_changes(&self, changes: ExtractedChanges) -> ExtractedChanges {
        let report = self.deduplicate_all(&changes);
        let dedup = report.metadata();
        if let Some(message) = dedup.review_message() {
            warn!("{message}");
        }

        let mut metadata = changes.metadata;
        metadata.extraction_confidence = adjusted_confidence(metadata.extraction_confidence, &dedup);
        metadata.deduplication = Some(dedup);

        ExtractedChanges {
            breaking_changes: report.breaking_changes.items,
            new_features: report.features.items,
            bug_fixes: report.bug_fixes.items,
            improvements: report.improvements.items,
            documentation: report.documentation.items,
            metadata,
        }
    }
}

/// Per-kind results of one full dedup run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupReport {
    pub breaking_changes: DedupResult<BreakingChange>,
    pub features: DedupResult<Feature>,
    pub bug_fixes: DedupResult<BugFix>,
    pub improvements: DedupResult<Improvement>,
    pub documentation: DedupResult<DocumentationChange>,
}

impl DedupReport {
    pub fn summary(&self, kind: ChangeKind) -> KindSummary {
        match kind {
            ChangeKind::BreakingChange => self.breaking_changes.summary(),
            ChangeKind::Feature => self.features.summary(),
            ChangeKind::BugFix => self.bug_fixes.summary(),
            ChangeKind::Improvement => self.improvements.summary(),
            ChangeKind::Documentation => self.documentation.summary(),
        }
    }

    /// One summary per kind, in `ChangeKind::ALL` order.
    pub fn summaries(&self) -> Vec<KindSummary> {
        ChangeKind::ALL.iter().map(|&kind| self.summary(kind)).collect()
    }

    pub fn metadata(&self) -> DeduplicationMetadata {
        build_metadata(&self.summaries())
    }

    /// Number of automatic merges across all kinds.
    pub fn merge_count(&self) -> usize {
        self.breaking_changes.merged_items.len()
            + self.features.merged_items.len()
            + self.bug_fixes.merged_items.len()
            + self.improvements.merged_items.len()
            + self.documentation.merged_items.len()
    }
}
