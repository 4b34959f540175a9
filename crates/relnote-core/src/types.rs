use serde::{Deserialize, Serialize};

use crate::change::{BreakingChange, BugFix, ChangeId, DocumentationChange, Feature, Improvement};
use crate::error::Result;

/// Suggested resolution for a group of suspected duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestedAction {
    Merge,
    KeepSeparate,
    NeedsClarification,
}

/// Item summary inside an uncertain duplicate group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertainItemRef {
    pub id: ChangeId,
    pub title: String,
    pub source: String,
}

/// One uncertain duplicate group, flattened for review queues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UncertainDuplicateInfo {
    pub change_type: String,
    pub item_count: usize,
    pub similarity: f64,
    pub suggested_action: SuggestedAction,
    pub items: Vec<UncertainItemRef>,
}

/// Aggregate deduplication outcome across all change kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeduplicationMetadata {
    pub original_count: usize,
    pub duplicates_removed: usize,
    pub uncertain_duplicates: Vec<UncertainDuplicateInfo>,
    pub effectiveness: f64,
}

impl DeduplicationMetadata {
    pub fn needs_review(&self) -> bool {
        !self.uncertain_duplicates.is_empty()
    }

    /// Reviewer-facing warning, present only when groups await manual review.
    pub fn review_message(&self) -> Option<String> {
        if !self.needs_review() {
            return None;
        }
        Some(format!(
            "{} potential duplicate groups require manual review",
            self.uncertain_duplicates.len()
        ))
    }

    /// Consistency contribution of deduplication to extraction quality.
    pub fn consistency_score(&self) -> f64 {
        (self.effectiveness + 0.5).min(1.0)
    }

    /// Comma-joined ids per uncertain group.
    pub fn affected_item_ids(&self) -> Vec<String> {
        self.uncertain_duplicates
            .iter()
            .map(|group| {
                group
                    .items
                    .iter()
                    .map(|item| item.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    pub documents_analyzed: usize,
    pub extraction_confidence: f64,
    pub ambiguous_items: Vec<String>,
    pub filtered_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduplication: Option<DeduplicationMetadata>,
}

/// Change records extracted from completion documents, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedChanges {
    pub breaking_changes: Vec<BreakingChange>,
    pub new_features: Vec<Feature>,
    pub bug_fixes: Vec<BugFix>,
    pub improvements: Vec<Improvement>,
    pub documentation: Vec<DocumentationChange>,
    pub metadata: ExtractionMetadata,
}

impl ExtractedChanges {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn total_items(&self) -> usize {
        self.breaking_changes.len()
            + self.new_features.len()
            + self.bug_fixes.len()
            + self.improvements.len()
            + self.documentation.len()
    }
}
