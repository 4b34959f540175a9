//! Shared data model for release-note change records.

pub mod change;
pub mod config;
pub mod error;
pub mod types;

pub use change::{
    BreakingChange, BugFix, ChangeId, ChangeKind, ChangeRecord, DocumentationChange, Feature, Impact,
    Improvement, Severity,
};
pub use config::{DedupConfig, DedupThresholds};
pub use error::{RelnoteError, Result};
pub use types::{
    DeduplicationMetadata, ExtractedChanges, ExtractionMetadata, SuggestedAction, UncertainDuplicateInfo,
    UncertainItemRef,
};
