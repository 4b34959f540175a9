//! Release-note change deduplication engine.
//!
//! Stages:
//! 1. Text: normalization and lexical similarity (word overlap, Jaccard)
//! 2. Scoring: per-kind weighted similarity of two change records
//! 3. Classifier: threshold-tiered clustering into definite, likely and uncertain duplicates
//! 4. Merge: field-level merge of a duplicate group into one record
//! 5. Engine: per-kind orchestration and aggregate metadata

pub mod classifier;
pub mod engine;
pub mod merge;
pub mod metadata;
pub mod scoring;
pub mod strategy;
pub mod text;

pub use classifier::{DedupResult, DedupStatistics, MergeRecord, SimilarityTier, UncertainGroup};
pub use engine::{DedupEngine, DedupReport};
pub use scoring::SimilarityScore;
pub use strategy::DedupStrategy;
