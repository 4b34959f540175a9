//! End-to-end scenarios for the dedup engine, driven through the public API.

use relnote_core::{
    BreakingChange, BugFix, ChangeKind, ChangeRecord, DocumentationChange, ExtractedChanges, Feature, Improvement,
    Severity, SuggestedAction,
};
use relnote_dedup::{DedupEngine, DedupResult};
use serde_json::json;
use std::collections::{BTreeSet, HashSet};

// ============================================================
// Helpers
// ============================================================

/// Every input id is either a standalone output item or a source of exactly
/// one merge record.
fn assert_accounted<T: ChangeRecord>(input: &[T], result: &DedupResult<T>) {
    let merged_ids: HashSet<&str> = result.merged_items.iter().map(|m| m.result.id().as_str()).collect();
    let mut seen: Vec<&str> = result
        .items
        .iter()
        .map(|i| i.id().as_str())
        .filter(|id| !merged_ids.contains(id))
        .collect();
    for record in &result.merged_items {
        seen.extend(record.sources.iter().map(|s| s.id().as_str()));
    }
    assert_eq!(seen.len(), input.len(), "an item was dropped or duplicated");
    let seen: BTreeSet<&str> = seen.into_iter().collect();
    let expected: BTreeSet<&str> = input.iter().map(|i| i.id().as_str()).collect();
    assert_eq!(seen, expected);

    let stats = &result.statistics;
    assert_eq!(stats.final_count, result.items.len());
    assert_eq!(stats.final_count, stats.total_processed - stats.duplicates_removed);
    assert!((0.0..=1.0).contains(&stats.effectiveness));
}

fn breaking(id: &str, title: &str, description: &str, api: &str) -> BreakingChange {
    BreakingChange::new(id, title, description, format!("docs/{id}.md")).with_affected_apis([api])
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn test_bug_fixes_same_issue_merge_definitely() {
    let input = vec![
        BugFix::new("b1", "Fix crash on login", "App crashes when the password field is empty", "docs/task-1.md")
            .with_issue_number("42")
            .with_affected_components(["auth"]),
        BugFix::new("b2", "Fix crash on login", "Login crashed when password field was left empty", "docs/task-2.md")
            .with_issue_number("42")
            .with_affected_components(["auth"])
            .with_severity(Severity::High),
    ];
    let result = DedupEngine::new().deduplicate_bug_fixes(&input);

    assert_eq!(result.items.len(), 1);
    assert_eq!(result.merged_items.len(), 1);
    assert!(result.merged_items[0].reason.contains("High similarity"));
    assert!(result.merged_items[0].similarities[0] >= 0.85);

    let merged = &result.items[0];
    assert_eq!(merged.id.as_str(), "b2");
    assert_eq!(merged.issue_number.as_deref(), Some("42"));
    assert_eq!(merged.severity, Severity::High);
    assert_eq!(merged.source, "docs/task-1.md, docs/task-2.md");
    assert_eq!(
        merged.description,
        "Login crashed when password field was left empty App crashes when the password field is empty"
    );
    assert_accounted(&input, &result);
}

#[test]
fn test_features_with_similar_titles_merge_as_likely() {
    let input = vec![
        Feature::new("f1", "Add dark mode", "Adds a dark colour scheme to the dashboard", "docs/a.md")
            .with_benefits(["accessibility"]),
        Feature::new("f2", "Add dark mode support", "Adds a dark colour scheme to the dashboard", "docs/b.md")
            .with_benefits(["a11y"]),
    ];
    let result = DedupEngine::new().deduplicate_features(&input);

    assert_eq!(result.items.len(), 1);
    let record = &result.merged_items[0];
    assert!(record.reason.contains("Moderate similarity (70-90%)"));
    assert!(record.similarities[0] >= 0.6 && record.similarities[0] < 0.85);
    assert_eq!(result.items[0].title, "Add dark mode");
    assert_eq!(result.items[0].benefits, vec!["accessibility".to_string(), "a11y".to_string()]);
    assert_accounted(&input, &result);
}

#[test]
fn test_unrelated_documentation_kept() {
    let input = vec![
        DocumentationChange::new("d1", "Update installation guide", "Explains the new installer flags", "docs/a.md")
            .with_type("guide"),
        DocumentationChange::new("d2", "Document token rotation", "Describes rotating API credentials safely", "docs/b.md")
            .with_type("api-reference"),
    ];
    let result = DedupEngine::new().deduplicate_documentation(&input);

    assert_eq!(result.items, input);
    assert_eq!(result.statistics.duplicates_removed, 0);
    assert_eq!(result.statistics.effectiveness, 0.0);
    assert!(result.uncertain_duplicates.is_empty());
    assert_accounted(&input, &result);
}

#[test]
fn test_improvements_with_partial_overlap_flagged_for_review() {
    let input = vec![
        Improvement::new("i1", "Faster cache lookups", "Reduced latency for reads", "docs/a.md").with_type("performance"),
        Improvement::new("i2", "Faster index rebuilds", "Reduced memory usage for writes", "docs/b.md")
            .with_type("performance"),
    ];
    let result = DedupEngine::new().deduplicate_improvements(&input);

    assert_eq!(result.items, input);
    assert!(result.merged_items.is_empty());
    assert_eq!(result.uncertain_duplicates.len(), 1);

    let group = &result.uncertain_duplicates[0];
    assert!(group.similarity >= 0.4 && group.similarity < 0.6);
    assert!((group.similarity - 0.5253).abs() < 1e-3);
    assert_eq!(group.suggested_action, SuggestedAction::Merge);
    assert!(group.reason.contains("requires manual review"));
    for item in &group.items {
        assert!(result.items.contains(item));
    }
    assert_eq!(result.statistics.uncertain_items, 2);
    assert_accounted(&input, &result);
}

#[test]
fn test_one_definite_pair_among_five_breaking_changes() {
    let input = vec![
        breaking("bc1", "Remove legacy auth endpoint", "The v1 login route is gone", "POST /v1/login"),
        breaking("bc2", "Rename config loader", "Settings reader now called ConfigSource", "ConfigLoader"),
        breaking("bc3", "Remove legacy auth endpoint", "The v1 login route is gone", "POST /v1/login"),
        breaking("bc4", "Drop Node 16 support", "Minimum runtime version raised", "engines.node"),
        breaking("bc5", "Change default port", "Server binds 8080 instead of 3000", "Server::bind"),
    ];
    let result = DedupEngine::new().deduplicate_breaking_changes(&input);

    assert_eq!(result.items.len(), 4);
    assert_eq!(result.statistics.duplicates_removed, 1);
    assert!((result.statistics.effectiveness - 0.2).abs() < 1e-9);
    assert_eq!(result.items[0].source, "docs/bc1.md, docs/bc3.md");
    let ids: Vec<&str> = result.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["bc1", "bc2", "bc4", "bc5"]);
    assert_accounted(&input, &result);
}

#[test]
fn test_breaking_change_api_union() {
    let input = vec![
        BreakingChange::new("a", "Remove v1 API", "The v1 API was removed", "x.md").with_affected_apis(["a", "b"]),
        BreakingChange::new("b", "Remove v1 API", "The v1 API was removed", "y.md").with_affected_apis(["b", "c"]),
    ];
    let result = DedupEngine::new().deduplicate_breaking_changes(&input);

    assert_eq!(result.items.len(), 1);
    let apis: BTreeSet<&str> = result.items[0].affected_apis.iter().map(String::as_str).collect();
    assert_eq!(apis, BTreeSet::from(["a", "b", "c"]));
}

#[test]
fn test_identical_items_merge_for_every_kind() {
    let engine = DedupEngine::new();
    let collapsed = |n: usize| n == 1;

    let bc = BreakingChange::new("x", "Same", "Same text", "a.md");
    let mut bc2 = bc.clone();
    bc2.id = "y".into();
    assert!(collapsed(engine.deduplicate_breaking_changes(&[bc, bc2]).items.len()));

    let f = Feature::new("x", "Same", "Same text", "a.md");
    let mut f2 = f.clone();
    f2.id = "y".into();
    assert!(collapsed(engine.deduplicate_features(&[f, f2]).items.len()));

    let b = BugFix::new("x", "Same", "Same text", "a.md");
    let mut b2 = b.clone();
    b2.id = "y".into();
    assert!(collapsed(engine.deduplicate_bug_fixes(&[b, b2]).items.len()));

    let i = Improvement::new("x", "Same", "Same text", "a.md");
    let mut i2 = i.clone();
    i2.id = "y".into();
    assert!(collapsed(engine.deduplicate_improvements(&[i, i2]).items.len()));

    let d = DocumentationChange::new("x", "Same", "Same text", "a.md");
    let mut d2 = d.clone();
    d2.id = "y".into();
    assert!(collapsed(engine.deduplicate_documentation(&[d, d2]).items.len()));
}

#[test]
fn test_empty_input() {
    let result = DedupEngine::new().deduplicate_features(&[]);
    assert!(result.items.is_empty());
    assert_eq!(result.statistics.total_processed, 0);
    assert_eq!(result.statistics.effectiveness, 0.0);
}

#[test]
fn test_deterministic() {
    let input = vec![
        Improvement::new("i1", "Faster cache lookups", "Reduced latency for reads", "a.md"),
        Improvement::new("i2", "Faster cache lookups", "Reduced latency for all reads", "b.md"),
        Improvement::new("i3", "Faster index rebuilds", "Reduced memory usage for writes", "c.md"),
    ];
    let engine = DedupEngine::new();
    let a = engine.deduplicate_improvements(&input);
    let b = engine.deduplicate_improvements(&input);
    assert_eq!(a.items, b.items);
    assert_eq!(a.statistics, b.statistics);
    assert_accounted(&input, &a);
}

// ============================================================
// Whole-extraction pass
// ============================================================

fn extraction_fixture() -> serde_json::Value {
    json!({
        "breakingChanges": [
            {"id": "bc1", "title": "Remove legacy auth endpoint", "description": "The v1 login route is gone",
             "affectedAPIs": ["POST /v1/login"], "source": "docs/a.md", "severity": "high"},
            {"id": "bc2", "title": "Remove legacy auth endpoint", "description": "The v1 login route is gone",
             "affectedAPIs": ["POST /v1/login"], "migrationGuidance": "Use /v2/login", "source": "docs/b.md",
             "severity": "critical"}
        ],
        "newFeatures": [],
        "bugFixes": [],
        "improvements": [
            {"id": "i1", "title": "Faster cache lookups", "description": "Reduced latency for reads",
             "type": "performance", "impact": "medium", "source": "docs/a.md"},
            {"id": "i2", "title": "Faster index rebuilds", "description": "Reduced memory usage for writes",
             "type": "performance", "impact": "high", "source": "docs/b.md"}
        ],
        "documentation": [],
        "metadata": {
            "documentsAnalyzed": 2,
            "extractionConfidence": 0.8,
            "ambiguousItems": [],
            "filteredItems": []
        }
    })
}

#[test]
fn test_deduplicate_changes_attaches_metadata() -> anyhow::Result<()> {
    let changes = ExtractedChanges::from_json(&extraction_fixture().to_string())?;
    let out = DedupEngine::new().deduplicate_changes(changes);

    assert_eq!(out.breaking_changes.len(), 1);
    assert_eq!(out.breaking_changes[0].severity, Severity::Critical);
    assert_eq!(out.breaking_changes[0].migration_guidance.as_deref(), Some("Use /v2/login"));
    assert_eq!(out.improvements.len(), 2);

    let dedup = out.metadata.deduplication.as_ref().expect("metadata attached");
    assert_eq!(dedup.original_count, 4);
    assert_eq!(dedup.duplicates_removed, 1);
    assert_eq!(dedup.uncertain_duplicates.len(), 1);
    assert_eq!(dedup.uncertain_duplicates[0].change_type, "improvements");
    assert_eq!(dedup.uncertain_duplicates[0].item_count, 2);
    // Mean over five kinds: only breaking changes removed anything (0.5).
    assert!((dedup.effectiveness - 0.1).abs() < 1e-9);
    // One group over four items is above the 20% review ratio.
    let expected = 0.8 * (1.0 - 0.25 * 0.3);
    assert!((out.metadata.extraction_confidence - expected).abs() < 1e-9);
    assert_eq!(
        dedup.review_message().as_deref(),
        Some("1 potential duplicate groups require manual review")
    );
    Ok(())
}

#[test]
fn test_deduplicate_all_report() -> anyhow::Result<()> {
    let changes = ExtractedChanges::from_json(&extraction_fixture().to_string())?;
    let report = DedupEngine::new().deduplicate_all(&changes);

    assert_eq!(report.merge_count(), 1);
    let kinds: Vec<ChangeKind> = report.summaries().iter().map(|s| s.kind).collect();
    assert_eq!(kinds, ChangeKind::ALL);
    assert_eq!(report.summary(ChangeKind::BreakingChange).statistics.duplicates_removed, 1);
    let value = serde_json::to_value(&report)?;
    assert_eq!(value["breakingChanges"]["statistics"]["duplicatesRemoved"], json!(1));
    assert_eq!(value["improvements"]["uncertainDuplicates"][0]["suggestedAction"], json!("merge"));
    Ok(())
}

#[test]
fn test_malformed_extraction_rejected() {
    let mut fixture = extraction_fixture();
    if let Some(item) = fixture["improvements"][0].as_object_mut() {
        item.remove("description");
    }
    assert!(ExtractedChanges::from_json(&fixture.to_string()).is_err());
}
