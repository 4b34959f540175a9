//! Merge strategies: collapse a duplicate group into one record.
//!
//! Every strategy starts from the primary item (the most detailed member of
//! the group) and recomputes description, list fields, and source from the
//! whole group.

use relnote_core::{BreakingChange, BugFix, ChangeRecord, DocumentationChange, Feature, Impact, Improvement, Severity};
use std::collections::HashSet;

use crate::text::text_len;

/// Pick the item with the longest description (UTF-16 length); ties go to
/// the item with more populated fields, then to the earlier item. `items`
/// must be non-empty.
pub fn select_primary<'a, T: ChangeRecord>(items: &[&'a T]) -> &'a T {
    let mut primary = items[0];
    for &current in &items[1..] {
        let current_len = text_len(current.description());
        let primary_len = text_len(primary.description());
        if current_len > primary_len
            || (current_len == primary_len && current.populated_fields() > primary.populated_fields())
        {
            primary = current;
        }
    }
    primary
}

fn unique_in_order<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}

/// Longest unique description, followed by any other description it does not
/// already contain (case-insensitive).
pub fn merge_descriptions<'a>(descriptions: impl IntoIterator<Item = &'a str>) -> String {
    let unique = unique_in_order(descriptions.into_iter().map(str::trim));
    let Some(&first) = unique.first() else {
        return String::new();
    };
    if unique.len() == 1 {
        return first.to_string();
    }

    let mut longest = first;
    for &desc in &unique[1..] {
        if text_len(desc) > text_len(longest) {
            longest = desc;
        }
    }

    let longest_lower = longest.to_lowercase();
    let additional: Vec<&str> = unique
        .iter()
        .copied()
        .filter(|d| *d != longest)
        .filter(|d| !longest_lower.contains(&d.to_lowercase()))
        .collect();

    if additional.is_empty() {
        longest.to_string()
    } else {
        format!("{} {}", longest, additional.join(" ")).trim().to_string()
    }
}

/// Flatten, trim, drop empties, dedupe (first occurrence wins).
pub fn merge_lists<'a>(lists: impl IntoIterator<Item = &'a [String]>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for item in lists.into_iter().flatten() {
        let item = item.trim();
        if !item.is_empty() && seen.insert(item) {
            merged.push(item.to_string());
        }
    }
    merged
}

pub fn merge_sources<'a>(sources: impl IntoIterator<Item = &'a str>) -> String {
    unique_in_order(sources).join(", ")
}

/// Distinct non-empty guidance, space-joined. `None` when nobody gave any.
pub fn merge_migration_guidance(changes: &[&BreakingChange]) -> Option<String> {
    let guidance = unique_in_order(
        changes
            .iter()
            .filter_map(|c| c.migration_guidance.as_deref())
            .filter(|g| !g.is_empty()),
    );
    if guidance.is_empty() {
        None
    } else {
        Some(guidance.join(" "))
    }
}

pub fn highest_severity(severities: impl IntoIterator<Item = Severity>) -> Severity {
    severities.into_iter().max().unwrap_or_default()
}

pub fn highest_impact(impacts: impl IntoIterator<Item = Impact>) -> Impact {
    impacts.into_iter().max().unwrap_or_default()
}

pub fn merge_breaking_changes(changes: &[&BreakingChange]) -> BreakingChange {
    let primary = select_primary(changes);
    BreakingChange {
        description: merge_descriptions(changes.iter().map(|c| c.description.as_str())),
        affected_apis: merge_lists(changes.iter().map(|c| c.affected_apis.as_slice())),
        migration_guidance: merge_migration_guidance(changes),
        source: merge_sources(changes.iter().map(|c| c.source.as_str())),
        severity: highest_severity(changes.iter().map(|c| c.severity)),
        ..primary.clone()
    }
}

/// Category follows the primary item.
pub fn merge_features(features: &[&Feature]) -> Feature {
    let primary = select_primary(features);
    Feature {
        description: merge_descriptions(features.iter().map(|f| f.description.as_str())),
        benefits: merge_lists(features.iter().map(|f| f.benefits.as_slice())),
        requirements: merge_lists(features.iter().map(|f| f.requirements.as_slice())),
        artifacts: merge_lists(features.iter().map(|f| f.artifacts.as_slice())),
        source: merge_sources(features.iter().map(|f| f.source.as_str())),
        ..primary.clone()
    }
}

/// Issue number follows the primary item.
pub fn merge_bug_fixes(fixes: &[&BugFix]) -> BugFix {
    let primary = select_primary(fixes);
    BugFix {
        description: merge_descriptions(fixes.iter().map(|b| b.description.as_str())),
        affected_components: merge_lists(fixes.iter().map(|b| b.affected_components.as_slice())),
        source: merge_sources(fixes.iter().map(|b| b.source.as_str())),
        severity: highest_severity(fixes.iter().map(|b| b.severity)),
        ..primary.clone()
    }
}

pub fn merge_improvements(improvements: &[&Improvement]) -> Improvement {
    let primary = select_primary(improvements);
    Improvement {
        description: merge_descriptions(improvements.iter().map(|i| i.description.as_str())),
        source: merge_sources(improvements.iter().map(|i| i.source.as_str())),
        impact: highest_impact(improvements.iter().map(|i| i.impact)),
        ..primary.clone()
    }
}

pub fn merge_documentation(docs: &[&DocumentationChange]) -> DocumentationChange {
    let primary = select_primary(docs);
    DocumentationChange {
        description: merge_descriptions(docs.iter().map(|d| d.description.as_str())),
        source: merge_sources(docs.iter().map(|d| d.source.as_str())),
        ..primary.clone()
    }
}
