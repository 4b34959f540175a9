use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque change identifier, unique within one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(String);

impl ChangeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for records that arrive without one.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChangeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChangeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Severity of a breaking change or bug fix. Ordered low to critical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Impact of an improvement. Ordered low to high.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    #[default]
    Medium,
    High,
}

/// The five change categories. Items are only ever compared within one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    BreakingChange,
    Feature,
    BugFix,
    Improvement,
    Documentation,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 5] = [
        Self::BreakingChange,
        Self::Feature,
        Self::BugFix,
        Self::Improvement,
        Self::Documentation,
    ];

    /// Stable label used in deduplication metadata.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BreakingChange => "breaking-changes",
            Self::Feature => "features",
            Self::BugFix => "bug-fixes",
            Self::Improvement => "improvements",
            Self::Documentation => "documentation",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Common shape of every change record.
pub trait ChangeRecord {
    const KIND: ChangeKind;

    fn id(&self) -> &ChangeId;
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn source(&self) -> &str;

    /// Number of own fields carrying a non-empty value.
    fn populated_fields(&self) -> usize;
}

fn filled(s: &str) -> usize {
    usize::from(!s.is_empty())
}

fn filled_opt(s: &Option<String>) -> usize {
    s.as_deref().map_or(0, filled)
}

fn filled_list(v: &[String]) -> usize {
    usize::from(!v.is_empty())
}

macro_rules! record_basics {
    ($ty:ty, $kind:expr) => {
        impl $ty {
            fn base_fields(&self) -> usize {
                filled(self.id.as_str()) + filled(&self.title) + filled(&self.description) + filled(&self.source)
            }
        }

        impl ChangeRecord for $ty {
            const KIND: ChangeKind = $kind;

            fn id(&self) -> &ChangeId {
                &self.id
            }

            fn title(&self) -> &str {
                &self.title
            }

            fn description(&self) -> &str {
                &self.description
            }

            fn source(&self) -> &str {
                &self.source
            }

            fn populated_fields(&self) -> usize {
                self.base_fields() + self.extra_fields()
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakingChange {
    #[serde(default = "ChangeId::generate")]
    pub id: ChangeId,
    pub title: String,
    pub description: String,
    #[serde(rename = "affectedAPIs")]
    pub affected_apis: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_guidance: Option<String>,
    pub source: String,
    pub severity: Severity,
}

impl BreakingChange {
    pub fn new(
        id: impl Into<ChangeId>,
        title: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            affected_apis: Vec::new(),
            migration_guidance: None,
            source: source.into(),
            severity: Severity::default(),
        }
    }

    pub fn with_affected_apis<S: Into<String>>(mut self, apis: impl IntoIterator<Item = S>) -> Self {
        self.affected_apis = apis.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_migration_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.migration_guidance = Some(guidance.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn extra_fields(&self) -> usize {
        filled_list(&self.affected_apis) + filled_opt(&self.migration_guidance) + 1
    }
}

record_basics!(BreakingChange, ChangeKind::BreakingChange);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(default = "ChangeId::generate")]
    pub id: ChangeId,
    pub title: String,
    pub description: String,
    pub benefits: Vec<String>,
    pub requirements: Vec<String>,
    pub artifacts: Vec<String>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Feature {
    pub fn new(
        id: impl Into<ChangeId>,
        title: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            benefits: Vec::new(),
            requirements: Vec::new(),
            artifacts: Vec::new(),
            source: source.into(),
            category: None,
        }
    }

    pub fn with_benefits<S: Into<String>>(mut self, benefits: impl IntoIterator<Item = S>) -> Self {
        self.benefits = benefits.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_requirements<S: Into<String>>(mut self, requirements: impl IntoIterator<Item = S>) -> Self {
        self.requirements = requirements.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_artifacts<S: Into<String>>(mut self, artifacts: impl IntoIterator<Item = S>) -> Self {
        self.artifacts = artifacts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn extra_fields(&self) -> usize {
        filled_list(&self.benefits)
            + filled_list(&self.requirements)
            + filled_list(&self.artifacts)
            + filled_opt(&self.category)
    }
}

record_basics!(Feature, ChangeKind::Feature);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugFix {
    #[serde(default = "ChangeId::generate")]
    pub id: ChangeId,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_number: Option<String>,
    pub affected_components: Vec<String>,
    pub source: String,
    pub severity: Severity,
}

impl BugFix {
    pub fn new(
        id: impl Into<ChangeId>,
        title: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            issue_number: None,
            affected_components: Vec::new(),
            source: source.into(),
            severity: Severity::default(),
        }
    }

    pub fn with_issue_number(mut self, issue: impl Into<String>) -> Self {
        self.issue_number = Some(issue.into());
        self
    }

    pub fn with_affected_components<S: Into<String>>(mut self, components: impl IntoIterator<Item = S>) -> Self {
        self.affected_components = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Issue number, treating an empty string as absent.
    pub fn issue(&self) -> Option<&str> {
        self.issue_number.as_deref().filter(|s| !s.is_empty())
    }

    fn extra_fields(&self) -> usize {
        filled_opt(&self.issue_number) + filled_list(&self.affected_components) + 1
    }
}

record_basics!(BugFix, ChangeKind::BugFix);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvement {
    #[serde(default = "ChangeId::generate")]
    pub id: ChangeId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub improvement_type: String,
    pub impact: Impact,
    pub source: String,
}

impl Improvement {
    pub fn new(
        id: impl Into<ChangeId>,
        title: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            improvement_type: "other".into(),
            impact: Impact::default(),
            source: source.into(),
        }
    }

    pub fn with_type(mut self, improvement_type: impl Into<String>) -> Self {
        self.improvement_type = improvement_type.into();
        self
    }

    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self
    }

    fn extra_fields(&self) -> usize {
        filled(&self.improvement_type) + 1
    }
}

record_basics!(Improvement, ChangeKind::Improvement);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationChange {
    #[serde(default = "ChangeId::generate")]
    pub id: ChangeId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub source: String,
}

impl DocumentationChange {
    pub fn new(
        id: impl Into<ChangeId>,
        title: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            doc_type: "other".into(),
            source: source.into(),
        }
    }

    pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = doc_type.into();
        self
    }

    fn extra_fields(&self) -> usize {
        filled(&self.doc_type)
    }
}

record_basics!(DocumentationChange, ChangeKind::Documentation);
