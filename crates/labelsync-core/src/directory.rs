use crate::error::ConfigError;
use crate::model::{LabelDef, RepoAssignment, RepoRef};
use std::collections::BTreeMap;

/// The declared catalog of labels plus the repository assignments, either
/// materialized from a manifest or rebuilt from live state as a snapshot.
/// Immutable once built; two directories compare by structural equality
/// (labels order-independent, assignments as stored).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LabelDirectory {
    labels: BTreeMap<String, LabelDef>,
    assignments: Vec<RepoAssignment>,
}

impl LabelDirectory {
    pub fn new(
        labels: Vec<LabelDef>,
        assignments: Vec<RepoAssignment>,
    ) -> Result<Self, ConfigError> {
        let mut by_name = BTreeMap::new();
        for label in labels {
            if let Some(previous) = &label.previous_name
                && previous == &label.name
            {
                return Err(ConfigError::SelfRename(label.name));
            }
            let name = label.name.clone();
            if by_name.insert(name.clone(), label).is_some() {
                return Err(ConfigError::DuplicateLabel(name));
            }
        }
        Ok(Self {
            labels: by_name,
            assignments,
        })
    }

    pub(crate) fn from_parts(
        labels: BTreeMap<String, LabelDef>,
        assignments: Vec<RepoAssignment>,
    ) -> Self {
        Self {
            labels,
            assignments,
        }
    }

    pub fn lookup_label(&self, name: &str) -> Result<&LabelDef, ConfigError> {
        self.labels
            .get(name)
            .ok_or_else(|| ConfigError::UnknownLabel(name.to_string()))
    }

    /// False when the repository is unknown or does not declare the label.
    pub fn repo_has_label(&self, repo: &RepoRef, label_name: &str) -> bool {
        self.assignments
            .iter()
            .find(|assignment| assignment.repo == *repo)
            .is_some_and(|assignment| assignment.labels.iter().any(|name| name == label_name))
    }

    pub fn labels(&self) -> impl Iterator<Item = &LabelDef> {
        self.labels.values()
    }

    pub fn assignments(&self) -> &[RepoAssignment] {
        &self.assignments
    }
}
