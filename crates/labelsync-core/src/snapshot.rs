use crate::directory::LabelDirectory;
use crate::gateway::LabelGateway;
use crate::model::{LabelDef, RemoteLabel, RepoAssignment};
use anyhow::Context;
use std::collections::BTreeMap;

/// Builds a directory describing what exists right now: one assignment per
/// declared repository (label names in listing order) and every distinct
/// remote label folded into the label set, first occurrence winning.
pub async fn snapshot(
    directory: &LabelDirectory,
    gateway: &dyn LabelGateway,
) -> anyhow::Result<LabelDirectory> {
    let mut labels: BTreeMap<String, LabelDef> = BTreeMap::new();
    let mut assignments = Vec::with_capacity(directory.assignments().len());
    for declared in directory.assignments() {
        let repo = &declared.repo;
        let remote = gateway
            .list(repo)
            .await
            .with_context(|| format!("list labels on {repo}"))?;
        let names = remote.iter().map(|label| label.name.clone()).collect();
        for label in remote {
            labels
                .entry(label.name.clone())
                .or_insert_with(|| into_def(label));
        }
        assignments.push(RepoAssignment {
            repo: repo.clone(),
            labels: names,
        });
    }
    Ok(LabelDirectory::from_parts(labels, assignments))
}

fn into_def(label: RemoteLabel) -> LabelDef {
    LabelDef {
        name: label.name,
        description: label.description,
        color: label.color,
        previous_name: None,
    }
}
