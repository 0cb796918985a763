use crate::directory::LabelDirectory;
use crate::error::GatewayError;
use crate::gateway::{GatewayFuture, LabelGateway};
use crate::model::{LabelDef, RemoteLabel, RepoAssignment, RepoRef};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

pub(crate) fn label(
    name: &str,
    description: &str,
    color: &str,
    previous_name: Option<&str>,
) -> LabelDef {
    LabelDef {
        name: name.to_string(),
        description: description.to_string(),
        color: color.to_string(),
        previous_name: previous_name.map(|name| name.to_string()),
    }
}

pub(crate) fn assignment(slug: &str, labels: &[&str]) -> RepoAssignment {
    RepoAssignment {
        repo: RepoRef::parse(slug).unwrap(),
        labels: labels.iter().map(|name| name.to_string()).collect(),
    }
}

pub(crate) fn directory(
    labels: Vec<LabelDef>,
    assignments: Vec<RepoAssignment>,
) -> LabelDirectory {
    LabelDirectory::new(labels, assignments).unwrap()
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Call {
    Get { repo: String, name: String },
    Create { repo: String, def: LabelDef },
    Edit { repo: String, target: String, def: LabelDef },
    List { repo: String },
    Delete { repo: String, name: String },
}

impl Call {
    fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Create { .. } | Call::Edit { .. } | Call::Delete { .. }
        )
    }
}

/// In-memory gateway: labels per repository slug plus a recorded call log.
/// Follows the live/dry-run contract of the real gateway; dry-run records
/// mutations without touching the stored state.
#[derive(Default)]
pub(crate) struct FakeGateway {
    dry_run: bool,
    state: Mutex<BTreeMap<String, Vec<RemoteLabel>>>,
    calls: Mutex<Vec<Call>>,
    failing: BTreeSet<String>,
}

impl FakeGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    pub(crate) fn with_labels(self, slug: &str, labels: &[(&str, &str, &str)]) -> Self {
        let remote = labels
            .iter()
            .map(|(name, description, color)| RemoteLabel {
                name: name.to_string(),
                description: description.to_string(),
                color: color.to_string(),
            })
            .collect();
        self.state.lock().unwrap().insert(slug.to_string(), remote);
        self
    }

    /// Every operation against this slug fails with a remote error.
    pub(crate) fn failing(mut self, slug: &str) -> Self {
        self.failing.insert(slug.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(Call::is_mutation)
            .collect()
    }

    pub(crate) fn labels_on(&self, slug: &str) -> Vec<RemoteLabel> {
        self.state
            .lock()
            .unwrap()
            .get(slug)
            .cloned()
            .unwrap_or_default()
    }

    fn check_reachable(&self, repo: &RepoRef) -> Result<(), GatewayError> {
        if self.failing.contains(&repo.slug()) {
            return Err(GatewayError::remote(
                repo,
                anyhow::anyhow!("injected remote failure"),
            ));
        }
        Ok(())
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl LabelGateway for FakeGateway {
    fn get<'a>(&'a self, repo: &'a RepoRef, name: &'a str) -> GatewayFuture<'a, RemoteLabel> {
        Box::pin(async move {
            self.check_reachable(repo)?;
            self.record(Call::Get {
                repo: repo.slug(),
                name: name.to_string(),
            });
            let state = self.state.lock().unwrap();
            state
                .get(&repo.slug())
                .and_then(|labels| labels.iter().find(|label| label.name == name))
                .cloned()
                .ok_or_else(|| GatewayError::not_found(repo, name))
        })
    }

    fn create<'a>(&'a self, repo: &'a RepoRef, def: &'a LabelDef) -> GatewayFuture<'a, ()> {
        Box::pin(async move {
            self.check_reachable(repo)?;
            self.record(Call::Create {
                repo: repo.slug(),
                def: def.clone(),
            });
            if self.dry_run {
                return Ok(());
            }
            self.state
                .lock()
                .unwrap()
                .entry(repo.slug())
                .or_default()
                .push(RemoteLabel {
                    name: def.name.clone(),
                    description: def.description.clone(),
                    color: def.color.clone(),
                });
            Ok(())
        })
    }

    fn edit<'a>(
        &'a self,
        repo: &'a RepoRef,
        target_name: &'a str,
        def: &'a LabelDef,
    ) -> GatewayFuture<'a, ()> {
        Box::pin(async move {
            self.check_reachable(repo)?;
            self.record(Call::Edit {
                repo: repo.slug(),
                target: target_name.to_string(),
                def: def.clone(),
            });
            if self.dry_run {
                return Ok(());
            }
            let mut state = self.state.lock().unwrap();
            let labels = state.entry(repo.slug()).or_default();
            let Some(existing) = labels.iter_mut().find(|label| label.name == target_name)
            else {
                return Err(GatewayError::not_found(repo, target_name));
            };
            existing.name = def.name.clone();
            existing.description = def.description.clone();
            existing.color = def.color.clone();
            Ok(())
        })
    }

    fn list<'a>(&'a self, repo: &'a RepoRef) -> GatewayFuture<'a, Vec<RemoteLabel>> {
        Box::pin(async move {
            self.check_reachable(repo)?;
            self.record(Call::List { repo: repo.slug() });
            Ok(self.labels_on(&repo.slug()))
        })
    }

    fn delete<'a>(&'a self, repo: &'a RepoRef, name: &'a str) -> GatewayFuture<'a, ()> {
        Box::pin(async move {
            self.check_reachable(repo)?;
            self.record(Call::Delete {
                repo: repo.slug(),
                name: name.to_string(),
            });
            if self.dry_run {
                return Ok(());
            }
            let mut state = self.state.lock().unwrap();
            let labels = state.entry(repo.slug()).or_default();
            let before = labels.len();
            labels.retain(|label| label.name != name);
            if labels.len() == before {
                return Err(GatewayError::not_found(repo, name));
            }
            Ok(())
        })
    }
}
