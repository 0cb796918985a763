use crate::directory::LabelDirectory;
use crate::error::ConfigError;
use crate::gateway::LabelGateway;
use crate::reconcile::reconcile_repo;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Fans one reconciliation task out per declared repository, waits for every
/// task to finish, and returns the first error observed. Later failures are
/// logged but not returned; completion order between repositories is
/// unspecified.
pub async fn run(
    directory: Arc<LabelDirectory>,
    gateway: Arc<dyn LabelGateway>,
) -> anyhow::Result<()> {
    if directory.assignments().is_empty() {
        return Err(ConfigError::NoRepos.into());
    }

    let mut tasks = JoinSet::new();
    for assignment in directory.assignments().to_vec() {
        let directory = Arc::clone(&directory);
        let gateway = Arc::clone(&gateway);
        tasks.spawn(async move {
            let slug = assignment.repo.slug();
            let result = reconcile_repo(&assignment, &directory, gateway.as_ref()).await;
            (slug, result)
        });
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = match joined {
            Ok((slug, Ok(()))) => {
                info!(repo = %slug, "repository reconciled");
                continue;
            }
            Ok((_, Err(err))) => err,
            Err(err) => anyhow::anyhow!("reconciliation task failed: {err}"),
        };
        if first_error.is_none() {
            first_error = Some(outcome);
        } else {
            warn!(error = %format!("{outcome:#}"), "additional repository failure");
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
