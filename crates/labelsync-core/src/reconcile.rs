use crate::directory::LabelDirectory;
use crate::error::GatewayError;
use crate::gateway::LabelGateway;
use crate::model::{LabelDef, RepoAssignment, RepoRef};
use anyhow::Context;

/// Reconciles one repository: applies every declared label in declaration
/// order, then deletes remote labels the repository does not declare. Any
/// gateway error aborts the remaining steps for this repository.
pub async fn reconcile_repo(
    assignment: &RepoAssignment,
    directory: &LabelDirectory,
    gateway: &dyn LabelGateway,
) -> anyhow::Result<()> {
    let repo = &assignment.repo;
    for name in &assignment.labels {
        let def = directory
            .lookup_label(name)
            .with_context(|| format!("resolve label {name:?} declared for {repo}"))?;
        apply_label(repo, def, gateway)
            .await
            .with_context(|| format!("apply label {name:?} to {repo}"))?;
    }
    delete_undeclared(repo, directory, gateway)
        .await
        .with_context(|| format!("delete undeclared labels on {repo}"))
}

async fn apply_label(
    repo: &RepoRef,
    def: &LabelDef,
    gateway: &dyn LabelGateway,
) -> Result<(), GatewayError> {
    // A pending rename always goes through edit on the old name: a lookup
    // under the new name proves only that the new name does not exist yet,
    // not that the label is missing.
    if let Some(previous) = &def.previous_name {
        return gateway.edit(repo, previous, def).await;
    }
    match gateway.get(repo, &def.name).await {
        Ok(remote) => {
            if remote.description != def.description || remote.color != def.color {
                gateway.edit(repo, &def.name, def).await?;
            }
            Ok(())
        }
        Err(err) if err.is_not_found() => gateway.create(repo, def).await,
        Err(err) => Err(err),
    }
}

async fn delete_undeclared(
    repo: &RepoRef,
    directory: &LabelDirectory,
    gateway: &dyn LabelGateway,
) -> Result<(), GatewayError> {
    let remote = gateway.list(repo).await?;
    for label in remote {
        if directory.repo_has_label(repo, &label.name) {
            // declared for this repo, keep it
            continue;
        }
        gateway.delete(repo, &label.name).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Call, FakeGateway, assignment, directory, label};

    #[tokio::test]
    async fn matching_repo_issues_no_mutations() {
        let directory = directory(
            vec![label("bug", "Something isn't working", "f00", None)],
            vec![assignment("o/r", &["bug"])],
        );
        let gateway =
            FakeGateway::new().with_labels("o/r", &[("bug", "Something isn't working", "f00")]);

        reconcile_repo(&directory.assignments()[0], &directory, &gateway)
            .await
            .unwrap();

        assert!(gateway.mutations().is_empty());
    }

    #[tokio::test]
    async fn absent_label_is_created_once_with_declared_fields() {
        let directory = directory(
            vec![label("bug", "Something isn't working", "f00", None)],
            vec![assignment("o/r", &["bug"])],
        );
        let gateway = FakeGateway::new();

        reconcile_repo(&directory.assignments()[0], &directory, &gateway)
            .await
            .unwrap();

        let mutations = gateway.mutations();
        assert_eq!(mutations.len(), 1);
        match &mutations[0] {
            Call::Create { repo, def } => {
                assert_eq!(repo, "o/r");
                assert_eq!(def.name, "bug");
                assert_eq!(def.description, "Something isn't working");
                assert_eq!(def.color, "f00");
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rename_edits_previous_name_even_when_new_name_exists() {
        let directory = directory(
            vec![label("kind/bug", "", "f00", Some("bug"))],
            vec![assignment("o/r", &["kind/bug"])],
        );
        let gateway = FakeGateway::new()
            .with_labels("o/r", &[("bug", "", "000"), ("kind/bug", "stale", "aaa")]);

        reconcile_repo(&directory.assignments()[0], &directory, &gateway)
            .await
            .unwrap();

        let mutations = gateway.mutations();
        assert_eq!(mutations.len(), 1);
        match &mutations[0] {
            Call::Edit { repo, target, def } => {
                assert_eq!(repo, "o/r");
                assert_eq!(target, "bug");
                assert_eq!(def.name, "kind/bug");
            }
            other => panic!("expected edit keyed on previous name, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undeclared_labels_deleted_once_and_declared_never() {
        let directory = directory(
            vec![label("bug", "", "f00", None)],
            vec![assignment("o/r", &["bug"])],
        );
        // declared label differs in content; must be edited, never deleted
        let gateway = FakeGateway::new().with_labels(
            "o/r",
            &[("bug", "", "000"), ("stale", "", "111"), ("old", "", "222")],
        );

        reconcile_repo(&directory.assignments()[0], &directory, &gateway)
            .await
            .unwrap();

        let mutations = gateway.mutations();
        let deletes: Vec<_> = mutations
            .iter()
            .filter_map(|call| match call {
                Call::Delete { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(deletes, vec!["stale", "old"]);
        assert!(
            mutations
                .iter()
                .any(|call| matches!(call, Call::Edit { target, .. } if target == "bug"))
        );
    }

    #[tokio::test]
    async fn second_run_issues_no_mutations() {
        let directory = directory(
            vec![label("bug", "Something isn't working", "f00", None)],
            vec![assignment("o/r", &["bug"])],
        );
        let gateway = FakeGateway::new().with_labels("o/r", &[("wip", "", "fff")]);

        reconcile_repo(&directory.assignments()[0], &directory, &gateway)
            .await
            .unwrap();
        let after_first = gateway.mutations().len();
        assert!(after_first > 0);

        reconcile_repo(&directory.assignments()[0], &directory, &gateway)
            .await
            .unwrap();
        assert_eq!(gateway.mutations().len(), after_first);
    }

    #[tokio::test]
    async fn dry_run_plans_the_same_operations_as_live() {
        let remote = [("bug", "", "000"), ("wip", "", "fff")];
        let declared = directory(
            vec![label("bug", "Something isn't working", "f00", None)],
            vec![assignment("o/r", &["bug"])],
        );
        let live = FakeGateway::new().with_labels("o/r", &remote);
        let dry = FakeGateway::dry_run().with_labels("o/r", &remote);

        reconcile_repo(&declared.assignments()[0], &declared, &live)
            .await
            .unwrap();
        reconcile_repo(&declared.assignments()[0], &declared, &dry)
            .await
            .unwrap();

        assert_eq!(live.mutations(), dry.mutations());
        assert_eq!(dry.labels_on("o/r").len(), 2); // dry run left remote state alone
    }

    #[tokio::test]
    async fn create_scenario_for_empty_repository() {
        let directory = directory(
            vec![label("bug", "", "f00", None)],
            vec![assignment("o/r", &["bug"])],
        );
        let gateway = FakeGateway::new();

        reconcile_repo(&directory.assignments()[0], &directory, &gateway)
            .await
            .unwrap();

        let mutations = gateway.mutations();
        assert_eq!(mutations.len(), 1);
        assert!(matches!(
            &mutations[0],
            Call::Create { def, .. } if def.name == "bug" && def.color == "f00"
        ));
    }

    #[tokio::test]
    async fn edit_and_delete_scenario() {
        let directory = directory(
            vec![label("bug", "", "f00", None)],
            vec![assignment("o/r", &["bug"])],
        );
        let gateway =
            FakeGateway::new().with_labels("o/r", &[("bug", "", "000"), ("wip", "", "fff")]);

        reconcile_repo(&directory.assignments()[0], &directory, &gateway)
            .await
            .unwrap();

        let mutations = gateway.mutations();
        assert_eq!(mutations.len(), 2);
        assert!(matches!(
            &mutations[0],
            Call::Edit { target, def, .. } if target == "bug" && def.color == "f00"
        ));
        assert!(matches!(
            &mutations[1],
            Call::Delete { name, .. } if name == "wip"
        ));
        assert_eq!(gateway.labels_on("o/r").len(), 1);
    }

    #[tokio::test]
    async fn unresolvable_label_aborts_before_any_mutation() {
        let directory = directory(
            vec![label("bug", "", "f00", None)],
            vec![assignment("o/r", &["ghost", "bug"])],
        );
        let gateway = FakeGateway::new();

        let err = reconcile_repo(&directory.assignments()[0], &directory, &gateway)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("ghost"));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn gateway_failure_aborts_the_repository() {
        let directory = directory(
            vec![label("bug", "", "f00", None)],
            vec![assignment("o/r", &["bug"])],
        );
        let gateway = FakeGateway::new().failing("o/r");

        let err = reconcile_repo(&directory.assignments()[0], &directory, &gateway)
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("o/r"));
        assert!(gateway.mutations().is_empty());
    }
}
