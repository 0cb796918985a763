use crate::error::GatewayError;
use crate::model::{LabelDef, RemoteLabel, RepoRef};
use std::future::Future;
use std::pin::Pin;

pub type GatewayFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send + 'a>>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunMode {
    Live,
    DryRun,
}

impl RunMode {
    pub fn is_dry_run(self) -> bool {
        matches!(self, RunMode::DryRun)
    }
}

/// Capability interface over the remote label API of one repository.
///
/// `list` pages through all results transparently. Under `RunMode::DryRun`
/// implementations accept and log `create`/`edit`/`delete` without remote
/// effect while `get`/`list` still read real state, so a dry run computes
/// the same operation plan as a live one.
pub trait LabelGateway: Send + Sync {
    fn get<'a>(&'a self, repo: &'a RepoRef, name: &'a str) -> GatewayFuture<'a, RemoteLabel>;

    fn create<'a>(&'a self, repo: &'a RepoRef, def: &'a LabelDef) -> GatewayFuture<'a, ()>;

    /// `target_name` is the name of the label being mutated; it differs from
    /// `def.name` when renaming.
    fn edit<'a>(
        &'a self,
        repo: &'a RepoRef,
        target_name: &'a str,
        def: &'a LabelDef,
    ) -> GatewayFuture<'a, ()>;

    fn list<'a>(&'a self, repo: &'a RepoRef) -> GatewayFuture<'a, Vec<RemoteLabel>>;

    fn delete<'a>(&'a self, repo: &'a RepoRef, name: &'a str) -> GatewayFuture<'a, ()>;
}
