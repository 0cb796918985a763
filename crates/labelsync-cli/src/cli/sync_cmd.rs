use super::*;
use labelsync_core::fleet;
use labelsync_core::snapshot::snapshot;

pub(super) async fn handle_sync(args: SyncArgs, manifest_path: &Path) -> anyhow::Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let directory = Arc::new(manifest.into_directory()?);
    let mode = if args.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Live
    };
    let gateway = app::gateway_from_env(args.api_host, mode)?;

    let actual = snapshot(&directory, gateway.as_ref()).await?;
    if actual == *directory {
        info!("remote labels already match the manifest");
        return Ok(());
    }

    fleet::run(directory, gateway).await
}
