use super::*;
use labelsync_core::snapshot::snapshot;

pub(super) async fn handle_import(args: ImportArgs, manifest_path: &Path) -> anyhow::Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let directory = manifest.into_directory()?;
    // import only reads remote state, so the gateway stays in live mode
    let gateway = app::gateway_from_env(args.api_host, RunMode::Live)?;

    let actual = snapshot(&directory, gateway.as_ref()).await?;
    let imported = Manifest::from_directory(&actual);
    imported.save(manifest_path)?;
    info!(path = %manifest_path.display(), "imported remote labels into manifest");
    Ok(())
}
