use super::*;

#[derive(Parser)]
#[command(author, version, about)]
pub(super) struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "labels.yaml",
        help = "Path to the YAML manifest describing labels and repos"
    )]
    pub(super) manifest: PathBuf,
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(clap::Subcommand)]
pub(super) enum Commands {
    #[command(about = "Reconcile remote labels against the manifest")]
    Sync(SyncArgs),
    #[command(about = "Import existing remote labels into the manifest")]
    Import(ImportArgs),
}

#[derive(Parser)]
pub(super) struct SyncArgs {
    #[arg(long, help = "Log the operations that would run without mutating anything")]
    pub(super) dry_run: bool,
    #[arg(long, help = "GitHub API base URL (defaults to https://api.github.com)")]
    pub(super) api_host: Option<String>,
}

#[derive(Parser)]
pub(super) struct ImportArgs {
    #[arg(long, help = "GitHub API base URL (defaults to https://api.github.com)")]
    pub(super) api_host: Option<String>,
}
