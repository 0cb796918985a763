use super::*;

pub(super) async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    info!(command = command_label(&cli.command), "running command");
    match cli.command {
        Commands::Sync(args) => handle_sync(args, &cli.manifest).await,
        Commands::Import(args) => handle_import(args, &cli.manifest).await,
    }
}

fn command_label(command: &Commands) -> &'static str {
    match command {
        Commands::Sync(_) => "sync",
        Commands::Import(_) => "import",
    }
}

pub(super) fn gateway_from_env(
    api_host: Option<String>,
    mode: RunMode,
) -> anyhow::Result<Arc<dyn LabelGateway>> {
    let token = std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN is missing")?;
    let gateway = GitHubGateway::new(GatewayConfig {
        api_host,
        token,
        mode,
    })?;
    Ok(Arc::new(gateway))
}
