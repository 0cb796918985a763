use anyhow::Context;
use clap::Parser;
use labelsync_core::gateway::{LabelGateway, RunMode};
use labelsync_core::manifest::Manifest;
use labelsync_github::github::{GatewayConfig, GitHubGateway};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

mod app;
mod args;
mod import_cmd;
mod sync_cmd;

use args::*;
use import_cmd::handle_import;
use sync_cmd::handle_sync;

pub async fn run() -> anyhow::Result<()> {
    app::run().await
}
