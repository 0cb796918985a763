use crate::http::{send_with_retry, send_with_retry_allow_statuses};
use crate::models::LabelItem;
use crate::paging::next_page_from_link_header;
use anyhow::Context;
use labelsync_core::error::GatewayError;
use labelsync_core::gateway::{GatewayFuture, LabelGateway, RunMode};
use labelsync_core::model::{LabelDef, RemoteLabel, RepoRef};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::json;
use tracing::info;

pub const DEFAULT_API_HOST: &str = "https://api.github.com";

const USER_AGENT: &str = "labelsync";

/// Everything the gateway needs, passed in once at construction. No ambient
/// state: the token, host, and run mode travel with the value.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub api_host: Option<String>,
    pub token: String,
    pub mode: RunMode,
}

pub struct GitHubGateway {
    client: Client,
    api_host: String,
    token: String,
    mode: RunMode,
}

impl GitHubGateway {
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let api_host = config
            .api_host
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client: Client::new(),
            api_host,
            token: config.token,
            mode: config.mode,
        })
    }

    fn labels_url(&self, repo: &RepoRef) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.api_host).context("parse API host")?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("API host {} cannot be a base URL", self.api_host))?
            .extend(["repos", repo.owner(), repo.repo(), "labels"]);
        Ok(url)
    }

    fn label_url(&self, repo: &RepoRef, name: &str) -> anyhow::Result<Url> {
        let mut url = self.labels_url(repo)?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("API host {} cannot be a base URL", self.api_host))?
            .push(name);
        Ok(url)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(&self.token)
    }

    async fn get_label(&self, repo: &RepoRef, name: &str) -> Result<RemoteLabel, GatewayError> {
        let url = self
            .label_url(repo, name)
            .map_err(|err| GatewayError::remote(repo, err))?;
        let builder = self.request(self.client.get(url));
        let response = send_with_retry_allow_statuses(
            || builder.try_clone().context("clone request"),
            &[StatusCode::NOT_FOUND],
        )
        .await
        .context("call GitHub get label")
        .map_err(|err| GatewayError::remote(repo, err))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::not_found(repo, name));
        }
        let item: LabelItem = response
            .json()
            .await
            .context("decode label response")
            .map_err(|err| GatewayError::remote(repo, err))?;
        Ok(item.into())
    }

    async fn create_label(&self, repo: &RepoRef, def: &LabelDef) -> Result<(), GatewayError> {
        info!(
            repo = %repo,
            label = %def.name,
            dry_run = self.mode.is_dry_run(),
            "create label"
        );
        if self.mode.is_dry_run() {
            return Ok(());
        }
        let url = self
            .labels_url(repo)
            .map_err(|err| GatewayError::remote(repo, err))?;
        let body = json!({
            "name": def.name,
            "color": def.color,
            "description": def.description,
        });
        let builder = self.request(self.client.post(url)).json(&body);
        let response = send_with_retry(|| builder.try_clone().context("clone request"))
            .await
            .context("call GitHub create label")
            .map_err(|err| GatewayError::remote(repo, err))?;
        let _ = response.bytes().await;
        Ok(())
    }

    async fn edit_label(
        &self,
        repo: &RepoRef,
        target_name: &str,
        def: &LabelDef,
    ) -> Result<(), GatewayError> {
        if target_name == def.name {
            info!(
                repo = %repo,
                label = %def.name,
                dry_run = self.mode.is_dry_run(),
                "edit label"
            );
        } else {
            info!(
                repo = %repo,
                from = %target_name,
                to = %def.name,
                dry_run = self.mode.is_dry_run(),
                "rename label"
            );
        }
        if self.mode.is_dry_run() {
            return Ok(());
        }
        let url = self
            .label_url(repo, target_name)
            .map_err(|err| GatewayError::remote(repo, err))?;
        let body = json!({
            "new_name": def.name,
            "color": def.color,
            "description": def.description,
        });
        let builder = self.request(self.client.patch(url)).json(&body);
        let response = send_with_retry(|| builder.try_clone().context("clone request"))
            .await
            .context("call GitHub edit label")
            .map_err(|err| GatewayError::remote(repo, err))?;
        let _ = response.bytes().await;
        Ok(())
    }

    async fn list_labels(&self, repo: &RepoRef) -> Result<Vec<RemoteLabel>, GatewayError> {
        let mut page = 1u32;
        let mut labels = Vec::new();
        loop {
            let mut url = self
                .labels_url(repo)
                .map_err(|err| GatewayError::remote(repo, err))?;
            url.query_pairs_mut()
                .append_pair("per_page", "100")
                .append_pair("page", &page.to_string());
            let builder = self.request(self.client.get(url));
            let response = send_with_retry(|| builder.try_clone().context("clone request"))
                .await
                .context("call GitHub list labels")
                .map_err(|err| GatewayError::remote(repo, err))?;
            let next_page = next_page_from_link_header(response.headers());
            let payload: Vec<LabelItem> = response
                .json()
                .await
                .context("decode labels response")
                .map_err(|err| GatewayError::remote(repo, err))?;
            labels.extend(payload.into_iter().map(RemoteLabel::from));
            match next_page {
                Some(next) => page = next,
                None => break,
            }
        }
        Ok(labels)
    }

    async fn delete_label(&self, repo: &RepoRef, name: &str) -> Result<(), GatewayError> {
        info!(
            repo = %repo,
            label = %name,
            dry_run = self.mode.is_dry_run(),
            "delete label"
        );
        if self.mode.is_dry_run() {
            return Ok(());
        }
        let url = self
            .label_url(repo, name)
            .map_err(|err| GatewayError::remote(repo, err))?;
        let builder = self.request(self.client.delete(url));
        let response = send_with_retry(|| builder.try_clone().context("clone request"))
            .await
            .context("call GitHub delete label")
            .map_err(|err| GatewayError::remote(repo, err))?;
        let _ = response.bytes().await;
        Ok(())
    }
}

impl LabelGateway for GitHubGateway {
    fn get<'a>(&'a self, repo: &'a RepoRef, name: &'a str) -> GatewayFuture<'a, RemoteLabel> {
        Box::pin(self.get_label(repo, name))
    }

    fn create<'a>(&'a self, repo: &'a RepoRef, def: &'a LabelDef) -> GatewayFuture<'a, ()> {
        Box::pin(self.create_label(repo, def))
    }

    fn edit<'a>(
        &'a self,
        repo: &'a RepoRef,
        target_name: &'a str,
        def: &'a LabelDef,
    ) -> GatewayFuture<'a, ()> {
        Box::pin(self.edit_label(repo, target_name, def))
    }

    fn list<'a>(&'a self, repo: &'a RepoRef) -> GatewayFuture<'a, Vec<RemoteLabel>> {
        Box::pin(self.list_labels(repo))
    }

    fn delete<'a>(&'a self, repo: &'a RepoRef, name: &'a str) -> GatewayFuture<'a, ()> {
        Box::pin(self.delete_label(repo, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(api_host: Option<&str>) -> GitHubGateway {
        GitHubGateway::new(GatewayConfig {
            api_host: api_host.map(|host| host.to_string()),
            token: "token".to_string(),
            mode: RunMode::Live,
        })
        .unwrap()
    }

    #[test]
    fn labels_url_uses_default_host() {
        let repo = RepoRef::parse("octocat/hello-world").unwrap();
        let url = gateway(None).labels_url(&repo).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octocat/hello-world/labels"
        );
    }

    #[test]
    fn label_url_percent_encodes_names() {
        let repo = RepoRef::parse("o/r").unwrap();
        let url = gateway(None).label_url(&repo, "good first issue").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/o/r/labels/good%20first%20issue"
        );
    }

    #[test]
    fn enterprise_host_keeps_its_path_prefix() {
        let repo = RepoRef::parse("o/r").unwrap();
        let url = gateway(Some("https://ghe.example.com/api/v3/"))
            .labels_url(&repo)
            .unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/repos/o/r/labels");
    }
}
