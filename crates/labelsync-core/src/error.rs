use crate::model::RepoRef;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("repository name {0:?} is invalid, expected \"owner/repo\"")]
    InvalidSlug(String),
    #[error("no repositories declared in the manifest")]
    NoRepos,
    #[error("{0}: no such label defined in the manifest")]
    UnknownLabel(String),
    #[error("label {0:?} is defined more than once")]
    DuplicateLabel(String),
    #[error("label {0:?} names itself as its previous name")]
    SelfRename(String),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("label {name:?} not found on {repo}")]
    NotFound { repo: String, name: String },
    #[error("label request failed on {repo}: {source}")]
    Remote {
        repo: String,
        #[source]
        source: anyhow::Error,
    },
}

impl GatewayError {
    pub fn not_found(repo: &RepoRef, name: &str) -> Self {
        GatewayError::NotFound {
            repo: repo.slug(),
            name: name.to_string(),
        }
    }

    pub fn remote(repo: &RepoRef, source: anyhow::Error) -> Self {
        GatewayError::Remote {
            repo: repo.slug(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound { .. })
    }
}
