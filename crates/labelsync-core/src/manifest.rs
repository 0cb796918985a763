use crate::directory::LabelDirectory;
use crate::error::ConfigError;
use crate::model::{LabelDef, RepoAssignment, RepoRef};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The YAML document describing labels and repos.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub labels: Vec<LabelDef>,
    #[serde(default)]
    pub repos: Vec<RepoEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RepoEntry {
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Manifest {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("read manifest {}", path.display()))?;
        let manifest = serde_yaml::from_str(&data).context("parse manifest")?;
        Ok(manifest)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let data = serde_yaml::to_string(self).context("serialize manifest")?;
        fs::write(path, data).with_context(|| format!("write manifest {}", path.display()))?;
        Ok(())
    }

    pub fn into_directory(self) -> Result<LabelDirectory, ConfigError> {
        if self.repos.is_empty() {
            return Err(ConfigError::NoRepos);
        }
        let mut assignments = Vec::with_capacity(self.repos.len());
        for repo in self.repos {
            assignments.push(RepoAssignment {
                repo: RepoRef::parse(&repo.name)?,
                labels: repo.labels,
            });
        }
        LabelDirectory::new(self.labels, assignments)
    }

    pub fn from_directory(directory: &LabelDirectory) -> Self {
        Self {
            labels: directory.labels().cloned().collect(),
            repos: directory
                .assignments()
                .iter()
                .map(|assignment| RepoEntry {
                    name: assignment.repo.slug(),
                    labels: assignment.labels.clone(),
                })
                .collect(),
        }
    }
}
