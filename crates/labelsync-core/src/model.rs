use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LabelDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_name: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RepoRef {
    owner: String,
    repo: String,
}

impl RepoRef {
    pub fn parse(slug: &str) -> Result<Self, ConfigError> {
        let mut segments = slug.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => Ok(Self {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(ConfigError::InvalidSlug(slug.to_string())),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepoAssignment {
    pub repo: RepoRef,
    pub labels: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteLabel {
    pub name: String,
    pub description: String,
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_ref_parses_owner_and_repo() {
        let repo = RepoRef::parse("octocat/hello-world").unwrap();
        assert_eq!(repo.owner(), "octocat");
        assert_eq!(repo.repo(), "hello-world");
        assert_eq!(repo.slug(), "octocat/hello-world");
    }

    #[test]
    fn repo_ref_rejects_malformed_slugs() {
        for slug in ["", "octocat", "/repo", "owner/", "a/b/c"] {
            let err = RepoRef::parse(slug).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidSlug(_)), "slug {slug:?}");
        }
    }

    #[test]
    fn label_def_yaml_field_names_match_manifest() {
        let label: LabelDef = serde_yaml::from_str(
            "name: bug\ndescription: Something isn't working\ncolor: f00\nprevious_name: defect\n",
        )
        .unwrap();
        assert_eq!(label.name, "bug");
        assert_eq!(label.description, "Something isn't working");
        assert_eq!(label.color, "f00");
        assert_eq!(label.previous_name.as_deref(), Some("defect"));
    }

    #[test]
    fn label_def_description_and_previous_name_default() {
        let label: LabelDef = serde_yaml::from_str("name: wip\ncolor: fff\n").unwrap();
        assert_eq!(label.description, "");
        assert_eq!(label.previous_name, None);
    }
}
