//! GitLab REST API access.

pub mod client;

use crate::error::Result;
use crate::model::Project;
use serde::Deserialize;

pub use client::{ClientOptions, GitLabClient};

/// Read-only view of the projects and branches visible to a credential.
///
/// One instance is shared by reference across all workers.
pub trait ProjectSource: Send + Sync {
    fn list_projects(&self) -> Result<Vec<Project>>;
    fn list_branches(&self, project: &Project) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectRecord {
    id: u64,
    path_with_namespace: String,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    http_url_to_repo: Option<String>,
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        Project {
            id: record.id,
            path_with_namespace: record.path_with_namespace,
            default_branch: record.default_branch.filter(|b| !b.is_empty()),
            http_url_to_repo: record.http_url_to_repo.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BranchRecord {
    pub(crate) name: String,
}
