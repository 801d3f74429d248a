use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A GitLab project, normalized from the API record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: u64,
    pub path_with_namespace: String,
    pub default_branch: Option<String>,
    pub http_url_to_repo: String,
}

/// Line tallies for one branch. `languages` always sums to `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchStats {
    pub total: u64,
    pub languages: BTreeMap<String, u64>,
}

impl BranchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_lines(&mut self, language: &str, lines: u64) {
        if lines == 0 {
            return;
        }
        *self.languages.entry(language.to_string()).or_insert(0) += lines;
        self.total += lines;
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub id: u64,
    pub name: String,
    pub chosen_branch: Option<String>,
    pub loc_by_language: BTreeMap<String, u64>,
}

impl ReportEntry {
    /// Entry for a project where no branch produced countable lines.
    pub fn empty(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.path_with_namespace.clone(),
            chosen_branch: None,
            loc_by_language: BTreeMap::new(),
        }
    }

    pub fn chosen(project: &Project, branch: String, stats: BranchStats) -> Self {
        Self {
            id: project.id,
            name: project.path_with_namespace.clone(),
            chosen_branch: Some(branch),
            loc_by_language: stats.languages,
        }
    }

    pub fn total_lines(&self) -> u64 {
        self.loc_by_language.values().sum()
    }
}

/// One branch of a local `count` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCount {
    pub branch: String,
    pub stats: Option<BranchStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountOutput {
    pub repository_path: String,
    pub chosen_branch: Option<String>,
    pub branches: Vec<BranchCount>,
}
