use crate::count::{count_lines, LanguageTable};
use crate::error::{GllocError, Result};
use crate::model::BranchStats;
use gix::objs::tree::EntryKind;
use gix::{discover, ObjectId, Repository};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        Ok(Self::from_repository(repo))
    }

    pub fn from_repository(repo: Repository) -> Self {
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        Self { repo, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short name of the branch HEAD points to, if any.
    pub fn head_branch(&self) -> Result<Option<String>> {
        let name = self
            .repo
            .head_name()
            .map_err(|e| GllocError::GitRepo(format!("Cannot read HEAD: {e}")))?;
        Ok(name.map(|n| n.shorten().to_string()))
    }

    /// Resolve a branch name against remote-tracking refs first, so bare
    /// mirrors and ordinary clones both work.
    pub fn resolve_branch(&self, branch: &str) -> Result<ObjectId> {
        let specs = [
            format!("refs/remotes/origin/{branch}"),
            format!("refs/heads/{branch}"),
            branch.to_string(),
        ];
        for spec in &specs {
            if let Ok(id) = self.repo.rev_parse_single(spec.as_str()) {
                return Ok(id.detach());
            }
        }
        Err(GllocError::GitRepo(format!("Unknown branch: {branch}")))
    }

    /// Paths and blob ids of every regular file tracked at `branch`.
    pub fn list_files(&self, branch: &str) -> Result<Vec<(String, ObjectId)>> {
        let commit_id = self.resolve_branch(branch)?;
        let tree = self.repo.find_commit(commit_id)?.tree()?;

        let mut recorder = gix::traverse::tree::Recorder::default();
        tree.traverse()
            .breadthfirst(&mut recorder)
            .map_err(|e| GllocError::GitRepo(format!("Tree walk failed on {branch}: {e}")))?;

        Ok(recorder
            .records
            .into_iter()
            .filter(|entry| matches!(entry.mode.kind(), EntryKind::Blob | EntryKind::BlobExecutable))
            .map(|entry| (entry.filepath.to_string(), entry.oid))
            .collect())
    }

    /// Text content of a blob, or `None` when it is missing. Invalid UTF-8
    /// is replaced, which never adds or removes a line.
    pub fn read_text(&self, id: ObjectId) -> Option<String> {
        let object = self.repo.find_object(id).ok()?;
        Some(String::from_utf8_lossy(&object.data).into_owned())
    }

    /// Count lines on `branch`. `None` when the branch cannot be resolved or
    /// nothing countable was found.
    pub fn branch_stats(&self, branch: &str, table: &LanguageTable) -> Option<BranchStats> {
        let files = match self.list_files(branch) {
            Ok(files) => files,
            Err(e) => {
                debug!(branch, error = %e, "skipping branch");
                return None;
            }
        };

        let mut stats = BranchStats::new();
        for (path, id) in files {
            let Some(language) = table.classify(&path) else {
                continue;
            };
            let Some(text) = self.read_text(id) else {
                debug!(branch, path = %path, "unreadable blob skipped");
                continue;
            };
            stats.add_lines(language.label, count_lines(&text, language.brace_sensitive));
        }

        if stats.is_empty() {
            None
        } else {
            Some(stats)
        }
    }
}
