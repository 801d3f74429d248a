use super::GitRepo;
use crate::error::{GllocError, Result};
use crate::model::Project;
use gix::remote::fetch::Shallow;
use std::fmt::Display;
use std::num::NonZeroU32;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;
use tracing::debug;

/// User name GitLab accepts together with a personal access token.
const TOKEN_PRINCIPAL: &str = "oauth2";

/// Produces a readable repository for a project.
///
/// Implementations are shared by all workers, so they must be `Sync`.
pub trait MirrorFetcher: Send + Sync {
    fn fetch(&self, project: &Project) -> Result<Mirror>;
}

/// A repository handle plus the scratch directory backing it. The directory
/// is removed when the mirror is dropped.
pub struct Mirror {
    repo: GitRepo,
    _workspace: Option<TempDir>,
}

impl Mirror {
    /// Wrap an existing repository that is not owned by the mirror.
    pub fn local(repo: GitRepo) -> Self {
        Self {
            repo,
            _workspace: None,
        }
    }

    pub fn repo(&self) -> &GitRepo {
        &self.repo
    }
}

/// Bare, history-truncated clone of every branch into a fresh temp dir.
pub struct ShallowCloner {
    token: String,
    depth: NonZeroU32,
}

impl ShallowCloner {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            depth: NonZeroU32::MIN,
        }
    }
}

impl ShallowCloner {
    /// Clone `url` into `workspace`. The workspace moves into the returned
    /// mirror and is deleted with it.
    pub(crate) fn clone_into(&self, project: &Project, url: &str, workspace: TempDir) -> Result<Mirror> {
        let fail = |e: &dyn Display| GllocError::Fetch {
            project: project.path_with_namespace.clone(),
            message: redact(&e.to_string(), &self.token),
        };

        debug!(project = %project.path_with_namespace, dir = %workspace.path().display(), "cloning");
        let mut prepare = gix::prepare_clone_bare(url, workspace.path())
            .map_err(|e| fail(&e))?
            .with_shallow(Shallow::DepthAtRemote(self.depth));
        let (repo, _outcome) = prepare
            .fetch_only(gix::progress::Discard, &AtomicBool::new(false))
            .map_err(|e| fail(&e))?;

        Ok(Mirror {
            repo: GitRepo::from_repository(repo),
            _workspace: Some(workspace),
        })
    }
}

impl MirrorFetcher for ShallowCloner {
    fn fetch(&self, project: &Project) -> Result<Mirror> {
        let workspace = tempfile::Builder::new().prefix("glloc-").tempdir()?;
        let url = authorized_url(&project.http_url_to_repo, &self.token);
        self.clone_into(project, &url, workspace)
    }
}

/// Embed `token` into an HTTP(S) clone URL, replacing any user info.
/// URLs without an `http://` prefix are treated as `https://`.
pub fn authorized_url(url: &str, token: &str) -> String {
    let (scheme, rest) = match url.strip_prefix("http://") {
        Some(rest) => ("http://", rest),
        None => ("https://", url.strip_prefix("https://").unwrap_or(url)),
    };
    let host = rest.split('/').next().unwrap_or(rest);
    let rest = if host.contains('@') {
        rest.split_once('@').map_or(rest, |(_, tail)| tail)
    } else {
        rest
    };
    format!("{scheme}{TOKEN_PRINCIPAL}:{token}@{rest}")
}

pub fn redact(message: &str, token: &str) -> String {
    if token.is_empty() {
        message.to_string()
    } else {
        message.replace(token, "***")
    }
}
