use crate::branches::{choose_branch, BranchPolicy};
use crate::count::LanguageTable;
use crate::error::Result;
use crate::git::{GitRepo, MirrorFetcher};
use crate::gitlab::ProjectSource;
use crate::model::{BranchStats, Project, ReportEntry};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Shared, read-only inputs of every project task.
pub struct Pipeline<'a> {
    pub source: &'a dyn ProjectSource,
    pub fetcher: &'a dyn MirrorFetcher,
    pub policy: &'a BranchPolicy,
    pub table: &'a LanguageTable,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn ProjectSource,
        fetcher: &'a dyn MirrorFetcher,
        policy: &'a BranchPolicy,
        table: &'a LanguageTable,
    ) -> Self {
        Self {
            source,
            fetcher,
            policy,
            table,
        }
    }

    /// Run one project end to end. Failures and panics are logged and
    /// reported as an entry without a chosen branch.
    pub fn process_project(&self, project: &Project) -> ReportEntry {
        match panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(project))) {
            Ok(Ok(entry)) => entry,
            Ok(Err(e)) => {
                warn!(project = %project.path_with_namespace, error = %e, "project skipped");
                ReportEntry::empty(project)
            }
            Err(payload) => {
                warn!(
                    project = %project.path_with_namespace,
                    panic = panic_message(payload.as_ref()),
                    "project task panicked"
                );
                ReportEntry::empty(project)
            }
        }
    }

    fn evaluate(&self, project: &Project) -> Result<ReportEntry> {
        let listed = self.source.list_branches(project)?;
        let candidates = self
            .policy
            .candidates(project.default_branch.as_deref(), listed.iter().map(String::as_str));
        debug!(project = %project.path_with_namespace, ?candidates, "candidate branches");

        let mirror = self.fetcher.fetch(project)?;
        let results = count_branches(mirror.repo(), candidates, self.table);

        Ok(match choose_branch(results) {
            Some((branch, stats)) => {
                debug!(project = %project.path_with_namespace, branch = %branch, total = stats.total, "branch chosen");
                ReportEntry::chosen(project, branch, stats)
            }
            None => ReportEntry::empty(project),
        })
    }
}

/// Count every branch in evaluation order.
pub fn count_branches<I>(repo: &GitRepo, branches: I, table: &LanguageTable) -> Vec<(String, Option<BranchStats>)>
where
    I: IntoIterator<Item = String>,
{
    branches
        .into_iter()
        .map(|branch| {
            let stats = repo.branch_stats(&branch, table);
            (branch, stats)
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
