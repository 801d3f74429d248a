use super::output::{print_summary, write_report};
use super::process::Pipeline;
use crate::cli::{CommonArgs, LinesArgs};
use crate::config::Settings;
use crate::count::LanguageTable;
use crate::error::Result;
use crate::git::ShallowCloner;
use crate::gitlab::{GitLabClient, ProjectSource};
use crate::model::{Project, ReportEntry};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::mpsc;
use tracing::info;

pub fn exec(common: &CommonArgs, args: &LinesArgs) -> anyhow::Result<()> {
    let settings = Settings::resolve(common, args).context("Failed to resolve configuration")?;
    let client = GitLabClient::new(&settings.url, settings.token.clone(), settings.client.clone())
        .context("Failed to build GitLab client")?;

    info!(url = %settings.url, "starting GitLab line count export");
    client.authenticate().context("GitLab authentication failed")?;
    let projects = client.list_projects().context("Failed to list GitLab projects")?;
    info!(projects = projects.len(), workers = settings.max_workers, "processing projects");

    let fetcher = ShallowCloner::new(settings.token.clone());
    let table = LanguageTable::default();
    let pipeline = Pipeline::new(&client, &fetcher, &settings.policy, &table);

    let report = run(&pipeline, &projects, settings.max_workers, settings.show_progress)
        .context("Failed to start workers")?;

    write_report(&report, &settings.output)
        .with_context(|| format!("Failed to write report to {}", settings.output.display()))?;
    info!(entries = report.len(), output = %settings.output.display(), "export finished");
    print_summary(&report, &settings.output);

    Ok(())
}

/// Process every project on a pool of `max_workers` threads. Entries come
/// back in completion order.
pub fn run(
    pipeline: &Pipeline<'_>,
    projects: &[Project],
    max_workers: usize,
    show_progress: bool,
) -> Result<Vec<ReportEntry>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_workers.max(1))
        .thread_name(|i| format!("glloc-worker-{i}"))
        .build()?;

    let pb = progress_bar(projects.len() as u64, show_progress);
    let (tx, rx) = mpsc::channel::<ReportEntry>();
    let mut entries = Vec::with_capacity(projects.len());

    std::thread::scope(|scope| {
        let pool = &pool;
        scope.spawn(move || {
            pool.scope(|s| {
                for project in projects {
                    let tx = tx.clone();
                    s.spawn(move |_| {
                        let _ = tx.send(pipeline.process_project(project));
                    });
                }
            });
            drop(tx);
        });

        for entry in rx.iter() {
            pb.set_message(entry.name.clone());
            pb.inc(1);
            entries.push(entry);
        }
    });

    pb.finish_with_message("Projects processed");
    Ok(entries)
}

fn progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} projects {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}
