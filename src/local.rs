use crate::branches::choose_branch;
use crate::cli::CountArgs;
use crate::count::LanguageTable;
use crate::git::GitRepo;
use crate::lines::count_branches;
use crate::model::{BranchCount, CountOutput};
use anyhow::{anyhow, Context};
use console::style;

pub fn exec(args: CountArgs) -> anyhow::Result<()> {
    let repo = GitRepo::open(args.repo.as_ref()).context("Failed to open git repository")?;

    let branches = if args.branches.is_empty() {
        let head = repo
            .head_branch()
            .context("Failed to read HEAD")?
            .ok_or_else(|| anyhow!("HEAD is detached; pass --branch"))?;
        vec![head]
    } else {
        args.branches
    };

    let table = LanguageTable::default();
    let results = count_branches(&repo, branches, &table);
    let chosen_branch = choose_branch(results.clone()).map(|(branch, _)| branch);

    let output = CountOutput {
        repository_path: repo.path().to_string_lossy().to_string(),
        chosen_branch,
        branches: results
            .into_iter()
            .map(|(branch, stats)| BranchCount { branch, stats })
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        output_table(&output);
    }
    Ok(())
}

fn output_table(output: &CountOutput) {
    for entry in &output.branches {
        let marker = if output.chosen_branch.as_deref() == Some(entry.branch.as_str()) {
            style("*").green().bold()
        } else {
            style(" ")
        };
        println!("{} {}", marker, style(&entry.branch).bold());
        println!("{}", "─".repeat(32));

        match &entry.stats {
            Some(stats) => {
                for (language, lines) in &stats.languages {
                    println!("  {:<20} {:>8}", language, lines);
                }
                println!("  {:<20} {:>8}", style("Total").bold(), stats.total);
            }
            None => println!("  {}", style("no countable lines").dim()),
        }
        println!();
    }
}
