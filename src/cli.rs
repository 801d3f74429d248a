use crate::logging::LogLevel;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glloc")]
#[command(about = "Export per-language source line counts for every visible GitLab project")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Base directory for config/ and raw_data/", default_value = ".", global = true)]
    pub base_dir: PathBuf,

    #[arg(long, value_enum, help = "Log level (RUST_LOG takes precedence)", default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,
}

#[derive(Args, Clone)]
pub struct LinesArgs {
    #[arg(long, env = "GITLAB_URL", help = "GitLab base URL")]
    pub url: Option<String>,

    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true, help = "Private access token")]
    pub token: Option<String>,

    #[arg(long, help = "Tokens file (default: <base-dir>/config/tokens.json)")]
    pub tokens_file: Option<PathBuf>,

    #[arg(long, help = "Report path (default: <base-dir>/raw_data/gitlab_export_lines.json)")]
    pub output: Option<PathBuf>,

    #[arg(long, env = "MAX_WORKERS", help = "Projects processed in parallel", default_value_t = crate::config::DEFAULT_MAX_WORKERS)]
    pub max_workers: usize,

    #[arg(long = "marker", help = "Branch name substring marking active development (repeatable)", default_value = crate::branches::DEFAULT_MARKER)]
    pub markers: Vec<String>,

    #[arg(long, help = "HTTP timeout for API calls", default_value = "60s")]
    pub http_timeout: String,

    #[arg(long, help = "Retries on HTTP 429/5xx", default_value_t = 5)]
    pub max_retries: u32,

    #[arg(long, help = "Hide the progress bar")]
    pub no_progress: bool,
}

#[derive(Args, Clone)]
pub struct CountArgs {
    #[arg(long, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long = "branch", help = "Branch to count (repeatable, default: HEAD branch)")]
    pub branches: Vec<String>,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count lines for every project on the GitLab host and write the report
    Lines(LinesArgs),
    /// Count lines of a local repository
    Count(CountArgs),
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::logging::init(self.common.log_level);
        match self.command {
            Commands::Lines(args) => crate::lines::exec(&self.common, &args),
            Commands::Count(args) => crate::local::exec(args),
        }
    }
}
