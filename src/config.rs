use crate::branches::BranchPolicy;
use crate::cli::{CommonArgs, LinesArgs};
use crate::error::{GllocError, Result};
use crate::gitlab::ClientOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_WORKERS: usize = 8;
pub const TOKENS_FILE: &str = "config/tokens.json";
pub const OUTPUT_FILE: &str = "raw_data/gitlab_export_lines.json";

/// Everything a `lines` run needs, resolved from flags, environment and the
/// tokens file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub url: String,
    pub token: String,
    pub output: PathBuf,
    pub max_workers: usize,
    pub policy: BranchPolicy,
    pub client: ClientOptions,
    pub show_progress: bool,
}

#[derive(Deserialize)]
struct TokensFile {
    gitlab: GitLabTokens,
}

#[derive(Deserialize)]
struct GitLabTokens {
    token: String,
}

impl Settings {
    pub fn resolve(common: &CommonArgs, args: &LinesArgs) -> Result<Self> {
        let url = args
            .url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| GllocError::Config("GitLab URL is required (--url or GITLAB_URL)".into()))?;

        let token = match args.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t.to_string(),
            None => {
                let path = args
                    .tokens_file
                    .clone()
                    .unwrap_or_else(|| common.base_dir.join(TOKENS_FILE));
                load_token(&path)?
            }
        };

        if args.max_workers == 0 {
            return Err(GllocError::Config("--max-workers must be at least 1".into()));
        }

        let timeout = humantime::parse_duration(&args.http_timeout)
            .map_err(|e| GllocError::Config(format!("Invalid --http-timeout '{}': {e}", args.http_timeout)))?;

        let output = args
            .output
            .clone()
            .unwrap_or_else(|| common.base_dir.join(OUTPUT_FILE));

        Ok(Self {
            url,
            token,
            output,
            max_workers: args.max_workers,
            policy: BranchPolicy::new(&args.markers),
            client: ClientOptions {
                timeout,
                max_retries: args.max_retries,
                ..ClientOptions::default()
            },
            show_progress: !args.no_progress,
        })
    }
}

/// Read `{"gitlab": {"token": "..."}}`.
pub fn load_token(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| GllocError::Config(format!("Cannot read tokens file {}: {e}", path.display())))?;
    let parsed: TokensFile = serde_json::from_str(&raw)
        .map_err(|e| GllocError::Config(format!("Malformed tokens file {}: {e}", path.display())))?;
    let token = parsed.gitlab.token.trim().to_string();
    if token.is_empty() {
        return Err(GllocError::Config(format!("Empty GitLab token in {}", path.display())));
    }
    Ok(token)
}
