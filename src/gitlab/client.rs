use super::{BranchRecord, ProjectRecord, ProjectSource};
use crate::error::{GllocError, Result};
use crate::model::Project;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const NEXT_PAGE_HEADER: &str = "x-next-page";

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub backoff_cap: Duration,
    pub per_page: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 5,
            backoff_base: Duration::from_millis(500),
            backoff_cap: Duration::from_secs(30),
            per_page: 100,
        }
    }
}

impl ClientOptions {
    /// Delay before retry number `attempt` (zero-based) when the server
    /// gives no `Retry-After`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.min(16);
        self.backoff_base.saturating_mul(factor).min(self.backoff_cap)
    }
}

/// Blocking GitLab v4 client. `reqwest::blocking::Client` is `Sync`, so a
/// single instance serves every worker.
pub struct GitLabClient {
    http: Client,
    base: Url,
    token: String,
    options: ClientOptions,
}

impl GitLabClient {
    pub fn new(base_url: &str, token: impl Into<String>, options: ClientOptions) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("glloc/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base,
            token: token.into(),
            options,
        })
    }

    /// Check the token once. Rejected credentials are fatal for the run.
    pub fn authenticate(&self) -> Result<()> {
        let url = self.base.join("api/v4/user")?;
        let resp = self.send(&url)?;
        check_status(&resp, &url)
    }

    fn send(&self, url: &Url) -> Result<Response> {
        let mut attempt = 0;
        loop {
            let resp = self
                .http
                .get(url.clone())
                .header(TOKEN_HEADER, &self.token)
                .send()?;
            let status = resp.status();
            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if !retryable || attempt >= self.options.max_retries {
                return Ok(resp);
            }

            let wait = retry_after(&resp).unwrap_or_else(|| self.options.backoff(attempt));
            warn!(
                %status,
                url = %url,
                attempt = attempt + 1,
                wait = %humantime::format_duration(wait),
                "retrying GitLab request"
            );
            std::thread::sleep(wait);
            attempt += 1;
        }
    }

    /// Fetch every page of a collection endpoint.
    fn get_all<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let endpoint = self.base.join(path)?;
        let per_page = self.options.per_page.to_string();
        let mut items = Vec::new();
        let mut page = "1".to_string();

        loop {
            let mut url = endpoint.clone();
            url.query_pairs_mut()
                .extend_pairs(query)
                .append_pair("per_page", &per_page)
                .append_pair("page", &page);

            let resp = self.send(&url)?;
            check_status(&resp, &url)?;
            let next = next_page(&resp);
            let batch: Vec<T> = resp.json()?;
            debug!(url = %url, count = batch.len(), "fetched page");

            let exhausted = batch.is_empty();
            items.extend(batch);
            match next {
                Some(n) if !exhausted => page = n,
                _ => break,
            }
        }

        Ok(items)
    }
}

impl ProjectSource for GitLabClient {
    fn list_projects(&self) -> Result<Vec<Project>> {
        let records: Vec<ProjectRecord> = self.get_all("api/v4/projects", &[])?;
        Ok(records.into_iter().map(Project::from).collect())
    }

    fn list_branches(&self, project: &Project) -> Result<Vec<String>> {
        let path = format!("api/v4/projects/{}/repository/branches", project.id);
        let records: Vec<BranchRecord> = self.get_all(&path, &[])?;
        Ok(records.into_iter().map(|b| b.name).collect())
    }
}

fn check_status(resp: &Response, url: &Url) -> Result<()> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let url = url.to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GllocError::Authentication {
            url,
            status: status.as_u16(),
        }),
        _ => Err(GllocError::Api {
            url,
            status: status.as_u16(),
        }),
    }
}

fn retry_after(resp: &Response) -> Option<Duration> {
    let value = resp.headers().get(reqwest::header::RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn next_page(resp: &Response) -> Option<String> {
    resp.headers()
        .get(NEXT_PAGE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
