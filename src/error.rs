use thiserror::Error;

pub type Result<T> = std::result::Result<T, GllocError>;

#[derive(Error, Debug)]
pub enum GllocError {
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Authentication failed against {url} (HTTP {status})")]
    Authentication { url: String, status: u16 },
    #[error("GitLab API error: HTTP {status} for {url}")]
    Api { url: String, status: u16 },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Fetch of {project} failed: {message}")]
    Fetch { project: String, message: String },
    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::object::commit::Error> for GllocError {
    fn from(err: gix::object::commit::Error) -> Self {
        GllocError::Commit(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for GllocError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GllocError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::discover::Error> for GllocError {
    fn from(err: gix::discover::Error) -> Self {
        GllocError::GitDiscover(Box::new(err))
    }
}
