pub mod mirror;
pub mod repo;

pub use mirror::{authorized_url, redact, Mirror, MirrorFetcher, ShallowCloner};
pub use repo::GitRepo;
