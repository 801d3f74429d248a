//! Per-language source line counts for every project on a GitLab host.
//!
//! Each project is shallow-mirrored, a handful of candidate branches are
//! counted straight from the object database, and the branch with the most
//! lines is reported.

pub mod branches;
pub mod cli;
pub mod config;
pub mod count;
pub mod error;
pub mod git;
pub mod gitlab;
pub mod lines;
pub mod local;
pub mod logging;
pub mod model;
