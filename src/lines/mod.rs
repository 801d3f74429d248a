pub mod exec;
pub mod output;
pub mod process;

pub use exec::{exec, run};
pub use output::{print_summary, write_report};
pub use process::{count_branches, Pipeline};
