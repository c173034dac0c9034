//! CLI command handlers, one per file.

mod check;
mod list;
mod probe;
mod rewrite;

pub use check::run_check;
pub use list::run_list;
pub use probe::run_probe;
pub use rewrite::run_rewrite;
