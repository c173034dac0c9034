pub mod config;
pub mod logging;

pub mod check;
pub mod probe;
pub mod registry;
pub mod report;
pub mod rewrite;
