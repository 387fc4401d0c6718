//! CLI module for plastisim.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested. The
//! entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, RunOptions, ScaleKind, ScaleQuery, DEFAULT_LOG_LEVEL};
pub use commands::{execute_run, resolve_parameters, run_cli, run_projection, scale_lookup, RunReport};
pub use output::{format_projection_table, format_scale_result, print_help, print_version};

#[cfg(test)]
mod tests;
