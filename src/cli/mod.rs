pub mod catalog;
pub mod commands;
pub mod group;
pub mod session;

pub use commands::*;

use crate::error::TaskdeskError;
use crate::output;

/// Turn a command result into an exit code, reporting errors the same way
/// for every subcommand.
pub(crate) fn finish(result: Result<i32, TaskdeskError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                output::json::print(&output::json::error(&e));
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}
