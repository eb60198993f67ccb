//! Output formatting and the per-batch log artifact
//!
//! Result lines are `domain` or `domain,email1,email2,...`. The log artifact
//! starts with `TOTAL : <seconds>` followed by one diagnostics entry per
//! domain.

mod format;
mod log;

pub use format::{format_diagnostics, format_log, format_result_line};
pub use log::{log_file_name, write_log};
