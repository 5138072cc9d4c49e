//! Command implementations.

pub mod classify;
pub mod daemon;
pub mod run;
pub mod submit;

pub use self::classify::execute_classify;
pub use self::daemon::{execute_list, execute_logs, execute_start, execute_status, execute_stop};
pub use self::run::execute_run;
pub use self::submit::execute_submit;

use crate::cli::TextArgs;
use crate::error::{CliError, Result};
use std::io::Read;

/// Resolve text given inline, by file, or on stdin.
pub(crate) fn read_text(args: &TextArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    if text.is_empty() {
        return Err(CliError::InvalidInput(
            "no text given (pass TEXT, --file, or pipe stdin)".to_string(),
        ));
    }
    Ok(text)
}
