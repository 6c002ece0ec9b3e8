//! Small helpers for text cleanup, logging and the file system.

use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Remove every newline and trim surrounding whitespace.
///
/// This is the cleanup applied to headlines and to each body paragraph.
/// Inner whitespace is left as is.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(strip_newlines("\n  Инфляция\n в марте  \n"), "Инфляция в марте");
/// ```
pub fn strip_newlines(s: &str) -> String {
    s.replace('\n', "").trim().to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended. Cuts always land on a character boundary.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Create the parent directory of `path` if it has one and it is missing.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
        debug!(parent = %parent.display(), "Parent directory ready");
    }
    Ok(())
}
