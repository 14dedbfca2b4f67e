use std::fs;
use std::path::Path;

use anyhow::Context;
use once_cell::sync::Lazy;

/// Denylisted payment identifiers shipped with the binary. Entries are
/// matched as exact substrings, grouping spaces included, so each one must
/// be written the way the identifier is displayed in documents.
pub static DEFAULT_DENYLIST: Lazy<Vec<String>> =
    Lazy::new(|| vec!["DE15 3006 0601 0505 7807 80".to_string()]);

/// Loads the denylist from `path` when given, falling back to the built-in
/// list. File format: one entry per line. Blank lines and `#` comments are
/// skipped; line endings are trimmed but interior spacing is kept exactly
/// as written.
pub fn load_denylist(path: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(DEFAULT_DENYLIST.clone());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read denylist file {}", path.display()))?;

    let entries: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    Ok(entries)
}
