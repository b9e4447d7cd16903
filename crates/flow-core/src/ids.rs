//! ID prefix constants.
//!
//! Generated IDs have the form `{prefix}-{8 hex chars}`, e.g. `tsk-a3f8b2c1`.
//! User IDs come from the employee directory and are not generated here.

pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_COMMENT: &str = "cmt";
pub const PREFIX_AUDIT: &str = "aud";

pub const ALL_PREFIXES: [&str; 3] = [PREFIX_TASK, PREFIX_COMMENT, PREFIX_AUDIT];

/// Format a prefixed ID from a prefix and its random hex suffix.
#[must_use]
pub fn format_id(prefix: &str, suffix: &str) -> String {
    format!("{prefix}-{suffix}")
}

/// Return the prefix of a generated ID, if it has one of the known prefixes.
#[must_use]
pub fn prefix_of(id: &str) -> Option<&'static str> {
    let (prefix, _) = id.split_once('-')?;
    ALL_PREFIXES.iter().copied().find(|p| *p == prefix)
}
