// ABOUTME: File naming helpers — sanitization, collision-free unique names, and path relativization.
// ABOUTME: Pure functions so concurrent persist calls never need to coordinate.

use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Name used when sanitization leaves nothing behind.
pub const FALLBACK_FILE_NAME: &str = "attachment";

/// Length of the random token in unique file names.
const RANDOM_TOKEN_LEN: usize = 8;

/// Characters that are illegal in file names on at least one common platform.
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Make a display name safe to use as a single path segment.
///
/// Illegal and control characters become `_`, whitespace runs collapse to a
/// single space, and the result is trimmed. Applying it twice is a no-op.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if ILLEGAL_CHARS.contains(&c) || (c as u32) < 32 {
                '_'
            } else {
                c
            }
        })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        collapsed
    }
}

/// Short lowercase alphanumeric token.
pub fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_TOKEN_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// `{millis}-{token}-{sanitized name}`.
pub fn unique_file_name(name: &str) -> String {
    format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        random_token(),
        sanitize_file_name(name)
    )
}

/// Path of `path` relative to `root`, if it stays inside `root`.
///
/// Returns `None` when `path` is not under `root` or when the relative form
/// would climb out of it through `..` segments.
pub fn relativize(root: &Path, path: &Path) -> Option<PathBuf> {
    let relative = path.strip_prefix(root).ok()?;

    let mut normalized = PathBuf::new();
    let mut depth = 0usize;
    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                normalized.pop();
                depth -= 1;
            }
            Component::Normal(part) => {
                normalized.push(part);
                depth += 1;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if depth == 0 { None } else { Some(normalized) }
}
