//! URL normalization for git operations
//!
//! This module handles:
//! - Normalizing SCP-style SSH URLs to ssh:// format
//! - Normalizing file:// URLs for libgit2 compatibility
//! - Telling local sources apart from remote ones

use std::borrow::Cow;
use std::path::Path;

/// Normalize SSH URLs from SCP-style (git@host:path) to ssh:// format.
///
/// libgit2 handles the explicit ssh:// form more reliably than the SCP form.
pub fn normalize_ssh_url(url: &str) -> Cow<'_, str> {
    if url.starts_with("ssh://") || url.contains("://") {
        return Cow::Borrowed(url);
    }

    let Some((host_part, path_part)) = url.split_once(':') else {
        return Cow::Borrowed(url);
    };
    if !host_part.contains('@') {
        return Cow::Borrowed(url);
    }

    let normalized_path = if path_part.starts_with('/') {
        path_part.to_string()
    } else {
        format!("/{path_part}")
    };
    Cow::Owned(format!("ssh://{host_part}{normalized_path}"))
}

/// Normalize file:// URLs so libgit2 can resolve them on Unix.
pub fn normalize_file_url(url: &str) -> Cow<'_, str> {
    let Some(after) = url.strip_prefix("file://") else {
        return Cow::Borrowed(url);
    };
    #[cfg(not(windows))]
    {
        if after.contains('\\') {
            let path = after.replace('\\', "/");
            return Cow::Owned(format!("file:///{}", path.trim_start_matches('/')));
        }
        if !after.is_empty() && !after.starts_with('/') {
            return Cow::Owned(format!("file:///{after}"));
        }
    }
    #[cfg(windows)]
    let _ = after;
    Cow::Borrowed(url)
}

/// The URL handed to libgit2 for `url`
pub fn transport_url(url: &str) -> String {
    normalize_file_url(&normalize_ssh_url(url)).into_owned()
}

/// Whether `url` points at the local filesystem.
///
/// Shallow fetches are not supported by libgit2's local transport.
pub fn is_local(url: &str) -> bool {
    url.starts_with("file://") || url.starts_with('/') || Path::new(url).is_absolute()
}
