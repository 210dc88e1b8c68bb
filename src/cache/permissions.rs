//! Write protection of cached trees
//!
//! Cached sources are inputs, never edited in place. After every clone or pull
//! the write bits of all regular files are cleared, except inside `.git`, which
//! git itself must keep managing.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use super::paths::VCS_DIR;
use crate::error::{Result, cache};

/// Clear the write permission of every regular file under `root`, skipping `.git`
pub fn make_read_only(root: &Path) -> Result<()> {
    set_writable(root, false, true)
}

/// Restore owner write permission under `root`, skipping `.git`
pub fn make_writable(root: &Path) -> Result<()> {
    set_writable(root, true, true)
}

/// Restore owner write permission everywhere under `root` so it can be deleted
pub fn make_removable(root: &Path) -> Result<()> {
    set_writable(root, true, false)
}

fn set_writable(root: &Path, writable: bool, skip_vcs: bool) -> Result<()> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !(skip_vcs && e.file_type().is_dir() && e.file_name() == VCS_DIR));

    for entry in walker {
        let entry = entry.map_err(|e| {
            cache::operation_failed(format!("Failed to walk {}: {}", root.display(), e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let mut permissions = fs::metadata(path)?.permissions();
        if !apply(&mut permissions, writable) {
            continue;
        }
        fs::set_permissions(path, permissions).map_err(|e| {
            cache::operation_failed(format!(
                "Failed to change permissions of {}: {}",
                path.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// Update `permissions`; returns whether anything changed
#[cfg(unix)]
fn apply(permissions: &mut fs::Permissions, writable: bool) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let mode = permissions.mode();
    let updated = if writable { mode | 0o200 } else { mode & !0o222 };
    permissions.set_mode(updated);
    updated != mode
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn apply(permissions: &mut fs::Permissions, writable: bool) -> bool {
    if permissions.readonly() == !writable {
        return false;
    }
    permissions.set_readonly(!writable);
    true
}
