use std::fs::Permissions;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::RenderError;

/// Replaces `path` with `contents` via a sibling temp file and rename, so
/// readers see either the old file or the complete new one.
///
/// An existing file keeps its permissions. A new file is created
/// world-readable (`0644` on Unix) so it can be served as a static page.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the temp file cannot be created, written
/// or moved into place. `path` is untouched in that case.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), RenderError> {
    let io_error = |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let permissions = match std::fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => new_file_permissions(),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(contents.as_bytes()).map_err(io_error)?;
    if let Some(permissions) = permissions {
        file.as_file().set_permissions(permissions).map_err(io_error)?;
    }
    file.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

/// Reads `path` as UTF-8.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the file is missing or unreadable.
pub fn read_text(path: &Path) -> Result<String, RenderError> {
    std::fs::read_to_string(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
