//! Filesystem helpers for artifacts that must never be observed half-written.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::MediaResult;

/// Write `contents` to `dst` via a sibling temp file and a rename.
///
/// Readers either see the previous file or the complete new one.
pub async fn write_atomic(dst: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> MediaResult<()> {
    let dst = dst.as_ref();

    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut tmp_name = dst.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = dst.with_file_name(tmp_name);

    if let Err(e) = fs::write(&tmp, contents).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&tmp, dst).await {
        tracing::error!("Failed to move {} into place: {}", tmp.display(), e);
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    Ok(())
}

/// Copy `src` to `dst`, creating the destination directory if needed.
pub async fn copy_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> MediaResult<u64> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    Ok(fs::copy(src, dst).await?)
}

/// Absolute form of `path` with symlinks and `..` resolved.
///
/// The file itself need not exist: a missing final component is joined onto
/// the canonical parent. If the parent is missing too the path is returned
/// as given.
pub async fn resolve_path(path: impl AsRef<Path>) -> MediaResult<PathBuf> {
    let path = path.as_ref();

    match fs::canonicalize(path).await {
        Ok(resolved) => return Ok(resolved),
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
        Err(_) => {}
    }

    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return Ok(path.to_path_buf());
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };

    match fs::canonicalize(parent).await {
        Ok(resolved) => Ok(resolved.join(name)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e.into()),
    }
}

/// True if `a` and `b` name the same file once resolved.
pub async fn same_file(a: impl AsRef<Path>, b: impl AsRef<Path>) -> MediaResult<bool> {
    Ok(resolve_path(a).await? == resolve_path(b).await?)
}
