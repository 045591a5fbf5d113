//! Filesystem primitives used by the build steps.
//!
//! Output directories are owned by the builder: [`reset_dir`] destroys and
//! recreates them so a build never merges with a previous run's files.

use std::ffi::OsStr;
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};

use kbdocs_shared::{KbDocsError, Result};
use tracing::debug;
use walkdir::WalkDir;

/// Remove `path` (file or directory tree) if present, then create it as an
/// empty directory, parents included.
pub fn reset_dir(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(path).map_err(|e| KbDocsError::io(path, e))?;
        }
        Ok(_) => fs::remove_file(path).map_err(|e| KbDocsError::io(path, e))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(KbDocsError::io(path, e)),
    }
    ensure_dir(path)?;
    debug!(path = %path.display(), "output directory reset");
    Ok(())
}

/// Create `path` and any missing parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| KbDocsError::io(path, e))
}

/// Copy one file, keeping permissions and access/modification times.
/// Returns the number of bytes copied.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    let bytes = fs::copy(src, dst).map_err(|e| KbDocsError::io(src, e))?;

    let meta = fs::metadata(src).map_err(|e| KbDocsError::io(src, e))?;
    let mut times = FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    open_for_times(dst)
        .and_then(|f| f.set_times(times))
        .map_err(|e| KbDocsError::io(dst, e))?;

    Ok(bytes)
}

/// Handle on which `set_times` is allowed even when `path` was copied as
/// read-only. Windows needs `FILE_WRITE_ATTRIBUTES`, which a read handle
/// lacks; elsewhere a read handle is enough.
#[cfg(windows)]
fn open_for_times(path: &Path) -> std::io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    const FILE_WRITE_ATTRIBUTES: u32 = 0x0100;
    fs::OpenOptions::new()
        .access_mode(FILE_WRITE_ATTRIBUTES)
        .open(path)
}

#[cfg(not(windows))]
fn open_for_times(path: &Path) -> std::io::Result<File> {
    File::open(path)
}

/// Mirror the whole tree under `src` into `dst`: every directory (empty ones
/// included) and every file, at the same relative path. Returns the number
/// of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(src, e))?;
        let target = dst.join(relative(src, entry.path())?);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else if entry.path().is_file() {
            copy_file(entry.path(), &target)?;
            count += 1;
        }
    }
    Ok(count)
}

/// Copy every regular file under `src` whose extension is in `extensions`
/// (case-insensitive, no leading dot) to the same relative path under `dst`.
/// Directories are only created when they receive a file. A missing `src`,
/// or one that is not a directory, copies nothing. Returns the number of files copied.
pub fn copy_matching_files(src: &Path, dst: &Path, extensions: &[&str]) -> Result<usize> {
    if !src.is_dir() {
        debug!(path = %src.display(), "source tree absent, nothing to copy");
        return Ok(0);
    }

    let mut count = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(src, e))?;
        let path = entry.path();
        if !path.is_file() || !has_extension(path, extensions) {
            continue;
        }

        let target = dst.join(relative(src, path)?);
        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }
        copy_file(path, &target)?;
        count += 1;
    }
    Ok(count)
}

/// Count regular files under `root` with one of `extensions`.
pub fn count_files_with_extension(root: &Path, extensions: &[&str]) -> Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.path().is_file() && has_extension(entry.path(), extensions) {
            count += 1;
        }
    }
    Ok(count)
}

/// Case-insensitive extension check; `extensions` carry no leading dot.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

fn relative<'a>(root: &Path, path: &'a Path) -> Result<&'a Path> {
    path.strip_prefix(root).map_err(|_| {
        KbDocsError::io(
            path,
            std::io::Error::other(format!("not under {}", root.display())),
        )
    })
}

fn walk_error(root: &Path, err: walkdir::Error) -> KbDocsError {
    let path = err
        .path()
        .map_or_else(|| root.to_path_buf(), PathBuf::from);
    KbDocsError::io(path, err.into())
}
