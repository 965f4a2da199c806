//! ``src/fs/workdir.rs``
//!
//! The process working directory is shared by the whole host. The widget
//! resolves relative moves (`..`, a subdirectory name) by briefly switching
//! into its own tracked directory; [`AmbientDirGuard`] puts the previous
//! directory back when dropped, whichever way the caller leaves.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, MutexGuard, const_mutex};
use tracing::warn;

use crate::error::AppError;

/// Serializes every save/switch/restore sequence in the process.
static AMBIENT_DIR_LOCK: Mutex<()> = const_mutex(());

/// Holds the process inside `dir` until dropped.
#[must_use = "the previous working directory is restored when the guard drops"]
pub struct AmbientDirGuard {
    saved: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl AmbientDirGuard {
    pub fn enter(dir: &Path) -> Result<Self, AppError> {
        let lock = AMBIENT_DIR_LOCK.lock();
        let saved = env::current_dir()?;
        env::set_current_dir(dir)
            .map_err(|e| AppError::navigation_failed(dir, e.to_string()))?;
        Ok(Self { saved, _lock: lock })
    }
}

impl Drop for AmbientDirGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.saved) {
            warn!(
                "Could not restore working directory {}: {e}",
                self.saved.display()
            );
        }
    }
}

/// Absolute path reached by changing from `base` to `target` (`..`, a
/// child name, or an absolute path). The ambient directory is unchanged
/// afterwards, also on failure.
pub fn resolve_from(base: &Path, target: &Path) -> Result<PathBuf, AppError> {
    let _guard = AmbientDirGuard::enter(base)?;
    env::set_current_dir(target)
        .map_err(|e| AppError::navigation_failed(target, e.to_string()))?;
    Ok(env::current_dir()?)
}

/// `path` made absolute against the ambient working directory.
pub fn absolute(path: &Path) -> Result<PathBuf, AppError> {
    let _lock = AMBIENT_DIR_LOCK.lock();
    fs::canonicalize(path).map_err(|e| AppError::navigation_failed(path, e.to_string()))
}

/// `X:\` for drive letter `x`.
#[must_use]
pub fn drive_root(letter: char) -> PathBuf {
    PathBuf::from(format!("{}:\\", letter.to_ascii_uppercase()))
}

/// Current ambient working directory, read under the same lock the guards
/// use.
pub fn ambient_dir() -> Result<PathBuf, AppError> {
    let _lock = AMBIENT_DIR_LOCK.lock();
    Ok(env::current_dir()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_restores_ambient_dir() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().canonicalize().unwrap();
        fs::create_dir(base.join("child")).unwrap();

        let before = ambient_dir().unwrap();
        let child = resolve_from(&base, Path::new("child")).unwrap();
        assert_eq!(child, base.join("child"));
        assert_eq!(ambient_dir().unwrap(), before);

        let parent = resolve_from(&child, Path::new("..")).unwrap();
        assert_eq!(parent, base);
        assert_eq!(ambient_dir().unwrap(), before);
    }

    #[test]
    fn test_failure_restores_ambient_dir() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().canonicalize().unwrap();

        let before = ambient_dir().unwrap();
        let err = resolve_from(&base, Path::new("missing")).unwrap_err();
        assert!(matches!(err, AppError::NavigationFailed { .. }));
        assert_eq!(ambient_dir().unwrap(), before);

        assert!(resolve_from(&base.join("gone"), Path::new("..")).is_err());
        assert_eq!(ambient_dir().unwrap(), before);
    }

    #[test]
    fn test_absolute_and_drive_root() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().canonicalize().unwrap();
        assert_eq!(absolute(&base.join("x").join("..")).ok(), None);
        fs::create_dir(base.join("x")).unwrap();
        assert_eq!(absolute(&base.join("x").join("..")).unwrap(), base);
        assert_eq!(drive_root('c'), PathBuf::from("C:\\"));
    }
}
