use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

/// Advisory file lock serializing load-modify-save cycles on a board.
///
/// Uses flock (Unix) so two `tb` processes never interleave writes to the
/// page document. The `.lock` file is never unlinked: every process must
/// contend on the same inode, so only closing the descriptor releases it.
pub struct FileLock {
    _file: File,
    path: PathBuf,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not acquire lock on {path}: another tb process may be writing")]
    Timeout { path: PathBuf },
}

impl FileLock {
    /// Acquire an advisory lock on the board directory.
    /// Blocks up to `timeout` waiting for the lock.
    pub fn acquire(board_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let lock_path = board_dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LockError::CreateError {
                path: lock_path.clone(),
                source: e,
            })?;

        let start = Instant::now();
        loop {
            match try_lock(&file) {
                Ok(()) => {
                    debug!(path = %lock_path.display(), "acquired board lock");
                    return Ok(FileLock {
                        _file: file,
                        path: lock_path,
                    });
                }
                Err(_) if start.elapsed() < timeout => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => {
                    return Err(LockError::Timeout { path: lock_path });
                }
            }
        }
    }

    /// Acquire with default timeout (5 seconds)
    pub fn acquire_default(board_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(board_dir, Duration::from_secs(5))
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // flock is released when `_file` closes
        debug!(path = %self.path.display(), "released board lock");
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_release_reacquire() {
        let tmp = TempDir::new().unwrap();
        let lock = FileLock::acquire_default(tmp.path());
        assert!(lock.is_ok());
        drop(lock);
        assert!(FileLock::acquire_default(tmp.path()).is_ok());
    }

    #[test]
    #[cfg(unix)]
    fn test_lock_contention_times_out() {
        let tmp = TempDir::new().unwrap();
        let _held = FileLock::acquire_default(tmp.path()).unwrap();
        let second = FileLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Timeout { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn test_release_keeps_single_holder() {
        let tmp = TempDir::new().unwrap();
        let held = FileLock::acquire_default(tmp.path()).unwrap();

        // A waiter that opened the lock file while it was held
        let waiter = OpenOptions::new()
            .write(true)
            .open(tmp.path().join(".lock"))
            .unwrap();
        assert!(try_lock(&waiter).is_err());

        drop(held);
        assert!(tmp.path().join(".lock").exists());
        assert!(try_lock(&waiter).is_ok());

        // The waiter now holds it; nobody else may get in
        let third = FileLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(third, Err(LockError::Timeout { .. })));

        drop(waiter);
        assert!(FileLock::acquire(tmp.path(), Duration::from_millis(50)).is_ok());
    }

    #[test]
    fn test_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let result = FileLock::acquire_default(&tmp.path().join("nope"));
        assert!(matches!(result, Err(LockError::CreateError { .. })));
    }
}
