//! Shared helpers for filterlog tests.
//!
//! The environment helpers centralise the unsafe interactions with `std::env`
//! so individual tests stay focused on their assertions while the environment
//! is restored even when a test panics. [`SharedBuffer`] is a cloneable
//! in-memory writer that lets a test hand a sink to a logger and still read
//! what was written.

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Global mutex guarding environment mutations performed by tests.
///
/// Acquire it with [`lock_env`] before creating [`EnvGuard`]s so tests running
/// in parallel threads never observe each other's overrides.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Locks [`ENV_LOCK`], recovering from a poisoned lock left by a failed test.
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scoped helper that applies an environment change and restores the previous
/// value when dropped.
#[derive(Debug)]
pub struct EnvGuard {
    key: OsString,
    previous: Option<OsString>,
}

impl EnvGuard {
    /// Sets `key` to `value` for the duration of the guard.
    #[allow(unsafe_code)]
    pub fn set(key: &str, value: &str) -> Self {
        let key_os = OsString::from(key);
        let previous = env::var_os(&key_os);
        // SAFETY: callers hold ENV_LOCK, so no other test thread touches the
        // environment concurrently.
        unsafe {
            env::set_var(&key_os, value);
        }
        Self {
            key: key_os,
            previous,
        }
    }

    /// Removes `key` for the duration of the guard.
    #[allow(unsafe_code)]
    pub fn remove(key: &str) -> Self {
        let key_os = OsString::from(key);
        let previous = env::var_os(&key_os);
        // SAFETY: see `EnvGuard::set`.
        unsafe {
            env::remove_var(&key_os);
        }
        Self {
            key: key_os,
            previous,
        }
    }
}

#[allow(unsafe_code)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: see `EnvGuard::set`.
        if let Some(ref value) = self.previous {
            unsafe {
                env::set_var(&self.key, value);
            }
        } else {
            unsafe {
                env::remove_var(&self.key);
            }
        }
    }
}

/// Cloneable writer collecting everything written to it in memory.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected output as UTF-8 text (lossy).
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Returns the collected output split into lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes `contents` to `name` inside `dir` and returns the full path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write test file");
    path
}

/// Creates a temporary directory holding a config file with `contents`.
///
/// The directory is removed when the returned [`tempfile::TempDir`] drops.
pub fn temp_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_file(dir.path(), "app.conf", contents);
    (dir, path)
}
