//! # File I/O Module
//!
//! Project file operations with safety features:
//! - **Atomic saves**: write to .tmp, fsync, rename to prevent corruption
//! - **File locking**: prevent concurrent edits on shared drives
//! - **Version validation**: ensure schema compatibility
//!
//! ## File Format
//!
//! Projects are saved as `.glz` files containing JSON. Lock files use
//! the `.glz.lock` extension with metadata about who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use glaze_core::file_io::{save_project, load_project, FileLock};
//! use glaze_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Estimator", "25-001", "Client");
//! let path = Path::new("site_a.glz");
//!
//! let lock = FileLock::acquire(path, "estimator@company.com").unwrap();
//! save_project(&project, path).unwrap();
//! drop(lock); // releases the lock
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{GlazeError, GlazeResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Lock metadata stored in .glz.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where the lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create lock info for the current process.
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both an OS-level lock (via fs2) for process safety and a .lock
/// file with metadata for user visibility on shared drives.
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a project file.
    ///
    /// Fails with `GlazeError::FileLocked` when another live process
    /// holds the lock; a stale lock (dead process, or older than a day)
    /// is taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> GlazeResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(GlazeError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| io_error("create lock", &lock_path, e))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            GlazeError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json =
            serde_json::to_string_pretty(&info).map_err(|e| GlazeError::SerializationError {
                reason: e.to_string(),
            })?;
        lock_file
            .write_all(lock_json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| io_error("write lock", &lock_path, e))?;

        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check whether a file is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if locked, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if !lock_path.exists() {
            return None;
        }
        match read_lock_info(&lock_path) {
            Ok(info) if !is_lock_stale(&info) => Some(info),
            _ => None,
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // OS lock is released when the handle drops
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn io_error(operation: &str, path: &Path, e: std::io::Error) -> GlazeError {
    GlazeError::file_error(operation, path.display().to_string(), e.to_string())
}

fn lock_path_for(project_path: &Path) -> PathBuf {
    let mut lock_path = project_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> GlazeResult<LockInfo> {
    let mut contents = String::new();
    File::open(lock_path)
        .and_then(|mut f| f.read_to_string(&mut contents))
        .map_err(|e| io_error("read lock", lock_path, e))?;

    serde_json::from_str(&contents).map_err(|e| GlazeError::SerializationError {
        reason: e.to_string(),
    })
}

/// A lock is stale when its process is gone (same machine) or it is more
/// than a day old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if hostname().is_some_and(|ours| info.machine == ours) {
        #[cfg(unix)]
        {
            if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                return true;
            }
        }
        #[cfg(windows)]
        {
            use std::process::Command;
            let output = Command::new("tasklist")
                .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                .output();
            if let Ok(output) = output {
                let stdout = String::from_utf8_lossy(&output.stdout);
                if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                    return true;
                }
            }
        }
    }

    (Utc::now() - info.locked_at).num_hours() > 24
}

/// Save a project to a file with atomic write semantics.
///
/// Serializes to JSON, writes a `.glz.tmp` sibling, fsyncs it, then
/// renames over the target - an interrupted save never corrupts an
/// existing file.
pub fn save_project(project: &Project, path: &Path) -> GlazeResult<()> {
    let json =
        serde_json::to_string_pretty(project).map_err(|e| GlazeError::SerializationError {
            reason: e.to_string(),
        })?;

    let tmp_path = path.with_extension("glz.tmp");

    let mut tmp_file =
        File::create(&tmp_path).map_err(|e| io_error("create temp file", &tmp_path, e))?;
    tmp_file
        .write_all(json.as_bytes())
        .and_then(|_| tmp_file.sync_all())
        .map_err(|e| io_error("write temp file", &tmp_path, e))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_error("rename to final", path, e)
    })?;

    Ok(())
}

/// Load a project from a `.glz` file, validating the schema version.
pub fn load_project(path: &Path) -> GlazeResult<Project> {
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut contents))
        .map_err(|e| io_error("read", path, e))?;

    let project: Project =
        serde_json::from_str(&contents).map_err(|e| GlazeError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&project.meta.version)?;
    Ok(project)
}

/// Load a project, also reporting whether another user holds the lock.
pub fn load_project_with_lock_check(path: &Path) -> GlazeResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

/// Major version must match; for 0.x the minor version must not be newer
/// than this build supports.
fn validate_version(file_version: &str) -> GlazeResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || GlazeError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}
