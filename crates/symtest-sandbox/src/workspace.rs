//! Per-run scratch directory and cleanup of engine artifacts.
//!
//! The scratch directory lives under the project root so it can be mounted
//! next to it. [`ScratchDir`] owns it for the duration of one run and removes
//! it, together with instrumentation artifacts the engine leaves beside the
//! analysed sources, when closed or dropped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub const SCRATCH_DIR_NAME: &str = ".test-generator";
pub const DRIVER_FILE_NAME: &str = "test.js";
pub const LOG_FILE_NAME: &str = "inputs.json";
/// Instrumented copies are named `<file>_jalangi_.js` (plus source maps).
pub const ARTIFACT_MARKER: &str = "_jalangi_.js";

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> WorkspaceError + '_ {
    move |source| WorkspaceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// What a cleanup pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub artifacts_removed: usize,
    pub scratch_removed: bool,
}

/// Scratch directory guard for one run.
#[derive(Debug)]
pub struct ScratchDir {
    project_root: PathBuf,
    path: PathBuf,
    keep: bool,
    closed: bool,
}

impl ScratchDir {
    /// Create `<project_root>/.test-generator`, or reuse it if present.
    pub fn ensure(project_root: &Path) -> Result<Self, WorkspaceError> {
        let path = project_root.join(SCRATCH_DIR_NAME);
        if !path.is_dir() {
            fs::create_dir(&path).map_err(io_error(&path))?;
            debug!(path = %path.display(), "created scratch directory");
        }
        Ok(Self {
            project_root: project_root.to_path_buf(),
            path,
            keep: false,
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn driver_path(&self) -> PathBuf {
        self.path.join(DRIVER_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.path.join(LOG_FILE_NAME)
    }

    /// Leave the directory and artifacts in place when the guard goes away.
    pub fn set_keep(&mut self, keep: bool) {
        self.keep = keep;
    }

    /// Write the driver script and drop any log left by a previous run.
    pub fn write_driver(&self, script: &str) -> Result<PathBuf, WorkspaceError> {
        let driver = self.driver_path();
        fs::write(&driver, script).map_err(io_error(&driver))?;

        let log = self.log_path();
        match fs::remove_file(&log) {
            Ok(()) => debug!(path = %log.display(), "removed stale log"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(&log)(e)),
        }
        Ok(driver)
    }

    /// Contents of the driver log, or None if the engine never wrote one.
    pub fn read_log(&self) -> Result<Option<String>, WorkspaceError> {
        let log = self.log_path();
        match fs::read_to_string(&log) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&log)(e)),
        }
    }

    /// Remove artifacts and the scratch directory, reporting failures.
    /// Does nothing when the guard was told to keep them.
    pub fn close(mut self) -> Result<CleanupReport, WorkspaceError> {
        self.closed = true;
        if self.keep {
            return Ok(CleanupReport::default());
        }
        self.cleanup()
    }

    /// Both steps always run; the first failure is reported.
    fn cleanup(&self) -> Result<CleanupReport, WorkspaceError> {
        let artifacts = remove_artifacts(&self.project_root);
        let scratch = remove_scratch_dir(&self.path);
        Ok(CleanupReport {
            artifacts_removed: artifacts?,
            scratch_removed: scratch?,
        })
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.closed || self.keep {
            return;
        }
        if let Err(e) = self.cleanup() {
            warn!(error = %e, "scratch cleanup failed");
        }
    }
}

/// Recursively delete `dir`. Returns false if it did not exist.
pub fn remove_scratch_dir(dir: &Path) -> Result<bool, WorkspaceError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error(dir)(e)),
    }
}

pub fn is_artifact(file_name: &str) -> bool {
    file_name.contains(ARTIFACT_MARKER)
}

/// Delete every instrumentation artifact under `root`.
///
/// Hidden entries are skipped and symlinks are not followed. A matching
/// entry is unlinked whatever its type, so a directory carrying the marker
/// fails the walk.
pub fn remove_artifacts(root: &Path) -> Result<usize, WorkspaceError> {
    let mut removed = 0;
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(io_error(&dir)(e)),
        };

        for entry in entries {
            let entry = entry.map_err(io_error(&dir))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') {
                continue;
            }

            let path = entry.path();
            let file_type = entry.file_type().map_err(io_error(&path))?;
            if is_artifact(&name) {
                fs::remove_file(&path).map_err(io_error(&path))?;
                debug!(path = %path.display(), "removed artifact");
                removed += 1;
            } else if file_type.is_dir() {
                pending.push(path);
            }
        }
    }

    Ok(removed)
}
