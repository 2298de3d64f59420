use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;
use crate::worker::FetchJob;

pub const CONTENT_EXTENSION: &str = "html";

/// Where a job's content lands, derived purely from the job row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Product folder as stored by the producer. May be relative.
    pub directory: PathBuf,
    pub filename: String,
}

/// Builds the placement of `job`: `{folder}/{correlation_id}_{timestamp}.html`.
pub fn build_placement(job: &FetchJob) -> Result<Placement, StorageError> {
    let invalid = |reason: &str| StorageError::InvalidPlacement {
        job_id: job.id,
        reason: reason.to_string(),
    };

    let directory = job
        .folder_path
        .as_deref()
        .map(str::trim)
        .filter(|folder| !folder.is_empty())
        .ok_or_else(|| invalid("product folder path is not set"))?;

    check_component(&job.correlation_id)
        .map_err(|reason| invalid(&format!("correlation id {}", reason)))?;
    check_component(&job.folder_timestamp)
        .map_err(|reason| invalid(&format!("folder timestamp {}", reason)))?;

    Ok(Placement {
        directory: PathBuf::from(directory),
        filename: format!(
            "{}_{}.{}",
            job.correlation_id, job.folder_timestamp, CONTENT_EXTENSION
        ),
    })
}

fn check_component(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("is empty");
    }
    if value.contains('/') || value.contains('\\') {
        return Err("contains a path separator");
    }
    if value == "." || value == ".." {
        return Err("is a relative directory name");
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    content_root: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(content_root: P) -> Self {
        Self {
            content_root: content_root.as_ref().to_path_buf(),
        }
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Final path for `placement`. Absolute folders are used as-is; relative
    /// ones keep their stored form when the root is the working directory.
    pub fn resolve(&self, placement: &Placement) -> PathBuf {
        self.directory_for(placement).join(&placement.filename)
    }

    fn directory_for(&self, placement: &Placement) -> PathBuf {
        let root = self.content_root.as_path();
        if root.as_os_str().is_empty() || root == Path::new(".") {
            placement.directory.clone()
        } else {
            root.join(&placement.directory)
        }
    }

    /// Writes `content` at `placement`, replacing any previous file.
    ///
    /// Bytes are staged in a temporary file inside the destination directory
    /// and renamed into place, so the named file is either the old content or
    /// the complete new content.
    pub fn write(&self, placement: &Placement, content: &[u8]) -> Result<PathBuf, StorageError> {
        let target = self.resolve(placement);
        let dir_path = self.directory_for(placement);
        self.ensure_directory(&dir_path)?;

        let mut staged = tempfile::Builder::new()
            .prefix(".pagefetch-")
            .suffix(".partial")
            .tempfile_in(&dir_path)
            .map_err(|e| StorageError::WriteFile {
                path: target.clone(),
                source: e,
            })?;

        staged
            .write_all(content)
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|e| StorageError::WriteFile {
                path: target.clone(),
                source: e,
            })?;

        staged.persist(&target).map_err(|e| StorageError::Persist {
            path: target.clone(),
            source: e.error,
        })?;

        debug!("Wrote {} bytes to {}", content.len(), target.display());
        Ok(target)
    }

    fn ensure_directory(&self, path: &Path) -> Result<(), StorageError> {
        if !path.is_dir() {
            std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }
}
