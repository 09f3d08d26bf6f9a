//! File download collaborator.
//!
//! [`DirectoryDownloader`] writes `<dir>/<filename>.md`. Content goes to a
//! temporary file in the target directory first and is renamed into place,
//! so a failed download never leaves a partial file behind: the temporary
//! file is removed on every error path when it is dropped.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use tracing::info;

use crate::types::DownloadOptions;
use crate::{MdmintError, Result};

/// MIME type of downloaded documents.
pub const MARKDOWN_MIME: &str = "text/markdown";

/// Produces a `.md` download from [`DownloadOptions`].
pub trait Downloader: Send + Sync {
    fn download(&self, options: &DownloadOptions) -> Result<()>;
}

/// Filename stem for a download made on `date`: `converted-YYYY-MM-DD`.
pub fn download_filename(date: NaiveDate) -> String {
    format!("converted-{}", date.format("%Y-%m-%d"))
}

/// Saves downloads into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `options` would be written.
    pub fn path_for(&self, options: &DownloadOptions) -> Result<PathBuf> {
        validate_filename(&options.filename)?;
        Ok(self.dir.join(options.file_name()))
    }
}

impl Downloader for DirectoryDownloader {
    fn download(&self, options: &DownloadOptions) -> Result<()> {
        let path = self.path_for(options)?;
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(options.content.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| MdmintError::Io(e.error))?;
        info!(
            path = %path.display(),
            mime = MARKDOWN_MIME,
            bytes = options.content.len(),
            "saved download"
        );
        Ok(())
    }
}

fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(MdmintError::InvalidInput(
            "download filename is empty".into(),
        ));
    }
    if filename.contains(['/', '\\']) || filename == "." || filename == ".." {
        return Err(MdmintError::InvalidInput(format!(
            "download filename must not contain a path: {filename:?}"
        )));
    }
    Ok(())
}
