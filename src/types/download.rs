//! Download request type

use serde::{Deserialize, Serialize};

/// Options for downloading a markdown file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOptions {
    /// The filename for the downloaded file (without extension)
    pub filename: String,
    /// The markdown content to download
    pub content: String,
}

impl DownloadOptions {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Filename with the `.md` extension appended.
    pub fn file_name(&self) -> String {
        format!("{}.md", self.filename)
    }
}
