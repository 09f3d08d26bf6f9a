//! Front-end controller.
//!
//! Everything a user interface needs around the conversion service: the
//! [`Workspace`] with its optimistic-update state machine, debounced draft
//! persistence, and the clipboard and download collaborators. Nothing here
//! is required to use [`ConversionService`](crate::ConversionService)
//! directly.

pub mod clipboard;
pub mod download;
pub mod draft;
pub mod state;
pub mod workspace;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use download::{DirectoryDownloader, Downloader, MARKDOWN_MIME, download_filename};
pub use draft::{
    DEFAULT_DEBOUNCE, DRAFT_KEY, DraftAutosaver, DraftStore, FileDraftStore, MemoryDraftStore,
};
pub use state::ConvertState;
pub use workspace::{COPIED_FEEDBACK, Workspace};
