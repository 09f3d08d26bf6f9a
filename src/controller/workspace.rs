//! Headless editor workspace.
//!
//! [`Workspace`] models the conversion page: an editable input, the last
//! converted markdown, and the actions around them. Conversions are
//! optimistic. [`begin_convert`](Workspace::begin_convert) swaps the input
//! for a locally rendered preview and remembers the original text;
//! [`finish_convert`](Workspace::finish_convert) either confirms the result
//! or rolls the input back.
//!
//! A pending conversion locks the input: edits and a second conversion are
//! refused with [`MdmintError::Busy`] until it settles.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::clipboard::Clipboard;
use super::download::{Downloader, download_filename};
use super::draft::DraftAutosaver;
use super::state::ConvertState;
use crate::convert::to_markdown;
use crate::traits::ConversionGateway;
use crate::types::{ConversionInput, ConversionResponse, DownloadOptions};
use crate::{MdmintError, Result};

/// How long the "copied" indicator stays on after a copy.
pub const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

const STATUS_DONE: &str = "Conversion complete";
const STATUS_WAITING: &str = "Markdown output will appear after conversion";

pub struct Workspace {
    gateway: Arc<dyn ConversionGateway>,
    input: String,
    converted: String,
    state: ConvertState,
    copied_at: Option<Instant>,
    drafts: Option<DraftAutosaver>,
}

impl Workspace {
    pub fn new(gateway: Arc<dyn ConversionGateway>) -> Self {
        Self {
            gateway,
            input: String::new(),
            converted: String::new(),
            state: ConvertState::Idle,
            copied_at: None,
            drafts: None,
        }
    }

    /// Attach a draft autosaver, restoring any saved draft into the input.
    pub fn with_drafts(mut self, drafts: DraftAutosaver) -> Self {
        if let Some(draft) = drafts.load() {
            debug!(chars = draft.chars().count(), "restored draft");
            self.input = draft;
        }
        self.drafts = Some(drafts);
        self
    }

    /// Workspace for a one-shot conversion.
    ///
    /// Non-blank `text` is loaded as-is and `drafts` is not attached, so the
    /// saved draft is neither overwritten nor cleared. Otherwise the saved
    /// draft is restored and the autosaver attached; converting it then
    /// clears it.
    pub fn open(
        gateway: Arc<dyn ConversionGateway>,
        text: Option<String>,
        drafts: DraftAutosaver,
    ) -> Self {
        let workspace = Self::new(gateway);
        match text.filter(|t| !t.trim().is_empty()) {
            Some(text) => Self {
                input: text,
                ..workspace
            },
            None => workspace.with_drafts(drafts),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Markdown from the last successful conversion (empty if none).
    pub fn converted(&self) -> &str {
        &self.converted
    }

    pub fn state(&self) -> &ConvertState {
        &self.state
    }

    pub fn drafts(&self) -> Option<&DraftAutosaver> {
        self.drafts.as_ref()
    }

    /// Replace the input text. Refused while a conversion is pending.
    pub fn set_input(&mut self, text: impl Into<String>) -> Result<()> {
        if self.state.is_pending() {
            return Err(MdmintError::Busy);
        }
        self.input = text.into();
        if let Some(drafts) = &self.drafts {
            drafts.schedule(self.input.clone());
        }
        Ok(())
    }

    /// Start a conversion of the current input.
    ///
    /// Returns the request to send, or `None` when the input is blank. The
    /// input is replaced with a preview until the conversion settles.
    pub fn begin_convert(&mut self) -> Result<Option<ConversionInput>> {
        if self.state.is_pending() {
            return Err(MdmintError::Busy);
        }
        if self.input.trim().is_empty() {
            return Ok(None);
        }
        let original = std::mem::take(&mut self.input);
        self.input = to_markdown(&original);
        let request = ConversionInput::new(original.clone());
        self.state.begin(original)?;
        Ok(Some(request))
    }

    /// Settle the pending conversion with `response`.
    ///
    /// Success makes the markdown both the input and the output. Failure
    /// restores the original input and leaves the previous output alone.
    pub fn finish_convert(&mut self, response: &ConversionResponse) -> Result<()> {
        if response.success {
            self.state.succeed(response.markdown.clone())?;
            self.input = response.markdown.clone();
            self.converted = response.markdown.clone();
            if let Some(drafts) = &self.drafts {
                drafts.clear();
            }
        } else {
            let error = response
                .error
                .clone()
                .unwrap_or_else(|| "conversion failed".to_string());
            warn!(error = %error, "conversion failed, restoring input");
            self.input = self.state.fail(error)?;
        }
        Ok(())
    }

    /// Convert the current input through the gateway.
    ///
    /// Returns the response, or `None` when the input was blank.
    pub async fn convert(&mut self) -> Result<Option<ConversionResponse>> {
        let Some(request) = self.begin_convert()? else {
            return Ok(None);
        };
        let response = self.gateway.convert_text(&request).await;
        self.finish_convert(&response)?;
        Ok(Some(response))
    }

    /// Put the pre-conversion text back and return to `Idle`.
    ///
    /// Applies to a pending conversion whose result will never be settled
    /// (its future was dropped) and to a failed one. Returns whether
    /// anything was rolled back.
    pub fn rollback(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            ConvertState::Pending { original } | ConvertState::Failed { original, .. } => {
                self.input = original;
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Empty the input and output and forget the draft.
    pub fn clear(&mut self) -> Result<()> {
        if self.state.is_pending() {
            return Err(MdmintError::Busy);
        }
        self.input.clear();
        self.converted.clear();
        self.state.reset();
        self.copied_at = None;
        if let Some(drafts) = &self.drafts {
            drafts.clear();
        }
        Ok(())
    }

    /// Copy the converted markdown to `clipboard`.
    ///
    /// Returns whether anything was copied. Clipboard failures are logged
    /// and leave the workspace unchanged.
    pub async fn copy(&mut self, clipboard: &dyn Clipboard) -> bool {
        if self.converted.is_empty() {
            return false;
        }
        match clipboard.write_text(&self.converted).await {
            Ok(()) => {
                self.copied_at = Some(Instant::now());
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to copy");
                false
            }
        }
    }

    /// Whether the "copied" indicator should currently show.
    pub fn show_copied(&self) -> bool {
        self.copied_at
            .is_some_and(|at| at.elapsed() < COPIED_FEEDBACK)
    }

    /// The download a user would get on `date`, if there is output.
    pub fn download_options(&self, date: NaiveDate) -> Option<DownloadOptions> {
        if self.converted.is_empty() {
            return None;
        }
        Some(DownloadOptions::new(
            download_filename(date),
            self.converted.clone(),
        ))
    }

    /// Hand the converted markdown to `downloader`.
    ///
    /// Returns whether a download was produced.
    pub fn download(&self, downloader: &dyn Downloader, date: NaiveDate) -> Result<bool> {
        let Some(options) = self.download_options(date) else {
            return Ok(false);
        };
        downloader.download(&options)?;
        Ok(true)
    }

    /// Length of the input in characters.
    pub fn character_count(&self) -> usize {
        self.input.chars().count()
    }

    pub fn status_line(&self) -> &'static str {
        if self.converted.is_empty() {
            STATUS_WAITING
        } else {
            STATUS_DONE
        }
    }

    pub fn can_convert(&self) -> bool {
        !self.input.trim().is_empty() && !self.state.is_pending()
    }

    pub fn can_copy(&self) -> bool {
        !self.converted.is_empty()
    }

    pub fn can_clear(&self) -> bool {
        !self.input.trim().is_empty() || !self.converted.is_empty()
    }
}
