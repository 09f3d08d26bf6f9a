//! Conversion lifecycle state machine.
//!
//! ```text
//! Idle | Success | Failed  --begin-->    Pending
//! Pending                  --succeed-->  Success
//! Pending                  --fail-->     Failed
//! any                      --reset-->    Idle
//! ```
//!
//! `Pending` and `Failed` carry the text that was in the editor before the
//! optimistic update, so a failure can roll it back.

use crate::{MdmintError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConvertState {
    #[default]
    Idle,
    /// A conversion is running; `original` is the text it started from.
    Pending { original: String },
    /// The last conversion succeeded.
    Success { markdown: String },
    /// The last conversion failed; the editor was restored to `original`.
    Failed { original: String, error: String },
}

impl ConvertState {
    pub fn name(&self) -> &'static str {
        match self {
            ConvertState::Idle => "idle",
            ConvertState::Pending { .. } => "pending",
            ConvertState::Success { .. } => "success",
            ConvertState::Failed { .. } => "failed",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ConvertState::Pending { .. })
    }

    /// Start a conversion of `original`.
    pub fn begin(&mut self, original: String) -> Result<()> {
        if self.is_pending() {
            return Err(MdmintError::InvalidTransition {
                from: self.name(),
                to: "pending",
            });
        }
        *self = ConvertState::Pending { original };
        Ok(())
    }

    /// Settle a pending conversion successfully.
    pub fn succeed(&mut self, markdown: String) -> Result<()> {
        self.expect_pending("success")?;
        *self = ConvertState::Success { markdown };
        Ok(())
    }

    /// Settle a pending conversion as failed and return the text to restore.
    pub fn fail(&mut self, error: String) -> Result<String> {
        let original = match std::mem::take(self) {
            ConvertState::Pending { original } => original,
            other => {
                let from = other.name();
                *self = other;
                return Err(MdmintError::InvalidTransition { from, to: "failed" });
            }
        };
        *self = ConvertState::Failed {
            original: original.clone(),
            error,
        };
        Ok(original)
    }

    /// Return to `Idle` from any state.
    pub fn reset(&mut self) {
        *self = ConvertState::Idle;
    }

    fn expect_pending(&self, to: &'static str) -> Result<()> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(MdmintError::InvalidTransition {
                from: self.name(),
                to,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path() {
        let mut state = ConvertState::default();
        state.begin("raw".into()).unwrap();
        assert!(state.is_pending());
        state.succeed("# raw\n\nraw\n".into()).unwrap();
        assert_eq!(
            state,
            ConvertState::Success {
                markdown: "# raw\n\nraw\n".into()
            }
        );
    }

    #[test]
    fn failure_returns_original() {
        let mut state = ConvertState::default();
        state.begin("raw".into()).unwrap();
        let restored = state.fail("boom".into()).unwrap();
        assert_eq!(restored, "raw");
        assert_eq!(state.name(), "failed");
    }

    #[test]
    fn begin_while_pending_is_rejected() {
        let mut state = ConvertState::default();
        state.begin("a".into()).unwrap();
        let err = state.begin("b".into()).unwrap_err();
        assert!(matches!(
            err,
            MdmintError::InvalidTransition {
                from: "pending",
                to: "pending"
            }
        ));
        // Still pending on the first text.
        assert_eq!(
            state,
            ConvertState::Pending {
                original: "a".into()
            }
        );
    }

    #[test]
    fn settle_without_begin_is_rejected() {
        let mut state = ConvertState::default();
        assert!(state.succeed("x".into()).is_err());
        assert!(state.fail("x".into()).is_err());
        assert_eq!(state, ConvertState::Idle);
    }

    #[test]
    fn can_restart_after_settling() {
        let mut state = ConvertState::Failed {
            original: "a".into(),
            error: "e".into(),
        };
        state.begin("a".into()).unwrap();
        state.succeed("m".into()).unwrap();
        state.begin("m".into()).unwrap();
        assert!(state.is_pending());
        state.reset();
        assert_eq!(state, ConvertState::Idle);
    }
}
