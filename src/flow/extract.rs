//! Extract flow: recover hidden text and check it against the chain.
//!
//! Verification is a separate axis from call success. An extraction that
//! comes back with `verified=false` is a successful call whose outcome is
//! rendered as a failure.

use super::{FlowError, SubmitState, Transition, PNG_REQUIRED};
use crate::api::{ApiError, Extraction, StegoGateway};
use crate::upload::ImageFile;

/// Shown when the image or the transaction hash is missing.
pub const EXTRACT_INPUT_REQUIRED: &str = "Please provide both an image and transaction hash";

/// Fallback when the backend gives no reason.
pub const EXTRACT_FAILED: &str = "Failed to extract text from image";

/// Shown next to text whose hash does not match the anchored one.
pub const TAMPER_WARNING: &str =
    "The text may have been tampered with or the transaction hash is incorrect.";

/// Form and result of the extract flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractFlow {
    pub image: Option<ImageFile>,
    pub transaction_hash: String,
    pub state: SubmitState<Extraction>,
}

#[derive(Debug, Clone)]
pub enum ExtractAction {
    SelectFile(ImageFile),
    RejectFile(String),
    SetTransactionHash(String),
    Submit,
    Resolved(Result<Extraction, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractEffect {
    ExtractText {
        image: ImageFile,
        transaction_hash: String,
    },
}

impl ExtractEffect {
    /// Performs the request and returns the action that resolves it.
    pub async fn perform(self, gateway: &dyn StegoGateway) -> ExtractAction {
        match self {
            ExtractEffect::ExtractText {
                image,
                transaction_hash,
            } => ExtractAction::Resolved(gateway.extract_text(&image, &transaction_hash).await),
        }
    }
}

/// What the result area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractPanel<'a> {
    /// Text recovered and its hash matches.
    Verified { text: &'a str },
    /// Failure-styled: the text (when the backend returned it) does not
    /// match the anchored hash.
    Tampered {
        text: Option<&'a str>,
        detail: Option<&'a str>,
    },
    /// Validation, transport or backend failure.
    Error { message: &'a str },
}

impl ExtractFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_submit(&self) -> bool {
        !self.state.is_pending()
            && self.image.is_some()
            && !self.transaction_hash.trim().is_empty()
    }

    /// Verification verdict to display. Unknown while idle or pending, so
    /// a previous verdict never survives into a new attempt.
    pub fn verified(&self) -> Option<bool> {
        match &self.state {
            SubmitState::Idle | SubmitState::Pending => None,
            SubmitState::Succeeded(extraction) => Some(extraction.verified),
            SubmitState::Failed(_) => Some(false),
        }
    }

    /// The result panel for the current state, if any.
    pub fn panel(&self) -> Option<ExtractPanel<'_>> {
        match &self.state {
            SubmitState::Idle | SubmitState::Pending => None,
            SubmitState::Succeeded(e) if e.verified => Some(ExtractPanel::Verified { text: &e.text }),
            SubmitState::Succeeded(e) => Some(ExtractPanel::Tampered {
                text: Some(e.text.as_str()),
                detail: e.message.as_deref(),
            }),
            SubmitState::Failed(FlowError::Integrity { message }) => Some(ExtractPanel::Tampered {
                text: None,
                detail: Some(message.as_str()),
            }),
            SubmitState::Failed(err) => Some(ExtractPanel::Error {
                message: err.message(),
            }),
        }
    }

    pub fn reduce(self, action: ExtractAction) -> Transition<Self, ExtractEffect> {
        match action {
            // The in-flight request already owns its image.
            ExtractAction::SelectFile(_) | ExtractAction::RejectFile(_)
                if self.state.is_pending() =>
            {
                Transition::to(self)
            }
            ExtractAction::SelectFile(file) if !file.is_png() => Transition::to(Self {
                state: SubmitState::Failed(FlowError::Validation(PNG_REQUIRED.to_string())),
                ..self
            }),
            ExtractAction::SelectFile(file) => {
                let state = match self.state {
                    SubmitState::Failed(FlowError::Validation(_)) => SubmitState::Idle,
                    other => other,
                };
                Transition::to(Self {
                    image: Some(file),
                    state,
                    ..self
                })
            }
            ExtractAction::RejectFile(reason) => Transition::to(Self {
                state: SubmitState::Failed(FlowError::Validation(reason)),
                ..self
            }),
            ExtractAction::SetTransactionHash(transaction_hash) => Transition::to(Self {
                transaction_hash,
                ..self
            }),
            ExtractAction::Submit => self.submit(),
            ExtractAction::Resolved(Ok(extraction)) => Transition::to(Self {
                state: SubmitState::Succeeded(extraction),
                ..self
            }),
            ExtractAction::Resolved(Err(err)) => Transition::to(Self {
                state: SubmitState::Failed(FlowError::from_api(&err, EXTRACT_FAILED)),
                ..self
            }),
        }
    }

    fn submit(self) -> Transition<Self, ExtractEffect> {
        if self.state.is_pending() {
            return Transition::to(self);
        }
        let transaction_hash = self.transaction_hash.trim().to_string();
        let image = match self.image.clone() {
            Some(image) if image.is_png() && !transaction_hash.is_empty() => image,
            _ => {
                return Transition::to(Self {
                    state: SubmitState::Failed(FlowError::Validation(
                        EXTRACT_INPUT_REQUIRED.to_string(),
                    )),
                    ..self
                })
            }
        };
        Transition::with_effect(
            Self {
                state: SubmitState::Pending,
                ..self
            },
            ExtractEffect::ExtractText {
                image,
                transaction_hash,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> ImageFile {
        ImageFile::new("a.png", "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    fn ready(hash: &str) -> ExtractFlow {
        ExtractFlow::new()
            .reduce(ExtractAction::SelectFile(png()))
            .state
            .reduce(ExtractAction::SetTransactionHash(hash.into()))
            .state
    }

    fn extraction(text: &str, verified: bool) -> Extraction {
        Extraction {
            text: text.into(),
            verified,
            message: None,
        }
    }

    #[test]
    fn test_missing_image_issues_no_request() {
        let t = ExtractFlow::new()
            .reduce(ExtractAction::SetTransactionHash("0xdead".into()))
            .state
            .reduce(ExtractAction::Submit);
        assert!(t.effect.is_none());
        assert_eq!(
            t.state.panel(),
            Some(ExtractPanel::Error {
                message: EXTRACT_INPUT_REQUIRED
            })
        );
    }

    #[test]
    fn test_submit_sends_trimmed_hash() {
        let t = ready(" 0xdead ").reduce(ExtractAction::Submit);
        assert_eq!(
            t.effect,
            Some(ExtractEffect::ExtractText {
                image: png(),
                transaction_hash: "0xdead".into()
            })
        );
        assert_eq!(t.state.verified(), None);
    }

    #[test]
    fn test_verified_false_renders_tampered_panel() {
        let done = ready("0xdead")
            .reduce(ExtractAction::Submit)
            .state
            .reduce(ExtractAction::Resolved(Ok(extraction("secret", false))))
            .state;
        assert_eq!(done.verified(), Some(false));
        assert_eq!(
            done.panel(),
            Some(ExtractPanel::Tampered {
                text: Some("secret"),
                detail: None
            })
        );
    }

    #[test]
    fn test_verified_true_renders_verified_panel() {
        let done = ready("0xbeef")
            .reduce(ExtractAction::Submit)
            .state
            .reduce(ExtractAction::Resolved(Ok(extraction("secret", true))))
            .state;
        assert_eq!(done.verified(), Some(true));
        assert_eq!(done.panel(), Some(ExtractPanel::Verified { text: "secret" }));
    }

    #[test]
    fn test_integrity_error_status_is_tampered_not_transport() {
        let err = ApiError::Backend {
            status: Some(409),
            message: "Text integrity verification failed".into(),
            verified: Some(false),
        };
        let done = ready("0xdead")
            .reduce(ExtractAction::Submit)
            .state
            .reduce(ExtractAction::Resolved(Err(err)))
            .state;
        assert_eq!(
            done.panel(),
            Some(ExtractPanel::Tampered {
                text: None,
                detail: Some("Text integrity verification failed")
            })
        );
    }

    #[test]
    fn test_retry_clears_stale_verdict() {
        let done = ready("0xbeef")
            .reduce(ExtractAction::Submit)
            .state
            .reduce(ExtractAction::Resolved(Ok(extraction("secret", true))))
            .state;
        let retry = done.reduce(ExtractAction::Submit);
        assert!(retry.effect.is_some());
        assert_eq!(retry.state.verified(), None);
        assert!(retry.state.panel().is_none());
    }

    #[test]
    fn test_file_rejection_while_pending_keeps_request_guard() {
        let pending = ready("0xdead").reduce(ExtractAction::Submit).state;
        let other = ImageFile::new("b.png", "image/png", vec![0x89]);
        let t = pending
            .reduce(ExtractAction::RejectFile("No such file".into()))
            .state
            .reduce(ExtractAction::SelectFile(other))
            .state
            .reduce(ExtractAction::Submit);
        assert!(t.effect.is_none());
        assert!(t.state.state.is_pending());
        assert_eq!(t.state.image, Some(png()));
    }

    #[test]
    fn test_transport_failure_resets_verdict_to_false() {
        let done = ready("0xbeef")
            .reduce(ExtractAction::Submit)
            .state
            .reduce(ExtractAction::Resolved(Err(ApiError::Transport("timeout".into()))))
            .state;
        assert_eq!(done.verified(), Some(false));
        assert_eq!(
            done.panel(),
            Some(ExtractPanel::Error {
                message: EXTRACT_FAILED
            })
        );
    }
}
