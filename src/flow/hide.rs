//! Hide flow: pick a PNG, enter text, anchor it.

use super::{FlowError, SubmitState, Transition, PNG_REQUIRED};
use crate::api::{ApiError, StegoGateway};
use crate::record::SteganographyRecord;
use crate::upload::ImageFile;

/// Shown when the image or the text is missing.
pub const HIDE_INPUT_REQUIRED: &str = "Please provide both an image and text to hide";

/// Fallback when the backend gives no reason.
pub const HIDE_FAILED: &str = "Failed to hide text in image";

/// Form and result of the hide flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HideFlow {
    /// Selected image; only PNGs are ever stored here.
    pub image: Option<ImageFile>,
    /// Text to hide, as typed.
    pub text: String,
    pub state: SubmitState<SteganographyRecord>,
}

/// Inputs to the hide reducer.
#[derive(Debug, Clone)]
pub enum HideAction {
    SelectFile(ImageFile),
    /// The picked file could not be read.
    RejectFile(String),
    SetText(String),
    Submit,
    Resolved(Result<SteganographyRecord, ApiError>),
}

/// The request the hide flow asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HideEffect {
    HideText { image: ImageFile, text: String },
}

impl HideEffect {
    /// Performs the request and returns the action that resolves it.
    pub async fn perform(self, gateway: &dyn StegoGateway) -> HideAction {
        match self {
            HideEffect::HideText { image, text } => {
                HideAction::Resolved(gateway.hide_text(&image, &text).await)
            }
        }
    }
}

impl HideFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a submit would pass local validation.
    pub fn can_submit(&self) -> bool {
        !self.state.is_pending() && self.image.is_some() && !self.text.trim().is_empty()
    }

    pub fn reduce(self, action: HideAction) -> Transition<Self, HideEffect> {
        match action {
            // The in-flight request already owns its image.
            HideAction::SelectFile(_) | HideAction::RejectFile(_) if self.state.is_pending() => {
                Transition::to(self)
            }
            HideAction::SelectFile(file) if !file.is_png() => Transition::to(Self {
                state: SubmitState::Failed(FlowError::Validation(PNG_REQUIRED.to_string())),
                ..self
            }),
            HideAction::SelectFile(file) => {
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
            HideAction::RejectFile(reason) => Transition::to(Self {
                state: SubmitState::Failed(FlowError::Validation(reason)),
                ..self
            }),
            HideAction::SetText(text) => Transition::to(Self { text, ..self }),
            HideAction::Submit => self.submit(),
            HideAction::Resolved(Ok(record)) => Transition::to(Self {
                image: None,
                text: String::new(),
                state: SubmitState::Succeeded(record),
            }),
            HideAction::Resolved(Err(err)) => Transition::to(Self {
                state: SubmitState::Failed(FlowError::from_api(&err, HIDE_FAILED)),
                ..self
            }),
        }
    }

    fn submit(self) -> Transition<Self, HideEffect> {
        if self.state.is_pending() {
            return Transition::to(self);
        }
        let text = self.text.trim().to_string();
        let image = match self.image.clone() {
            Some(image) if image.is_png() && !text.is_empty() => image,
            _ => {
                return Transition::to(Self {
                    state: SubmitState::Failed(FlowError::Validation(
                        HIDE_INPUT_REQUIRED.to_string(),
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
            HideEffect::HideText { image, text },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordStatus;

    fn png() -> ImageFile {
        ImageFile::new("a.png", "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    fn record(tx: &str) -> SteganographyRecord {
        SteganographyRecord {
            id: "1".into(),
            file_name: "stego_a.png".into(),
            original_file_name: "a.png".into(),
            text_hash: "2cf24d".into(),
            transaction_hash: tx.into(),
            blockchain_address: "0x1111".into(),
            status: RecordStatus::Completed,
            created_at: "2024-03-01T10:15:30".into(),
        }
    }

    fn ready(text: &str) -> HideFlow {
        HideFlow::new()
            .reduce(HideAction::SelectFile(png()))
            .state
            .reduce(HideAction::SetText(text.into()))
            .state
    }

    #[test]
    fn test_submit_without_file_issues_no_request() {
        let t = HideFlow::new()
            .reduce(HideAction::SetText("hello".into()))
            .state
            .reduce(HideAction::Submit);
        assert!(t.effect.is_none());
        assert_eq!(
            t.state.state,
            SubmitState::Failed(FlowError::Validation(HIDE_INPUT_REQUIRED.into()))
        );
    }

    #[test]
    fn test_blank_text_issues_no_request() {
        let t = ready("   ").reduce(HideAction::Submit);
        assert!(t.effect.is_none());
        assert!(matches!(t.state.state, SubmitState::Failed(FlowError::Validation(_))));
    }

    #[test]
    fn test_non_png_is_rejected_and_previous_file_kept() {
        let jpeg = ImageFile::new("a.jpg", "image/jpeg", vec![1]);
        let t = ready("hello").reduce(HideAction::SelectFile(jpeg));
        assert_eq!(t.state.image, Some(png()));
        assert_eq!(
            t.state.state,
            SubmitState::Failed(FlowError::Validation(PNG_REQUIRED.into()))
        );

        let t = t.state.reduce(HideAction::SelectFile(png()));
        assert_eq!(t.state.state, SubmitState::Idle);
    }

    #[test]
    fn test_submit_trims_text_and_goes_pending() {
        let t = ready("  hello  ").reduce(HideAction::Submit);
        assert_eq!(t.state.state, SubmitState::Pending);
        assert_eq!(
            t.effect,
            Some(HideEffect::HideText {
                image: png(),
                text: "hello".into()
            })
        );
    }

    #[test]
    fn test_success_clears_form() {
        let pending = ready("hello").reduce(HideAction::Submit).state;
        let done = pending.reduce(HideAction::Resolved(Ok(record("0xabc")))).state;
        assert!(done.image.is_none());
        assert!(done.text.is_empty());
        assert_eq!(done.state.result().unwrap().transaction_hash, "0xabc");
    }

    #[test]
    fn test_resubmit_clears_previous_result() {
        let done = ready("hello")
            .reduce(HideAction::Submit)
            .state
            .reduce(HideAction::Resolved(Ok(record("0xabc"))))
            .state;
        let again = done
            .reduce(HideAction::SelectFile(png()))
            .state
            .reduce(HideAction::SetText("again".into()))
            .state
            .reduce(HideAction::Submit);
        assert_eq!(again.state.state, SubmitState::Pending);
        assert!(again.state.state.result().is_none());
        assert!(again.effect.is_some());
    }

    #[test]
    fn test_submit_while_pending_is_ignored() {
        let pending = ready("hello").reduce(HideAction::Submit).state;
        let t = pending.reduce(HideAction::Submit);
        assert!(t.effect.is_none());
        assert!(t.state.state.is_pending());
    }

    #[test]
    fn test_file_rejection_while_pending_keeps_request_guard() {
        let pending = ready("hello").reduce(HideAction::Submit).state;
        let t = pending
            .reduce(HideAction::RejectFile("No such file".into()))
            .state
            .reduce(HideAction::SelectFile(ImageFile::new("a.jpg", "image/jpeg", vec![1])))
            .state
            .reduce(HideAction::Submit);
        assert!(t.effect.is_none());
        assert!(t.state.state.is_pending());
        assert_eq!(t.state.image, Some(png()));
    }

    #[test]
    fn test_failure_keeps_form_for_retry() {
        let pending = ready("hello").reduce(HideAction::Submit).state;
        let failed = pending
            .reduce(HideAction::Resolved(Err(ApiError::Transport("refused".into()))))
            .state;
        assert_eq!(
            failed.state,
            SubmitState::Failed(FlowError::Transport(HIDE_FAILED.into()))
        );
        assert!(failed.can_submit());
        assert!(failed.reduce(HideAction::Submit).effect.is_some());
    }
}
