//! Verify flow: check a piece of text against an anchored hash without an
//! image.

use super::{FlowError, SubmitState, Transition};
use crate::api::{ApiError, StegoGateway, Verification};

pub const VERIFY_INPUT_REQUIRED: &str = "Please provide both text and transaction hash";

pub const VERIFY_FAILED: &str = "Failed to verify text integrity";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyFlow {
    pub text: String,
    pub transaction_hash: String,
    pub state: SubmitState<Verification>,
}

#[derive(Debug, Clone)]
pub enum VerifyAction {
    SetText(String),
    SetTransactionHash(String),
    Submit,
    Resolved(Result<Verification, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyEffect {
    VerifyText {
        text: String,
        transaction_hash: String,
    },
}

impl VerifyEffect {
    pub async fn perform(self, gateway: &dyn StegoGateway) -> VerifyAction {
        match self {
            VerifyEffect::VerifyText {
                text,
                transaction_hash,
            } => VerifyAction::Resolved(gateway.verify_text(&text, &transaction_hash).await),
        }
    }
}

impl VerifyFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verdict to display; see [`ExtractFlow::verified`](super::ExtractFlow::verified).
    pub fn verified(&self) -> Option<bool> {
        match &self.state {
            SubmitState::Idle | SubmitState::Pending => None,
            SubmitState::Succeeded(v) => Some(v.verified),
            SubmitState::Failed(_) => Some(false),
        }
    }

    pub fn reduce(self, action: VerifyAction) -> Transition<Self, VerifyEffect> {
        match action {
            VerifyAction::SetText(text) => Transition::to(Self { text, ..self }),
            VerifyAction::SetTransactionHash(transaction_hash) => Transition::to(Self {
                transaction_hash,
                ..self
            }),
            VerifyAction::Submit => self.submit(),
            VerifyAction::Resolved(Ok(verification)) => Transition::to(Self {
                state: SubmitState::Succeeded(verification),
                ..self
            }),
            VerifyAction::Resolved(Err(err)) => Transition::to(Self {
                state: SubmitState::Failed(FlowError::from_api(&err, VERIFY_FAILED)),
                ..self
            }),
        }
    }

    fn submit(self) -> Transition<Self, VerifyEffect> {
        if self.state.is_pending() {
            return Transition::to(self);
        }
        let text = self.text.trim().to_string();
        let transaction_hash = self.transaction_hash.trim().to_string();
        if text.is_empty() || transaction_hash.is_empty() {
            return Transition::to(Self {
                state: SubmitState::Failed(FlowError::Validation(VERIFY_INPUT_REQUIRED.to_string())),
                ..self
            });
        }
        Transition::with_effect(
            Self {
                state: SubmitState::Pending,
                ..self
            },
            VerifyEffect::VerifyText {
                text,
                transaction_hash,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_inputs_issue_no_request() {
        let t = VerifyFlow::new()
            .reduce(VerifyAction::SetText("hello".into()))
            .state
            .reduce(VerifyAction::Submit);
        assert!(t.effect.is_none());
        assert_eq!(t.state.verified(), Some(false));
    }

    #[test]
    fn test_mismatch_is_successful_call_with_false_verdict() {
        let pending = VerifyFlow::new()
            .reduce(VerifyAction::SetText("hello".into()))
            .state
            .reduce(VerifyAction::SetTransactionHash("0xabc".into()))
            .state
            .reduce(VerifyAction::Submit);
        assert!(pending.effect.is_some());

        let done = pending
            .state
            .reduce(VerifyAction::Resolved(Ok(Verification {
                verified: false,
                message: Some("Text integrity verification failed".into()),
            })))
            .state;
        assert!(done.state.result().is_some());
        assert_eq!(done.verified(), Some(false));
    }
}
