//! Client-side flows as pure state machines.
//!
//! Each flow is an owned value that a reducer consumes together with an
//! action and turns into the next state plus, at most, one gateway call to
//! perform. A transition without an effect issued no request, so local
//! validation never reaches the network.
//!
//! Drivers (the CLI commands and the terminal UI) perform the effect with
//! [`StegoGateway`](crate::api::StegoGateway) and feed the outcome back as
//! a `Resolved` action. There is no cancellation: whichever response is
//! applied last wins.

mod cache;
pub mod extract;
pub mod hide;
pub mod records;
pub mod verify;

pub use cache::RecordCache;
pub use extract::{ExtractAction, ExtractEffect, ExtractFlow, ExtractPanel};
pub use hide::{HideAction, HideEffect, HideFlow};
pub use records::{RecordsAction, RecordsBrowser, RecordsEffect};
pub use verify::{VerifyAction, VerifyEffect, VerifyFlow};

use crate::api::ApiError;

/// Shown when a non-PNG file is selected.
pub const PNG_REQUIRED: &str = "Please select a PNG image file";

/// Lifecycle of a submit-style flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(FlowError),
}

impl<T> Default for SubmitState<T> {
    fn default() -> Self {
        SubmitState::Idle
    }
}

impl<T> SubmitState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmitState::Pending)
    }

    /// The successful result, if any.
    pub fn result(&self) -> Option<&T> {
        match self {
            SubmitState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&FlowError> {
        match self {
            SubmitState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Why a flow ended up failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Local input problem; no request was sent.
    Validation(String),
    /// No usable response from the backend.
    Transport(String),
    /// The backend rejected the request.
    Backend(String),
    /// The extracted text does not match the anchored hash.
    Integrity { message: String },
}

impl FlowError {
    /// Maps a gateway error to a flow error, keeping the backend message
    /// when there is one and using `fallback` otherwise.
    pub fn from_api(err: &ApiError, fallback: &str) -> Self {
        if err.is_integrity_failure() {
            FlowError::Integrity {
                message: err.user_message(fallback),
            }
        } else if err.is_transport() {
            FlowError::Transport(fallback.to_string())
        } else {
            FlowError::Backend(err.user_message(fallback))
        }
    }

    /// Text to display inline.
    pub fn message(&self) -> &str {
        match self {
            FlowError::Validation(m) | FlowError::Transport(m) | FlowError::Backend(m) => m,
            FlowError::Integrity { message } => message,
        }
    }
}

/// Next state of a flow and the gateway call it requests, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub state: S,
    pub effect: Option<E>,
}

impl<S, E> Transition<S, E> {
    /// A transition that performs no request.
    pub fn to(state: S) -> Self {
        Self {
            state,
            effect: None,
        }
    }

    /// A transition that asks the driver to perform `effect`.
    pub fn with_effect(state: S, effect: E) -> Self {
        Self {
            state,
            effect: Some(effect),
        }
    }

    /// Splits the transition into its parts.
    pub fn into_parts(self) -> (S, Option<E>) {
        (self.state, self.effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_transport_uses_fallback() {
        let err = ApiError::Transport("connection refused".into());
        assert_eq!(
            FlowError::from_api(&err, "Failed to hide text in image"),
            FlowError::Transport("Failed to hide text in image".into())
        );
    }

    #[test]
    fn test_from_api_backend_keeps_message() {
        let err = ApiError::Backend {
            status: Some(400),
            message: "Image too small".into(),
            verified: None,
        };
        assert_eq!(
            FlowError::from_api(&err, "fallback"),
            FlowError::Backend("Image too small".into())
        );
    }

    #[test]
    fn test_from_api_integrity() {
        let err = ApiError::Backend {
            status: Some(409),
            message: "Text integrity verification failed".into(),
            verified: Some(false),
        };
        assert!(matches!(
            FlowError::from_api(&err, "fallback"),
            FlowError::Integrity { .. }
        ));
    }

    #[test]
    fn test_submit_state_accessors() {
        let state: SubmitState<u8> = SubmitState::Succeeded(7);
        assert_eq!(state.result(), Some(&7));
        assert!(state.error().is_none());
        assert!(!state.is_pending());
    }
}
