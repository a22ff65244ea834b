//! # Stegchain - terminal client for a PNG steganography service
//!
//! Stegchain talks to a backend that hides text in PNG images and anchors
//! the SHA-256 digest of that text on a blockchain. The client itself does
//! no pixel work, no hashing and no chain interaction: it validates input,
//! calls the backend over HTTP and renders what comes back.
//!
//! ## Overview
//!
//! - **Hide**: upload a PNG and a text; the backend returns the record of
//!   the anchoring transaction.
//! - **Extract**: upload a steganographic PNG and the transaction hash; the
//!   backend returns the hidden text and whether it still matches the
//!   anchored hash.
//! - **Records**: browse every operation and look one up by transaction
//!   hash.
//!
//! Every flow is a pure reducer (see [`flow`]) driven either by a one-shot
//! CLI command or by the tabbed terminal UI.
//!
//! ## Example Usage
//!
//! ```rust
//! use stegchain::flow::{HideAction, HideFlow, SubmitState};
//! use stegchain::upload::ImageFile;
//!
//! let image = ImageFile::new("a.png", "image/png", vec![0x89, b'P', b'N', b'G']);
//! let transition = HideFlow::new()
//!     .reduce(HideAction::SelectFile(image))
//!     .state
//!     .reduce(HideAction::SetText("hello".into()))
//!     .state
//!     .reduce(HideAction::Submit);
//!
//! // The flow is now pending and names the request to perform.
//! assert_eq!(transition.state.state, SubmitState::Pending);
//! assert!(transition.effect.is_some());
//! ```
//!
//! ## Modules
//!
//! - [`api`]: gateway trait, response envelope and HTTP implementation
//! - [`flow`]: hide, extract, verify and records state machines
//! - [`record`]: record model and display helpers
//! - [`upload`]: image files selected for upload
//! - [`config`]: configuration file and overrides
//! - [`logging`]: tracing subscriber setup
//! - [`tui`]: tabbed terminal interface

pub mod api;
pub mod config;
pub mod flow;
pub mod logging;
pub mod record;
pub mod tui;
pub mod upload;

// Re-export commonly used types at the crate root
pub use api::{ApiError, ApiResponse, Extraction, HttpGateway, StegoGateway, Verification};
pub use config::ClientConfig;
pub use flow::{FlowError, SubmitState, Transition};
pub use record::{shorten_hash, RecordStatus, SteganographyRecord};
pub use upload::ImageFile;
