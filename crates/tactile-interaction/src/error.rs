//! Interaction error types.

use tactile_targeting::TargetingError;
use thiserror::Error;

use crate::action::ProtocolAction;

/// Errors surfaced to the host's error channel.
#[derive(Debug, Error)]
pub enum InteractionError {
    /// Target resolution hit a contract violation.
    #[error(transparent)]
    Targeting(#[from] TargetingError),

    /// An action was rejected for a reason the engine does not expect.
    #[error("{action} rejected: {message}")]
    ActionRejected {
        /// The rejected action.
        action: ProtocolAction,
        /// Rejection message from the host.
        message: String,
    },

    /// A server settings packet could not be decoded.
    #[error("invalid server settings: {0}")]
    InvalidServerSettings(#[source] serde_json::Error),
}
