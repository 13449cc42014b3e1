// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Framework-level failures of the step pipeline itself.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Step not found in pipeline definition: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Internal pipeline error: {0}")]
  Internal(String),
}

/// Errors surfaced by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
  /// Malformed quantity or price on add.
  #[error("Invalid cart item: {reason}")]
  InvalidItem { reason: String },

  /// A mutating operation was attempted without a user identity. Callers are
  /// expected to redirect to sign-in rather than treat this as fatal.
  #[error("A signed-in user is required to modify the cart")]
  Unauthenticated,

  /// The document store failed to read or write. The cause is opaque.
  #[error("Cart persistence failed: {source}")]
  Persistence {
    #[source]
    source: AnyhowError,
  },

  #[error("Cart pipeline error: {0}")]
  Pipeline(#[from] PipelineError),
}

impl CartError {
  pub fn invalid_item(reason: impl Into<String>) -> Self {
    CartError::InvalidItem { reason: reason.into() }
  }

  pub fn persistence(source: impl Into<AnyhowError>) -> Self {
    CartError::Persistence { source: source.into() }
  }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;
