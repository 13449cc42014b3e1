// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use bakery_core::validation::FieldErrors;
use bakery_core::{CartError, PipelineError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Cart error: {0}")]
  Cart(#[from] CartError),

  #[error("Form validation failed: {0}")]
  FormInvalid(FieldErrors),

  #[error("Bad request: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Cart is empty")]
  EmptyCart,

  #[error("Payment Processing Error: {0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: PipelineError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<FieldErrors> for AppError {
  fn from(errors: FieldErrors) -> Self {
    AppError::FormInvalid(errors)
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Cart(CartError::Unauthenticated) => StatusCode::UNAUTHORIZED,
      AppError::Cart(CartError::InvalidItem { .. }) | AppError::Validation(_) | AppError::EmptyCart => {
        StatusCode::BAD_REQUEST
      }
      AppError::FormInvalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
      AppError::Cart(_)
      | AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      // Log the full cause here; the client only gets a generic message.
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }

    let mut builder = HttpResponse::build(status);
    match self {
      AppError::Cart(CartError::Unauthenticated) => builder.json(json!({
        "error": "Please sign in to continue.",
        "action": "redirect_to_login"
      })),
      AppError::Cart(CartError::InvalidItem { reason }) => builder.json(json!({ "error": reason })),
      AppError::FormInvalid(fields) => builder.json(json!({ "error": "Please correct the highlighted fields.", "fields": fields })),
      AppError::Validation(m) | AppError::NotFound(m) | AppError::Payment(m) => builder.json(json!({ "error": m })),
      AppError::EmptyCart => builder.json(json!({ "error": "Your cart is empty." })),
      AppError::Cart(CartError::Persistence { .. }) | AppError::Sqlx(_) => {
        builder.json(json!({ "error": "Cart storage is temporarily unavailable." }))
      }
      AppError::Cart(_) | AppError::Config(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        builder.json(json!({ "error": "An internal error occurred" }))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
