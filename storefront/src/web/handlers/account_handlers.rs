// storefront/src/web/handlers/account_handlers.rs

//! Server-side checks for the account and contact forms.
//!
//! Sign-in itself happens at the identity provider; these endpoints only tell
//! the page which fields to highlight before it submits there.

use actix_web::{web, HttpResponse};
use bakery_core::validation::{ContactForm, Form, LoginForm, ProfileForm, RegistrationForm};
use serde_json::json;
use tracing::{debug, instrument};

use crate::errors::AppError;

fn validated<F: Form>(form: &F) -> Result<HttpResponse, AppError> {
  form.validate()?;
  debug!("Form passed validation.");
  Ok(HttpResponse::Ok().json(json!({ "valid": true })))
}

#[instrument(name = "handler::validate_registration", skip_all)]
pub async fn validate_registration_handler(form: web::Json<RegistrationForm>) -> Result<HttpResponse, AppError> {
  validated(&form.into_inner())
}

#[instrument(name = "handler::validate_login", skip_all)]
pub async fn validate_login_handler(form: web::Json<LoginForm>) -> Result<HttpResponse, AppError> {
  validated(&form.into_inner())
}

#[instrument(name = "handler::validate_profile", skip_all)]
pub async fn validate_profile_handler(form: web::Json<ProfileForm>) -> Result<HttpResponse, AppError> {
  validated(&form.into_inner())
}

#[instrument(name = "handler::validate_contact", skip_all)]
pub async fn validate_contact_handler(form: web::Json<ContactForm>) -> Result<HttpResponse, AppError> {
  validated(&form.into_inner())
}
