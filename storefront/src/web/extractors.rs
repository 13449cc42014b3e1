// storefront/src/web/extractors.rs

use actix_web::{FromRequest, HttpRequest};
use crate::errors::AppError;
use futures_util::future::{ready, Ready};
use tracing::debug;

/// Header carrying the identity verified upstream by the identity provider.
pub const USER_ID_HEADER: &str = "X-User-ID";

/// The caller's user id, if the request carries one.
///
/// Never rejects a request: browsing and cart display work without a session,
/// and mutating operations report `Unauthenticated` through the cart service.
#[derive(Debug, Clone, Default)]
pub struct MaybeUser(pub Option<String>);

impl MaybeUser {
  pub fn user_id(&self) -> Option<&str> {
    self.0.as_deref()
  }
}

impl FromRequest for MaybeUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let user_id = req
      .headers()
      .get(USER_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .map(str::trim)
      .filter(|value| !value.is_empty())
      .map(str::to_string);
    if user_id.is_none() {
      debug!("Request without {} header, treating as signed out.", USER_ID_HEADER);
    }
    ready(Ok(MaybeUser(user_id)))
  }
}
