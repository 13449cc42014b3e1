// storefront/src/config.rs

use crate::errors::{AppError, Result};
use bakery_core::PricingRules;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Postgres document store. When unset carts live in process memory.
  pub database_url: Option<String>,

  pub pricing: PricingRules,

  pub mock_payment_account_id: String,
  /// Charges above this amount are declined by the mock provider.
  pub mock_payment_limit: i64,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      pricing: PricingRules::default(),
      mock_payment_account_id: "mock_main_acct".to_string(),
      mock_payment_limit: 100_000,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let defaults = Self::default();
    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = parse_or("SERVER_PORT", get_env("SERVER_PORT"), defaults.server_port)?;
    let database_url = get_env("DATABASE_URL");

    let pricing = PricingRules {
      free_shipping_threshold: parse_or(
        "FREE_SHIPPING_THRESHOLD",
        get_env("FREE_SHIPPING_THRESHOLD"),
        defaults.pricing.free_shipping_threshold,
      )?,
      flat_shipping_fee: parse_or(
        "FLAT_SHIPPING_FEE",
        get_env("FLAT_SHIPPING_FEE"),
        defaults.pricing.flat_shipping_fee,
      )?,
      expedite_surcharge: parse_or(
        "EXPEDITE_SURCHARGE",
        get_env("EXPEDITE_SURCHARGE"),
        defaults.pricing.expedite_surcharge,
      )?,
    };

    let mock_payment_account_id = get_env("MOCK_PAYMENT_ACCOUNT_ID").unwrap_or(defaults.mock_payment_account_id);
    let mock_payment_limit = parse_or(
      "MOCK_PAYMENT_LIMIT",
      get_env("MOCK_PAYMENT_LIMIT"),
      defaults.mock_payment_limit,
    )?;

    tracing::info!(
      persistent_store = database_url.is_some(),
      ?pricing,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      pricing,
      mock_payment_account_id,
      mock_payment_limit,
    })
  }
}

fn parse_or<T>(var_name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    None => Ok(default),
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", var_name, e))),
  }
}
