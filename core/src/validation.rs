// core/src/validation.rs

//! Typed form validation for the account, checkout and contact forms.
//!
//! Each form declares an ordered list of `(Field, &[Rule])`. For every field:
//! `Required` fails on a blank value and stops further checks; the remaining
//! rules only run when the value is non-empty; the first failing rule wins.

use crate::models::{PaymentMethod, ShippingMethod};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^09[0-9]{8}$").expect("phone pattern compiles"));

const PASSWORD_MIN_LEN: usize = 8;
const NAME_MIN_CHARS: usize = 2;

pub fn is_valid_email(value: &str) -> bool {
  EMAIL_RE.is_match(value)
}

/// At least eight ASCII letters or digits, with at least one of each.
pub fn is_valid_password(value: &str) -> bool {
  value.len() >= PASSWORD_MIN_LEN
    && value.chars().all(|c| c.is_ascii_alphanumeric())
    && value.chars().any(|c| c.is_ascii_alphabetic())
    && value.chars().any(|c| c.is_ascii_digit())
}

/// Mobile number: `09` followed by eight digits.
pub fn is_valid_phone(value: &str) -> bool {
  PHONE_RE.is_match(value)
}

pub fn is_valid_name(value: &str) -> bool {
  value.trim().chars().count() >= NAME_MIN_CHARS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
  DisplayName,
  Name,
  Email,
  Password,
  ConfirmPassword,
  Phone,
  Address,
  Message,
}

impl Field {
  pub fn as_str(self) -> &'static str {
    match self {
      Field::DisplayName => "displayName",
      Field::Name => "name",
      Field::Email => "email",
      Field::Password => "password",
      Field::ConfirmPassword => "confirmPassword",
      Field::Phone => "phone",
      Field::Address => "address",
      Field::Message => "message",
    }
  }

  fn required_message(self) -> &'static str {
    match self {
      Field::DisplayName | Field::Name => "Please enter your name",
      Field::Email => "Please enter your email address",
      Field::Password => "Please enter a password",
      Field::ConfirmPassword => "Please confirm your password",
      Field::Phone => "Please enter your mobile number",
      Field::Address => "Please enter a shipping address",
      Field::Message => "Please enter a message",
    }
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
  Required,
  Email,
  Password,
  Name,
  Phone,
  /// Equal to the value of `Field::Password` in the same form.
  MatchesPassword,
}

impl Rule {
  /// Runs the predicate. `Required` is handled by the caller.
  fn check(self, value: &str, form: &dyn FormValues) -> bool {
    match self {
      Rule::Required => !value.trim().is_empty(),
      Rule::Email => is_valid_email(value),
      Rule::Password => is_valid_password(value),
      Rule::Name => is_valid_name(value),
      Rule::Phone => is_valid_phone(value),
      Rule::MatchesPassword => form.value(Field::Password) == Some(value),
    }
  }

  fn error_code(self) -> ErrorCode {
    match self {
      Rule::Required => ErrorCode::Required,
      Rule::Email => ErrorCode::EmailInvalid,
      Rule::Password => ErrorCode::PasswordInvalid,
      Rule::Name => ErrorCode::NameInvalid,
      Rule::Phone => ErrorCode::PhoneInvalid,
      Rule::MatchesPassword => ErrorCode::PasswordMismatch,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
  Required,
  EmailInvalid,
  PasswordInvalid,
  NameInvalid,
  PhoneInvalid,
  PasswordMismatch,
}

impl ErrorCode {
  pub fn default_message(self) -> &'static str {
    match self {
      ErrorCode::Required => "This field is required",
      ErrorCode::EmailInvalid => "Please enter a valid email address",
      ErrorCode::PasswordInvalid => "Password must be at least 8 characters and contain both letters and digits",
      ErrorCode::NameInvalid => "Name must be at least 2 characters",
      ErrorCode::PhoneInvalid => "Please enter a valid mobile number (10 digits starting with 09)",
      ErrorCode::PasswordMismatch => "The two passwords do not match",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub code: ErrorCode,
  pub message: String,
}

impl FieldError {
  fn for_rule(field: Field, rule: Rule) -> Self {
    let code = rule.error_code();
    let message = match rule {
      Rule::Required => field.required_message(),
      _ => code.default_message(),
    };
    Self {
      code,
      message: message.to_string(),
    }
  }
}

/// At most one error per field, serialized as `{ "<field>": { code, message } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, FieldError>);

impl FieldErrors {
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn get(&self, field: Field) -> Option<&FieldError> {
    self.0.get(&field)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Field, &FieldError)> {
    self.0.iter()
  }

  pub fn insert(&mut self, field: Field, error: FieldError) {
    self.0.insert(field, error);
  }

  pub fn into_result(self) -> Result<(), FieldErrors> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(self)
    }
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let fields: Vec<&str> = self.0.keys().map(|field| field.as_str()).collect();
    write!(f, "invalid fields: {}", fields.join(", "))
  }
}

/// Field lookup for a form. Missing and empty are treated alike.
pub trait FormValues {
  fn value(&self, field: Field) -> Option<&str>;
}

impl FormValues for BTreeMap<Field, String> {
  fn value(&self, field: Field) -> Option<&str> {
    self.get(&field).map(String::as_str)
  }
}

/// Runs `rules` against `form` and collects the first failure of each field.
pub fn validate_fields(form: &dyn FormValues, rules: &[(Field, &[Rule])]) -> FieldErrors {
  let mut errors = FieldErrors::default();
  for (field, field_rules) in rules {
    let value = form.value(*field).unwrap_or_default();

    if field_rules.contains(&Rule::Required) && !Rule::Required.check(value, form) {
      errors.insert(*field, FieldError::for_rule(*field, Rule::Required));
      continue;
    }
    if value.is_empty() {
      continue;
    }
    if let Some(rule) = field_rules
      .iter()
      .copied()
      .filter(|rule| *rule != Rule::Required)
      .find(|rule| !rule.check(value, form))
    {
      errors.insert(*field, FieldError::for_rule(*field, rule));
    }
  }
  errors
}

/// A submitted form with a fixed rule set.
pub trait Form: FormValues {
  const RULES: &'static [(Field, &'static [Rule])];

  fn validate(&self) -> Result<(), FieldErrors>
  where
    Self: Sized,
  {
    validate_fields(self, Self::RULES).into_result()
  }
}

fn non_empty(value: &str) -> Option<&str> {
  Some(value).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
  pub display_name: String,
  pub email: String,
  pub password: String,
  pub confirm_password: String,
}

impl FormValues for RegistrationForm {
  fn value(&self, field: Field) -> Option<&str> {
    match field {
      Field::DisplayName => non_empty(&self.display_name),
      Field::Email => non_empty(&self.email),
      Field::Password => non_empty(&self.password),
      Field::ConfirmPassword => non_empty(&self.confirm_password),
      _ => None,
    }
  }
}

impl Form for RegistrationForm {
  const RULES: &'static [(Field, &'static [Rule])] = &[
    (Field::DisplayName, &[Rule::Required, Rule::Name]),
    (Field::Email, &[Rule::Required, Rule::Email]),
    (Field::Password, &[Rule::Required, Rule::Password]),
    (Field::ConfirmPassword, &[Rule::Required, Rule::MatchesPassword]),
  ];
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginForm {
  pub email: String,
  pub password: String,
}

impl FormValues for LoginForm {
  fn value(&self, field: Field) -> Option<&str> {
    match field {
      Field::Email => non_empty(&self.email),
      Field::Password => non_empty(&self.password),
      _ => None,
    }
  }
}

impl Form for LoginForm {
  const RULES: &'static [(Field, &'static [Rule])] = &[
    (Field::Email, &[Rule::Required, Rule::Email]),
    (Field::Password, &[Rule::Required]),
  ];
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileForm {
  pub display_name: String,
  pub phone: String,
}

impl FormValues for ProfileForm {
  fn value(&self, field: Field) -> Option<&str> {
    match field {
      Field::DisplayName => non_empty(&self.display_name),
      Field::Phone => non_empty(&self.phone),
      _ => None,
    }
  }
}

impl Form for ProfileForm {
  const RULES: &'static [(Field, &'static [Rule])] = &[
    (Field::DisplayName, &[Rule::Required, Rule::Name]),
    (Field::Phone, &[Rule::Phone]),
  ];
}

/// Recipient details plus the chosen shipping and payment options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
  pub name: String,
  pub email: String,
  pub phone: String,
  pub address: String,
  pub shipping_method: ShippingMethod,
  pub payment_method: PaymentMethod,
}

impl FormValues for CheckoutForm {
  fn value(&self, field: Field) -> Option<&str> {
    match field {
      Field::Name => non_empty(&self.name),
      Field::Email => non_empty(&self.email),
      Field::Phone => non_empty(&self.phone),
      Field::Address => non_empty(&self.address),
      _ => None,
    }
  }
}

impl Form for CheckoutForm {
  const RULES: &'static [(Field, &'static [Rule])] = &[
    (Field::Name, &[Rule::Required]),
    (Field::Email, &[Rule::Required, Rule::Email]),
    (Field::Phone, &[Rule::Required, Rule::Phone]),
    (Field::Address, &[Rule::Required]),
  ];
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
  pub name: String,
  pub email: String,
  pub message: String,
}

impl FormValues for ContactForm {
  fn value(&self, field: Field) -> Option<&str> {
    match field {
      Field::Name => non_empty(&self.name),
      Field::Email => non_empty(&self.email),
      Field::Message => non_empty(&self.message),
      _ => None,
    }
  }
}

impl Form for ContactForm {
  const RULES: &'static [(Field, &'static [Rule])] = &[
    (Field::Name, &[Rule::Required]),
    (Field::Email, &[Rule::Required, Rule::Email]),
    (Field::Message, &[Rule::Required]),
  ];
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_predicate() {
    assert!(is_valid_email("kitty@bakery.tw"));
    assert!(!is_valid_email("kitty@bakery"));
    assert!(!is_valid_email("kit ty@bakery.tw"));
    assert!(!is_valid_email("@bakery.tw"));
  }

  #[test]
  fn password_predicate() {
    assert!(is_valid_password("abc12345"));
    assert!(!is_valid_password("abc1234"));
    assert!(!is_valid_password("abcdefgh"));
    assert!(!is_valid_password("12345678"));
    assert!(!is_valid_password("abc-12345"));
  }

  #[test]
  fn phone_and_name_predicates() {
    assert!(is_valid_phone("0912345678"));
    assert!(!is_valid_phone("091234567"));
    assert!(!is_valid_phone("0812345678"));
    assert!(is_valid_name(" Al "));
    assert!(!is_valid_name(" A "));
  }

  #[test]
  fn blank_required_field_reports_required_only() {
    let form = RegistrationForm {
      display_name: "   ".into(),
      ..Default::default()
    };
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.len(), 4);
    assert_eq!(errors.get(Field::DisplayName).unwrap().code, ErrorCode::Required);
    assert_eq!(errors.get(Field::Email).unwrap().message, "Please enter your email address");
  }

  #[test]
  fn optional_phone_is_checked_only_when_present() {
    let ok = ProfileForm {
      display_name: "Mimi".into(),
      phone: String::new(),
    };
    assert!(ok.validate().is_ok());

    let bad = ProfileForm {
      display_name: "Mimi".into(),
      phone: "12345".into(),
    };
    let errors = bad.validate().unwrap_err();
    assert_eq!(errors.get(Field::Phone).unwrap().code, ErrorCode::PhoneInvalid);
  }

  #[test]
  fn confirmation_must_match_password() {
    let form = RegistrationForm {
      display_name: "Mimi".into(),
      email: "mimi@bakery.tw".into(),
      password: "meow1234".into(),
      confirm_password: "meow4321".into(),
    };
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(Field::ConfirmPassword).unwrap().code, ErrorCode::PasswordMismatch);
  }

  #[test]
  fn field_errors_serialize_keyed_by_field() {
    let errors = LoginForm::default().validate().unwrap_err();
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json["email"]["code"], "required");
    assert_eq!(json["password"]["message"], "Please enter a password");
  }
}
