//! Input validation for user-facing form fields
//!
//! Every validator returns the same [`Validation`] shape. Rules run in a fixed
//! priority order (empty, too short, too long, then the format rule) and stop
//! at the first failure, so only the highest-priority violation is reported.

use crate::error::ValidationError;
use email_address::{EmailAddress, Options};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Trailing run of non-word characters (word = ASCII letters, digits, `_`).
static TRAILING_NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_]+$").expect("static pattern is valid")
});

/// Reason a value was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rejection {
    Empty,
    TooShort,
    TooLong,
    BadUsername,
    NoNumber,
    NoUpper,
    BadEmail,
    Mismatch,
}

impl Rejection {
    /// Short stable tag, e.g. `tooshort`
    pub fn tag(&self) -> &'static str {
        match self {
            Rejection::Empty => "empty",
            Rejection::TooShort => "tooshort",
            Rejection::TooLong => "toolong",
            Rejection::BadUsername => "badusername",
            Rejection::NoNumber => "nonumber",
            Rejection::NoUpper => "noupper",
            Rejection::BadEmail => "bademail",
            Rejection::Mismatch => "mismatch",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rejection::Empty => "value is empty",
            Rejection::TooShort => "value is too short",
            Rejection::TooLong => "value is too long",
            Rejection::BadUsername => "username ends with a non-word character",
            Rejection::NoNumber => "value must contain a number",
            Rejection::NoUpper => "value must contain an uppercase letter",
            Rejection::BadEmail => "not a valid email address",
            Rejection::Mismatch => "values do not match",
        };
        f.write_str(text)
    }
}

/// Outcome of a validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(Rejection),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    /// `ok` for a valid value, otherwise the rejection tag
    pub fn tag(&self) -> &'static str {
        match self {
            Validation::Valid => "ok",
            Validation::Invalid(rejection) => rejection.tag(),
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Validation::Valid => None,
            Validation::Invalid(rejection) => Some(*rejection),
        }
    }

    /// Convert into a `Result`, naming the field in the error
    pub fn into_result(self, field: &str) -> Result<(), ValidationError> {
        match self {
            Validation::Valid => Ok(()),
            Validation::Invalid(rejection) => Err(ValidationError::Rejected {
                field: field.to_string(),
                rejection,
            }),
        }
    }
}

impl Serialize for Validation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Inclusive character-count bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLengthBounds")]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl LengthBounds {
    pub const USERNAME: LengthBounds = LengthBounds { min: 4, max: 40 };
    pub const PASSWORD: LengthBounds = LengthBounds { min: 6, max: 92 };
    pub const NAME: LengthBounds = LengthBounds { min: 2, max: 30 };

    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Bounds with `min <= max`, or `None`
    pub fn checked(min: usize, max: usize) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    fn check(&self, value: &str) -> Option<Rejection> {
        let length = value.chars().count();
        if length < self.min {
            Some(Rejection::TooShort)
        } else if length > self.max {
            Some(Rejection::TooLong)
        } else {
            None
        }
    }
}

#[derive(Deserialize)]
struct RawLengthBounds {
    min: usize,
    max: usize,
}

impl TryFrom<RawLengthBounds> for LengthBounds {
    type Error = String;

    fn try_from(raw: RawLengthBounds) -> Result<Self, Self::Error> {
        LengthBounds::checked(raw.min, raw.max).ok_or_else(|| {
            format!(
                "length bounds min ({}) must not exceed max ({})",
                raw.min, raw.max
            )
        })
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate a username with the default bounds (4-40)
pub fn validate_username(username: &str) -> Validation {
    validate_username_within(username, LengthBounds::USERNAME)
}

pub fn validate_username_within(username: &str, bounds: LengthBounds) -> Validation {
    if is_blank(username) {
        return Validation::Invalid(Rejection::Empty);
    }
    if let Some(rejection) = bounds.check(username) {
        return Validation::Invalid(rejection);
    }
    if TRAILING_NON_WORD.is_match(username) {
        return Validation::Invalid(Rejection::BadUsername);
    }
    Validation::Valid
}

/// Validate a password with the default bounds (6-92)
pub fn validate_password(password: &str) -> Validation {
    validate_password_within(password, LengthBounds::PASSWORD)
}

pub fn validate_password_within(password: &str, bounds: LengthBounds) -> Validation {
    if password.is_empty() {
        return Validation::Invalid(Rejection::Empty);
    }
    if let Some(rejection) = bounds.check(password) {
        return Validation::Invalid(rejection);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Validation::Invalid(Rejection::NoNumber);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Validation::Invalid(Rejection::NoUpper);
    }
    Validation::Valid
}

/// True for a bare `local@domain.tld` address
///
/// Display-name forms like `Name <a@b.com>` and single-label domains like
/// `user@localhost` are refused.
pub fn is_valid_email(address: &str) -> bool {
    let options = Options::default()
        .without_display_text()
        .with_required_tld();
    EmailAddress::parse_with_options(address, options).is_ok()
}

/// Validate an email address
pub fn validate_email(email: &str) -> Validation {
    if email.is_empty() {
        return Validation::Invalid(Rejection::Empty);
    }
    if !is_valid_email(email) {
        return Validation::Invalid(Rejection::BadEmail);
    }
    Validation::Valid
}

/// Validate a first or last name with the default bounds (2-30)
///
/// Only the length is checked; an empty name is reported as too short.
pub fn validate_name(name: &str) -> Validation {
    validate_name_within(name, LengthBounds::NAME)
}

pub fn validate_name_within(name: &str, bounds: LengthBounds) -> Validation {
    match bounds.check(name) {
        Some(rejection) => Validation::Invalid(rejection),
        None => Validation::Valid,
    }
}

/// Check that two values are identical, e.g. password and confirmation
pub fn validate_identical(first: &str, second: &str) -> Validation {
    if first == second {
        Validation::Valid
    } else {
        Validation::Invalid(Rejection::Mismatch)
    }
}

/// True when there is at least one field and every value is non-empty
pub fn filled_out<'a, I>(fields: I) -> bool
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut seen = false;
    for (_, value) in fields {
        if value.is_empty() {
            return false;
        }
        seen = true;
    }
    seen
}

/// Validators bound to configured length limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldValidator {
    pub username: LengthBounds,
    pub password: LengthBounds,
    pub name: LengthBounds,
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self {
            username: LengthBounds::USERNAME,
            password: LengthBounds::PASSWORD,
            name: LengthBounds::NAME,
        }
    }
}

impl FieldValidator {
    pub fn username(&self, value: &str) -> Validation {
        validate_username_within(value, self.username)
    }

    pub fn password(&self, value: &str) -> Validation {
        validate_password_within(value, self.password)
    }

    pub fn email(&self, value: &str) -> Validation {
        validate_email(value)
    }

    pub fn name(&self, value: &str) -> Validation {
        validate_name_within(value, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("ab"), Validation::Invalid(Rejection::TooShort));
        assert_eq!(validate_username("valid_name1"), Validation::Valid);
        assert_eq!(validate_username("bad!"), Validation::Invalid(Rejection::BadUsername));
        assert_eq!(validate_username(""), Validation::Invalid(Rejection::Empty));
        assert_eq!(validate_username("   "), Validation::Invalid(Rejection::Empty));
        assert_eq!(
            validate_username(&"a".repeat(41)),
            Validation::Invalid(Rejection::TooLong)
        );
    }

    #[test]
    fn test_username_only_trailing_symbols_are_rejected() {
        assert_eq!(validate_username("jo.hn_doe"), Validation::Valid);
        assert_eq!(validate_username("john..."), Validation::Invalid(Rejection::BadUsername));
        assert_eq!(validate_username("john doe "), Validation::Invalid(Rejection::BadUsername));
    }

    #[test]
    fn test_short_values_always_report_tooshort() {
        // "a!" would fail the format rule too, but length has priority
        for value in ["a", "a!", "!!", "abc"] {
            assert_eq!(validate_username(value).tag(), "tooshort", "{value}");
        }
        for value in ["a", "Ab1", "abcde"] {
            assert_eq!(validate_password(value).tag(), "tooshort", "{value}");
        }
    }

    #[test]
    fn test_validate_password() {
        assert_eq!(validate_password("abc123"), Validation::Invalid(Rejection::NoUpper));
        assert_eq!(validate_password("Abc123"), Validation::Valid);
        assert_eq!(validate_password(""), Validation::Invalid(Rejection::Empty));
        assert_eq!(validate_password("Abcdef"), Validation::Invalid(Rejection::NoNumber));
        assert_eq!(
            validate_password(&format!("A1{}", "x".repeat(91))),
            Validation::Invalid(Rejection::TooLong)
        );
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("a@b.com"), Validation::Valid);
        assert_eq!(validate_email("not-an-email"), Validation::Invalid(Rejection::BadEmail));
        assert_eq!(validate_email(""), Validation::Invalid(Rejection::Empty));
        assert_eq!(validate_email("user@@example.com").tag(), "bademail");
        for address in ["Name <a@b.com>", "<a@b.com>", "a@b", "user@localhost"] {
            assert_eq!(validate_email(address).tag(), "bademail", "{address}");
        }
        assert_eq!(validate_email("first.last+tag@mail.example.org"), Validation::Valid);
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Jo"), Validation::Valid);
        assert_eq!(validate_name("J"), Validation::Invalid(Rejection::TooShort));
        assert_eq!(validate_name(""), Validation::Invalid(Rejection::TooShort));
        assert_eq!(validate_name(&"x".repeat(31)), Validation::Invalid(Rejection::TooLong));
        // counted in characters, not bytes
        assert_eq!(validate_name("Éloïse"), Validation::Valid);
    }

    #[test]
    fn test_custom_bounds() {
        let bounds = LengthBounds::new(2, 5);
        assert_eq!(validate_username_within("ab", bounds), Validation::Valid);
        assert_eq!(
            validate_username_within("abcdef", bounds),
            Validation::Invalid(Rejection::TooLong)
        );
    }

    #[test]
    fn test_inverted_bounds_are_refused() {
        assert_eq!(LengthBounds::checked(2, 5), Some(LengthBounds::new(2, 5)));
        assert_eq!(LengthBounds::checked(3, 3), Some(LengthBounds::new(3, 3)));
        assert_eq!(LengthBounds::checked(10, 4), None);

        let err = toml::from_str::<LengthBounds>("min = 10\nmax = 4\n").unwrap_err();
        assert!(err.to_string().contains("must not exceed max"));
        let bounds: LengthBounds = toml::from_str("min = 1\nmax = 4\n").unwrap();
        assert_eq!(bounds, LengthBounds::new(1, 4));
    }

    #[test]
    fn test_validate_identical_and_filled_out() {
        assert!(validate_identical("Secret1", "Secret1").is_valid());
        assert_eq!(validate_identical("a", "b").tag(), "mismatch");

        assert!(filled_out([("name", "Ann"), ("email", "ann@example.com")]));
        assert!(!filled_out([("name", "Ann"), ("email", "")]));
        assert!(!filled_out(Vec::<(&str, &str)>::new()));
    }

    #[test]
    fn test_into_result() {
        assert!(validate_email("a@b.com").into_result("email").is_ok());
        let err = validate_email("nope").into_result("email").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Rejected {
                field: "email".to_string(),
                rejection: Rejection::BadEmail,
            }
        );
    }

    #[test]
    fn test_validation_serializes_as_tag() {
        let json = serde_json::to_string(&validate_password("abc123")).unwrap();
        assert_eq!(json, "\"noupper\"");
        let json = serde_json::to_string(&Validation::Valid).unwrap();
        assert_eq!(json, "\"ok\"");
    }

    #[test]
    fn test_field_validator_uses_configured_bounds() {
        let validator = FieldValidator {
            username: LengthBounds::new(8, 12),
            ..FieldValidator::default()
        };
        assert_eq!(validator.username("alice"), Validation::Invalid(Rejection::TooShort));
        assert_eq!(validator.password("Abc123"), Validation::Valid);
        assert_eq!(validator.name("Al"), Validation::Valid);
        assert_eq!(validator.email("x@y.org"), Validation::Valid);
    }
}
