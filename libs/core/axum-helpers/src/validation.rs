//! Ordered accumulation of input validation failures.
//!
//! Checks run in call order and every failing check contributes one
//! `{message}` entry, so clients see all problems at once.
//!
//! ```rust
//! use axum_helpers::validation::InputErrors;
//!
//! let mut errors = InputErrors::new();
//! errors
//!     .email("not-an-email", "E-Mail is invalid.")
//!     .min_length("abc", 5, "Password too short!");
//! assert_eq!(errors.len(), 2);
//! assert!(errors.into_result().is_err());
//! ```

use validator::{ValidateEmail, ValidateLength};

use crate::errors::{AppError, FieldMessage};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputErrors {
    messages: Vec<FieldMessage>,
}

impl InputErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` unless `ok` holds.
    pub fn check(&mut self, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.messages.push(FieldMessage::new(message));
        }
        self
    }

    pub fn email(&mut self, value: &str, message: &str) -> &mut Self {
        self.check(value.validate_email(), message)
    }

    /// Non-empty and at least `min` characters.
    pub fn min_length(&mut self, value: &str, min: u64, message: &str) -> &mut Self {
        let ok = !value.is_empty() && value.validate_length(Some(min), None, None);
        self.check(ok, message)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[FieldMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<FieldMessage> {
        self.messages
    }

    /// `Ok(())` when nothing failed, otherwise a single validation error
    /// carrying every message in check order.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.messages))
        }
    }
}
