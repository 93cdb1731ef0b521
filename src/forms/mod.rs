//! Sign-in and sign-up submit handlers. They check the fields locally, call
//! the [`AuthClient`](crate::auth::AuthClient), and hand back either the user
//! or a message ready to show next to the form.

pub mod signin;
pub use self::signin::SigninForm;

pub mod signup;
pub use self::signup::{
    SignupForm, MIN_PASSWORD_LENGTH, PASSWORD_MISMATCH_MESSAGE, PASSWORD_TOO_SHORT_MESSAGE,
};

use crate::auth::AuthError;
use regex::Regex;
use thiserror::Error;

pub const EMAIL_REQUIRED_MESSAGE: &str = "Email is required";
pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address";
pub const PASSWORD_REQUIRED_MESSAGE: &str = "Password is required";

#[derive(Debug, Error)]
pub enum FormError {
    /// Rejected locally; nothing was sent.
    #[error("{0}")]
    Validation(&'static str),

    #[error("{message}")]
    Submit {
        message: String,
        #[source]
        source: AuthError,
    },
}

impl FormError {
    /// Wraps a client error, keeping server and precondition messages as-is
    /// and prefixing anything else with the form's fallback.
    pub(crate) fn submit(fallback: &str, source: AuthError) -> Self {
        let message = if source.is_user_facing() {
            source.to_string()
        } else {
            format!("{fallback}: {source}")
        };

        Self::Submit { message, source }
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// Checks shared by both forms: a well-formed email and a non-blank password.
pub(crate) fn validate_credentials(email: &str, password: &str) -> Result<(), FormError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FormError::Validation(EMAIL_REQUIRED_MESSAGE));
    }
    if !valid_email(email) {
        return Err(FormError::Validation(INVALID_EMAIL_MESSAGE));
    }
    if password.trim().is_empty() {
        return Err(FormError::Validation(PASSWORD_REQUIRED_MESSAGE));
    }

    Ok(())
}
