use super::{validate_credentials, FormError};
use crate::auth::{AuthClient, SignupCredentials, User};
use tracing::{debug, instrument};

/// Minimum length, in characters, of both password fields.
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const PASSWORD_TOO_SHORT_MESSAGE: &str = "Password must be at least 6 characters";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";
pub const SIGNUP_FAILED_MESSAGE: &str = "Sign up failed";

#[derive(Debug, Clone, Copy)]
pub struct SignupForm<'a> {
    client: &'a AuthClient,
}

impl<'a> SignupForm<'a> {
    #[must_use]
    pub const fn new(client: &'a AuthClient) -> Self {
        Self { client }
    }

    /// Local checks, in order: email, password, length of both passwords,
    /// confirmation match.
    ///
    /// # Errors
    /// Returns the first failing check as `FormError::Validation`.
    pub fn validate(credentials: &SignupCredentials) -> Result<(), FormError> {
        validate_credentials(&credentials.email, &credentials.password)?;

        let too_short = |password: &str| password.chars().count() < MIN_PASSWORD_LENGTH;
        if too_short(&credentials.password) || too_short(&credentials.password_confirmation) {
            return Err(FormError::Validation(PASSWORD_TOO_SHORT_MESSAGE));
        }

        if credentials.password != credentials.password_confirmation {
            return Err(FormError::Validation(PASSWORD_MISMATCH_MESSAGE));
        }

        Ok(())
    }

    /// # Errors
    /// `FormError::Validation` without a request when validation fails,
    /// `FormError::Submit` when registration fails.
    #[instrument(skip_all)]
    pub async fn submit(&self, credentials: &SignupCredentials) -> Result<User, FormError> {
        Self::validate(credentials)?;

        let credentials = SignupCredentials::new(
            credentials.email.trim(),
            credentials.password.clone(),
            credentials.password_confirmation.clone(),
        );

        let user = self
            .client
            .register(&credentials)
            .await
            .map_err(|err| FormError::submit(SIGNUP_FAILED_MESSAGE, err))?;

        debug!(user_id = user.id, "sign up form submitted");

        Ok(user)
    }
}
