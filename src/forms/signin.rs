use super::{validate_credentials, FormError};
use crate::auth::{AuthClient, Credentials, User};
use tracing::{debug, instrument};

pub const SIGNIN_FAILED_MESSAGE: &str = "Sign in failed";

#[derive(Debug, Clone, Copy)]
pub struct SigninForm<'a> {
    client: &'a AuthClient,
}

impl<'a> SigninForm<'a> {
    #[must_use]
    pub const fn new(client: &'a AuthClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// `FormError::Validation` without a request when a field is missing or
    /// malformed, `FormError::Submit` when the login fails.
    #[instrument(skip_all)]
    pub async fn submit(&self, credentials: &Credentials) -> Result<User, FormError> {
        validate_credentials(&credentials.email, &credentials.password)?;

        let credentials = Credentials::new(credentials.email.trim(), credentials.password.clone());

        let user = self
            .client
            .login(&credentials)
            .await
            .map_err(|err| FormError::submit(SIGNIN_FAILED_MESSAGE, err))?;

        debug!(user_id = user.id, "sign in form submitted");

        Ok(user)
    }
}
