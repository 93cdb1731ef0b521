//! Request and response types for the auth API. Passwords and tokens pass
//! through these payloads, so they must never be logged; the `Debug` impls of
//! the credential types redact them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub confirmed: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Serialize, Deserialize, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize, Default)]
pub struct SignupCredentials {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl SignupCredentials {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            password_confirmation: password_confirmation.into(),
        }
    }
}

impl fmt::Debug for SignupCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("password_confirmation", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct PasswordUpdate {
    pub reset_password_token: String,
    pub password: String,
    pub password_confirmation: String,
}

impl fmt::Debug for PasswordUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordUpdate").finish_non_exhaustive()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub password: String,
    pub password_confirmation: String,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}

/// Body of `POST /api/auth/register`, which nests the fields under `user`.
#[derive(Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub user: RegisterUser<'a>,
}

#[derive(Serialize)]
pub(crate) struct RegisterUser<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirmation: &'a str,
}

impl<'a> From<&'a SignupCredentials> for RegisterRequest<'a> {
    fn from(credentials: &'a SignupCredentials) -> Self {
        Self {
            user: RegisterUser {
                email: &credentials.email,
                password: &credentials.password,
                password_confirmation: &credentials.password_confirmation,
            },
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ConfirmationRequest<'a> {
    pub email: &'a str,
}

/// `data` of the session-establishing endpoints.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct AuthPayload {
    pub user: User,
    #[serde(default)]
    pub token: Option<String>,
}

/// `data` of the endpoints that only return the user.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct UserPayload {
    pub user: User,
}
