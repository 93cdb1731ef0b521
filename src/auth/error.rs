use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// Message surfaced when an authenticated call is attempted without a token.
pub const NOT_AUTHENTICATED_MESSAGE: &str = "Authentication credentials not found";

/// The client operations, used to pick the fallback error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Login,
    Logout,
    CurrentUser,
    SendConfirmation,
    ConfirmEmail,
    SendPasswordReset,
    ResetPassword,
    ChangePassword,
}

impl Operation {
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Register => "Registration failed",
            Self::Login => "Login failed",
            Self::Logout => "Logout failed",
            Self::CurrentUser => "Failed to fetch user information",
            Self::SendConfirmation => "Failed to send confirmation email",
            Self::ConfirmEmail => "Failed to confirm email address",
            Self::SendPasswordReset => "Failed to send password reset email",
            Self::ResetPassword => "Failed to reset password",
            Self::ChangePassword => "Failed to change password",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::CurrentUser => "current_user",
            Self::SendConfirmation => "send_confirmation",
            Self::ConfirmEmail => "confirm_email",
            Self::SendPasswordReset => "send_password_reset",
            Self::ResetPassword => "reset_password",
            Self::ChangePassword => "change_password",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// No session token is stored; raised before contacting the server.
    #[error("Authentication credentials not found")]
    NotAuthenticated,

    /// The server answered with `success: false`.
    #[error("{message}")]
    Rejected {
        message: String,
        field: Option<String>,
    },

    /// The server answered with `success: true` but without the promised `data`.
    #[error("{0}: response reported success without data")]
    MissingData(Operation),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response ({status}): {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("unsupported base URL {0}: expected http(s) with a host and no query or fragment")]
    UnsupportedBaseUrl(String),

    #[error("token store error: {0}")]
    Store(String),
}

impl AuthError {
    /// True for local failures and server rejections, the cases a form shows
    /// verbatim.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::Rejected { .. })
    }
}
