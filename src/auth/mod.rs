//! Client for the remote authentication API plus local session token
//! handling.

pub mod client;
pub use self::client::{AuthClient, DEFAULT_BASE_URL};

pub mod envelope;
pub use self::envelope::{ApiResponse, FieldError};

pub mod error;
pub use self::error::{AuthError, Operation, NOT_AUTHENTICATED_MESSAGE};

pub mod store;
pub use self::store::{FileTokenStore, MemoryTokenStore, NoopTokenStore, TokenStore, AUTH_TOKEN_KEY};

pub mod types;
pub use self::types::{
    Credentials, PasswordChange, PasswordResetRequest, PasswordUpdate, SignupCredentials, User,
};
