//! # Mealplan (authentication client)
//!
//! `mealplan` is the client side of the meal planning product's account
//! system. It talks to the remote authentication API and keeps the local
//! session token.
//!
//! ## Response envelope
//!
//! Every endpoint answers with `{success, message, data?, errors?}`. A
//! `success: false` envelope always becomes an error; the surfaced message is
//! the first field error, then the envelope message, then a fixed default for
//! the operation.
//!
//! ## Session token
//!
//! One opaque bearer token per [`auth::TokenStore`], kept under the key
//! `auth_token`. It is written by `register`, `login` and `reset_password`,
//! and removed only by a successful `logout`. Calls that need it fail locally
//! with [`auth::AuthError::NotAuthenticated`] before any request is sent.
//!
//! ## Forms
//!
//! [`forms`] holds the sign-in and sign-up submit handlers, which validate
//! input locally before calling the client.

pub mod auth;
pub mod cli;
pub mod forms;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
