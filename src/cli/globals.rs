use crate::auth::{AuthClient, AuthError, FileTokenStore};
use std::{path::PathBuf, sync::Arc};

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub token_file: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, token_file: PathBuf) -> Self {
        Self {
            api_url,
            token_file,
        }
    }

    /// Build the auth client backed by the session file.
    ///
    /// # Errors
    /// Returns an error if the API URL is invalid.
    pub fn client(&self) -> Result<AuthClient, AuthError> {
        let store = Arc::new(FileTokenStore::new(&self.token_file));
        AuthClient::new(Some(&self.api_url), store)
    }
}
