//! Typed gateway to the auth API endpoints. Every operation issues at most
//! one request, unwraps the response envelope, and touches the token store
//! only after the server has accepted the call.

use super::{
    envelope::ApiResponse,
    error::{AuthError, Operation},
    store::TokenStore,
    types::{
        AuthPayload, ConfirmationRequest, Credentials, PasswordChange, PasswordResetRequest,
        PasswordUpdate, RegisterRequest, SignupCredentials, User, UserPayload,
    },
};
use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::{fmt, sync::Arc};
use tracing::{debug, info, info_span, Instrument};
use url::Url;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

const REGISTER_PATH: &str = "/api/auth/register";
const LOGIN_PATH: &str = "/api/auth/login";
const LOGOUT_PATH: &str = "/api/auth/logout";
const ME_PATH: &str = "/api/auth/me";
const CONFIRMATION_PATH: &str = "/api/auth/confirmation";
const PASSWORD_PATH: &str = "/api/auth/password";
const PASSWORD_CHANGE_PATH: &str = "/api/auth/password/change";

#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    http: Client,
    store: Arc<dyn TokenStore>,
}

impl fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl AuthClient {
    /// Build a client against `base_url`, or [`DEFAULT_BASE_URL`] when unset
    /// or blank.
    ///
    /// # Errors
    /// Returns an error if the base URL is not an absolute http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(base_url: Option<&str>, store: Arc<dyn TokenStore>) -> Result<Self, AuthError> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;

        Self::with_http_client(base_url, store, http)
    }

    /// Same as [`AuthClient::new`] with a caller-supplied `reqwest::Client`,
    /// e.g. one carrying a timeout.
    ///
    /// # Errors
    /// Returns an error if the base URL is not an absolute http(s) URL.
    pub fn with_http_client(
        base_url: Option<&str>,
        store: Arc<dyn TokenStore>,
        http: Client,
    ) -> Result<Self, AuthError> {
        let base_url = normalize_base_url(base_url)?;

        debug!("auth API base URL: {}", base_url);

        Ok(Self {
            base_url,
            http,
            store,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Pure presence check on the stored token; never fails.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.get_token().is_some()
    }

    /// Register a new account and store the issued session token.
    ///
    /// Password confirmation is sent as given; matching it against the
    /// password is the caller's job.
    ///
    /// # Errors
    /// Returns an error if the request fails or the server rejects it.
    pub async fn register(&self, credentials: &SignupCredentials) -> Result<User, AuthError> {
        let body = RegisterRequest::from(credentials);
        let response: ApiResponse<AuthPayload> = self
            .call(Operation::Register, Method::POST, REGISTER_PATH, None, |request| {
                request.json(&body)
            })
            .await?;

        let user = self.establish_session(response.into_data(Operation::Register)?)?;

        info!(user_id = user.id, "account registered");

        Ok(user)
    }

    /// Log in and store the issued session token.
    ///
    /// # Errors
    /// Returns an error if the request fails or the credentials are rejected.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let response: ApiResponse<AuthPayload> = self
            .call(Operation::Login, Method::POST, LOGIN_PATH, None, |request| {
                request.json(credentials)
            })
            .await?;

        let user = self.establish_session(response.into_data(Operation::Login)?)?;

        info!(user_id = user.id, "logged in");

        Ok(user)
    }

    /// End the session on the server, then drop the local token.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` without a request when no token is stored.
    /// A rejected logout keeps the token.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let token = self.require_token()?;

        let response: ApiResponse<IgnoredAny> = self
            .call(
                Operation::Logout,
                Method::DELETE,
                LOGOUT_PATH,
                Some(&token),
                |request| request,
            )
            .await?;

        response.into_unit(Operation::Logout)?;
        self.store.clear_token()?;

        info!("logged out");

        Ok(())
    }

    /// Fetch the user the stored token belongs to.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` without a request when no token is stored.
    pub async fn current_user(&self) -> Result<User, AuthError> {
        let token = self.require_token()?;

        let response: ApiResponse<UserPayload> = self
            .call(
                Operation::CurrentUser,
                Method::GET,
                ME_PATH,
                Some(&token),
                |request| request,
            )
            .await?;

        Ok(response.into_data(Operation::CurrentUser)?.user)
    }

    /// Ask the server to (re)send the confirmation email.
    ///
    /// # Errors
    /// Returns an error if the request fails or the server rejects it.
    pub async fn send_confirmation(&self, email: &str) -> Result<(), AuthError> {
        let body = ConfirmationRequest { email };
        let response: ApiResponse<IgnoredAny> = self
            .call(
                Operation::SendConfirmation,
                Method::POST,
                CONFIRMATION_PATH,
                None,
                |request| request.json(&body),
            )
            .await?;

        response.into_unit(Operation::SendConfirmation)
    }

    /// Confirm an email address with the token from the confirmation link.
    ///
    /// # Errors
    /// Returns an error if the request fails or the token is rejected.
    pub async fn confirm_email(&self, confirmation_token: &str) -> Result<User, AuthError> {
        let response: ApiResponse<UserPayload> = self
            .call(
                Operation::ConfirmEmail,
                Method::GET,
                CONFIRMATION_PATH,
                None,
                |request| request.query(&[("confirmation_token", confirmation_token)]),
            )
            .await?;

        Ok(response.into_data(Operation::ConfirmEmail)?.user)
    }

    /// Request a password reset email.
    ///
    /// # Errors
    /// Returns an error if the request fails or the server rejects it.
    pub async fn send_password_reset(
        &self,
        request: &PasswordResetRequest,
    ) -> Result<(), AuthError> {
        let response: ApiResponse<IgnoredAny> = self
            .call(
                Operation::SendPasswordReset,
                Method::POST,
                PASSWORD_PATH,
                None,
                |builder| builder.json(request),
            )
            .await?;

        response.into_unit(Operation::SendPasswordReset)
    }

    /// Set a new password with a reset token; the server opens a new session.
    ///
    /// # Errors
    /// Returns an error if the request fails or the server rejects it.
    pub async fn reset_password(&self, update: &PasswordUpdate) -> Result<User, AuthError> {
        let response: ApiResponse<AuthPayload> = self
            .call(
                Operation::ResetPassword,
                Method::PUT,
                PASSWORD_PATH,
                None,
                |request| request.json(update),
            )
            .await?;

        let user = self.establish_session(response.into_data(Operation::ResetPassword)?)?;

        info!(user_id = user.id, "password reset");

        Ok(user)
    }

    /// Change the password of the logged-in user.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` without a request when no token is stored.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<User, AuthError> {
        let token = self.require_token()?;

        let response: ApiResponse<UserPayload> = self
            .call(
                Operation::ChangePassword,
                Method::PUT,
                PASSWORD_CHANGE_PATH,
                Some(&token),
                |request| request.json(change),
            )
            .await?;

        Ok(response.into_data(Operation::ChangePassword)?.user)
    }

    fn require_token(&self) -> Result<SecretString, AuthError> {
        self.store
            .get_token()
            .map(SecretString::from)
            .ok_or(AuthError::NotAuthenticated)
    }

    fn establish_session(&self, payload: AuthPayload) -> Result<User, AuthError> {
        match payload.token.as_deref() {
            Some(token) if !token.is_empty() => self.store.set_token(token)?,
            _ => debug!("response carried no session token"),
        }

        Ok(payload.user)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and decode the envelope, whatever the HTTP status.
    /// Sending, reading and decoding all happen inside the request span.
    async fn call<T, F>(
        &self,
        operation: Operation,
        method: Method,
        path: &str,
        token: Option<&SecretString>,
        build: F,
    ) -> Result<ApiResponse<T>, AuthError>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.endpoint(path);

        let span = info_span!(
            "auth.request",
            operation = %operation,
            http.method = %method,
            url = %url
        );

        let mut request = self.http.request(method, &url);
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }

        async move {
            let response = build(request).send().await?;

            let status = response.status();
            let body = response.bytes().await?;

            debug!(status = %status, "auth response received");

            let mut envelope: ApiResponse<T> = serde_json::from_slice(&body)
                .map_err(|source| AuthError::Decode { status, source })?;
            envelope.status = status;

            Ok::<_, AuthError>(envelope)
        }
        .instrument(span)
        .await
    }
}

fn normalize_base_url(base_url: Option<&str>) -> Result<String, AuthError> {
    let base_url = base_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BASE_URL);

    let parsed = Url::parse(base_url)?;
    if !matches!(parsed.scheme(), "http" | "https")
        || parsed.host().is_none()
        || parsed.query().is_some()
        || parsed.fragment().is_some()
    {
        return Err(AuthError::UnsupportedBaseUrl(base_url.to_string()));
    }

    Ok(base_url.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;

    fn client(base_url: Option<&str>) -> Result<AuthClient, AuthError> {
        AuthClient::new(base_url, Arc::new(MemoryTokenStore::new()))
    }

    #[test]
    fn falls_back_to_default_base_url() {
        assert_eq!(client(None).unwrap().base_url(), DEFAULT_BASE_URL);
        assert_eq!(client(Some("   ")).unwrap().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn trims_trailing_slashes() {
        let client = client(Some("https://api.mealplan.dev/")).unwrap();
        assert_eq!(client.base_url(), "https://api.mealplan.dev");
        assert_eq!(
            client.endpoint(ME_PATH),
            "https://api.mealplan.dev/api/auth/me"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let client = client(Some("https://mealplan.dev/backend")).unwrap();
        assert_eq!(
            client.endpoint(LOGIN_PATH),
            "https://mealplan.dev/backend/api/auth/login"
        );
    }

    #[test]
    fn rejects_invalid_base_urls() {
        assert!(matches!(
            client(Some("not a url")),
            Err(AuthError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            client(Some("ftp://files.mealplan.dev")),
            Err(AuthError::UnsupportedBaseUrl(_))
        ));
    }

    #[test]
    fn rejects_base_urls_with_query_or_fragment() {
        for base_url in [
            "http://api.mealplan.dev/?x=1",
            "http://api.mealplan.dev/#top",
            "http://api.mealplan.dev?",
        ] {
            assert!(
                matches!(client(Some(base_url)), Err(AuthError::UnsupportedBaseUrl(_))),
                "{base_url} should be rejected"
            );
        }
    }

    #[test]
    fn authenticated_follows_store() {
        let store = Arc::new(MemoryTokenStore::with_token("token"));
        let client = AuthClient::new(None, store.clone()).unwrap();
        assert!(client.is_authenticated());

        store.clear_token().unwrap();
        assert!(!client.is_authenticated());
    }

    #[test]
    fn debug_hides_token() {
        let store = Arc::new(MemoryTokenStore::with_token("very-secret-token"));
        let client = AuthClient::new(None, store).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("authenticated: true"));
        assert!(!debug.contains("very-secret-token"));
    }

    mod spans {
        use super::*;
        use std::{net::TcpListener, sync::Mutex};
        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::{
            layer::{Context, SubscriberExt},
            registry::LookupSpan,
            Layer, Registry,
        };
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        type Seen = Arc<Mutex<Vec<(String, Level, Option<String>)>>>;

        struct EventSpans(Seen);

        impl<S> Layer<S> for EventSpans
        where
            S: Subscriber + for<'a> LookupSpan<'a>,
        {
            fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
                let span = ctx.event_span(event).map(|span| span.name().to_string());
                let metadata = event.metadata();
                self.0
                    .lock()
                    .unwrap()
                    .push((metadata.target().to_string(), *metadata.level(), span));
            }
        }

        #[tokio::test]
        async fn response_is_handled_inside_request_span() {
            if TcpListener::bind("127.0.0.1:0").is_err() {
                eprintln!("Skipping test: cannot bind localhost");
                return;
            }
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(CONFIRMATION_PATH))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({"success": true, "message": "sent"})),
                )
                .mount(&server)
                .await;

            let seen = Seen::default();
            let subscriber = Registry::default().with(EventSpans(seen.clone()));
            let _guard = tracing::subscriber::set_default(subscriber);

            let client = client(Some(&server.uri())).unwrap();
            client.send_confirmation("cook@mealplan.dev").await.unwrap();

            let seen = seen.lock().unwrap();
            assert!(seen.iter().any(|(target, level, span)| {
                target == module_path!().trim_end_matches("::tests::spans")
                    && *level == Level::DEBUG
                    && span.as_deref() == Some("auth.request")
            }));
        }
    }
}
