//! Authentication session store

use common::models::{LoginForm, PasswordChange, RefreshTokenRequest, TokenResponse, User};
use common::validation::check;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};
use crate::http::{ApiClient, unwrap_flexible};
use crate::transport::ApiRequest;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    /// A session probe or login is in flight
    Loading,
    Authenticated,
}

#[derive(Debug)]
struct SessionState {
    status: SessionStatus,
    user: Option<User>,
}

/// Current user and authentication flag, backed by the client's tokens
#[derive(Clone)]
pub struct Session {
    client: ApiClient,
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(SessionState {
                status: SessionStatus::Unauthenticated,
                user: None,
            })),
        }
    }

    /// Current status
    ///
    /// An authenticated session whose tokens have since been cleared (a
    /// refresh failed somewhere) reports `Unauthenticated`.
    pub fn status(&self) -> SessionStatus {
        let status = self.state.read().unwrap_or_else(|e| e.into_inner()).status;
        if status == SessionStatus::Authenticated && !self.client.has_tokens() {
            return SessionStatus::Unauthenticated;
        }
        status
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    pub fn current_user(&self) -> Option<User> {
        if !self.is_authenticated() {
            return None;
        }
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .user
            .clone()
    }

    /// Probe the stored tokens at start-up
    pub async fn init(&self) -> SessionStatus {
        if !self.client.has_tokens() {
            self.reset();
            return SessionStatus::Unauthenticated;
        }

        if let Err(e) = self.refresh_user().await {
            warn!("Session probe failed: {}", e);
        }
        self.status()
    }

    /// Fetch the signed-in user with the stored token
    ///
    /// A failure clears the cached user. Tokens are only dropped when the
    /// request's own refresh attempt failed.
    pub async fn refresh_user(&self) -> ClientResult<User> {
        self.set_status(SessionStatus::Loading);

        let outcome = match self.client.send(ApiRequest::get("/api/auth/me")).await {
            Ok(response) => unwrap_flexible::<User>(&response),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(user) => {
                self.set_user(user.clone());
                Ok(user)
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Sign in with a form-encoded username and password
    pub async fn login(&self, form: LoginForm) -> ClientResult<User> {
        check(&form).map_err(ClientError::Validation)?;
        self.set_status(SessionStatus::Loading);

        match self.authenticate(&form).await {
            Ok(user) => {
                info!("Signed in as {}", user.username);
                self.set_user(user.clone());
                Ok(user)
            }
            Err(e) => {
                warn!("Login failed for {}: {}", form.username, e);
                self.reset();
                Err(e)
            }
        }
    }

    async fn authenticate(&self, form: &LoginForm) -> ClientResult<User> {
        let request = ApiRequest::post("/api/auth/login").form(vec![
            ("username".to_string(), form.username.clone()),
            ("password".to_string(), form.password.clone()),
        ]);

        let response = self.client.send_public(request).await?;
        let token: TokenResponse = unwrap_flexible(&response)?;
        let user = token.user.clone();
        self.client.begin_session(token.into())?;

        match user {
            Some(user) => Ok(user),
            None => {
                let response = self.client.send(ApiRequest::get("/api/auth/me")).await?;
                unwrap_flexible(&response)
            }
        }
    }

    /// Revoke the refresh token on a best-effort basis and forget the session
    ///
    /// Local state is cleared even when the server cannot be reached.
    pub async fn logout(&self) {
        if let Some(tokens) = self.client.tokens() {
            let request = ApiRequest::post("/api/auth/logout").json(&RefreshTokenRequest {
                refresh_token: tokens.refresh_token,
            });
            let result = match request {
                Ok(request) => self.client.send_public(request).await.map(|_| ()),
                Err(e) => Err(e.into()),
            };
            if let Err(e) = result {
                warn!("Logout request failed: {}", e);
            }
        }

        self.client.clear_tokens();
        self.reset();
        info!("Signed out");
    }

    /// See [`ApiClient::refresh_access_token`]; a failure also resets the session
    pub async fn refresh_access_token(&self) -> bool {
        let refreshed = self.client.refresh_access_token().await;
        if !refreshed {
            self.reset();
        }
        refreshed
    }

    pub async fn change_password(&self, form: PasswordChange) -> ClientResult<Option<String>> {
        check(&form).map_err(ClientError::Validation)?;
        let request = ApiRequest::post("/api/auth/change-password").json(&form)?;
        self.client.fetch_message(request).await
    }

    fn set_status(&self, status: SessionStatus) {
        self.state.write().unwrap_or_else(|e| e.into_inner()).status = status;
    }

    fn set_user(&self, user: User) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.status = SessionStatus::Authenticated;
        state.user = Some(user);
    }

    fn reset(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.status = SessionStatus::Unauthenticated;
        state.user = None;
    }
}
