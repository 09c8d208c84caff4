//! Authenticated HTTP wrapper
//!
//! [`ApiClient`] is the single point of egress for API calls. It injects the
//! cached bearer token, and on a 401 performs at most one token refresh before
//! replaying the request once. Refreshes are serialised: callers that hit a
//! 401 while another caller is refreshing wait for that outcome instead of
//! starting their own.
//!
//! Hooks registered with [`ApiClient::on_identity_change`] run whenever the
//! signed-in identity goes away or is replaced: on logout, on a failed
//! refresh and on a fresh login. A refresh keeps the identity and runs none.

use common::Envelope;
use common::models::{RefreshTokenRequest, TokenResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::tokens::{FileTokenStore, MemoryTokenStore, TokenPair, TokenStore};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

struct Inner {
    transport: Arc<dyn Transport>,
    store: Arc<dyn TokenStore>,
    tokens: RwLock<Option<TokenPair>>,
    refresh_lock: Mutex<()>,
    identity_hooks: RwLock<Vec<IdentityHook>>,
}

type IdentityHook = Arc<dyn Fn() + Send + Sync>;

/// Cheaply cloneable handle; clones share tokens and the refresh lock
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl ApiClient {
    /// Build a client, loading any persisted tokens from `store`
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn TokenStore>) -> Self {
        let tokens = match store.load() {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Ignoring unreadable stored tokens: {}", e);
                None
            }
        };

        Self {
            inner: Arc::new(Inner {
                transport,
                store,
                tokens: RwLock::new(tokens),
                refresh_lock: Mutex::new(()),
                identity_hooks: RwLock::new(Vec::new()),
            }),
        }
    }

    /// reqwest transport and file or memory token store per `config`
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::new(config.base_url.clone(), config.timeout)?;
        let store: Arc<dyn TokenStore> = match &config.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Ok(Self::new(Arc::new(transport), store))
    }

    pub fn tokens(&self) -> Option<TokenPair> {
        self.inner
            .tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens().map(|t| t.access_token)
    }

    pub fn has_tokens(&self) -> bool {
        self.inner
            .tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Cache and persist a new token pair
    ///
    /// The in-memory copy is updated even when persisting fails.
    pub fn set_tokens(&self, tokens: TokenPair) -> ClientResult<()> {
        let result = self.inner.store.save(&tokens);
        *self.inner.tokens.write().unwrap_or_else(|e| e.into_inner()) = Some(tokens);
        result.map_err(ClientError::from)
    }

    /// Install the token pair of a new sign-in
    ///
    /// Unlike [`ApiClient::set_tokens`] this runs the identity hooks first.
    pub fn begin_session(&self, tokens: TokenPair) -> ClientResult<()> {
        self.notify_identity_change();
        self.set_tokens(tokens)
    }

    /// Forget the token pair; storage failures are logged, never returned
    pub fn clear_tokens(&self) {
        *self.inner.tokens.write().unwrap_or_else(|e| e.into_inner()) = None;
        if let Err(e) = self.inner.store.clear() {
            warn!("Failed to remove stored tokens: {}", e);
        }
        self.notify_identity_change();
    }

    /// Run `hook` whenever the signed-in identity is dropped or replaced
    pub fn on_identity_change(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.inner
            .identity_hooks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(hook));
    }

    fn notify_identity_change(&self) {
        let hooks = self
            .inner
            .identity_hooks
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        for hook in hooks {
            hook();
        }
    }

    /// Send with the cached bearer token, refreshing once on 401
    ///
    /// Returns the response when its status is 2xx.
    pub async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let sent_with = self.access_token();
        let response = self.dispatch(request.clone(), sent_with.as_deref()).await?;

        if response.status != 401 {
            return check_status(response);
        }

        let message = error_message(&response);
        let Some(stale) = sent_with else {
            return Err(ClientError::Unauthorized(message));
        };

        if !self.refresh_after(&stale).await {
            return Err(ClientError::Unauthorized(message));
        }

        debug!("Replaying {} {} with refreshed token", request.method, request.path);
        let token = self.access_token();
        let retried = self.dispatch(request, token.as_deref()).await?;
        check_status(retried)
    }

    /// Send without a bearer token and without refresh handling
    pub async fn send_public(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let response = self.dispatch(request, None).await?;
        check_status(response)
    }

    /// Send and unwrap the `data` of an enveloped response
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let response = self.send(request).await?;
        unwrap_envelope(&response)
    }

    /// Send and return the envelope message, for endpoints without a payload
    pub async fn fetch_message(&self, request: ApiRequest) -> ClientResult<Option<String>> {
        let response = self.send(request).await?;
        if response.body.is_empty() {
            return Ok(None);
        }
        let envelope: Envelope<Value> = response.decode()?;
        let message = envelope.message.clone();
        envelope.into_result()?;
        Ok(message)
    }

    /// Exchange the refresh token for a new pair
    ///
    /// Never fails: returns whether the exchange succeeded. On failure the
    /// cached tokens are cleared.
    pub async fn refresh_access_token(&self) -> bool {
        let _guard = self.inner.refresh_lock.lock().await;
        match self.tokens() {
            Some(tokens) => self.exchange(tokens.refresh_token).await,
            None => false,
        }
    }

    /// Refresh unless a concurrent caller already replaced `stale`
    async fn refresh_after(&self, stale: &str) -> bool {
        let _guard = self.inner.refresh_lock.lock().await;
        match self.tokens() {
            // A refresh that ran while we waited already failed
            None => false,
            Some(tokens) if tokens.access_token != stale => true,
            Some(tokens) => self.exchange(tokens.refresh_token).await,
        }
    }

    async fn exchange(&self, refresh_token: String) -> bool {
        let request = match ApiRequest::post("/api/auth/refresh")
            .json(&RefreshTokenRequest { refresh_token })
        {
            Ok(request) => request,
            Err(e) => {
                error!("Failed to encode refresh request: {}", e);
                return false;
            }
        };

        let outcome = match self.dispatch(request, None).await {
            Ok(response) if response.is_success() => unwrap_flexible::<TokenResponse>(&response),
            Ok(response) => Err(ClientError::from_status(
                response.status,
                error_message(&response),
            )),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(tokens) => {
                if let Err(e) = self.set_tokens(tokens.into()) {
                    warn!("Refreshed tokens could not be persisted: {}", e);
                }
                info!("Access token refreshed");
                true
            }
            Err(e) => {
                warn!("Token refresh failed, clearing session: {}", e);
                self.clear_tokens();
                false
            }
        }
    }

    async fn dispatch(&self, mut request: ApiRequest, token: Option<&str>) -> ClientResult<ApiResponse> {
        if let Some(token) = token {
            request.set_header("Authorization", format!("Bearer {}", token));
        }

        let method = request.method.clone();
        let path = request.path.clone();
        debug!("Sending {} {}", method, path);

        self.inner.transport.execute(request).await.map_err(|e| {
            error!("Network error on {} {}: {}", method, path, e);
            ClientError::Network(e)
        })
    }
}

fn check_status(response: ApiResponse) -> ClientResult<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ClientError::from_status(
            response.status,
            error_message(&response),
        ))
    }
}

/// Human-readable reason carried by an error response
///
/// Looks at `message`, then `detail`, then `error`, falling back to the status.
pub fn error_message(response: &ApiResponse) -> String {
    let fallback = || format!("HTTP {}", response.status);
    let Ok(body) = response.decode::<Value>() else {
        return fallback();
    };

    let text = |value: Option<&Value>| -> Option<String> {
        match value? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(map) => map
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            Value::Array(items) => items
                .first()
                .and_then(|item| item.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        }
    };

    text(body.get("message"))
        .or_else(|| text(body.get("detail")))
        .or_else(|| text(body.get("error")))
        .unwrap_or_else(fallback)
}

/// `data` of an enveloped body; `success: false` becomes [`ClientError::Rejected`]
pub fn unwrap_envelope<T: DeserializeOwned>(response: &ApiResponse) -> ClientResult<T> {
    let envelope: Envelope<T> = response.decode()?;
    envelope
        .into_result()?
        .ok_or_else(|| ClientError::Decode("response has no data".to_string()))
}

/// Accept either an envelope or the bare payload
pub fn unwrap_flexible<T: DeserializeOwned>(response: &ApiResponse) -> ClientResult<T> {
    let body: Value = response.decode()?;
    if body.get("success").is_some_and(Value::is_boolean) {
        let envelope: Envelope<T> = serde_json::from_value(body)?;
        envelope
            .into_result()?
            .ok_or_else(|| ClientError::Decode("response has no data".to_string()))
    } else {
        Ok(serde_json::from_value(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_precedence() {
        let both = ApiResponse::json(400, &json!({"message": "Bad title", "detail": "ignored"}));
        assert_eq!(error_message(&both), "Bad title");

        let detail = ApiResponse::json(401, &json!({"detail": "Could not validate credentials"}));
        assert_eq!(error_message(&detail), "Could not validate credentials");

        let error = ApiResponse::json(
            404,
            &json!({"success": false, "error": {"code": "NOT_FOUND", "description": "Image not found"}}),
        );
        assert_eq!(error_message(&error), "Image not found");

        assert_eq!(error_message(&ApiResponse::new(502, "<html>")), "HTTP 502");
    }

    #[test]
    fn test_unwrap_flexible_accepts_both_shapes() {
        let bare = ApiResponse::json(200, &json!({"access_token": "a", "refresh_token": "r"}));
        let token: TokenResponse = unwrap_flexible(&bare).unwrap();
        assert_eq!(token.access_token, "a");

        let wrapped = ApiResponse::json(
            200,
            &json!({"success": true, "data": {"access_token": "b", "refresh_token": "r"}}),
        );
        let token: TokenResponse = unwrap_flexible(&wrapped).unwrap();
        assert_eq!(token.access_token, "b");
    }

    #[test]
    fn test_unwrap_envelope_rejects_failure() {
        let response = ApiResponse::json(200, &json!({"success": false, "message": "Nope"}));
        let result: ClientResult<Vec<i64>> = unwrap_envelope(&response);
        assert!(matches!(result, Err(ClientError::Rejected(message)) if message == "Nope"));
    }
}
