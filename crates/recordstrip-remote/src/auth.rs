use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::config::RemoteConfig;
use crate::errors::RemoteError;

pub(crate) const AUTH: &str = "auth";

/// A hosted-auth identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated hosted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: AuthUser,
    pub access_token: String,
}

/// Hosted authentication operations, each keyed by email.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Password sign-in. On success the session is retained client-side and
    /// returned by [`Self::current_session`].
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, RemoteError>;

    /// Create a new hosted identity.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<AuthUser, RemoteError>;

    /// The session from the last successful sign-in, if any.
    async fn current_session(&self) -> Option<AuthSession>;
}

/// REST client for the hosted auth endpoint.
pub struct RestAuthClient {
    http: reqwest::Client,
    config: RemoteConfig,
    session: RwLock<Option<AuthSession>>,
}

impl RestAuthClient {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        if config.api_key.trim().is_empty() {
            return Err(RemoteError::Config(
                "auth client api_key must not be empty".into(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::Config(format!("failed to build auth client: {e}")))?;
        Ok(Self {
            http,
            config,
            session: RwLock::new(None),
        })
    }

    async fn post(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: serde_json::Value,
    ) -> Result<serde_json::Value, RemoteError> {
        let response = self
            .http
            .post(self.config.auth_url(path))
            .header("apikey", &self.config.api_key)
            .query(query)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::transport(AUTH, format!("{path} request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(RemoteError::service(
                AUTH,
                format!("{path} failed with status {status}: {body}"),
                Some(status.as_u16()),
            ));
        }
        response
            .json()
            .await
            .map_err(|e| RemoteError::protocol(AUTH, format!("{path} returned invalid JSON: {e}")))
    }
}

fn parse_user(value: &serde_json::Value) -> Result<AuthUser, RemoteError> {
    let user = value.get("user").unwrap_or(value);
    serde_json::from_value(user.clone())
        .map_err(|e| RemoteError::protocol(AUTH, format!("missing user in auth response: {e}")))
}

#[async_trait]
impl AuthService for RestAuthClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, RemoteError> {
        let value = self
            .post(
                "token",
                &[("grant_type", "password")],
                json!({ "email": email, "password": password }),
            )
            .await?;
        let access_token = value
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| RemoteError::protocol(AUTH, "missing access_token in sign-in response"))?
            .to_string();
        let session = AuthSession {
            user: parse_user(&value)?,
            access_token,
        };
        debug!(event = "auth.signed_in", domain = "auth", user_id = %session.user.id);
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<AuthUser, RemoteError> {
        let mut body = json!({ "email": email, "password": password });
        if let Some(name) = full_name {
            body["data"] = json!({ "full_name": name });
        }
        let value = self.post("signup", &[], body).await?;
        let user = parse_user(&value)?;
        debug!(event = "auth.signed_up", domain = "auth", user_id = %user.id);
        Ok(user)
    }

    async fn current_session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_parses_from_nested_and_flat_responses() {
        let id = Uuid::new_v4();
        let nested = json!({ "user": { "id": id, "email": "d@x.com" } });
        let flat = json!({ "id": id, "email": null });
        assert_eq!(parse_user(&nested).unwrap().id, id);
        assert_eq!(parse_user(&flat).unwrap().email, None);
        assert!(parse_user(&json!({ "user": {} })).is_err());
    }
}
