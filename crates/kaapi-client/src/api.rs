//! Auth API seam and its reqwest implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Tracing target for auth API calls.
pub const TRACING_TARGET: &str = "kaapi_client::api";

/// Account as returned by the auth endpoints.
///
/// Extra fields sent to admins are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Token and account returned by login and registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Calls made by the session store.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /api/auth/login`.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// `POST /api/auth/register`.
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthSession>;

    /// `GET /api/auth/verifyToken`.
    async fn verify_token(&self, token: &str) -> Result<User>;
}

/// Settings for [`HttpAuthApi`].
#[derive(Debug, Clone)]
pub struct HttpAuthApiConfig {
    /// Origin of the API server, e.g. `http://localhost:5002`.
    pub base_url: String,
    /// Whole-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl HttpAuthApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            user_agent: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("kaapi-client/{}", env!("CARGO_PKG_VERSION")))
    }
}

struct HttpAuthApiInner {
    http: Client,
    base_url: Url,
}

/// [`AuthApi`] over HTTP.
#[derive(Clone)]
pub struct HttpAuthApi {
    inner: Arc<HttpAuthApiInner>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Login and registration bodies, with every field optional so that a
/// partial body is reported as [`Error::InvalidResponse`].
#[derive(Deserialize)]
struct SessionBody {
    token: Option<String>,
    user: Option<User>,
}

#[derive(Deserialize)]
struct VerifyBody {
    user: Option<User>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpAuthApi {
    /// Creates a client for the API at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be
    /// built.
    pub fn new(config: HttpAuthApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| Error::Request(Box::new(e)))?;

        let mut builder = Client::builder().user_agent(config.effective_user_agent());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| Error::Request(Box::new(e)))?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %base_url,
            "Auth API client created"
        );

        Ok(Self {
            inner: Arc::new(HttpAuthApiInner { http, base_url }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| Error::Request(Box::new(e)))
    }

    /// Turns a response into its body, or into [`Error::Server`] for error
    /// statuses.
    async fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::server_error(status, response).await);
        }

        response.json::<T>().await.map_err(|err| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                "Success response body could not be decoded"
            );
            Error::InvalidResponse
        })
    }

    async fn server_error(status: StatusCode, response: Response) -> Error {
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);

        tracing::debug!(
            target: TRACING_TARGET,
            status = status.as_u16(),
            has_message = message.is_some(),
            "Auth API returned an error"
        );

        Error::Server {
            status: status.as_u16(),
            message,
        }
    }

    async fn post_session<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<AuthSession> {
        let response = self
            .inner
            .http
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await
            .map_err(Error::from_transport)?;

        let body: SessionBody = Self::read(response).await?;
        match (body.token, body.user) {
            (Some(token), Some(user)) if !token.is_empty() => Ok(AuthSession { token, user }),
            _ => Err(Error::InvalidResponse),
        }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.post_session("/api/auth/login", &LoginBody { email, password })
            .await
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthSession> {
        let body = RegisterBody {
            name,
            email,
            password,
        };
        self.post_session("/api/auth/register", &body).await
    }

    async fn verify_token(&self, token: &str) -> Result<User> {
        let response = self
            .inner
            .http
            .get(self.endpoint("/api/auth/verifyToken")?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Error::from_transport)?;

        let body: VerifyBody = Self::read(response).await?;
        body.user.ok_or(Error::InvalidResponse)
    }
}

impl std::fmt::Debug for HttpAuthApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAuthApi")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;

    const USER_ID: &str = "8a4f3c1e-2b7d-4e59-9c0a-1f6b2d3e4a5b";

    fn user_json() -> Value {
        json!({ "id": USER_ID, "name": "Jane", "email": "jane@x.com", "isAdmin": false })
    }

    async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        match (body["email"].as_str(), body["password"].as_str()) {
            (Some("jane@x.com"), Some("secret1")) => (
                StatusCode::OK,
                Json(json!({ "token": "token-1", "user": user_json() })),
            ),
            (Some("partial@x.com"), _) => (StatusCode::OK, Json(json!({ "token": "token-1" }))),
            _ => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "name": "bad_request", "message": "Invalid credentials" })),
            ),
        }
    }

    async fn register() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "oops")
    }

    async fn verify(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "Bearer token-1");

        if authorized {
            (StatusCode::OK, Json(json!({ "user": user_json() })))
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Not authorized, token failed" })),
            )
        }
    }

    async fn spawn_server() -> anyhow::Result<SocketAddr> {
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/verifyToken", get(verify));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, app).await });
        Ok(addr)
    }

    fn api(addr: SocketAddr) -> anyhow::Result<HttpAuthApi> {
        let config = HttpAuthApiConfig::new(format!("http://{addr}"))
            .with_timeout(Duration::from_secs(5));
        Ok(HttpAuthApi::new(config)?)
    }

    #[tokio::test]
    async fn login_and_verify() -> anyhow::Result<()> {
        let api = api(spawn_server().await?)?;

        let session = api.login("jane@x.com", "secret1").await?;
        assert_eq!(session.token, "token-1");
        assert_eq!(session.user.email, "jane@x.com");
        assert!(!session.user.is_admin);

        let user = api.verify_token(&session.token).await?;
        assert_eq!(user, session.user);
        Ok(())
    }

    #[tokio::test]
    async fn server_messages_are_carried() -> anyhow::Result<()> {
        let api = api(spawn_server().await?)?;

        let error = api.login("jane@x.com", "wrong").await.unwrap_err();
        assert!(matches!(
            error,
            Error::Server { status: 400, message: Some(ref m) } if m == "Invalid credentials"
        ));

        let error = api.verify_token("stale").await.unwrap_err();
        assert!(error.is_unauthorized());

        let error = api.register("Jane", "jane@x.com", "secret1").await.unwrap_err();
        assert!(matches!(error, Error::Server { status: 500, message: None }));
        Ok(())
    }

    #[tokio::test]
    async fn partial_session_is_invalid() -> anyhow::Result<()> {
        let api = api(spawn_server().await?)?;

        let error = api.login("partial@x.com", "secret1").await.unwrap_err();
        assert!(matches!(error, Error::InvalidResponse));
        Ok(())
    }

    #[tokio::test]
    async fn closed_port_is_no_response() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let error = api(addr)?.login("jane@x.com", "secret1").await.unwrap_err();
        assert!(matches!(error, Error::NoResponse(_)));
        Ok(())
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let error = HttpAuthApi::new(HttpAuthApiConfig::new("not a url")).unwrap_err();
        assert!(matches!(error, Error::Request(_)));
    }
}
