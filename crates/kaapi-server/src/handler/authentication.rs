//! Registration, login and token verification, plus the account
//! management routes of the `/api/auth` prefix.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use kaapi_postgres::model::UpdateAccount;

use crate::extract::{AuthState, ClientAddress, Json, Path, ValidateJson};
use crate::handler::request::{AccountPathParams, Login, Register, UpdateAdmin};
use crate::handler::response::{
    AccountMessageResponse, AccountResponse, AuthResponse, MessageResponse, VerifyTokenResponse,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::middleware::RouterAuthExt;
use crate::service::{Authentication, CredentialStore, ServiceState, SessionKeys};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "kaapi_server::handler::authentication";

/// Replaces the message of server-side failures, keeping client errors as is.
fn with_failure_message(error: impl Into<Error<'static>>, message: &'static str) -> Error<'static> {
    let error = error.into();
    match error.kind() {
        ErrorKind::InternalServerError => error.with_message(message),
        _ => error,
    }
}

fn user_not_found() -> Error<'static> {
    ErrorKind::NotFound
        .with_message("User not found")
        .with_resource("users")
}

/// Creates an account and returns a token for it.
#[tracing::instrument(skip_all)]
async fn register(
    State(credentials): State<CredentialStore>,
    State(session_keys): State<SessionKeys>,
    ValidateJson(request): ValidateJson<Register>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    tracing::debug!(target: TRACING_TARGET, "Registration attempt");

    let account = credentials
        .create(request.name(), request.email(), request.password())
        .await
        .map_err(|e| with_failure_message(e, "Error creating user"))?;

    let token = session_keys
        .issue(account.id, account.is_admin)
        .map_err(|e| with_failure_message(e, "Error creating user"))?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        is_admin = account.is_admin,
        "Account registered"
    );

    let response = AuthResponse {
        token,
        user: account.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Checks credentials, records the login and returns a token.
///
/// Unknown emails, wrong passwords and deactivated accounts all answer with
/// the same `Invalid credentials` message. The actual reason is logged.
#[tracing::instrument(skip_all)]
async fn login(
    State(credentials): State<CredentialStore>,
    State(session_keys): State<SessionKeys>,
    client_address: ClientAddress,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<Json<AuthResponse>> {
    let outcome = credentials
        .authenticate(request.email(), request.password())
        .await
        .map_err(|e| with_failure_message(e, "Error during login"))?;

    let account = match outcome {
        Authentication::Accepted(account) => account,
        rejected => {
            tracing::warn!(
                target: TRACING_TARGET,
                email = %request.email(),
                reason = rejected.reason(),
                "Login rejected"
            );

            return Err(ErrorKind::BadRequest
                .with_message("Invalid credentials")
                .with_resource("authentication"));
        }
    };

    let account = credentials
        .promote_seed_admin(account)
        .await
        .map_err(|e| with_failure_message(e, "Error during login"))?;

    let token = session_keys
        .issue(account.id, account.is_admin)
        .map_err(|e| with_failure_message(e, "Error during login"))?;

    credentials
        .record_login(account.id, client_address.ip_net())
        .await
        .map_err(|e| with_failure_message(e, "Error during login"))?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        is_admin = account.is_admin,
        "Login succeeded"
    );

    Ok(Json(AuthResponse {
        token,
        user: account.into(),
    }))
}

/// Returns the account behind the presented token.
#[tracing::instrument(skip_all)]
async fn verify_token(auth_state: AuthState) -> Result<Json<VerifyTokenResponse>> {
    tracing::debug!(
        target: TRACING_TARGET,
        account_id = %auth_state.account_id(),
        "Token verified"
    );

    Ok(Json(VerifyTokenResponse {
        user: auth_state.into_account().into(),
    }))
}

/// Lists all accounts, newest first.
#[tracing::instrument(skip_all)]
async fn list_users(
    State(credentials): State<CredentialStore>,
) -> Result<Json<Vec<AccountResponse>>> {
    let accounts = credentials.list().await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Permanently deletes an account.
#[tracing::instrument(skip_all)]
async fn delete_user(
    State(credentials): State<CredentialStore>,
    auth_state: AuthState,
    Path(path): Path<AccountPathParams>,
) -> Result<Json<MessageResponse>> {
    if !credentials.delete(path.id).await? {
        return Err(user_not_found());
    }

    tracing::warn!(
        target: TRACING_TARGET,
        account_id = %path.id,
        deleted_by = %auth_state.account_id(),
        "Account deleted"
    );

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Grants admin access to the account with the given email.
#[tracing::instrument(skip_all)]
async fn update_admin(
    State(credentials): State<CredentialStore>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<UpdateAdmin>,
) -> Result<Json<AccountMessageResponse>> {
    let account = credentials
        .find_by_email(request.email())
        .await?
        .ok_or_else(user_not_found)?;

    let updates = UpdateAccount::admin_flag(true);
    let account = credentials
        .update(account.id, updates)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        granted_by = %auth_state.account_id(),
        "Admin access granted"
    );

    Ok(Json(AccountMessageResponse::new(
        "Admin status updated successfully",
        account,
    )))
}

/// Returns a [`Router`] with the `/api/auth` routes.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    let public = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let authenticated = Router::new()
        .route("/api/auth/verifyToken", get(verify_token))
        .with_authentication(state.clone());

    let admin = Router::new()
        .route("/api/auth/users", get(list_users))
        .route("/api/auth/users/{id}", delete(delete_user))
        .route("/api/auth/update-admin", post(update_admin))
        .with_admin_authentication(state);

    public.merge(authenticated).merge(admin)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::response::ErrorResponse;
    use crate::handler::test::{SEED_ADMIN_EMAIL, create_account, create_test_server_with_router};

    fn message(response: &axum_test::TestResponse) -> String {
        response.json::<ErrorResponse>().message.into_owned()
    }

    #[tokio::test]
    async fn register_login_verify_scenario() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(routes)?;

        let response = server
            .post("/api/auth/register")
            .json(&json!({"name": "Jane", "email": "jane@x.com", "password": "secret1"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let registered = response.json::<AuthResponse>();
        assert!(!registered.token.is_empty());
        assert_eq!(registered.user.email, "jane@x.com");
        assert!(!registered.user.is_admin);

        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": "jane@x.com", "password": "secret1"}))
            .await;
        response.assert_status_ok();
        let logged_in = response.json::<AuthResponse>();
        assert_eq!(logged_in.user.id, registered.user.id);

        let response = server
            .get("/api/auth/verifyToken")
            .authorization_bearer(&logged_in.token)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["user"]["email"], "jane@x.com");
        assert_eq!(body["user"]["isAdmin"], false);
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("passwordHash").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn register_validation_messages() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(routes)?;

        let cases = [
            (json!({"name": "Jane", "email": "jane@x.com"}), "All fields are required"),
            (
                json!({"name": "Jane", "email": "jane@x.com", "password": "12345"}),
                "Password must be at least 6 characters long",
            ),
            (
                json!({"name": "Jane", "email": "jane-at-x", "password": "secret1"}),
                "Please enter a valid email",
            ),
        ];

        for (body, expected) in cases {
            let response = server.post("/api/auth/register").json(&body).await;
            response.assert_status_bad_request();
            assert_eq!(message(&response), expected);
        }

        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_duplicates_in_any_case() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(routes)?;
        let body = json!({"name": "Jane", "email": "jane@x.com", "password": "secret1"});
        server.post("/api/auth/register").json(&body).await;

        let body = json!({"name": "Jane", "email": "JANE@X.COM", "password": "secret1"});
        let response = server.post("/api/auth/register").json(&body).await;
        response.assert_status_bad_request();
        assert_eq!(message(&response), "User already exists");
        Ok(())
    }

    #[tokio::test]
    async fn login_failures_share_one_message() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(routes)?;
        create_account(&state, "Jane", "jane@x.com", false).await?;

        for body in [
            json!({"email": "jane@x.com", "password": "wrong"}),
            json!({"email": "nobody@x.com", "password": "secret1"}),
        ] {
            let response = server.post("/api/auth/login").json(&body).await;
            response.assert_status_bad_request();
            assert_eq!(message(&response), "Invalid credentials");
        }

        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": "jane@x.com"}))
            .await;
        response.assert_status_bad_request();
        assert_eq!(message(&response), "Email and password are required");
        Ok(())
    }

    #[tokio::test]
    async fn deactivated_accounts_cannot_log_in() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(routes)?;
        let (account, token) = create_account(&state, "Jane", "jane@x.com", false).await?;

        let updates = UpdateAccount {
            is_active: Some(false),
            ..Default::default()
        };
        state.credentials.update(account.id, updates).await?;

        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": "jane@x.com", "password": "secret1"}))
            .await;
        response.assert_status_bad_request();
        assert_eq!(message(&response), "Invalid credentials");

        let response = server
            .get("/api/auth/verifyToken")
            .authorization_bearer(&token)
            .await;
        response.assert_status_unauthorized();
        assert_eq!(message(&response), "Not authorized, account is deactivated");
        Ok(())
    }

    #[tokio::test]
    async fn login_records_history() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(routes)?;
        let (account, _) = create_account(&state, "Jane", "jane@x.com", false).await?;

        server
            .post("/api/auth/login")
            .json(&json!({"email": "jane@x.com", "password": "secret1"}))
            .await
            .assert_status_ok();

        let history = state.credentials.login_history(account.id).await?;
        assert_eq!(history.len(), 1);
        let account = state.credentials.find_by_id(account.id).await?;
        assert!(account.and_then(|a| a.last_login_at).is_some());
        Ok(())
    }

    #[tokio::test]
    async fn seed_admin_is_promoted_on_login() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(routes)?;
        let (account, _) = create_account(&state, "Owner", SEED_ADMIN_EMAIL, false).await?;
        assert!(account.is_admin);

        let updates = UpdateAccount::admin_flag(false);
        state.credentials.update(account.id, updates).await?;

        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": SEED_ADMIN_EMAIL, "password": "secret1"}))
            .await;
        response.assert_status_ok();
        assert!(response.json::<AuthResponse>().user.is_admin);
        Ok(())
    }

    #[tokio::test]
    async fn verify_token_rejections() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(routes)?;

        let response = server.get("/api/auth/verifyToken").await;
        response.assert_status_unauthorized();
        assert_eq!(message(&response), "Not authorized, no token");

        let response = server
            .get("/api/auth/verifyToken")
            .authorization("Basic amFuZTpzZWNyZXQx")
            .await;
        response.assert_status_unauthorized();
        assert_eq!(message(&response), "Not authorized, no token");

        let response = server
            .get("/api/auth/verifyToken")
            .authorization_bearer("not.a.token")
            .await;
        response.assert_status_unauthorized();
        assert_eq!(message(&response), "Not authorized, token failed");

        let (account, token) = create_account(&state, "Jane", "jane@x.com", false).await?;
        state.credentials.delete(account.id).await?;
        let response = server
            .get("/api/auth/verifyToken")
            .authorization_bearer(&token)
            .await;
        response.assert_status_unauthorized();
        assert_eq!(message(&response), "Not authorized, user not found");
        Ok(())
    }

    #[tokio::test]
    async fn admin_routes_require_admin() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(routes)?;
        let (_, customer_token) = create_account(&state, "Jane", "jane@x.com", false).await?;
        let (_, admin_token) = create_account(&state, "Ann", "ann@x.com", true).await?;

        let response = server
            .get("/api/auth/users")
            .authorization_bearer(&customer_token)
            .await;
        response.assert_status_forbidden();
        assert_eq!(message(&response), "Access denied. Admin privileges required.");

        let response = server
            .get("/api/auth/users")
            .authorization_bearer(&admin_token)
            .await;
        response.assert_status_ok();
        let users: Vec<Value> = response.json();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.get("passwordHash").is_none()));
        Ok(())
    }

    #[tokio::test]
    async fn admin_deletes_user() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(routes)?;
        let (customer, _) = create_account(&state, "Jane", "jane@x.com", false).await?;
        let (_, admin_token) = create_account(&state, "Ann", "ann@x.com", true).await?;

        let path = format!("/api/auth/users/{}", customer.id);
        let response = server.delete(&path).authorization_bearer(&admin_token).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "User deleted successfully");

        let response = server.delete(&path).authorization_bearer(&admin_token).await;
        response.assert_status_not_found();
        assert_eq!(message(&response), "User not found");

        let response = server
            .delete("/api/auth/users/not-a-uuid")
            .authorization_bearer(&admin_token)
            .await;
        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn admin_grants_admin_by_email() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(routes)?;
        create_account(&state, "Jane", "jane@x.com", false).await?;
        let (_, admin_token) = create_account(&state, "Ann", "ann@x.com", true).await?;

        let response = server
            .post("/api/auth/update-admin")
            .authorization_bearer(&admin_token)
            .json(&json!({"email": "Jane@X.com"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Admin status updated successfully");
        assert_eq!(body["user"]["isAdmin"], true);
        assert_eq!(body["user"]["adminRole"], "none");

        let response = server
            .post("/api/auth/update-admin")
            .authorization_bearer(&admin_token)
            .json(&json!({"email": "nobody@x.com"}))
            .await;
        response.assert_status_not_found();
        Ok(())
    }
}
