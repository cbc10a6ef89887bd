//! Admin dashboard routes of the `/api/admin` prefix.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, put};
use jiff::Timestamp;
use kaapi_postgres::model::UpdateAccount;

use crate::extract::{AuthState, Json, Path, ValidateJson};
use crate::handler::request::{AccountPathParams, UpdateAdminSettings, UpdateAdminStatus};
use crate::handler::response::{
    AccountMessageResponse, AccountResponse, ActivityLogResponse, AdminStatsResponse,
    DatabaseHealth, SettingsMessageResponse, SystemHealthResponse, SystemStatus,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::middleware::RouterAuthExt;
use crate::service::{CredentialStore, ServiceState, Uptime};

/// Tracing target for account administration.
const TRACING_TARGET: &str = "kaapi_server::handler::admin";

fn user_not_found() -> Error<'static> {
    ErrorKind::NotFound
        .with_message("User not found")
        .with_resource("users")
}

/// Lists all accounts with their admin fields.
#[tracing::instrument(skip_all)]
async fn list_users(
    State(credentials): State<CredentialStore>,
) -> Result<Json<Vec<AccountResponse>>> {
    let accounts = credentials.list().await?;

    tracing::debug!(
        target: TRACING_TARGET,
        count = accounts.len(),
        "Accounts listed"
    );

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Returns account counts.
#[tracing::instrument(skip_all)]
async fn stats(State(credentials): State<CredentialStore>) -> Result<Json<AdminStatsResponse>> {
    let statistics = credentials.statistics().await?;
    Ok(Json(statistics.into()))
}

/// Returns account metrics together with uptime and database status.
#[tracing::instrument(skip_all)]
async fn system_health(
    State(credentials): State<CredentialStore>,
    State(uptime): State<Uptime>,
) -> Result<Json<SystemHealthResponse>> {
    let statistics = credentials.statistics().await?;
    let connected = credentials.is_available().await;

    tracing::debug!(
        target: TRACING_TARGET,
        recent_logins = statistics.recent_logins,
        database_connected = connected,
        "System health requested"
    );

    Ok(Json(SystemHealthResponse {
        metrics: statistics.into(),
        system_status: SystemStatus {
            uptime: uptime.elapsed().as_secs_f64(),
            timestamp: Timestamp::now(),
            database: DatabaseHealth { connected },
        },
    }))
}

/// Changes the role and permissions of an account.
#[tracing::instrument(skip_all)]
async fn update_admin_status(
    State(credentials): State<CredentialStore>,
    auth_state: AuthState,
    Path(path): Path<AccountPathParams>,
    ValidateJson(request): ValidateJson<UpdateAdminStatus>,
) -> Result<Json<AccountMessageResponse>> {
    let account = credentials
        .find_by_id(path.id)
        .await?
        .ok_or_else(user_not_found)?;

    let mut updates = match request.admin_role {
        Some(role) => UpdateAccount::admin_role(role),
        None => UpdateAccount::default(),
    };

    updates.admin_permissions = request
        .merge_permissions(account.permissions())
        .map(|permissions| permissions.to_json());

    let account = credentials
        .update(account.id, updates)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        admin_role = %account.admin_role,
        is_admin = account.is_admin,
        updated_by = %auth_state.account_id(),
        "Admin status updated"
    );

    Ok(Json(AccountMessageResponse::new(
        "User admin status updated successfully",
        account,
    )))
}

/// Activates a deactivated account or deactivates an active one.
#[tracing::instrument(skip_all)]
async fn toggle_status(
    State(credentials): State<CredentialStore>,
    auth_state: AuthState,
    Path(path): Path<AccountPathParams>,
) -> Result<Json<AccountMessageResponse>> {
    let account = credentials
        .find_by_id(path.id)
        .await?
        .ok_or_else(user_not_found)?;

    let updates = UpdateAccount {
        is_active: Some(!account.is_active),
        ..Default::default()
    };

    let account = credentials
        .update(account.id, updates)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        is_active = account.is_active,
        updated_by = %auth_state.account_id(),
        "Account status toggled"
    );

    let message = if account.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };

    Ok(Json(AccountMessageResponse::new(message, account)))
}

/// Returns the login history of the calling admin.
#[tracing::instrument(skip_all)]
async fn activity_log(
    State(credentials): State<CredentialStore>,
    auth_state: AuthState,
) -> Result<Json<ActivityLogResponse>> {
    let logins = credentials.login_history(auth_state.account_id()).await?;
    Ok(Json(ActivityLogResponse::new(auth_state.account(), logins)))
}

/// Updates the dashboard settings of the calling admin.
#[tracing::instrument(skip_all)]
async fn update_settings(
    State(credentials): State<CredentialStore>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<UpdateAdminSettings>,
) -> Result<Json<SettingsMessageResponse>> {
    let settings = request.merge(auth_state.account().settings());
    let encoded = serde_json::to_value(&settings).map_err(|e| {
        ErrorKind::InternalServerError.with_context(format!("failed to encode settings: {e}"))
    })?;

    let updates = UpdateAccount {
        admin_settings: Some(encoded),
        ..Default::default()
    };

    let account = credentials
        .update(auth_state.account_id(), updates)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::debug!(
        target: TRACING_TARGET,
        account_id = %account.id,
        "Admin settings updated"
    );

    Ok(Json(SettingsMessageResponse::new(
        "Admin settings updated successfully",
        account.settings(),
    )))
}

/// Returns a [`Router`] with the `/api/admin` routes.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/stats", get(stats))
        .route("/api/admin/system-health", get(system_health))
        .route(
            "/api/admin/users/{id}/admin-status",
            put(update_admin_status),
        )
        .route("/api/admin/users/{id}/toggle-status", put(toggle_status))
        .route("/api/admin/activity-log", get(activity_log))
        .route("/api/admin/settings", put(update_settings))
        .with_admin_authentication(state)
}
