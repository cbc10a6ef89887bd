//! Response types for HTTP handlers.

mod accounts;
mod admin;
mod authentications;
mod error_response;
mod monitors;

pub use accounts::{AccountResponse, AccountSummary};
pub use admin::{
    AccountMessageResponse, ActivityLogResponse, AdminStatsResponse, LoginEntry, MessageResponse,
    SettingsMessageResponse, SystemHealthResponse, SystemMetrics, SystemStatus,
};
pub use authentications::{AuthResponse, VerifyTokenResponse};
pub use error_response::ErrorResponse;
pub use monitors::{DatabaseHealth, HealthResponse};
