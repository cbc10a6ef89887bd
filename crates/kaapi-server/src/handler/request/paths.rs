//! Path parameter types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `{id}` segment of `/users/{id}` routes.
#[must_use]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AccountPathParams {
    pub id: Uuid,
}
