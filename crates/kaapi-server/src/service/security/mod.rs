//! Password hashing and bearer token keys.

mod password_hasher;
mod session_keys;

#[cfg(test)]
pub(crate) use password_hasher::TEST_HASH_COST;
pub use password_hasher::{HASH_COST, PasswordHasher};
pub use session_keys::{
    DEFAULT_EXPIRY_DAYS, MIN_SECRET_LEN, SessionKeys, SessionKeysConfig, TokenClaims, TokenError,
};
