#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod api;
mod error;
mod guard;
mod session;
mod storage;

pub use crate::api::{AuthApi, AuthSession, HttpAuthApi, HttpAuthApiConfig, User};
pub use crate::error::{
    AuthAction, AuthFailure, Error, INVALID_RESPONSE_MESSAGE, MISSING_CREDENTIALS_MESSAGE, Result,
};
pub use crate::guard::{Access, GuardDecision, Route, route_guard};
pub use crate::session::{AuthStore, PendingVerification, SessionState};
pub use crate::storage::{FileTokenStorage, MemoryTokenStorage, TOKEN_KEY, TokenStorage};
