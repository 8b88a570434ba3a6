//! Request module - handles HTTP requests for both WASM and no-WASM environments
//!
//! This module provides a unified interface for making HTTP requests while
//! supporting different implementations for WASM (gloo_net) and no-WASM (reqwest) environments.

use serde::de::DeserializeOwned;

use crate::error::{ErrorKind, Result};
use crate::model::dtos::ErrorDetail;

#[cfg(feature = "no-wasm")]
pub mod request;

#[cfg(feature = "wasm")]
pub mod gloo;

pub const LOGIN_PATH: &str = "/auth/login";
pub const ME_PATH: &str = "/auth/me";
pub const ACTIVITIES_PATH: &str = "/activities";

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Turn a finished HTTP exchange into a typed reply.
///
/// Non-success statuses with a JSON body become `ErrorKind::Rejected`, carrying
/// the server's `detail` when it is a string. A non-success body that is not
/// JSON is a transport failure, as is a success body that does not decode into `T`.
pub fn decode_reply<T: DeserializeOwned>(status: u16, ok: bool, body: &str) -> Result<T> {
    if !ok {
        let detail = serde_json::from_str::<ErrorDetail>(body)?.message();
        log::debug!("request rejected with status {status}: {detail:?}");
        return Err(ErrorKind::Rejected { status, detail }.into());
    }

    serde_json::from_str(body).map_err(Into::into)
}
