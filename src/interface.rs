#![allow(async_fn_in_trait)] // 允许在内部 trait 中使用 async fn

use crate::error::Result;
use crate::model::dtos::{LoginParams, LoginResponse, MessageResponse, ParticipantParams};
use crate::model::structs::{ActivityBoard, User};

/// Common trait for HTTP client functionality
pub trait HttpClient {
    /// Create a new HTTP client instance rooted at `base_url`
    async fn connect(base_url: &str) -> Result<Self>
    where
        Self: Sized;
}

/// Common interface for all HTTP operations
pub trait RequestApi {
    /// Exchange credentials for a bearer token
    async fn login(&self, params: LoginParams) -> Result<LoginResponse>;

    /// Resolve the user behind a bearer token. `None` when the server answers `null`.
    async fn current_user(&self, token: &str) -> Result<Option<User>>;

    /// Fetch every activity with its roster
    async fn activities(&self) -> Result<ActivityBoard>;

    /// Register a participant for an activity
    async fn signup(&self, token: Option<&str>, params: ParticipantParams)
        -> Result<MessageResponse>;

    /// Remove a participant from an activity
    async fn unregister(
        &self,
        token: Option<&str>,
        params: ParticipantParams,
    ) -> Result<MessageResponse>;
}
