//! WASM HTTP client implementation using gloo_net
//!
//! This module provides HTTP functionality for WASM environments
//! using the gloo_net crate for making HTTP requests via the browser's fetch API.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{bearer, decode_reply, ACTIVITIES_PATH, LOGIN_PATH, ME_PATH};
use crate::error::Result;
use crate::interface::{HttpClient, RequestApi};
use crate::model::dtos::{
    LoginParams, LoginResponse, MessageResponse, ParticipantAction, ParticipantParams,
};
use crate::model::structs::{ActivityBoard, User};

/// HTTP client for WASM environments using gloo_net
///
/// An empty base keeps every request same-origin, which is how the page is served.
#[derive(Debug, Clone, Default)]
pub struct WasmClient {
    base: String,
}

impl HttpClient for WasmClient {
    async fn connect(base_url: &str) -> Result<Self> {
        Ok(Self::with_base_url(base_url))
    }
}

impl WasmClient {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn participant_url(&self, action: ParticipantAction, activity: &str) -> String {
        let activity = String::from(js_sys::encode_uri_component(activity));
        self.url(&format!("{ACTIVITIES_PATH}/{activity}/{}", action.segment()))
    }

    fn with_token(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.header("Authorization", &bearer(token)),
            None => builder,
        }
    }

    /// Handle JSON response with error checking
    async fn handle_json_response<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let status = resp.status();
        let ok = resp.ok();
        let text = resp.text().await?;

        decode_reply(status, ok, &text)
    }

    async fn participant(
        &self,
        action: ParticipantAction,
        token: Option<&str>,
        params: ParticipantParams,
    ) -> Result<MessageResponse> {
        let url = self.participant_url(action, &params.activity);
        let builder = match action {
            ParticipantAction::Signup => Request::post(&url),
            ParticipantAction::Unregister => Request::delete(&url),
        };

        log::debug!("{} {url}", action.segment());

        let resp = Self::with_token(builder, token)
            .query([("email", params.email.as_str())])
            .send()
            .await?;

        Self::handle_json_response(resp).await
    }
}

impl RequestApi for WasmClient {
    async fn login(&self, params: LoginParams) -> Result<LoginResponse> {
        let resp = Request::post(&self.url(LOGIN_PATH))
            .json(&params)?
            .send()
            .await?;

        Self::handle_json_response(resp).await
    }

    async fn current_user(&self, token: &str) -> Result<Option<User>> {
        let resp = Self::with_token(Request::get(&self.url(ME_PATH)), Some(token))
            .send()
            .await?;

        Self::handle_json_response(resp).await
    }

    async fn activities(&self) -> Result<ActivityBoard> {
        let resp = Request::get(&self.url(ACTIVITIES_PATH)).send().await?;

        Self::handle_json_response(resp).await
    }

    async fn signup(
        &self,
        token: Option<&str>,
        params: ParticipantParams,
    ) -> Result<MessageResponse> {
        self.participant(ParticipantAction::Signup, token, params).await
    }

    async fn unregister(
        &self,
        token: Option<&str>,
        params: ParticipantParams,
    ) -> Result<MessageResponse> {
        self.participant(ParticipantAction::Unregister, token, params).await
    }
}
