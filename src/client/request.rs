//! No-WASM HTTP client implementation using reqwest
//!
//! This module provides HTTP functionality for non-WASM environments
//! using the reqwest crate for making HTTP requests.

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, Method, Request, Url,
};
use serde::de::DeserializeOwned;

use super::{bearer, decode_reply};
use crate::error::{ErrorKind, Result};
use crate::interface::{HttpClient, RequestApi};
use crate::model::dtos::{
    LoginParams, LoginResponse, MessageResponse, ParticipantAction, ParticipantParams,
};
use crate::model::structs::{ActivityBoard, User};

/// HTTP client for no-WASM environments using reqwest
#[derive(Debug, Clone)]
pub struct NativeClient {
    client: Client,
    base: Url,
}

impl HttpClient for NativeClient {
    async fn connect(base_url: &str) -> Result<Self> {
        Self::with_base_url(base_url)
    }
}

impl NativeClient {
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ErrorKind::ParseError(format!("Invalid base URL {base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ErrorKind::ParseError(format!("{base_url} cannot be a base URL")).into());
        }

        let client = Client::builder().build()?;
        Ok(Self { client, base })
    }

    /// Append percent-encoded path segments to the base URL.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ErrorKind::ParseError(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn auth_headers(token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&bearer(token))
                    .map_err(|e| ErrorKind::ParseError(e.to_string()))?,
            );
        }
        Ok(headers)
    }

    fn participant_request(
        &self,
        action: ParticipantAction,
        token: Option<&str>,
        params: &ParticipantParams,
    ) -> Result<Request> {
        let method = match action {
            ParticipantAction::Signup => Method::POST,
            ParticipantAction::Unregister => Method::DELETE,
        };
        let url = self.endpoint(&["activities", &params.activity, action.segment()])?;

        self.client
            .request(method, url)
            .headers(Self::auth_headers(token)?)
            .query(&[("email", params.email.as_str())])
            .build()
            .map_err(Into::into)
    }

    async fn execute<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        log::debug!("{} {}", request.method(), request.url());

        let resp = self.client.execute(request).await?;
        let status = resp.status();
        let body = resp.text().await?;

        decode_reply(status.as_u16(), status.is_success(), &body)
    }
}

impl RequestApi for NativeClient {
    async fn login(&self, params: LoginParams) -> Result<LoginResponse> {
        let url = self.endpoint(&["auth", "login"])?;
        let request = self.client.post(url).json(&params).build()?;
        self.execute(request).await
    }

    async fn current_user(&self, token: &str) -> Result<Option<User>> {
        let url = self.endpoint(&["auth", "me"])?;
        let request = self
            .client
            .get(url)
            .headers(Self::auth_headers(Some(token))?)
            .build()?;
        self.execute(request).await
    }

    async fn activities(&self) -> Result<ActivityBoard> {
        let url = self.endpoint(&["activities"])?;
        let request = self.client.get(url).build()?;
        self.execute(request).await
    }

    async fn signup(
        &self,
        token: Option<&str>,
        params: ParticipantParams,
    ) -> Result<MessageResponse> {
        let request = self.participant_request(ParticipantAction::Signup, token, &params)?;
        self.execute(request).await
    }

    async fn unregister(
        &self,
        token: Option<&str>,
        params: ParticipantParams,
    ) -> Result<MessageResponse> {
        let request = self.participant_request(ParticipantAction::Unregister, token, &params)?;
        self.execute(request).await
    }
}
