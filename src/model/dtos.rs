use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::structs::User;

/// Credentials posted to the login endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body returned with non-success replies
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorDetail {
    /// The detail when the server sent it as a non-empty string.
    pub fn message(self) -> Option<String> {
        match self.detail {
            Some(Value::String(detail)) if !detail.is_empty() => Some(detail),
            _ => None,
        }
    }
}

/// Parameters for registering or removing a participant
#[derive(Debug, Clone)]
pub struct ParticipantParams {
    pub activity: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantAction {
    Signup,
    Unregister,
}

impl ParticipantAction {
    /// Trailing path segment of the activity-scoped endpoint.
    pub fn segment(self) -> &'static str {
        match self {
            ParticipantAction::Signup => "signup",
            ParticipantAction::Unregister => "unregister",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            ParticipantAction::Signup => "Failed to sign up. Please try again.",
            ParticipantAction::Unregister => "Failed to unregister. Please try again.",
        }
    }
}
