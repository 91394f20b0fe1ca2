//! Registration and login calls.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use unionportal_common::config::PortalConfig;

use crate::error::{error_message_from_body, ClientError};

pub const QUICK_REGISTER_PATH: &str = "/api/auth/quick-register";
pub const VERIFY_CODE_PATH: &str = "/api/auth/verify-code";
pub const SET_PASSWORD_PATH: &str = "/api/auth/set-password";
pub const LOGIN_PATH: &str = "/api/auth/login";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickRegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPasswordRequest {
    pub email: String,
    pub password: String,
    /// Token handed out by a successful code verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful auth response. Fields the portal does not rely on are kept
/// in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Client for the portal backend.
#[derive(Debug, Clone)]
pub struct PortalClient {
    base_url: String,
    http: reqwest::Client,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &PortalConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn quick_register(
        &self,
        request: &QuickRegisterRequest,
    ) -> Result<AuthResponse, ClientError> {
        self.post(QUICK_REGISTER_PATH, request).await
    }

    pub async fn verify_code(
        &self,
        request: &VerifyCodeRequest,
    ) -> Result<AuthResponse, ClientError> {
        self.post(VERIFY_CODE_PATH, request).await
    }

    pub async fn set_password(
        &self,
        request: &SetPasswordRequest,
    ) -> Result<AuthResponse, ClientError> {
        self.post(SET_PASSWORD_PATH, request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.post(LOGIN_PATH, request).await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "POST");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = error_message_from_body(status.as_u16(), &text);
            tracing::warn!(url = %url, status = status.as_u16(), error = %message, "Request failed");
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        // Some endpoints answer 204 or an empty 200.
        let text = if text.trim().is_empty() { "{}" } else { &text };
        serde_json::from_str(text).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
