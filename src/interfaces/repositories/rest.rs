use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::{
    entities::{
        envelope::ApiEnvelope,
        project::{NewProject, Project, ProjectId, ProjectPatch},
        user::{AuthPayload, LoginUser, RegisterRequest, User},
    },
    errors::AppError,
    repositories::{auth::{AuthApi, TokenStore}, project::ProjectStore},
    settings::AppConfig,
};

const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

/// JSON client for the portfolio backend. Implements both the project and auth collaborators.
#[derive(Clone)]
pub struct RestRepo {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl RestRepo {
    pub fn new(base_url: Url, timeout: Duration, tokens: Arc<dyn TokenStore>) -> Result<Self, AppError> {
        if base_url.cannot_be_a_base() {
            return Err(AppError::InvalidInput(format!("{} cannot be used as an API base URL", base_url)));
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::InternalError(format!("HTTP client setup failed: {}", e)))?;

        Ok(RestRepo { http, base_url, tokens })
    }

    pub fn from_config(config: &AppConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, AppError> {
        Self::new(config.api_base_url.clone(), config.request_timeout(), tokens)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::InvalidInput(format!("{} cannot be used as an API base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<ApiEnvelope<T>, AppError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "backend request");

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(token) = self.tokens.get()? {
            request = request.bearer_auth(token.as_str());
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text);
            tracing::debug!(%method, %url, status = status.as_u16(), %message, "backend rejected request");
            return Err(AppError::Backend { status: Some(status), message });
        }

        serde_json::from_str(&text).map_err(|e| AppError::Backend {
            status: Some(status),
            message: format!("Malformed response: {}", e),
        })
    }
}

/// Pulls `message` out of an error body, falling back to a generic text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(AppError::from)
}

#[async_trait]
impl ProjectStore for RestRepo {
    async fn list(&self) -> Result<Vec<Project>, AppError> {
        self.send::<Vec<Project>>(Method::GET, &["projects"], None)
            .await?
            .into_data("Failed to load projects")
    }

    async fn get(&self, id: &ProjectId) -> Result<Project, AppError> {
        let id = id.to_string();
        match self.send::<Project>(Method::GET, &["projects", &id], None).await {
            Err(AppError::Backend { status: Some(StatusCode::NOT_FOUND), message }) => {
                Err(AppError::NotFound(message))
            }
            other => other?.into_data("Project not found"),
        }
    }

    async fn create(&self, project: &NewProject) -> Result<Project, AppError> {
        self.send::<Project>(Method::POST, &["projects"], Some(to_body(project)?))
            .await?
            .into_data("Failed to save project")
    }

    async fn update(&self, id: &ProjectId, patch: &ProjectPatch) -> Result<Project, AppError> {
        let id = id.to_string();
        self.send::<Project>(Method::PUT, &["projects", &id], Some(to_body(patch)?))
            .await?
            .into_data("Failed to update project")
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), AppError> {
        let id = id.to_string();
        self.send::<Value>(Method::DELETE, &["projects", &id], None)
            .await?
            .into_unit("Failed to delete project")
    }
}

#[async_trait]
impl AuthApi for RestRepo {
    async fn login(&self, credentials: &LoginUser) -> Result<AuthPayload, AppError> {
        self.send::<AuthPayload>(Method::POST, &["auth", "login"], Some(to_body(credentials)?))
            .await?
            .into_data("Login failed")
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, AppError> {
        self.send::<AuthPayload>(Method::POST, &["auth", "register"], Some(to_body(request)?))
            .await?
            .into_data("Registration failed")
    }

    async fn me(&self) -> Result<User, AppError> {
        self.send::<User>(Method::GET, &["auth", "me"], None)
            .await?
            .into_data("Session expired")
    }
}
