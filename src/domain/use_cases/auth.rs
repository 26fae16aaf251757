use std::sync::Arc;

use parking_lot::RwLock;
use validator::Validate;

use crate::entities::user::{AuthPayload, LoginUser, RegisterUser, User};
use crate::errors::{AppError, SessionError};
use crate::repositories::auth::{AuthApi, TokenStore};

/// Session flows: login, registration, restoring a stored token, logout.
pub struct AuthHandler<A, T>
where
    A: AuthApi,
    T: TokenStore + ?Sized,
{
    pub api: A,
    pub tokens: Arc<T>,
    current: RwLock<Option<User>>,
}

impl<A, T> AuthHandler<A, T>
where
    A: AuthApi,
    T: TokenStore + ?Sized,
{
    pub fn new(api: A, tokens: Arc<T>) -> Self {
        AuthHandler {
            api,
            tokens,
            current: RwLock::new(None),
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    pub async fn login(&self, request: LoginUser) -> Result<User, AppError> {
        request.validate()?;

        let payload = self.api.login(&request).await?;
        let user = self.start_session(payload)?;

        tracing::info!(user = %user.id, "logged in");
        Ok(user)
    }

    pub async fn register(&self, request: RegisterUser) -> Result<User, AppError> {
        request.validate()?;

        let payload = self.api.register(&request.to_request()).await?;
        let user = self.start_session(payload)?;

        tracing::info!(user = %user.id, "registered");
        Ok(user)
    }

    /// Loads the user behind a stored token. Any failure drops the token and leaves the session anonymous.
    pub async fn restore(&self) -> Result<Option<User>, AppError> {
        if self.tokens.get()?.is_none() {
            return Ok(None);
        }

        match self.api.me().await {
            Ok(user) => {
                *self.current.write() = Some(user.clone());
                tracing::debug!(user = %user.id, "session restored");
                Ok(Some(user))
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored session rejected, clearing token");
                self.tokens.clear()?;
                *self.current.write() = None;
                Ok(None)
            }
        }
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.tokens.clear()?;
        if let Some(user) = self.current.write().take() {
            tracing::info!(user = %user.id, "logged out");
        }
        Ok(())
    }

    fn start_session(&self, payload: AuthPayload) -> Result<User, AppError> {
        let AuthPayload { token, user } = payload;
        if token.trim().is_empty() {
            return Err(SessionError::MissingCredentials.into());
        }

        self.tokens.set(&token)?;
        *self.current.write() = Some(user.clone());
        Ok(user)
    }
}
