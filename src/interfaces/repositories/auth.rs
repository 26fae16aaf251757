use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::{
    entities::user::{AuthPayload, LoginUser, RegisterRequest, User},
    errors::AppError,
};

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginUser) -> Result<AuthPayload, AppError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, AppError>;
    /// Validates the stored bearer token and returns its user.
    async fn me(&self) -> Result<User, AppError>;
}

pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<Zeroizing<String>>, AppError>;
    fn set(&self, token: &str) -> Result<(), AppError>;
    fn clear(&self) -> Result<(), AppError>;
}
