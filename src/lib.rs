use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;

pub use domain::{entities, use_cases, validation};
pub use interfaces::{cli, repositories};
pub use infrastructure::{clock, imaging, logging};

use errors::AppError;
use repositories::{
    auth::TokenStore,
    local::LocalProjectStore,
    project::ProjectStore,
    rest::RestRepo,
    token::FileTokenStore,
};
use settings::{AppConfig, StoreBackend};
use use_cases::{auth::AuthHandler, projects::ProjectHandler};

pub type AppProjectHandler = ProjectHandler<Box<dyn ProjectStore>>;
pub type AppAuthHandler = AuthHandler<RestRepo, dyn TokenStore>;

pub struct AppState {
    pub projects: AppProjectHandler,
    pub auth: AppAuthHandler,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.session_path));
        let rest = RestRepo::from_config(config, tokens.clone())?;
        Ok(Self::with_store(config, build_store(config, &rest)?, rest, tokens))
    }

    pub fn with_store(
        config: &AppConfig,
        store: Box<dyn ProjectStore>,
        rest: RestRepo,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let projects = ProjectHandler::new(store)
            .with_image_limits(config.normalize_options(), config.image.max_upload_bytes);

        AppState {
            projects,
            auth: AuthHandler::new(rest, tokens),
        }
    }
}

fn build_store(config: &AppConfig, rest: &RestRepo) -> Result<Box<dyn ProjectStore>, AppError> {
    match config.store {
        StoreBackend::Rest => Ok(Box::new(rest.clone())),
        StoreBackend::Local => {
            tracing::debug!(path = %config.local_store_path.display(), "using local project store");
            Ok(Box::new(LocalProjectStore::with_default_projects(&config.local_store_path)?))
        }
    }
}
