use async_trait::async_trait;

use crate::{
    entities::project::{NewProject, Project, ProjectId, ProjectPatch},
    errors::AppError,
};

/// Persistence collaborator for portfolio entries.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>, AppError>;
    async fn get(&self, id: &ProjectId) -> Result<Project, AppError>;
    async fn create(&self, project: &NewProject) -> Result<Project, AppError>;
    /// Applies every field of `patch` in one write.
    async fn update(&self, id: &ProjectId, patch: &ProjectPatch) -> Result<Project, AppError>;
    async fn delete(&self, id: &ProjectId) -> Result<(), AppError>;
}

#[async_trait]
impl<S: ProjectStore + ?Sized> ProjectStore for Box<S> {
    async fn list(&self) -> Result<Vec<Project>, AppError> {
        (**self).list().await
    }

    async fn get(&self, id: &ProjectId) -> Result<Project, AppError> {
        (**self).get(id).await
    }

    async fn create(&self, project: &NewProject) -> Result<Project, AppError> {
        (**self).create(project).await
    }

    async fn update(&self, id: &ProjectId, patch: &ProjectPatch) -> Result<Project, AppError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), AppError> {
        (**self).delete(id).await
    }
}
