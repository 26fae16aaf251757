use std::path::Path;

use validator::Validate;

use crate::{
    clock::{Clock, SystemClock},
    entities::{
        content::ContentKind,
        project::{OwnerProfile, Project, ProjectForm, ProjectId, ProjectPatch},
        user::User,
    },
    errors::AppError,
    imaging::{
        normalizer::{normalize_bytes, NormalizeOptions},
        upload::read_upload,
    },
    constants::DEFAULT_MAX_UPLOAD_BYTES,
    repositories::project::ProjectStore,
    use_cases::{
        permissions::{ensure_can_modify, require_session, ProjectAction},
        timeline::{AppendPlan, ContentTimeline, EntryIdGenerator},
    },
};

/// Refreshed project after an append, plus the entry id to scroll to.
#[derive(Debug, Clone, PartialEq)]
pub struct Appended {
    pub project: Project,
    pub anchor: String,
}

/// Project flows for the gallery, the detail page and the admin form.
///
/// Mutations take the project as the caller last displayed it. The role gate runs against that
/// state, so a rejected call never touches the store. Successful mutations return freshly
/// fetched state instead of patching the caller's copy.
pub struct ProjectHandler<S, C = SystemClock>
where
    S: ProjectStore,
    C: Clock,
{
    pub store: S,
    ids: EntryIdGenerator<C>,
    normalize: NormalizeOptions,
    max_upload_bytes: u64,
}

impl<S: ProjectStore> ProjectHandler<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S, C> ProjectHandler<S, C>
where
    S: ProjectStore,
    C: Clock,
{
    pub fn with_clock(store: S, clock: C) -> Self {
        ProjectHandler {
            store,
            ids: EntryIdGenerator::new(clock),
            normalize: NormalizeOptions::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_image_limits(mut self, normalize: NormalizeOptions, max_upload_bytes: u64) -> Self {
        self.normalize = normalize;
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub async fn list(&self) -> Result<Vec<Project>, AppError> {
        self.store.list().await
    }

    pub async fn get(&self, id: &ProjectId) -> Result<Project, AppError> {
        self.store.get(id).await
    }

    pub fn timeline(&self, project: &Project) -> ContentTimeline {
        ContentTimeline::from_project(project)
    }

    pub async fn create(&self, user: Option<&User>, form: ProjectForm) -> Result<Vec<Project>, AppError> {
        let user = require_session(user, ProjectAction::Create)?;
        form.validate()?;

        let mut new_project = form.to_new_project();
        new_project.owner = Some(OwnerProfile::from_user(user));

        let created = self.store.create(&new_project).await?;
        tracing::info!(project = %created.id, user = %user.id, "project created");

        self.store.list().await
    }

    pub async fn update_fields(
        &self,
        user: Option<&User>,
        project: &Project,
        form: ProjectForm,
    ) -> Result<Project, AppError> {
        ensure_can_modify(user, project, ProjectAction::Edit)?;
        form.validate()?;

        self.store.update(&project.id, &form.to_patch()).await?;
        tracing::info!(project = %project.id, "project fields updated");

        self.store.get(&project.id).await
    }

    pub async fn add_image(&self, user: Option<&User>, project: &Project, blob: String) -> Result<Appended, AppError> {
        ensure_can_modify(user, project, ProjectAction::AddImage)?;
        if blob.trim().is_empty() {
            return Err(AppError::validation("image", "Please select an image to upload"));
        }

        let timeline = ContentTimeline::from_project(project);
        let id = self.ids.next(ContentKind::Image, &timeline);
        let plan = timeline.plan_image(project, id, blob);
        self.persist(project, plan).await
    }

    pub async fn add_image_file(
        &self,
        user: Option<&User>,
        project: &Project,
        path: &Path,
    ) -> Result<Appended, AppError> {
        ensure_can_modify(user, project, ProjectAction::AddImage)?;
        let blob = self.prepare_upload(path).await?;
        self.add_image(user, project, blob).await
    }

    /// Upload checks, then resize and re-encode into a JPEG data URI.
    pub async fn prepare_upload(&self, path: &Path) -> Result<String, AppError> {
        let (upload, bytes) = read_upload(path, self.max_upload_bytes).await?;
        tracing::debug!(file = %upload.file_name, media_type = %upload.media_type, size = upload.size, "normalizing upload");
        normalize_bytes(bytes, self.normalize).await
    }

    pub async fn add_description(
        &self,
        user: Option<&User>,
        project: &Project,
        text: &str,
    ) -> Result<Appended, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("description", "Please enter a description"));
        }
        ensure_can_modify(user, project, ProjectAction::AddDescription)?;

        let timeline = ContentTimeline::from_project(project);
        let id = self.ids.next(ContentKind::Description, &timeline);
        let plan = timeline.plan_description(project, id, text.to_string());
        self.persist(project, plan).await
    }

    pub async fn add_tool(&self, user: Option<&User>, project: &Project, tool: &str) -> Result<Project, AppError> {
        let tool = tool.trim();
        if tool.is_empty() {
            return Err(AppError::validation("tool", "Please enter a tool name"));
        }
        ensure_can_modify(user, project, ProjectAction::AddTool)?;

        let mut technologies = project.technologies.clone();
        technologies.push(tool.to_string());

        self.store.update(&project.id, &ProjectPatch::technologies(technologies)).await?;
        tracing::info!(project = %project.id, tool, "tool added");

        self.store.get(&project.id).await
    }

    /// Drops every tag equal to `tool`.
    pub async fn remove_tool(&self, user: Option<&User>, project: &Project, tool: &str) -> Result<Project, AppError> {
        ensure_can_modify(user, project, ProjectAction::RemoveTool)?;

        let technologies: Vec<String> = project
            .technologies
            .iter()
            .filter(|tag| tag.as_str() != tool)
            .cloned()
            .collect();
        if technologies.len() == project.technologies.len() {
            return Err(AppError::NotFound(format!("Tool \"{}\" is not listed on this project", tool)));
        }

        self.store.update(&project.id, &ProjectPatch::technologies(technologies)).await?;
        tracing::info!(project = %project.id, tool, "tool removed");

        self.store.get(&project.id).await
    }

    pub async fn delete(&self, user: Option<&User>, project: &Project) -> Result<Vec<Project>, AppError> {
        ensure_can_modify(user, project, ProjectAction::Delete)?;

        self.store.delete(&project.id).await?;
        tracing::info!(project = %project.id, "project deleted");

        self.store.list().await
    }

    async fn persist(&self, project: &Project, plan: AppendPlan) -> Result<Appended, AppError> {
        let AppendPlan { entry, patch } = plan;

        self.store.update(&project.id, &patch).await?;
        tracing::info!(project = %project.id, entry = %entry.id, kind = %entry.kind, "timeline entry appended");

        Ok(Appended {
            project: self.store.get(&project.id).await?,
            anchor: entry.id,
        })
    }
}
