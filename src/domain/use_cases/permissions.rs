use crate::{
    entities::{project::Project, user::User},
    errors::{AppError, SessionError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
    Create,
    Edit,
    Delete,
    AddImage,
    AddDescription,
    AddTool,
    RemoveTool,
}

impl ProjectAction {
    fn login_prompt(self) -> &'static str {
        match self {
            ProjectAction::Create => "add or edit projects",
            ProjectAction::Edit => "edit projects",
            ProjectAction::Delete => "delete projects",
            ProjectAction::AddImage => "add images",
            ProjectAction::AddDescription => "add descriptions",
            ProjectAction::AddTool => "add tools",
            ProjectAction::RemoveTool => "delete tools",
        }
    }

    fn denial(self) -> &'static str {
        match self {
            ProjectAction::Delete => "You can only delete your own projects",
            _ => "You can only edit your own projects",
        }
    }
}

/// Site owner, admins, and the project's creator may change a project.
pub fn can_modify(user: &User, project: &Project) -> bool {
    user.role.is_privileged() || project.owner_id().is_some_and(|owner| owner == user.id)
}

pub fn require_session(user: Option<&User>, action: ProjectAction) -> Result<&User, AppError> {
    user.ok_or_else(|| SessionError::NotAuthenticated(action.login_prompt().to_string()).into())
}

pub fn ensure_can_modify<'u>(
    user: Option<&'u User>,
    project: &Project,
    action: ProjectAction,
) -> Result<&'u User, AppError> {
    let user = require_session(user, action)?;
    if !can_modify(user, project) {
        tracing::warn!(project = %project.id, user = %user.id, ?action, "project change denied");
        return Err(AppError::Authorization(action.denial().to_string()));
    }
    Ok(user)
}
