use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use validator::Validate;

use crate::domain::entities::record_id;
use crate::domain::validation::validate_required;
use crate::entities::content::ContentEntry;
use crate::entities::user::User;

/// The local store numbers projects; the REST backend hands out opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectId::Number(n) => write!(f, "{}", n),
            ProjectId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for ProjectId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(n) => ProjectId::Number(n),
            Err(_) => ProjectId::Text(s.trim().to_string()),
        })
    }
}

impl From<i64> for ProjectId {
    fn from(n: i64) -> Self {
        ProjectId::Number(n)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        ProjectId::Text(s.to_string())
    }
}

/// Owner reference. Populated responses embed the owner's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedBy {
    Profile(OwnerProfile),
    Id(ProjectId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "OwnerRecord")]
pub struct OwnerProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

impl TryFrom<OwnerRecord> for OwnerProfile {
    type Error = String;

    fn try_from(record: OwnerRecord) -> Result<Self, Self::Error> {
        Ok(OwnerProfile {
            id: record_id(record.id, record.object_id, "owner")?,
            first_name: record.first_name,
            last_name: record.last_name,
        })
    }
}

impl OwnerProfile {
    pub fn from_user(user: &User) -> Self {
        OwnerProfile {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

impl CreatedBy {
    pub fn user_id(&self) -> String {
        match self {
            CreatedBy::Profile(profile) => profile.id.clone(),
            CreatedBy::Id(id) => id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default)]
    pub content_timeline: Vec<ContentEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<CreatedBy>,
}

impl Project {
    pub fn owner_id(&self) -> Option<String> {
        self.created_by.as_ref().map(CreatedBy::user_id)
    }

    pub fn creator_name(&self) -> String {
        match &self.created_by {
            Some(CreatedBy::Profile(profile)) => {
                let name = format!("{} {}", profile.first_name, profile.last_name);
                let name = name.trim();
                if name.is_empty() { "Unknown".to_string() } else { name.to_string() }
            }
            _ => "Unknown".to_string(),
        }
    }

    /// Merges a partial update the way `PUT /projects/:id` does on the backend.
    pub fn apply(&mut self, patch: ProjectPatch) {
        let ProjectPatch {
            title,
            description,
            image,
            date,
            link,
            technologies,
            images,
            descriptions,
            content_timeline,
        } = patch;

        if let Some(v) = title { self.title = v; }
        if let Some(v) = description { self.description = v; }
        if let Some(v) = image { self.image = v; }
        if let Some(v) = date { self.date = v; }
        if let Some(v) = link { self.link = v; }
        if let Some(v) = technologies { self.technologies = v; }
        if let Some(v) = images { self.images = v; }
        if let Some(v) = descriptions { self.descriptions = v; }
        if let Some(v) = content_timeline { self.content_timeline = v; }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub image: String,
    pub date: String,
    pub technologies: Vec<String>,
    pub link: String,
    /// The backend derives ownership from the bearer token; only local storage records it.
    #[serde(skip)]
    pub owner: Option<OwnerProfile>,
}

impl NewProject {
    pub fn into_project(self, id: ProjectId) -> Project {
        let created_by = self.owner.map(CreatedBy::Profile);
        Project {
            id,
            title: self.title,
            description: self.description,
            image: self.image,
            date: self.date,
            link: self.link,
            technologies: self.technologies,
            images: Vec::new(),
            descriptions: Vec::new(),
            content_timeline: Vec::new(),
            created_by,
        }
    }
}

/// Partial update body. Absent fields are left untouched by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_timeline: Option<Vec<ContentEntry>>,
}

impl ProjectPatch {
    pub fn technologies(technologies: Vec<String>) -> Self {
        ProjectPatch {
            technologies: Some(technologies),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &ProjectPatch::default()
    }
}

/// Admin form state, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct ProjectForm {
    #[validate(custom(function = "validate_required", message = "Title is required"))]
    pub title: String,

    #[validate(custom(function = "validate_required", message = "Description is required"))]
    pub description: String,

    pub image: String,
    pub date: String,

    /// Comma-separated tool labels.
    pub technologies: String,

    pub link: String,
}

impl ProjectForm {
    pub fn from_project(project: &Project) -> Self {
        ProjectForm {
            title: project.title.clone(),
            description: project.description.clone(),
            image: project.image.clone(),
            date: project.date.clone(),
            technologies: project.technologies.join(", "),
            link: project.link.clone(),
        }
    }

    pub fn technology_list(&self) -> Vec<String> {
        parse_technologies(&self.technologies)
    }

    pub fn to_new_project(&self) -> NewProject {
        NewProject {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            image: self.image.clone(),
            date: self.date.trim().to_string(),
            technologies: self.technology_list(),
            link: self.link.trim().to_string(),
            owner: None,
        }
    }

    pub fn to_patch(&self) -> ProjectPatch {
        let project = self.to_new_project();
        ProjectPatch {
            title: Some(project.title),
            description: Some(project.description),
            image: Some(project.image),
            date: Some(project.date),
            link: Some(project.link),
            technologies: Some(project.technologies),
            ..Default::default()
        }
    }
}

pub fn parse_technologies(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
