use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    entities::project::{NewProject, Project, ProjectId, ProjectPatch},
    errors::AppError,
    repositories::project::ProjectStore,
};

const DEFAULT_PROJECTS: &str = include_str!("../../../data/default_projects.json");

pub fn default_projects() -> Result<Vec<Project>, AppError> {
    serde_json::from_str(DEFAULT_PROJECTS).map_err(AppError::from)
}

/// Client-side CRUD against a JSON file, standing in for browser local storage.
///
/// The whole list is read and rewritten on every call. `io_lock` keeps concurrent calls
/// in this process from interleaving their read-modify-write cycles.
pub struct LocalProjectStore {
    path: PathBuf,
    seed: Vec<Project>,
    io_lock: Mutex<()>,
}

impl LocalProjectStore {
    pub fn new(path: impl Into<PathBuf>, seed: Vec<Project>) -> Self {
        LocalProjectStore {
            path: path.into(),
            seed,
            io_lock: Mutex::new(()),
        }
    }

    pub fn with_default_projects(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        Ok(Self::new(path, default_projects()?))
    }

    /// Stored items, or `None` when nothing usable is stored yet.
    async fn read_items(&self) -> Result<Option<Vec<Project>>, AppError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::IoError(format!("{}: {}", self.path.display(), e))),
        };

        match serde_json::from_str::<Vec<Project>>(&raw) {
            Ok(items) => Ok(Some(items)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable portfolio file");
                Ok(None)
            }
        }
    }

    async fn save_items(&self, items: &[Project]) -> Result<(), AppError> {
        let raw = serde_json::to_string_pretty(items)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| AppError::IoError(format!("{}: {}", self.path.display(), e)))
    }

    /// Seeds the file with the default projects when it is missing or empty.
    async fn load(&self) -> Result<Vec<Project>, AppError> {
        match self.read_items().await? {
            Some(items) if !items.is_empty() => Ok(items),
            _ => {
                self.save_items(&self.seed).await?;
                Ok(self.seed.clone())
            }
        }
    }

    fn next_id(items: &[Project]) -> ProjectId {
        let max = items
            .iter()
            .filter_map(|item| match item.id {
                ProjectId::Number(n) => Some(n),
                ProjectId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        ProjectId::Number(max + 1)
    }

    fn not_found(id: &ProjectId) -> AppError {
        AppError::NotFound(format!("Project {} not found", id))
    }
}

#[async_trait]
impl ProjectStore for LocalProjectStore {
    async fn list(&self) -> Result<Vec<Project>, AppError> {
        let _guard = self.io_lock.lock().await;
        self.load().await
    }

    async fn get(&self, id: &ProjectId) -> Result<Project, AppError> {
        let _guard = self.io_lock.lock().await;
        self.load()
            .await?
            .into_iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, project: &NewProject) -> Result<Project, AppError> {
        let _guard = self.io_lock.lock().await;
        let mut items = self.load().await?;

        let created = project.clone().into_project(Self::next_id(&items));
        items.push(created.clone());
        self.save_items(&items).await?;

        Ok(created)
    }

    async fn update(&self, id: &ProjectId, patch: &ProjectPatch) -> Result<Project, AppError> {
        let _guard = self.io_lock.lock().await;
        let mut items = self.load().await?;

        let item = items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        item.apply(patch.clone());
        let updated = item.clone();

        self.save_items(&items).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), AppError> {
        let _guard = self.io_lock.lock().await;
        let mut items = self.load().await?;

        let before = items.len();
        items.retain(|item| &item.id != id);
        if items.len() == before {
            return Err(Self::not_found(id));
        }

        self.save_items(&items).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> LocalProjectStore {
        LocalProjectStore::with_default_projects(dir.path().join("portfolio_items.json")).unwrap()
    }

    #[test]
    fn bundled_defaults_parse() {
        let projects = default_projects().unwrap();

        assert_eq!(projects.len(), 6);
        assert!(projects.iter().all(|p| matches!(p.id, ProjectId::Number(_))));
    }

    #[tokio::test]
    async fn seeds_defaults_on_first_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let items = store.list().await.unwrap();

        assert_eq!(items.len(), 6);
        assert!(dir.path().join("portfolio_items.json").exists());
    }

    #[tokio::test]
    async fn new_ids_follow_the_highest_existing_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.delete(&ProjectId::Number(2)).await.unwrap();

        let created = store
            .create(&NewProject { title: "Harbor".into(), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(created.id, ProjectId::Number(7));
    }

    #[tokio::test]
    async fn empty_store_starts_numbering_at_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalProjectStore::new(dir.path().join("items.json"), Vec::new());

        let created = store.create(&NewProject::default()).await.unwrap();

        assert_eq!(created.id, ProjectId::Number(1));
    }

    #[tokio::test]
    async fn updates_merge_into_the_stored_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store
            .update(&ProjectId::Number(1), &ProjectPatch::technologies(vec!["Sony A7".into()]))
            .await
            .unwrap();

        let reloaded = store.get(&ProjectId::Number(1)).await.unwrap();
        assert_eq!(reloaded.technologies, vec!["Sony A7"]);
        assert_eq!(reloaded.title, "E-Commerce Platform");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let err = store.delete(&ProjectId::Number(99)).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn corrupt_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio_items.json");
        std::fs::write(&path, "{not json").unwrap();

        let items = LocalProjectStore::with_default_projects(&path).unwrap().list().await.unwrap();

        assert_eq!(items.len(), 6);
    }
}
