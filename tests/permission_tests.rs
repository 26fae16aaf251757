use async_trait::async_trait;
use mockall::{mock, predicate::*};
use portfolio_site::{
    entities::{
        project::{CreatedBy, NewProject, Project, ProjectForm, ProjectId, ProjectPatch},
        user::{Role, User},
    },
    errors::AppError,
    repositories::project::ProjectStore,
    use_cases::projects::ProjectHandler,
};

mock! {
    pub Store {}

    #[async_trait]
    impl ProjectStore for Store {
        async fn list(&self) -> Result<Vec<Project>, AppError>;
        async fn get(&self, id: &ProjectId) -> Result<Project, AppError>;
        async fn create(&self, project: &NewProject) -> Result<Project, AppError>;
        async fn update(&self, id: &ProjectId, patch: &ProjectPatch) -> Result<Project, AppError>;
        async fn delete(&self, id: &ProjectId) -> Result<(), AppError>;
    }
}

/// A store that fails the test on any call.
fn untouchable_store() -> MockStore {
    let mut store = MockStore::new();
    store.expect_list().times(0);
    store.expect_get().times(0);
    store.expect_create().times(0);
    store.expect_update().times(0);
    store.expect_delete().times(0);
    store
}

fn user(id: &str, role: Role) -> User {
    User {
        id: id.into(),
        first_name: "Test".into(),
        last_name: "User".into(),
        email: format!("{}@example.com", id),
        role,
        avatar: None,
    }
}

fn project_owned_by(owner: &str) -> Project {
    let mut project = NewProject {
        title: "Tidal Flats".into(),
        description: "Low water".into(),
        technologies: vec!["Sony A7".into()],
        ..Default::default()
    }
    .into_project(ProjectId::from("p1"));
    project.created_by = Some(CreatedBy::Id(ProjectId::from(owner)));
    project
}

fn form() -> ProjectForm {
    ProjectForm {
        title: "Renamed".into(),
        description: "Still low water".into(),
        ..Default::default()
    }
}

async fn every_mutation(handler: &ProjectHandler<MockStore>, user: Option<&User>) -> Vec<AppError> {
    let project = project_owned_by("owner-1");
    let missing = std::path::Path::new("does-not-matter.jpg");

    vec![
        handler.add_image(user, &project, "data:image/jpeg;base64,AA".into()).await.unwrap_err(),
        handler.add_image_file(user, &project, missing).await.unwrap_err(),
        handler.add_description(user, &project, "Caption").await.unwrap_err(),
        handler.add_tool(user, &project, "Canon EOS R5").await.unwrap_err(),
        handler.remove_tool(user, &project, "Sony A7").await.unwrap_err(),
        handler.update_fields(user, &project, form()).await.unwrap_err(),
        handler.delete(user, &project).await.unwrap_err(),
    ]
}

#[tokio::test]
async fn strangers_never_reach_the_store() {
    let handler = ProjectHandler::new(untouchable_store());
    let stranger = user("someone-else", Role::default());

    let errors = every_mutation(&handler, Some(&stranger)).await;

    assert_eq!(errors.len(), 7);
    assert!(errors.iter().all(AppError::is_authorization), "{:?}", errors);
    assert_eq!(errors[6].to_string(), "You can only delete your own projects");
}

#[tokio::test]
async fn anonymous_users_never_reach_the_store() {
    let handler = ProjectHandler::new(untouchable_store());

    let errors = every_mutation(&handler, None).await;

    assert!(errors.iter().all(AppError::is_authorization), "{:?}", errors);
    assert!(errors.iter().all(|e| e.to_string().starts_with("Please login to")));
}

#[tokio::test]
async fn anonymous_create_never_reaches_the_store() {
    let handler = ProjectHandler::new(untouchable_store());

    let err = handler.create(None, form()).await.unwrap_err();

    assert!(err.is_authorization());
}

#[tokio::test]
async fn admins_pass_the_gate_on_projects_they_do_not_own() {
    let project = project_owned_by("owner-1");

    let mut store = MockStore::new();
    store
        .expect_update()
        .with(eq(ProjectId::from("p1")), eq(ProjectPatch::technologies(vec![])))
        .times(1)
        .returning(|_, _| Err(AppError::InternalError("response unused".into())));
    store.expect_get().times(0);
    store.expect_delete().times(0);
    let handler = ProjectHandler::new(store);

    let err = handler
        .remove_tool(Some(&user("admin-1", Role::Admin)), &project, "Sony A7")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InternalError(_)));
}

#[tokio::test]
async fn owners_get_the_refetched_project() {
    let project = project_owned_by("owner-1");
    let stored = Project {
        technologies: vec!["Sony A7".into(), "Canon EOS R5".into()],
        ..project.clone()
    };

    let mut store = MockStore::new();
    let updated = stored.clone();
    store
        .expect_update()
        .withf(|id, patch| {
            id == &ProjectId::from("p1")
                && patch.technologies.as_deref() == Some(&["Sony A7".to_string(), "Canon EOS R5".to_string()][..])
        })
        .times(1)
        .returning(move |_, _| Ok(updated.clone()));
    let fetched = stored.clone();
    store
        .expect_get()
        .with(eq(ProjectId::from("p1")))
        .times(1)
        .returning(move |_| Ok(fetched.clone()));
    let handler = ProjectHandler::new(store);

    let refreshed = handler
        .add_tool(Some(&user("owner-1", Role::default())), &project, "Canon EOS R5")
        .await
        .unwrap();

    assert_eq!(refreshed, stored);
}
