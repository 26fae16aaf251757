
use std::sync::Arc;

use portfolio_site::{
    entities::{
        project::{ProjectForm, ProjectId, ProjectPatch},
        user::{LoginUser, RegisterUser},
    },
    errors::AppError,
    repositories::{auth::TokenStore, project::ProjectStore, token::MemoryTokenStore},
    use_cases::timeline::ContentTimeline,
};
use reqwest::StatusCode;
use test_utils::{client, StubBackend};

fn login(email: &str) -> LoginUser {
    LoginUser {
        email: email.to_string(),
        password: "secret1".to_string(),
    }
}

#[actix_rt::test]
async fn adding_a_tool_sends_only_technologies_and_refetches() {
    let backend = StubBackend::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let app = client(&backend, &dir.path().join("session"));
    let user = app.auth.login(login("owner@example.com")).await.unwrap();
    let project = app.projects.get(&ProjectId::from("p1")).await.unwrap();
    backend.clear_requests();

    let updated = app
        .projects
        .add_tool(Some(&user), &project, "Canon EOS R5")
        .await
        .unwrap();

    assert_eq!(updated.technologies, vec!["Sony A7", "Canon EOS R5"]);
    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].path, "/api/projects/p1");
    assert_eq!(
        requests[0].body,
        Some(serde_json::json!({"technologies": ["Sony A7", "Canon EOS R5"]}))
    );
    assert_eq!(requests[1].method, "GET");
    backend.stop().await;
}

#[actix_rt::test]
async fn deleted_projects_disappear_from_the_gallery() {
    let backend = StubBackend::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let app = client(&backend, &dir.path().join("session"));
    let user = app.auth.login(login("alice@example.com")).await.unwrap();
    let project = app.projects.get(&ProjectId::from("p1")).await.unwrap();

    let remaining = app.projects.delete(Some(&user), &project).await.unwrap();

    assert!(remaining.iter().all(|p| p.id != ProjectId::from("p1")));
    let err = app.projects.get(&ProjectId::from("p1")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Project not found"));
    backend.stop().await;
}

#[actix_rt::test]
async fn appends_persist_images_and_timeline_in_one_update() {
    let backend = StubBackend::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let app = client(&backend, &dir.path().join("session"));
    let user = app.auth.login(login("alice@example.com")).await.unwrap();
    let project = app.projects.get(&ProjectId::from("p1")).await.unwrap();
    backend.clear_requests();

    let appended = app
        .projects
        .add_image(Some(&user), &project, "data:image/jpeg;base64,/9j/AA==".into())
        .await
        .unwrap();

    let puts: Vec<_> = backend.requests().into_iter().filter(|r| r.method == "PUT").collect();
    assert_eq!(puts.len(), 1);
    let body = puts[0].body.as_ref().unwrap().as_object().unwrap();
    let mut keys: Vec<_> = body.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["contentTimeline", "images"]);

    let timeline = ContentTimeline::from_project(&appended.project);
    let ids: Vec<_> = timeline.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["initial-image", "initial-desc", appended.anchor.as_str()]);
    assert!(appended.anchor.starts_with("image-"));
    backend.stop().await;
}

#[actix_rt::test]
async fn two_quick_appends_get_distinct_ordered_ids() {
    let backend = StubBackend::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let app = client(&backend, &dir.path().join("session"));
    let user = app.auth.login(login("owner@example.com")).await.unwrap();
    let project = app.projects.get(&ProjectId::from("p2")).await.unwrap();

    let first = app.projects.add_description(Some(&user), &project, "One").await.unwrap();
    let second = app.projects.add_description(Some(&user), &first.project, "Two").await.unwrap();

    assert_ne!(first.anchor, second.anchor);
    let timeline = ContentTimeline::from_project(&second.project);
    assert!(timeline.position(&first.anchor).unwrap() < timeline.position(&second.anchor).unwrap());
    assert_eq!(second.project.descriptions, vec!["One", "Two"]);
    backend.stop().await;
}

#[actix_rt::test]
async fn backend_messages_reach_the_caller() {
    let backend = StubBackend::spawn().await;
    let tokens = Arc::new(MemoryTokenStore::with_token("token-bob"));
    let repo = backend.repo(tokens);

    let err = repo
        .update(&ProjectId::from("p1"), &ProjectPatch::technologies(vec![]))
        .await
        .unwrap_err();

    match err {
        AppError::Backend { status, message } => {
            assert_eq!(status, Some(StatusCode::FORBIDDEN));
            assert_eq!(message, "Not authorized to update this project");
        }
        other => panic!("expected a backend error, got {:?}", other),
    }
    backend.stop().await;
}

#[actix_rt::test]
async fn wrong_passwords_surface_the_login_message() {
    let backend = StubBackend::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let app = client(&backend, &dir.path().join("session"));

    let err = app
        .auth
        .login(LoginUser { email: "alice@example.com".into(), password: "wrong-one".into() })
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Invalid email or password");
    assert!(app.tokens.get().unwrap().is_none());
    backend.stop().await;
}

#[actix_rt::test]
async fn registered_sessions_survive_a_restart() {
    let backend = StubBackend::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session");

    let first_run = client(&backend, &session);
    let user = first_run
        .auth
        .register(RegisterUser {
            first_name: "Vivian".into(),
            last_name: "Maier".into(),
            email: "vivian@example.com".into(),
            password: "street1".into(),
            confirm_password: "street1".into(),
        })
        .await
        .unwrap();

    let second_run = client(&backend, &session);
    let restored = second_run.auth.restore().await.unwrap();

    assert_eq!(restored.as_ref().map(|u| u.id.as_str()), Some(user.id.as_str()));
    assert_eq!(second_run.auth.current_user().unwrap().display_name(), "Vivian Maier");
    backend.stop().await;
}

#[actix_rt::test]
async fn stale_sessions_are_dropped() {
    let backend = StubBackend::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session");
    std::fs::write(&session, "token-ghost").unwrap();
    let app = client(&backend, &session);

    let restored = app.auth.restore().await.unwrap();

    assert!(restored.is_none());
    assert!(app.tokens.get().unwrap().is_none());
    backend.stop().await;
}

#[actix_rt::test]
async fn created_projects_show_up_with_their_creator() {
    let backend = StubBackend::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let app = client(&backend, &dir.path().join("session"));
    let user = app.auth.login(login("bob@example.com")).await.unwrap();

    let projects = app
        .projects
        .create(
            Some(&user),
            ProjectForm {
                title: "Night Market".into(),
                description: "Lanterns and steam".into(),
                technologies: "Fujifilm X100V, Lightroom".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let created = projects.iter().find(|p| p.title == "Night Market").unwrap();
    assert_eq!(created.owner_id().as_deref(), Some("bob"));
    assert_eq!(created.creator_name(), "Bob Burri");
    assert_eq!(created.technologies, vec!["Fujifilm X100V", "Lightroom"]);
    backend.stop().await;
}
