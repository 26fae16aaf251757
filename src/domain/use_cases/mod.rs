pub mod auth;
pub mod permissions;
pub mod projects;
pub mod timeline;
