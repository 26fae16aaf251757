pub mod auth;
pub mod local;
pub mod project;
pub mod rest;
pub mod token;
