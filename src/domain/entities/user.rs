use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::constants::{ROLE_ADMIN, ROLE_ME};
use crate::domain::entities::record_id;
use crate::domain::validation::{validate_name, validate_password, validate_required, EMAIL_REGEX};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// The site owner.
    Me,
    Admin,
    Member(String),
}

impl Role {
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Me | Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Member("user".to_string())
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            ROLE_ME => Role::Me,
            ROLE_ADMIN => Role::Admin,
            _ => Role::Member(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Me => write!(f, "{}", ROLE_ME),
            Role::Admin => write!(f, "{}", ROLE_ADMIN),
            Role::Member(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UserRecord")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Wire form of a user document.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    role: Role,
    #[serde(default)]
    avatar: Option<String>,
}

impl TryFrom<UserRecord> for User {
    type Error = String;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        Ok(User {
            id: record_id(record.id, record.object_id, "user")?,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            role: record.role,
            avatar: record.avatar,
        })
    }
}

impl User {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(
        custom(function = "validate_required"),
        regex(path = *EMAIL_REGEX, message = "Please enter a valid email address")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(custom(function = "validate_name", message = "First name must be at least 2 characters"))]
    pub first_name: String,

    #[validate(custom(function = "validate_name", message = "Last name must be at least 2 characters"))]
    pub last_name: String,

    #[validate(
        custom(function = "validate_required"),
        regex(path = *EMAIL_REGEX, message = "Please enter a valid email address")
    )]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// Body of `POST /auth/register`; the confirmation never leaves the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterUser {
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}
