use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::users::{User, UserRole};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub nickname: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
            nickname: user.nickname,
            bio: user.bio,
            role: user.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub nickname: Option<String>,
    pub bio: Option<String>,
    #[serde(rename = "currentPassword")]
    pub current_password: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

/// Profile as carried by the session token; no database round-trip.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GithubLoginQuery {
    #[serde(rename = "returnUrl")]
    pub return_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GithubCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}
