use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dto::friends::{CreateFriendRequest, DeleteFriendResponse, UpdateFriendRequest},
    error::AppError,
    models::friends::Friend,
    repositories::friends as friend_repo,
};

pub struct FriendService;

impl FriendService {
    pub async fn list_friends(pool: &PgPool) -> Result<Vec<Friend>, AppError> {
        friend_repo::list_friends(pool).await
    }

    pub async fn create_friend(
        pool: &PgPool,
        req: CreateFriendRequest,
    ) -> Result<Friend, AppError> {
        let name = req.name.trim();
        let url = req.url.trim();
        if name.is_empty() || url.is_empty() {
            return Err(AppError::ValidationError(
                "Friend link name and url are required".to_string(),
            ));
        }

        friend_repo::create_friend(pool, name, url, req.avatar, req.description).await
    }

    pub async fn update_friend(
        pool: &PgPool,
        friend_id: Uuid,
        req: UpdateFriendRequest,
    ) -> Result<Friend, AppError> {
        friend_repo::update_friend(pool, friend_id, req.name, req.url, req.avatar, req.description)
            .await?
            .ok_or_else(|| AppError::NotFound("Friend link not found".to_string()))
    }

    pub async fn delete_friend(
        pool: &PgPool,
        friend_id: Uuid,
    ) -> Result<DeleteFriendResponse, AppError> {
        let removed = friend_repo::delete_friend(pool, friend_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Friend link not found".to_string()));
        }

        Ok(DeleteFriendResponse {
            message: "Friend link deleted".to_string(),
        })
    }
}
