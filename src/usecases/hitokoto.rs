use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dto::hitokoto::{CreateHitokotoRequest, DeleteHitokotoResponse, UpdateHitokotoRequest},
    error::AppError,
    models::hitokoto::Hitokoto,
    repositories::hitokoto as hitokoto_repo,
};

pub struct HitokotoService;

impl HitokotoService {
    pub async fn list_hitokoto(pool: &PgPool) -> Result<Vec<Hitokoto>, AppError> {
        hitokoto_repo::list_hitokoto(pool).await
    }

    pub async fn create_hitokoto(
        pool: &PgPool,
        req: CreateHitokotoRequest,
    ) -> Result<Hitokoto, AppError> {
        let content = req.content.trim();
        if content.is_empty() {
            return Err(AppError::ValidationError(
                "Hitokoto content is required".to_string(),
            ));
        }

        let created_at = parse_entry_date(req.date.as_deref(), Utc::now());
        hitokoto_repo::create_hitokoto(pool, content, req.source, created_at).await
    }

    pub async fn update_hitokoto(
        pool: &PgPool,
        hitokoto_id: Uuid,
        req: UpdateHitokotoRequest,
    ) -> Result<Hitokoto, AppError> {
        hitokoto_repo::update_hitokoto(pool, hitokoto_id, req.content, req.source)
            .await?
            .ok_or_else(|| AppError::NotFound("Hitokoto not found".to_string()))
    }

    pub async fn delete_hitokoto(
        pool: &PgPool,
        hitokoto_id: Uuid,
    ) -> Result<DeleteHitokotoResponse, AppError> {
        let removed = hitokoto_repo::delete_hitokoto(pool, hitokoto_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Hitokoto not found".to_string()));
        }

        Ok(DeleteHitokotoResponse {
            message: "Hitokoto deleted".to_string(),
        })
    }
}

/// Entries may be backdated with a `YYYY-MM-DD` date; anything else falls
/// back to `now`.
fn parse_entry_date(date: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    date.and_then(|value| NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn valid_date_is_used_as_creation_time() {
        let now = Utc::now();
        let parsed = parse_entry_date(Some("2023-05-17"), now);
        assert_eq!(parsed.year(), 2023);
        assert_eq!(parsed.month(), 5);
        assert_eq!(parsed.day(), 17);
    }

    #[test]
    fn invalid_or_missing_date_falls_back_to_now() {
        let now = Utc::now();
        assert_eq!(parse_entry_date(Some("May 17"), now), now);
        assert_eq!(parse_entry_date(None, now), now);
    }
}
