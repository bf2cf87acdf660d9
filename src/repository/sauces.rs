//! Sauces repository for database operations.
//!
//! Reaction counters and membership arrays always move together inside a
//! single UPDATE statement, guarded on current membership, so `likes` stays
//! equal to the size of `users_liked` (and the dislike pair likewise) no
//! matter how concurrent toggles interleave.

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::sauce::{CreateSauce, Sauce, UpdateSauce},
};

const SAUCE_COLUMNS: &str = "id, user_id, name, manufacturer, description, main_pepper, \
                             image_url, heat, likes, dislikes, users_liked, users_disliked, \
                             created_at, updated_at";

#[derive(Clone)]
pub struct SaucesRepository {
    pool: Pool<Postgres>,
}

impl SaucesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Fetch every sauce, newest first
    pub async fn get_all(&self) -> AppResult<Vec<Sauce>> {
        let sauces = sqlx::query_as::<_, Sauce>(&format!(
            "SELECT {} FROM sauces ORDER BY created_at DESC",
            SAUCE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sauces)
    }

    /// Get sauce by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Sauce> {
        sqlx::query_as::<_, Sauce>(&format!(
            "SELECT {} FROM sauces WHERE id = $1",
            SAUCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sauce with id {} not found", id)))
    }

    /// Insert a new sauce with empty reaction state
    pub async fn create(
        &self,
        owner_id: Uuid,
        sauce: &CreateSauce,
        image_url: &str,
    ) -> AppResult<Sauce> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Sauce>(&format!(
            r#"
            INSERT INTO sauces (
                id, user_id, name, manufacturer, description, main_pepper,
                image_url, heat, likes, dislikes, users_liked, users_disliked,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, 0, 0, '{{}}', '{{}}', $9, $9
            ) RETURNING {}
            "#,
            SAUCE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&sauce.name)
        .bind(&sauce.manufacturer)
        .bind(&sauce.description)
        .bind(&sauce.main_pepper)
        .bind(image_url)
        .bind(sauce.heat)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Replace the content fields of a sauce. The image URL is only touched
    /// when a new one is supplied; identifier and owner never change.
    pub async fn update(
        &self,
        id: Uuid,
        sauce: &UpdateSauce,
        image_url: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE sauces
            SET name = $2, manufacturer = $3, description = $4, main_pepper = $5,
                heat = $6, image_url = COALESCE($7, image_url), updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&sauce.name)
        .bind(&sauce.manufacturer)
        .bind(&sauce.description)
        .bind(&sauce.main_pepper)
        .bind(sauce.heat)
        .bind(image_url)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a sauce row
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM sauces WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record a like for a user. No-op when the user already liked the
    /// sauce; a standing dislike from the same user is withdrawn in the
    /// same statement so the user ends up in exactly one set.
    ///
    /// Returns whether the sauce changed.
    pub async fn add_like(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sauces
            SET likes = likes + 1,
                users_liked = array_append(users_liked, $2),
                dislikes = dislikes - (CASE WHEN $2 = ANY(users_disliked) THEN 1 ELSE 0 END),
                users_disliked = array_remove(users_disliked, $2),
                updated_at = $3
            WHERE id = $1 AND NOT ($2 = ANY(users_liked))
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mirror of [`add_like`](Self::add_like) for dislikes
    pub async fn add_dislike(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sauces
            SET dislikes = dislikes + 1,
                users_disliked = array_append(users_disliked, $2),
                likes = likes - (CASE WHEN $2 = ANY(users_liked) THEN 1 ELSE 0 END),
                users_liked = array_remove(users_liked, $2),
                updated_at = $3
            WHERE id = $1 AND NOT ($2 = ANY(users_disliked))
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Withdraw a like. The membership guard makes this safe to attempt
    /// even when the triggering read has gone stale.
    pub async fn remove_like(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sauces
            SET likes = likes - 1,
                users_liked = array_remove(users_liked, $2),
                updated_at = $3
            WHERE id = $1 AND $2 = ANY(users_liked)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Withdraw a dislike
    pub async fn remove_dislike(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sauces
            SET dislikes = dislikes - 1,
                users_disliked = array_remove(users_disliked, $2),
                updated_at = $3
            WHERE id = $1 AND $2 = ANY(users_disliked)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
