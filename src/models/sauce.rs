//! Sauce model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Full sauce record from the database.
///
/// Serialized in camelCase to match the client contract.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sauce {
    pub id: Uuid,
    /// Owner of the sauce, fixed at creation
    pub user_id: Uuid,
    pub name: String,
    pub manufacturer: String,
    pub description: String,
    pub main_pepper: String,
    pub image_url: String,
    pub heat: i16,
    pub likes: i32,
    pub dislikes: i32,
    pub users_liked: Vec<Uuid>,
    pub users_disliked: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create sauce payload (the `sauce` JSON field of the multipart request).
///
/// Server-assigned fields (`_id`, `userId`, `imageUrl`) are tolerated in the
/// input because the reference client sends them, but their values are
/// discarded. Any other unrecognized field is rejected.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateSauce {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Manufacturer must be 1-255 characters"))]
    pub manufacturer: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 255, message = "Main pepper must be 1-255 characters"))]
    pub main_pepper: String,
    #[validate(range(min = 0, max = 10, message = "Heat must be between 0 and 10"))]
    pub heat: i16,
    #[serde(default, rename = "_id")]
    #[schema(value_type = Object)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub user_id: Option<serde_json::Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub image_url: Option<serde_json::Value>,
}

/// Update sauce payload (plain JSON body, or the `sauce` field when a new
/// image is attached). Same allow-list as [`CreateSauce`]: the five content
/// fields replace the stored ones, identifier and owner never change.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSauce {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Manufacturer must be 1-255 characters"))]
    pub manufacturer: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 255, message = "Main pepper must be 1-255 characters"))]
    pub main_pepper: String,
    #[validate(range(min = 0, max = 10, message = "Heat must be between 0 and 10"))]
    pub heat: i16,
    #[serde(default, rename = "_id")]
    #[schema(value_type = Object)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub user_id: Option<serde_json::Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub image_url: Option<serde_json::Value>,
}

/// Like/dislike request body.
///
/// The `userId` field is part of the client contract but the reaction is
/// always recorded for the authenticated user from the bearer token.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub like: i16,
}

/// Reaction requested by a like call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Like,
    Dislike,
    Neutral,
}

impl TryFrom<i16> for LikeAction {
    type Error = crate::error::AppError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LikeAction::Like),
            -1 => Ok(LikeAction::Dislike),
            0 => Ok(LikeAction::Neutral),
            other => Err(crate::error::AppError::Validation(format!(
                "Invalid like value {}: expected 1, -1 or 0",
                other
            ))),
        }
    }
}

/// Outcome of a toggle, reported back to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Liked,
    Disliked,
    LikeRemoved,
    DislikeRemoved,
    /// The request did not change the sauce (already liked/disliked, or
    /// neutral with no prior reaction)
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_action_parses_known_values() {
        assert_eq!(LikeAction::try_from(1).unwrap(), LikeAction::Like);
        assert_eq!(LikeAction::try_from(-1).unwrap(), LikeAction::Dislike);
        assert_eq!(LikeAction::try_from(0).unwrap(), LikeAction::Neutral);
    }

    #[test]
    fn like_action_rejects_other_values() {
        assert!(LikeAction::try_from(2).is_err());
        assert!(LikeAction::try_from(-2).is_err());
    }

    #[test]
    fn update_payload_rejects_unknown_fields() {
        let body = r#"{
            "name": "Fiery",
            "manufacturer": "Acme",
            "description": "Hot",
            "mainPepper": "Habanero",
            "heat": 8,
            "likes": 99
        }"#;
        assert!(serde_json::from_str::<UpdateSauce>(body).is_err());
    }

    #[test]
    fn update_payload_tolerates_server_assigned_fields() {
        let body = r#"{
            "_id": "abc",
            "userId": "def",
            "imageUrl": "http://example.com/images/x.png",
            "name": "Fiery",
            "manufacturer": "Acme",
            "description": "Hot",
            "mainPepper": "Habanero",
            "heat": 8
        }"#;
        let payload: UpdateSauce = serde_json::from_str(body).unwrap();
        assert_eq!(payload.name, "Fiery");
        assert_eq!(payload.heat, 8);
    }

    #[test]
    fn update_payload_requires_content_fields() {
        let body = r#"{"name": "Fiery"}"#;
        assert!(serde_json::from_str::<UpdateSauce>(body).is_err());
    }
}
