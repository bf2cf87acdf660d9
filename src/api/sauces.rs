//! Sauce endpoints

use axum::{
    extract::{FromRequest, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    Json,
};
use axum_extra::extract::Multipart;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::sauce::{CreateSauce, LikeAction, LikeRequest, Sauce, ToggleOutcome, UpdateSauce},
    services::storage::ImageUpload,
};

use super::{AuthenticatedUser, MessageResponse};

/// List every sauce
#[utoipa::path(
    get,
    path = "/sauces",
    tag = "sauces",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All sauces", body = Vec<Sauce>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_sauces(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Sauce>>> {
    let sauces = state.services.sauces.list_all().await?;
    Ok(Json(sauces))
}

/// Get one sauce by id
#[utoipa::path(
    get,
    path = "/sauces/{id}",
    tag = "sauces",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Sauce ID")),
    responses(
        (status = 200, description = "Sauce details", body = Sauce),
        (status = 404, description = "Sauce not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_sauce(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Sauce>> {
    let sauce = state.services.sauces.get_one(id).await?;
    Ok(Json(sauce))
}

/// Create a sauce from a multipart request: a `sauce` field holding the
/// JSON payload and an `image` file field.
#[utoipa::path(
    post,
    path = "/sauces",
    tag = "sauces",
    security(("bearer_auth" = [])),
    request_body(content = CreateSauce, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Sauce created", body = MessageResponse),
        (status = 400, description = "Invalid payload or image", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_sauce(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let (payload, image): (CreateSauce, _) = read_sauce_payload(multipart).await?;
    payload.validate()?;

    let image = image
        .ok_or_else(|| AppError::Validation("An image file is required".to_string()))?;

    state
        .services
        .sauces
        .create(claims.user_id, &payload, &image)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Sauce created")),
    ))
}

/// Update a sauce. Accepts either multipart form data (with a replacement
/// image) or a plain JSON body (fields only).
#[utoipa::path(
    put,
    path = "/sauces/{id}",
    tag = "sauces",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Sauce ID")),
    request_body = UpdateSauce,
    responses(
        (status = 201, description = "Sauce updated", body = MessageResponse),
        (status = 403, description = "Requester does not own the sauce", body = crate::error::ErrorResponse),
        (status = 404, description = "Sauce not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_sauce(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    request: Request,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let (payload, image): (UpdateSauce, _) = if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?;
        read_sauce_payload(multipart).await?
    } else {
        let Json(payload) = Json::<UpdateSauce>::from_request(request, &())
            .await
            .map_err(|e| AppError::Validation(format!("Invalid JSON body: {}", e)))?;
        (payload, None)
    };
    payload.validate()?;

    state
        .services
        .sauces
        .update(claims.user_id, id, &payload, image.as_ref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Sauce updated")),
    ))
}

/// Delete a sauce and its image
#[utoipa::path(
    delete,
    path = "/sauces/{id}",
    tag = "sauces",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Sauce ID")),
    responses(
        (status = 200, description = "Sauce deleted", body = MessageResponse),
        (status = 403, description = "Requester does not own the sauce", body = crate::error::ErrorResponse),
        (status = 404, description = "Sauce not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_sauce(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.services.sauces.delete(claims.user_id, id).await?;
    Ok(Json(MessageResponse::new("Sauce deleted")))
}

/// Like, dislike, or withdraw a reaction.
///
/// `like` must be 1 (like), -1 (dislike) or 0 (withdraw). The reaction is
/// recorded for the authenticated user. Every branch answers, including a
/// withdraw with nothing to remove.
#[utoipa::path(
    post,
    path = "/sauces/{id}/like",
    tag = "sauces",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Sauce ID")),
    request_body = LikeRequest,
    responses(
        (status = 201, description = "Reaction recorded", body = MessageResponse),
        (status = 200, description = "Nothing changed", body = MessageResponse),
        (status = 400, description = "Invalid like value", body = crate::error::ErrorResponse),
        (status = 404, description = "Sauce not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn like_sauce(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<LikeRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let action = LikeAction::try_from(request.like)?;

    let outcome = state
        .services
        .sauces
        .toggle(claims.user_id, id, action)
        .await?;

    let (status, message) = match outcome {
        ToggleOutcome::Liked => (StatusCode::CREATED, "Sauce appreciated"),
        ToggleOutcome::Disliked => (StatusCode::CREATED, "Sauce not appreciated"),
        ToggleOutcome::LikeRemoved => (StatusCode::CREATED, "Like removed"),
        ToggleOutcome::DislikeRemoved => (StatusCode::CREATED, "Dislike removed"),
        ToggleOutcome::Unchanged => (StatusCode::OK, "Sauce unchanged"),
    };

    Ok((status, Json(MessageResponse::new(message))))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Pull the `sauce` JSON field and the optional `image` file out of a
/// multipart request. Extra fields are ignored.
async fn read_sauce_payload<T: DeserializeOwned>(
    mut multipart: Multipart,
) -> AppResult<(T, Option<ImageUpload>)> {
    let mut sauce_json: Option<String> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("sauce") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid sauce field: {}", e)))?;
                sauce_json = Some(text);
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field
                    .content_type()
                    .ok_or_else(|| {
                        AppError::Validation("Image field is missing a content type".to_string())
                    })?
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid image field: {}", e)))?;
                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    let sauce_json = sauce_json
        .ok_or_else(|| AppError::Validation("Missing sauce field".to_string()))?;
    let payload = serde_json::from_str(&sauce_json)
        .map_err(|e| AppError::Validation(format!("Invalid sauce payload: {}", e)))?;

    Ok((payload, image))
}
