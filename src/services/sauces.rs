//! Sauce management service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::sauce::{CreateSauce, LikeAction, Sauce, ToggleOutcome, UpdateSauce},
    repository::Repository,
    services::storage::{ImageUpload, StorageService},
};

#[derive(Clone)]
pub struct SaucesService {
    repository: Repository,
    storage: StorageService,
}

impl SaucesService {
    pub fn new(repository: Repository, storage: StorageService) -> Self {
        Self {
            repository,
            storage,
        }
    }

    /// Every sauce in the database
    pub async fn list_all(&self) -> AppResult<Vec<Sauce>> {
        self.repository.sauces.get_all().await
    }

    /// One sauce by id
    pub async fn get_one(&self, id: Uuid) -> AppResult<Sauce> {
        self.repository.sauces.get_by_id(id).await
    }

    /// Create a sauce owned by `owner_id`. The image is stored first; if
    /// the insert then fails, the freshly stored file is removed again.
    pub async fn create(
        &self,
        owner_id: Uuid,
        sauce: &CreateSauce,
        image: &ImageUpload,
    ) -> AppResult<Sauce> {
        let image_url = self.storage.store(image).await?;

        match self.repository.sauces.create(owner_id, sauce, &image_url).await {
            Ok(created) => {
                tracing::info!("Sauce {} created by user {}", created.id, owner_id);
                Ok(created)
            }
            Err(e) => {
                self.storage.delete_by_url(&image_url).await;
                Err(e)
            }
        }
    }

    /// Update a sauce's content fields, optionally replacing its image.
    /// Only the owner may update; the old image file is removed when a new
    /// one is attached.
    pub async fn update(
        &self,
        requester_id: Uuid,
        id: Uuid,
        sauce: &UpdateSauce,
        image: Option<&ImageUpload>,
    ) -> AppResult<()> {
        let stored = self.repository.sauces.get_by_id(id).await?;
        self.check_ownership(&stored, requester_id)?;

        match image {
            Some(image) => {
                // Old file, new file, then the row, in that order.
                self.storage.delete_by_url(&stored.image_url).await;
                let image_url = self.storage.store(image).await?;
                self.repository.sauces.update(id, sauce, Some(&image_url)).await
            }
            None => self.repository.sauces.update(id, sauce, None).await,
        }
    }

    /// Delete a sauce and its image file. Only the owner may delete.
    pub async fn delete(&self, requester_id: Uuid, id: Uuid) -> AppResult<()> {
        let stored = self.repository.sauces.get_by_id(id).await?;
        self.check_ownership(&stored, requester_id)?;

        self.storage.delete_by_url(&stored.image_url).await;
        self.repository.sauces.delete(id).await?;

        tracing::info!("Sauce {} deleted by user {}", id, requester_id);
        Ok(())
    }

    /// Apply a like/dislike/neutral action for `user_id`.
    ///
    /// The neutral branch picks its target set from a prior read; under
    /// concurrent toggles on the same pair that read can be stale, in which
    /// case the guarded update turns into a no-op rather than corrupting
    /// the counters.
    pub async fn toggle(
        &self,
        user_id: Uuid,
        id: Uuid,
        action: LikeAction,
    ) -> AppResult<ToggleOutcome> {
        let sauce = self.repository.sauces.get_by_id(id).await?;

        let outcome = match action {
            LikeAction::Like => {
                if self.repository.sauces.add_like(id, user_id).await? {
                    ToggleOutcome::Liked
                } else {
                    ToggleOutcome::Unchanged
                }
            }
            LikeAction::Dislike => {
                if self.repository.sauces.add_dislike(id, user_id).await? {
                    ToggleOutcome::Disliked
                } else {
                    ToggleOutcome::Unchanged
                }
            }
            LikeAction::Neutral => {
                if sauce.users_liked.contains(&user_id) {
                    if self.repository.sauces.remove_like(id, user_id).await? {
                        ToggleOutcome::LikeRemoved
                    } else {
                        ToggleOutcome::Unchanged
                    }
                } else if sauce.users_disliked.contains(&user_id) {
                    if self.repository.sauces.remove_dislike(id, user_id).await? {
                        ToggleOutcome::DislikeRemoved
                    } else {
                        ToggleOutcome::Unchanged
                    }
                } else {
                    ToggleOutcome::Unchanged
                }
            }
        };

        Ok(outcome)
    }

    fn check_ownership(&self, sauce: &Sauce, requester_id: Uuid) -> AppResult<()> {
        if sauce.user_id != requester_id {
            return Err(AppError::Authorization(
                "Only the owner of a sauce may modify it".to_string(),
            ));
        }
        Ok(())
    }
}
