//! Business logic services

pub mod sauces;
pub mod storage;
pub mod users;

use crate::{
    config::{AuthConfig, StorageConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    repository: Repository,
    pub users: users::UsersService,
    pub sauces: sauces::SaucesService,
    pub storage: storage::StorageService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        storage_config: StorageConfig,
    ) -> Self {
        let storage = storage::StorageService::new(storage_config);
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            sauces: sauces::SaucesService::new(repository.clone(), storage.clone()),
            storage,
            repository,
        }
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping_database(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.repository.pool)
            .await?;
        Ok(())
    }
}
