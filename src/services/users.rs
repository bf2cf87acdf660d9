//! Signup and login service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, LoginResponse, SignupRequest, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user: hash the password and persist the account.
    /// A duplicate email surfaces as a validation error from the repository.
    pub async fn signup(&self, request: &SignupRequest) -> AppResult<User> {
        let hash = self.hash_password(&request.password)?;
        let user = self.repository.users.create(&request.email, &hash).await?;

        tracing::info!("New account registered: {}", user.id);
        Ok(user)
    }

    /// Authenticate by email and password, returning the user id and a
    /// bearer token valid for the configured window.
    ///
    /// Both failure paths answer 401; the messages differ, matching the
    /// historical behavior of this API (a known enumeration weakness).
    pub async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        let user = self
            .repository
            .users
            .get_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("No account matches this email".to_string())
            })?;

        if !self.verify_password(&user, &request.password)? {
            return Err(AppError::Authentication(
                "Wrong email and password combination".to_string(),
            ));
        }

        let claims = UserClaims::new(user.id, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(LoginResponse {
            user_id: user.id,
            token,
        })
    }

    /// Verify a password against the stored hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2 with a fresh random salt
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
