//! User service.

use savora_common::{AppError, AppResult, IdGenerator};
use savora_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use validator::Validate;

/// Input for registering a user.
#[derive(Debug, Validate)]
pub struct RegisterUserInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 128))]
    pub display_name: Option<String>,
}

/// User service for identity resolution and account records.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve an API token to a user.
    ///
    /// Token issuance/verification is an external concern; this is a pure
    /// lookup that maps an opaque token to an identity.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Register a new user account.
    pub async fn register(&self, input: RegisterUserInput) -> AppResult<user::Model> {
        input.validate()?;

        let username = input.username.trim();
        if username.is_empty()
            || !username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AppError::InvalidInput(
                "Username may only contain letters, digits and underscores".to_string(),
            ));
        }
        let email = input.email.trim();

        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        // The unique index still backs this under concurrency; the lookup
        // keeps the common case on a 409 instead of a database error.
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(username.to_string()),
            username_lower: Set(username.to_lowercase()),
            email: Set(email.to_string()),
            token: Set(Some(self.id_gen.generate_token())),
            display_name: Set(input.display_name),
            bio: Set(None),
            avatar_url: Set(None),
            is_active: Set(true),
            is_admin: Set(false),
            ban_expires_at: Set(None),
            ban_reason: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.user_repo.create(model).await
    }
}
