//! User entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    pub username_lower: String,

    #[sea_orm(unique)]
    pub email: String,

    /// API token (issuance handled externally; the engine only resolves it)
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    /// Display name
    #[sea_orm(nullable)]
    pub display_name: Option<String>,

    /// Profile description
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    /// Avatar URL
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Is this account active? Independent of ban state.
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    /// Is this user an admin?
    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    /// When the current ban lapses. NULL = not banned.
    ///
    /// Ban status is never stored as a flag; it is derived from this
    /// timestamp at read time so an expired ban lapses without a sweep.
    #[sea_orm(nullable)]
    pub ban_expires_at: Option<DateTimeWithTimeZone>,

    /// Reason given for the current ban.
    #[sea_orm(nullable)]
    pub ban_reason: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether this user is banned at the given instant.
    ///
    /// Pure predicate: `ban_expires_at` is set and in the future.
    #[must_use]
    pub fn is_banned_at(&self, now: DateTime<Utc>) -> bool {
        self.ban_expires_at.is_some_and(|expires| expires > now)
    }

    /// Whether this user is banned right now.
    #[must_use]
    pub fn is_banned(&self) -> bool {
        self.is_banned_at(Utc::now())
    }

    /// Whether this user may perform mutating actions.
    ///
    /// A ban implies the account is treated as inactive for authorization,
    /// even when `is_active` is still true.
    #[must_use]
    pub fn can_mutate(&self) -> bool {
        self.is_active && !self.is_banned()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe::Entity")]
    Recipes,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
