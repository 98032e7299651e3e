//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod engagement;
pub mod following;
pub mod moderation;
pub mod recipe;
pub mod user;

pub use comment::CommentService;
pub use engagement::{EngagementService, LikeOutcome};
pub use following::FollowingService;
pub use moderation::{
    BanDurationUnit, BanUserInput, CreateReportInput, ModerationService,
};
pub use recipe::{
    CommentDetail, CreateRecipeInput, IngredientInput, RecipeDetail, RecipeService, ReplyDetail,
};
pub use user::{RegisterUserInput, UserService};
