//! Database entities.

pub mod category;
pub mod comment;
pub mod comment_like;
pub mod favorite;
pub mod following;
pub mod ingredient;
pub mod recipe;
pub mod recipe_like;
pub mod reply;
pub mod reply_like;
pub mod report;
pub mod user;

pub use category::Entity as Category;
pub use comment::Entity as Comment;
pub use comment_like::Entity as CommentLike;
pub use favorite::Entity as Favorite;
pub use following::Entity as Following;
pub use ingredient::Entity as Ingredient;
pub use recipe::Entity as Recipe;
pub use recipe_like::Entity as RecipeLike;
pub use reply::Entity as Reply;
pub use reply_like::Entity as ReplyLike;
pub use report::Entity as Report;
pub use user::Entity as User;
