//! Database repositories.

pub mod comment;
pub mod favorite;
pub mod following;
pub mod like;
pub mod recipe;
pub mod report;
pub mod user;

pub use comment::CommentRepository;
pub use favorite::FavoriteRepository;
pub use following::FollowingRepository;
pub use like::LikeRepository;
pub use recipe::RecipeRepository;
pub use report::ReportRepository;
pub use user::UserRepository;
