//! Create like tables migration.
//!
//! Three membership tables, one per likeable entity. Each carries a unique
//! `(user_id, target_id)` index so a toggle can never insert a duplicate
//! row under concurrency; counts are derived with `COUNT(*)`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // recipe_like
        manager
            .create_table(
                Table::create()
                    .table(RecipeLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeLike::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecipeLike::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(RecipeLike::RecipeId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(RecipeLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_like_user")
                            .from(RecipeLike::Table, RecipeLike::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_like_recipe")
                            .from(RecipeLike::Table, RecipeLike::RecipeId)
                            .to(Recipe::Table, Recipe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_like_user_recipe")
                    .table(RecipeLike::Table)
                    .col(RecipeLike::UserId)
                    .col(RecipeLike::RecipeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_like_recipe_id")
                    .table(RecipeLike::Table)
                    .col(RecipeLike::RecipeId)
                    .to_owned(),
            )
            .await?;

        // comment_like
        manager
            .create_table(
                Table::create()
                    .table(CommentLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommentLike::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CommentLike::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(CommentLike::CommentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommentLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_like_user")
                            .from(CommentLike::Table, CommentLike::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_like_comment")
                            .from(CommentLike::Table, CommentLike::CommentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_like_user_comment")
                    .table(CommentLike::Table)
                    .col(CommentLike::UserId)
                    .col(CommentLike::CommentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // reply_like
        manager
            .create_table(
                Table::create()
                    .table(ReplyLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReplyLike::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReplyLike::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(ReplyLike::ReplyId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ReplyLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reply_like_user")
                            .from(ReplyLike::Table, ReplyLike::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reply_like_reply")
                            .from(ReplyLike::Table, ReplyLike::ReplyId)
                            .to(Reply::Table, Reply::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reply_like_user_reply")
                    .table(ReplyLike::Table)
                    .col(ReplyLike::UserId)
                    .col(ReplyLike::ReplyId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReplyLike::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CommentLike::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeLike::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RecipeLike {
    Table,
    Id,
    UserId,
    RecipeId,
    CreatedAt,
}

#[derive(Iden)]
enum CommentLike {
    Table,
    Id,
    UserId,
    CommentId,
    CreatedAt,
}

#[derive(Iden)]
enum ReplyLike {
    Table,
    Id,
    UserId,
    ReplyId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Recipe {
    Table,
    Id,
}

#[derive(Iden)]
enum Comment {
    Table,
    Id,
}

#[derive(Iden)]
enum Reply {
    Table,
    Id,
}
