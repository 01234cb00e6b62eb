use super::user::User;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{any::AnyRow, FromRow, Row as _};

pub mod manager;

/// Trait for managing comments.
#[async_trait]
pub trait Manager {
    /// Find the comments of a publication, oldest first.
    async fn find_comments_by_publication_id(
        &self,
        publication_id: i64,
    ) -> anyhow::Result<Vec<Comment>>;
    /// Find one page of comments for the moderation listing, newest first.
    async fn find_all_comments(&self, page: i64) -> anyhow::Result<Vec<AdminComment>>;
    /// Count all comments.
    async fn get_comments_count(&self) -> anyhow::Result<i64>;
    /// Delete a comment by id.
    async fn delete(&self, comment_id: i64) -> anyhow::Result<()>;
    /// Insert a new comment and return its id.
    async fn insert(&self, comment: &NewComment) -> anyhow::Result<i64>;
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
/// Model for a comment attached to a publication.
pub struct Comment {
    /// Comment identifier.
    pub id: i64,
    /// Foreign key reference to the commented publication.
    pub publication_id: i64,
    /// Author of the comment, `None` if the user row is gone.
    pub author: Option<User>,
    /// Comment text.
    pub content: String,
    /// Creation time.
    pub datetime: NaiveDateTime,
}

impl FromRow<'_, AnyRow> for Comment {
    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        let datetime: String = row.try_get("comment_datetime")?;
        Ok(Self {
            id: row.try_get("comment_id")?,
            publication_id: row.try_get("publication_id")?,
            author: User::from_joined_row(row)?,
            content: row.try_get("comment_content")?,
            datetime: super::parse_datetime("comment_datetime", &datetime)?,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
/// Comment as shown on the moderation page, with the publication and author it belongs to.
pub struct AdminComment {
    /// Comment identifier.
    pub id: i64,
    /// Comment text.
    pub content: String,
    /// Creation time.
    pub datetime: NaiveDateTime,
    /// Commented publication.
    pub publication_id: i64,
    /// Header of the commented publication.
    pub publication_header: String,
    /// Login of the author, `None` if the user row is gone.
    pub user_login: Option<String>,
}

impl FromRow<'_, AnyRow> for AdminComment {
    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        let datetime: String = row.try_get("comment_datetime")?;
        Ok(Self {
            id: row.try_get("comment_id")?,
            content: row.try_get("comment_content")?,
            datetime: super::parse_datetime("comment_datetime", &datetime)?,
            publication_id: row.try_get("publication_id")?,
            publication_header: row.try_get("publication_header")?,
            user_login: super::try_get_nullable(row, "user_login")?,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
/// Input for inserting a comment.
pub struct NewComment {
    /// Commented publication.
    pub publication_id: i64,
    /// Author.
    pub user_id: i64,
    /// Comment text.
    pub content: String,
}
