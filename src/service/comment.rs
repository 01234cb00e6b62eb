//! Thin layer over the comment manager.
use crate::db::models::comment::{AdminComment, Comment, Manager};
use crate::db::models::Page;

/// Comment operations used by the admin page and by publication pages.
#[derive(Debug, Clone)]
pub struct CommentService<M> {
    /// Store the comments are read from and deleted in.
    manager: M,
}

impl<M: Manager + Sync> CommentService<M> {
    /// Create a new comment service over a manager, usually a `DatabaseConnection`.
    pub const fn new(manager: M) -> Self {
        Self { manager }
    }

    /// One page of comments for moderation, with the total number of comments.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    pub async fn get_all_admin_comments(&self, page: i64) -> anyhow::Result<Page<AdminComment>> {
        let comments = self.manager.find_all_comments(page).await?;
        let total = self.manager.get_comments_count().await?;
        Ok(Page::new(comments, total))
    }

    /// Delete a comment.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    pub async fn delete_by_id(&self, comment_id: i64) -> anyhow::Result<()> {
        self.manager.delete(comment_id).await
    }

    /// Comments of a publication, oldest first.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    pub async fn find_comments_by_publication_id(
        &self,
        publication_id: i64,
    ) -> anyhow::Result<Vec<Comment>> {
        self.manager
            .find_comments_by_publication_id(publication_id)
            .await
    }

    /// Total number of comments.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    pub async fn get_rows_count(&self) -> anyhow::Result<i64> {
        self.manager.get_comments_count().await
    }
}
