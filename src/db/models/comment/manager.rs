//! Manager for the comment model.
use super::{AdminComment, Comment, NewComment};
use crate::db::models::{page_offset, PAGE_SIZE};
use crate::db::{DatabaseConnection, DatabaseKind};
use async_trait::async_trait;

#[async_trait]
impl super::Manager for DatabaseConnection {
    /// Find the comments of a publication, oldest first.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_comments_by_publication_id(
        &self,
        publication_id: i64,
    ) -> anyhow::Result<Vec<Comment>> {
        let statement = r#"
            SELECT comment.comment_id,
                   comment.publication_id,
                   comment.comment_content,
                   CAST(comment.comment_datetime AS TEXT) AS comment_datetime,
                   "user".user_id,
                   user_login,
                   user_full_name,
                   user_email,
                   user_karma
            FROM comment
                     LEFT JOIN "user" ON "user".user_id = comment.user_id
            WHERE comment.publication_id = $1
            ORDER BY comment.comment_datetime, comment.comment_id
        "#;
        let rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Comment>(statement)
                    .bind(publication_id)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Find one page of comments, newest first.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_all_comments(&self, page: i64) -> anyhow::Result<Vec<AdminComment>> {
        let statement = r#"
            SELECT comment.comment_id,
                   comment.comment_content,
                   CAST(comment.comment_datetime AS TEXT) AS comment_datetime,
                   "publication".publication_id,
                   publication_header,
                   user_login
            FROM comment
                     INNER JOIN "publication" ON "publication".publication_id = comment.publication_id
                     LEFT JOIN "user" ON "user".user_id = comment.user_id
            ORDER BY comment.comment_datetime DESC, comment.comment_id DESC
            LIMIT $1
            OFFSET $2
        "#;
        let rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, AdminComment>(statement)
                    .bind(PAGE_SIZE)
                    .bind(page_offset(page))
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Count all comments.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn get_comments_count(&self) -> anyhow::Result<i64> {
        let statement = "
            SELECT COUNT(*) AS count
            FROM comment
        ";
        let row = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, (i64,)>(statement)
                    .fetch_one(&mut *connection)
                    .await?
            }
        };
        Ok(row.0)
    }

    /// Delete a comment by id. Deleting a missing comment is a no-op.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn delete(&self, comment_id: i64) -> anyhow::Result<()> {
        let statement = "
            DELETE FROM comment
            WHERE comment_id = $1
        ";
        match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query(statement)
                    .bind(comment_id)
                    .execute(&mut *connection)
                    .await?;
            }
        }
        tracing::debug!(comment_id, "Deleted comment");
        Ok(())
    }

    /// Insert a new comment and return its id.
    ///
    /// # Errors
    /// Errors if the publication or the user does not exist.
    async fn insert(&self, comment: &NewComment) -> anyhow::Result<i64> {
        let statement = "
            INSERT INTO comment ( publication_id, user_id, comment_content )
            VALUES ( $1, $2, $3 )
            RETURNING comment_id
        ";
        let row = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, (i64,)>(statement)
                    .bind(comment.publication_id)
                    .bind(comment.user_id)
                    .bind(&comment.content)
                    .fetch_one(&mut *connection)
                    .await?
            }
        };
        Ok(row.0)
    }
}
