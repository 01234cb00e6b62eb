//! Manager for the tag model.
use super::Tag;
use crate::db::{DatabaseConnection, DatabaseKind};
use async_trait::async_trait;

#[async_trait]
impl super::Manager for DatabaseConnection {
    /// Find all tags.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_all(&self) -> anyhow::Result<Vec<Tag>> {
        let statement = r#"
            SELECT "tag".tag_id, tag_name
            FROM "tag"
            ORDER BY "tag".tag_id
        "#;
        let rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Tag>(statement)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Find the tags marking a publication.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_tags_by_publication_id(&self, publication_id: i64) -> anyhow::Result<Vec<Tag>> {
        let statement = r#"
            SELECT "tag".tag_id, tag_name
            FROM "tag"
                INNER JOIN marked ON "tag".tag_id = marked.tag_id
            WHERE marked.publication_id = $1
            ORDER BY "tag".tag_id
        "#;
        let rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Tag>(statement)
                    .bind(publication_id)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }
}
