//! Manager for the genre model.
use super::Genre;
use crate::db::{DatabaseConnection, DatabaseKind};
use async_trait::async_trait;

#[async_trait]
impl super::Manager for DatabaseConnection {
    /// Find all genres.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_all(&self) -> anyhow::Result<Vec<Genre>> {
        let statement = "
            SELECT genre_id, genre_name
            FROM genre
            ORDER BY genre_id
        ";
        let rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Genre>(statement)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Find the genres attached to a publication through `relates_to`.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_genres_by_publication_id(
        &self,
        publication_id: i64,
    ) -> anyhow::Result<Vec<Genre>> {
        let statement = "
            SELECT genre.genre_id, genre.genre_name
            FROM genre
                INNER JOIN relates_to rt ON genre.genre_id = rt.genre_id
            WHERE rt.publication_id = $1
            ORDER BY genre.genre_id
        ";
        let rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Genre>(statement)
                    .bind(publication_id)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }
}
