use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{any::AnyRow, FromRow, Row as _};

pub mod manager;

/// Trait for managing genres.
#[async_trait]
pub trait Manager {
    /// Find all genres.
    async fn find_all(&self) -> anyhow::Result<Vec<Genre>>;
    /// Find the genres attached to a publication.
    async fn find_genres_by_publication_id(&self, publication_id: i64)
        -> anyhow::Result<Vec<Genre>>;
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Model for a genre.
/// Genres are reference data, attached to publications through `relates_to`.
pub struct Genre {
    /// Genre identifier.
    pub id: i64,
    /// Human readable name.
    pub name: String,
}

impl FromRow<'_, AnyRow> for Genre {
    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("genre_id")?,
            name: row.try_get("genre_name")?,
        })
    }
}
