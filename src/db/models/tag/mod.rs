use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{any::AnyRow, FromRow, Row as _};

pub mod manager;

/// Trait for managing tags.
#[async_trait]
pub trait Manager {
    /// Find all tags.
    async fn find_all(&self) -> anyhow::Result<Vec<Tag>>;
    /// Find the tags marking a publication.
    async fn find_tags_by_publication_id(&self, publication_id: i64) -> anyhow::Result<Vec<Tag>>;
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Model for a tag.
pub struct Tag {
    /// Tag identifier.
    pub id: i64,
    /// Tag text.
    pub name: String,
}

impl FromRow<'_, AnyRow> for Tag {
    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("tag_id")?,
            name: row.try_get("tag_name")?,
        })
    }
}
