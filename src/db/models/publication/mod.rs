use super::comment::Comment;
use super::genre::Genre;
use super::tag::Tag;
use super::user::User;
use super::Page;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{any::AnyRow, FromRow, Row as _};

pub mod manager;

/// Trait for managing publications.
#[async_trait]
pub trait Manager {
    /// Insert a publication together with its genre and tag associations.
    /// Returns the generated publication id.
    async fn insert(&self, publication: &NewPublication) -> anyhow::Result<i64>;
    /// Find all publications, newest first, with comments, genres and tags.
    async fn find_all(&self) -> anyhow::Result<Vec<Publication>>;
    /// Find one page of publications, newest first, with comments, genres and tags.
    async fn find_page(&self, page: i64) -> anyhow::Result<Page<Publication>>;
    /// Find a publication by id, with genres and tags but without comments.
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Publication>>;
    /// Overwrite header and content of a publication.
    async fn update_header_and_content_by_id(
        &self,
        id: i64,
        header: &str,
        content: &str,
    ) -> anyhow::Result<()>;
    /// Increment the view counter by one.
    async fn update_views_count(&self, id: i64) -> anyhow::Result<()>;
    /// Record an upvote of `user_id` on `publication_id`.
    async fn add_like(&self, publication_id: i64, user_id: i64) -> anyhow::Result<()>;
    /// Remove an upvote of `user_id` from `publication_id`.
    async fn delete_like(&self, publication_id: i64, user_id: i64) -> anyhow::Result<()>;
    /// Whether `user_id` has upvoted `publication_id`.
    async fn check_up_voted(&self, publication_id: i64, user_id: i64) -> anyhow::Result<bool>;
    /// Find all publications carrying a genre, newest first.
    async fn find_all_by_genre(&self, genre_id: i64) -> anyhow::Result<Vec<Publication>>;
    /// Find one page of publications carrying a genre, newest first.
    async fn find_page_by_genre(&self, genre_id: i64, page: i64)
        -> anyhow::Result<Page<Publication>>;
    /// Find the publications of an author that have at least one genre.
    async fn find_all_by_user_id(&self, user_id: i64) -> anyhow::Result<Vec<Publication>>;
    /// Count all publications.
    async fn get_rows_count(&self) -> anyhow::Result<i64>;
    /// Delete a publication and every row depending on it.
    async fn delete(&self, id: i64) -> anyhow::Result<()>;
    /// Top 10 authors by number of publications.
    async fn find_best_users(&self) -> anyhow::Result<Vec<BestUser>>;
    /// Top 10 publications by karma.
    async fn find_best_publications(&self) -> anyhow::Result<Vec<Publication>>;
    /// Top 5 publications of the last 7 days by karma, then views.
    async fn get_best_mini_publications(&self) -> anyhow::Result<Vec<MiniPublication>>;
}

/// Trait for managing transactional publications.
#[async_trait]
pub trait TxManager {
    /// Insert the publication row and return the generated id.
    async fn create(&mut self, publication: &NewPublication) -> anyhow::Result<i64>;
    /// Attach a genre to a publication.
    async fn add_genre(&mut self, publication_id: i64, genre_id: i64) -> anyhow::Result<()>;
    /// Attach a tag to a publication.
    async fn add_tag(&mut self, publication_id: i64, tag_id: i64) -> anyhow::Result<()>;
    /// Delete a publication after its votes, associations and comments.
    async fn delete_cascade(&mut self, id: i64) -> anyhow::Result<()>;
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
/// Model for a publication.
pub struct Publication {
    /// Publication identifier.
    pub id: i64,
    /// Author, `None` when the user row is missing.
    pub author: Option<User>,
    /// Title of the publication.
    pub header: String,
    /// Path of the preview image, if any.
    pub preview_image_path: Option<String>,
    /// Body of the publication.
    pub content: String,
    /// Creation time.
    pub datetime: NaiveDateTime,
    /// How many times the publication has been opened.
    pub views_count: i64,
    /// Sum of votes.
    pub karma: i64,
    /// Attached genres.
    pub genres: Vec<Genre>,
    /// Attached tags.
    pub tags: Vec<Tag>,
    /// Attached comments, oldest first.
    /// Only filled by the list operations.
    pub comments: Vec<Comment>,
}

impl FromRow<'_, AnyRow> for Publication {
    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        let datetime: String = row.try_get("publication_datetime")?;
        Ok(Self {
            id: row.try_get("publication_id")?,
            author: User::from_joined_row(row)?,
            header: row.try_get("publication_header")?,
            preview_image_path: super::try_get_nullable(row, "publication_preview_image_path")?,
            content: row.try_get("publication_content")?,
            datetime: super::parse_datetime("publication_datetime", &datetime)?,
            views_count: row.try_get("publication_views_count")?,
            karma: row.try_get("publication_karma")?,
            genres: Vec::new(),
            tags: Vec::new(),
            comments: Vec::new(),
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
/// Input for inserting a publication.
pub struct NewPublication {
    /// Author of the publication.
    pub author_id: i64,
    /// Title of the publication.
    pub header: String,
    /// Path of the preview image, if any.
    pub preview_image_path: Option<String>,
    /// Body of the publication.
    pub content: String,
    /// Genres to attach.
    pub genre_ids: Vec<i64>,
    /// Tags to attach.
    pub tag_ids: Vec<i64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
/// Author ranked by how much they publish.
pub struct BestUser {
    /// Login of the author.
    pub login: String,
    /// Number of publications written.
    pub publications_count: i64,
    /// Reputation of the author.
    pub karma: i64,
}

impl FromRow<'_, AnyRow> for BestUser {
    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            login: row.try_get("user_login")?,
            publications_count: row.try_get("publications_count")?,
            karma: row.try_get("user_karma")?,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
/// Short form of a publication for the sidebar.
pub struct MiniPublication {
    /// Publication identifier.
    pub id: i64,
    /// Title of the publication.
    pub header: String,
    /// How many times the publication has been opened.
    pub views_count: i64,
    /// Number of comments.
    pub comments_count: usize,
}

impl FromRow<'_, AnyRow> for MiniPublication {
    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("publication_id")?,
            header: row.try_get("publication_header")?,
            views_count: row.try_get("publication_views_count")?,
            comments_count: 0,
        })
    }
}
