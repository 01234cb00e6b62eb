//! Manager for the publication model.
use super::{BestUser, MiniPublication, NewPublication, Publication};
use crate::db::models::{comment, genre, page_offset, tag, Page, PAGE_SIZE};
use crate::db::{DatabaseConnection, DatabaseKind, DatabaseTransaction, Tx};
use async_trait::async_trait;
use tracing::instrument;

/// Columns and joins shared by every full publication read.
const SELECT_PUBLICATION: &str = r#"
    SELECT "publication".publication_id,
           publication_views_count,
           publication_header,
           publication_preview_image_path,
           publication_content,
           CAST("publication".publication_datetime AS TEXT) AS publication_datetime,
           publication_karma,
           "user".user_id,
           user_login,
           user_full_name,
           user_email,
           user_karma
    FROM "publication"
             LEFT JOIN "user" ON "user".user_id = "publication".user_id
"#;

/// Newest first. Publications created at the same instant keep insertion order reversed.
const ORDER_BY_NEWEST: &str = r#"
    ORDER BY "publication".publication_datetime DESC, "publication".publication_id DESC
"#;

/// Statements run, in order, by the application-level cascade delete.
const DELETE_CASCADE: [&str; 5] = [
    "DELETE FROM upwoted_p WHERE publication_id = $1",
    "DELETE FROM relates_to WHERE publication_id = $1",
    "DELETE FROM marked WHERE publication_id = $1",
    "DELETE FROM comment WHERE publication_id = $1",
    r#"DELETE FROM "publication" WHERE publication_id = $1"#,
];

#[async_trait]
impl super::Manager for DatabaseConnection {
    /// Insert a publication with its genres and tags in a single transaction.
    ///
    /// # Errors
    /// Errors if any of the inserts fails, in which case nothing is committed.
    #[instrument(level = "debug", skip(self, publication), fields(author_id = publication.author_id))]
    async fn insert(&self, publication: &NewPublication) -> anyhow::Result<i64> {
        let mut tx = DatabaseTransaction::begin(self.pool.clone()).await?;
        match insert_with_associations(&mut tx, publication).await {
            Ok(id) => {
                tx.commit().await?;
                tracing::debug!(publication_id = id, "Inserted publication");
                Ok(id)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!("Failed to roll back publication insert: {rollback_err:?}");
                }
                Err(err)
            }
        }
    }

    /// Find all publications, newest first.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_all(&self) -> anyhow::Result<Vec<Publication>> {
        let statement = format!("{SELECT_PUBLICATION} {ORDER_BY_NEWEST}");
        let mut rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Publication>(&statement)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        attach_comments(self, &mut rows).await?;
        attach_genres_and_tags(self, &mut rows).await?;
        Ok(rows)
    }

    /// Find one page of publications, newest first.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_page(&self, page: i64) -> anyhow::Result<Page<Publication>> {
        let statement = format!("{SELECT_PUBLICATION} {ORDER_BY_NEWEST} LIMIT $1 OFFSET $2");
        let mut rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Publication>(&statement)
                    .bind(PAGE_SIZE)
                    .bind(page_offset(page))
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        attach_comments(self, &mut rows).await?;
        attach_genres_and_tags(self, &mut rows).await?;
        let total = super::Manager::get_rows_count(self).await?;
        Ok(Page::new(rows, total))
    }

    /// Find a publication by id. Comments are not attached.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Publication>> {
        let statement = format!(r#"{SELECT_PUBLICATION} WHERE "publication".publication_id = $1"#);
        let row = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Publication>(&statement)
                    .bind(id)
                    .fetch_optional(&mut *connection)
                    .await?
            }
        };
        let Some(publication) = row else {
            return Ok(None);
        };
        let mut rows = vec![publication];
        attach_genres_and_tags(self, &mut rows).await?;
        Ok(rows.pop())
    }

    /// Overwrite header and content. A missing id updates nothing.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn update_header_and_content_by_id(
        &self,
        id: i64,
        header: &str,
        content: &str,
    ) -> anyhow::Result<()> {
        let statement = r#"
            UPDATE "publication"
            SET publication_header = $1, publication_content = $2
            WHERE publication_id = $3
        "#;
        let result = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query(statement)
                    .bind(header)
                    .bind(content)
                    .bind(id)
                    .execute(&mut *connection)
                    .await?
            }
        };
        tracing::debug!(
            publication_id = id,
            rows_affected = result.rows_affected(),
            "Updated publication header and content"
        );
        Ok(())
    }

    /// Increment the view counter by one, in the database.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn update_views_count(&self, id: i64) -> anyhow::Result<()> {
        let statement = r#"
            UPDATE "publication"
            SET publication_views_count = publication_views_count + 1
            WHERE publication_id = $1
        "#;
        match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query(statement)
                    .bind(id)
                    .execute(&mut *connection)
                    .await?;
            }
        }
        Ok(())
    }

    /// Record an upvote.
    /// Callers check `check_up_voted` first, a repeated vote violates the primary key.
    ///
    /// # Errors
    /// Errors if the vote already exists or references a missing row.
    async fn add_like(&self, publication_id: i64, user_id: i64) -> anyhow::Result<()> {
        let statement = "
            INSERT INTO upwoted_p ( publication_id, user_id )
            VALUES ( $1, $2 )
        ";
        match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query(statement)
                    .bind(publication_id)
                    .bind(user_id)
                    .execute(&mut *connection)
                    .await?;
            }
        }
        tracing::debug!(publication_id, user_id, "Added upvote");
        Ok(())
    }

    /// Remove an upvote.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn delete_like(&self, publication_id: i64, user_id: i64) -> anyhow::Result<()> {
        let statement = "
            DELETE FROM upwoted_p
            WHERE publication_id = $1 AND user_id = $2
        ";
        match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query(statement)
                    .bind(publication_id)
                    .bind(user_id)
                    .execute(&mut *connection)
                    .await?;
            }
        }
        tracing::debug!(publication_id, user_id, "Removed upvote");
        Ok(())
    }

    /// Whether the user has upvoted the publication.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn check_up_voted(&self, publication_id: i64, user_id: i64) -> anyhow::Result<bool> {
        let statement = "
            SELECT user_id
            FROM upwoted_p
            WHERE publication_id = $1 AND user_id = $2
        ";
        let row = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, (i64,)>(statement)
                    .bind(publication_id)
                    .bind(user_id)
                    .fetch_optional(&mut *connection)
                    .await?
            }
        };
        Ok(row.is_some())
    }

    /// Find all publications carrying a genre, newest first.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_all_by_genre(&self, genre_id: i64) -> anyhow::Result<Vec<Publication>> {
        let statement = format!(
            r#"{SELECT_PUBLICATION}
                INNER JOIN relates_to genres ON "publication".publication_id = genres.publication_id
                INNER JOIN genre ON genres.genre_id = genre.genre_id
            WHERE genres.genre_id = $1
            {ORDER_BY_NEWEST}"#
        );
        let mut rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Publication>(&statement)
                    .bind(genre_id)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        attach_comments(self, &mut rows).await?;
        attach_genres_and_tags(self, &mut rows).await?;
        Ok(rows)
    }

    /// Find one page of publications carrying a genre, newest first.
    /// The page total counts all publications, not only those of the genre.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_page_by_genre(
        &self,
        genre_id: i64,
        page: i64,
    ) -> anyhow::Result<Page<Publication>> {
        let statement = format!(
            r#"{SELECT_PUBLICATION}
                INNER JOIN relates_to genres ON "publication".publication_id = genres.publication_id
                INNER JOIN genre ON genres.genre_id = genre.genre_id
            WHERE genres.genre_id = $1
            {ORDER_BY_NEWEST}
            LIMIT $2
            OFFSET $3"#
        );
        let mut rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Publication>(&statement)
                    .bind(genre_id)
                    .bind(PAGE_SIZE)
                    .bind(page_offset(page))
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        attach_comments(self, &mut rows).await?;
        attach_genres_and_tags(self, &mut rows).await?;
        let total = super::Manager::get_rows_count(self).await?;
        Ok(Page::new(rows, total))
    }

    /// Find the publications of an author, newest first.
    /// Publications without any genre are left out.
    /// A publication with several genres is listed once, not once per genre.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_all_by_user_id(&self, user_id: i64) -> anyhow::Result<Vec<Publication>> {
        let statement = format!(
            r#"{SELECT_PUBLICATION}
                INNER JOIN (SELECT DISTINCT publication_id FROM relates_to) genres
                    ON "publication".publication_id = genres.publication_id
            WHERE "publication".user_id = $1
            {ORDER_BY_NEWEST}"#
        );
        let mut rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Publication>(&statement)
                    .bind(user_id)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        attach_genres_and_tags(self, &mut rows).await?;
        Ok(rows)
    }

    /// Count all publications.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn get_rows_count(&self) -> anyhow::Result<i64> {
        let statement = r#"
            SELECT COUNT(*) AS count
            FROM "publication"
        "#;
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

    /// Delete a publication and everything depending on it.
    /// Postgres delegates to the `delete_publication` procedure,
    /// `SQLite` runs the same cascade in a transaction.
    ///
    /// # Errors
    /// Errors if any of the deletes fails, in which case nothing is deleted.
    #[instrument(level = "debug", skip(self))]
    async fn delete(&self, id: i64) -> anyhow::Result<()> {
        match self.kind {
            DatabaseKind::Postgres => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query("CALL delete_publication($1)")
                    .bind(id)
                    .execute(&mut *connection)
                    .await?;
            }
            DatabaseKind::Sqlite => {
                let mut tx = DatabaseTransaction::begin(self.pool.clone()).await?;
                if let Err(err) = super::TxManager::delete_cascade(&mut tx, id).await {
                    if let Err(rollback_err) = tx.rollback().await {
                        tracing::error!("Failed to roll back publication delete: {rollback_err:?}");
                    }
                    return Err(err);
                }
                tx.commit().await?;
            }
        }
        tracing::debug!(publication_id = id, "Deleted publication");
        Ok(())
    }

    /// Top 10 authors by number of publications.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_best_users(&self) -> anyhow::Result<Vec<BestUser>> {
        let statement = r#"
            SELECT user_login,
                   COUNT("publication".user_id) AS publications_count,
                   "user".user_karma
            FROM "publication"
                     INNER JOIN "user" ON "user".user_id = "publication".user_id
            GROUP BY user_login, "user".user_karma
            ORDER BY publications_count DESC, user_login
            LIMIT 10
        "#;
        let rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, BestUser>(statement)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Top 10 publications by karma. Nothing is attached.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_best_publications(&self) -> anyhow::Result<Vec<Publication>> {
        let statement = format!(
            r#"{SELECT_PUBLICATION}
            ORDER BY publication_karma DESC, "publication".publication_id
            LIMIT 10"#
        );
        let rows = match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Publication>(&statement)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Top 5 publications of the last 7 days by karma, then views, with comment counts.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn get_best_mini_publications(&self) -> anyhow::Result<Vec<MiniPublication>> {
        let mut rows = match self.kind {
            DatabaseKind::Postgres => {
                let statement = r#"
                    SELECT publication_id,
                           publication_header,
                           publication_views_count
                    FROM "publication"
                    WHERE publication_datetime BETWEEN now() - interval '7 days' AND now()
                    ORDER BY publication_karma DESC, publication_views_count DESC, publication_id
                    LIMIT 5
                "#;
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, MiniPublication>(statement)
                    .fetch_all(&mut *connection)
                    .await?
            }
            DatabaseKind::Sqlite => {
                let statement = r#"
                    SELECT publication_id,
                           publication_header,
                           publication_views_count
                    FROM "publication"
                    WHERE publication_datetime
                        BETWEEN strftime('%Y-%m-%d %H:%M:%f', 'now', '-7 days')
                        AND strftime('%Y-%m-%d %H:%M:%f', 'now')
                    ORDER BY publication_karma DESC, publication_views_count DESC, publication_id
                    LIMIT 5
                "#;
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, MiniPublication>(statement)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        for mini in &mut rows {
            let comments = comment::Manager::find_comments_by_publication_id(self, mini.id).await?;
            mini.comments_count = comments.len();
        }
        Ok(rows)
    }
}

#[async_trait]
impl super::TxManager for DatabaseTransaction {
    /// Insert the publication row.
    ///
    /// # Errors
    /// Errors if the author does not exist.
    async fn create(&mut self, publication: &NewPublication) -> anyhow::Result<i64> {
        let statement = r#"
            INSERT INTO "publication" ( user_id, publication_header,
                publication_preview_image_path, publication_content )
            VALUES ( $1, $2, $3, $4 )
            RETURNING publication_id
        "#;
        let row = sqlx::query_as::<_, (i64,)>(statement)
            .bind(publication.author_id)
            .bind(&publication.header)
            .bind(publication.preview_image_path.clone())
            .bind(&publication.content)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(row.0)
    }

    /// Attach a genre to a publication.
    ///
    /// # Errors
    /// Errors if the genre does not exist or is already attached.
    async fn add_genre(&mut self, publication_id: i64, genre_id: i64) -> anyhow::Result<()> {
        let statement = "
            INSERT INTO relates_to ( genre_id, publication_id )
            VALUES ( $1, $2 )
        ";
        sqlx::query(statement)
            .bind(genre_id)
            .bind(publication_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    /// Attach a tag to a publication.
    ///
    /// # Errors
    /// Errors if the tag does not exist or is already attached.
    async fn add_tag(&mut self, publication_id: i64, tag_id: i64) -> anyhow::Result<()> {
        let statement = "
            INSERT INTO marked ( publication_id, tag_id )
            VALUES ( $1, $2 )
        ";
        sqlx::query(statement)
            .bind(publication_id)
            .bind(tag_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    /// Delete votes, associations, comments and finally the publication row.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn delete_cascade(&mut self, id: i64) -> anyhow::Result<()> {
        for statement in DELETE_CASCADE {
            sqlx::query(statement)
                .bind(id)
                .execute(&mut *self.tx)
                .await?;
        }
        Ok(())
    }
}

/// Insert the publication row followed by one association row per genre and tag.
async fn insert_with_associations(
    tx: &mut DatabaseTransaction,
    publication: &NewPublication,
) -> anyhow::Result<i64> {
    let id = super::TxManager::create(&mut *tx, publication).await?;
    for genre_id in &publication.genre_ids {
        super::TxManager::add_genre(&mut *tx, id, *genre_id).await?;
    }
    for tag_id in &publication.tag_ids {
        super::TxManager::add_tag(&mut *tx, id, *tag_id).await?;
    }
    Ok(id)
}

/// Attach the comments of each publication.
async fn attach_comments(
    conn: &DatabaseConnection,
    publications: &mut [Publication],
) -> anyhow::Result<()> {
    for publication in publications.iter_mut() {
        publication.comments =
            comment::Manager::find_comments_by_publication_id(conn, publication.id).await?;
    }
    Ok(())
}

/// Attach the genres and tags of each publication.
async fn attach_genres_and_tags(
    conn: &DatabaseConnection,
    publications: &mut [Publication],
) -> anyhow::Result<()> {
    for publication in publications.iter_mut() {
        publication.genres =
            genre::Manager::find_genres_by_publication_id(conn, publication.id).await?;
        publication.tags = tag::Manager::find_tags_by_publication_id(conn, publication.id).await?;
    }
    Ok(())
}
