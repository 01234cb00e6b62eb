use habr::db::init::connect;
use habr::db::models::publication::{self, NewPublication};
use habr::db::DatabaseConnection;
use tempfile::{tempdir, TempDir};

/// A migrated `SQLite` database living in a temporary directory.
/// The directory is removed when the value is dropped.
pub struct TestDb {
    pub conn: DatabaseConnection,
    _dir: TempDir,
}

pub fn sqlite_url(dir: &TempDir) -> String {
    let path = dir.path().join("habr.sqlite3");
    format!("sqlite://{}?mode=rwc", path.to_string_lossy())
}

pub async fn initialize_db() -> TestDb {
    let dir = tempdir().unwrap();
    let conn = connect(&sqlite_url(&dir)).await.unwrap();
    TestDb { conn, _dir: dir }
}

pub async fn create_user(conn: &DatabaseConnection, login: &str, karma: i64) -> i64 {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO "user" ( user_login, user_full_name, user_email, user_karma )
        VALUES ( $1, $2, $3, $4 )
        RETURNING user_id
        "#,
    )
    .bind(login)
    .bind(format!("{login} full name"))
    .bind(format!("{login}@example.com"))
    .bind(karma)
    .fetch_one(&conn.pool)
    .await
    .unwrap();
    row.0
}

/// A user with only the required columns, leaving full name and email `NULL`.
pub async fn create_user_without_contacts(conn: &DatabaseConnection, login: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO "user" ( user_login )
        VALUES ( $1 )
        RETURNING user_id
        "#,
    )
    .bind(login)
    .fetch_one(&conn.pool)
    .await
    .unwrap();
    row.0
}

/// A comment whose `user_id` is `NULL`.
pub async fn insert_anonymous_comment(
    conn: &DatabaseConnection,
    publication_id: i64,
    content: &str,
) -> i64 {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO comment ( publication_id, comment_content )
        VALUES ( $1, $2 )
        RETURNING comment_id
        "#,
    )
    .bind(publication_id)
    .bind(content)
    .fetch_one(&conn.pool)
    .await
    .unwrap();
    row.0
}

pub fn new_publication(
    author_id: i64,
    header: &str,
    genre_ids: &[i64],
    tag_ids: &[i64],
) -> NewPublication {
    NewPublication {
        author_id,
        header: header.to_owned(),
        preview_image_path: Some(format!("/images/{header}.png")),
        content: format!("content of {header}"),
        genre_ids: genre_ids.to_vec(),
        tag_ids: tag_ids.to_vec(),
    }
}

pub async fn insert_publication(
    conn: &DatabaseConnection,
    author_id: i64,
    header: &str,
    genre_ids: &[i64],
    tag_ids: &[i64],
) -> i64 {
    let new = new_publication(author_id, header, genre_ids, tag_ids);
    publication::Manager::insert(conn, &new).await.unwrap()
}

pub async fn set_publication_karma(conn: &DatabaseConnection, id: i64, karma: i64) {
    sqlx::query(r#"UPDATE "publication" SET publication_karma = $1 WHERE publication_id = $2"#)
        .bind(karma)
        .bind(id)
        .execute(&conn.pool)
        .await
        .unwrap();
}

pub async fn set_publication_datetime(conn: &DatabaseConnection, id: i64, datetime: &str) {
    sqlx::query(r#"UPDATE "publication" SET publication_datetime = $1 WHERE publication_id = $2"#)
        .bind(datetime)
        .bind(id)
        .execute(&conn.pool)
        .await
        .unwrap();
}
