use crate::common;
use habr::db::init::connect;
use habr::db::models::genre;
use habr::db::DatabaseKind;
use tempfile::tempdir;

#[async_std::test]
async fn test_connect_when_sqlite_url_expect_sqlite_connection_with_schema() {
    let dir = tempdir().unwrap();
    let actual = connect(&common::sqlite_url(&dir)).await.unwrap();
    assert_eq!(actual.kind, DatabaseKind::Sqlite);
    let genres = genre::Manager::find_all(&actual).await.unwrap();
    assert!(!genres.is_empty());
}

#[async_std::test]
async fn test_connect_twice_expect_migrations_applied_once() {
    let dir = tempdir().unwrap();
    let url = common::sqlite_url(&dir);
    let first = connect(&url).await.unwrap();
    let first_genres = genre::Manager::find_all(&first).await.unwrap();
    first.pool.close().await;
    let second = connect(&url).await.unwrap();
    let second_genres = genre::Manager::find_all(&second).await.unwrap();
    assert_eq!(first_genres, second_genres);
}

#[async_std::test]
async fn test_connect_when_unsupported_url_expect_error() {
    let actual = connect("mysql://localhost/habr").await.unwrap_err();
    let expected = "Unsupported database URL";
    assert!(
        actual.to_string().contains(expected),
        "\"{actual}\" doesn't contain {expected}"
    );
}

#[async_std::test]
async fn test_connect_when_sqlite_file_missing_and_no_create_mode_expect_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing/habr.sqlite3");
    let url = format!("sqlite://{}", path.to_string_lossy());
    let actual = connect(&url).await.unwrap_err();
    let expected = "unable to open database file";
    assert!(
        actual.to_string().contains(expected),
        "\"{actual}\" doesn't contain {expected}"
    );
}
