use crate::common;
use habr::db::models::publication::Manager;

#[async_std::test]
async fn test_check_up_voted_follows_add_and_delete_like() {
    let db = common::initialize_db().await;
    let author = common::create_user(&db.conn, "alice", 0).await;
    let reader = common::create_user(&db.conn, "bob", 0).await;
    let id = common::insert_publication(&db.conn, author, "liked", &[1], &[]).await;

    assert!(!db.conn.check_up_voted(id, reader).await.unwrap());
    db.conn.add_like(id, reader).await.unwrap();
    assert!(db.conn.check_up_voted(id, reader).await.unwrap());
    assert!(!db.conn.check_up_voted(id, author).await.unwrap());
    db.conn.delete_like(id, reader).await.unwrap();
    assert!(!db.conn.check_up_voted(id, reader).await.unwrap());
}

#[async_std::test]
async fn test_add_like_twice_expect_storage_error() {
    let db = common::initialize_db().await;
    let author = common::create_user(&db.conn, "alice", 0).await;
    let reader = common::create_user(&db.conn, "bob", 0).await;
    let id = common::insert_publication(&db.conn, author, "liked", &[], &[]).await;

    db.conn.add_like(id, reader).await.unwrap();
    assert!(db.conn.add_like(id, reader).await.is_err());
    assert!(db.conn.check_up_voted(id, reader).await.unwrap());
}

#[async_std::test]
async fn test_delete_like_when_not_voted_expect_no_error() {
    let db = common::initialize_db().await;
    let author = common::create_user(&db.conn, "alice", 0).await;
    let id = common::insert_publication(&db.conn, author, "quiet", &[], &[]).await;
    db.conn.delete_like(id, author).await.unwrap();
    assert!(!db.conn.check_up_voted(id, author).await.unwrap());
}
