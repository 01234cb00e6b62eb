use crate::common;
use habr::db::models::{genre, tag};

#[async_std::test]
async fn test_find_all_genres_expect_seeded_list_in_id_order() {
    let db = common::initialize_db().await;
    let genres = genre::Manager::find_all(&db.conn).await.unwrap();
    let ids: Vec<i64> = genres.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(genres[0].name, "Development");
}

#[async_std::test]
async fn test_find_all_tags_expect_seeded_list_in_id_order() {
    let db = common::initialize_db().await;
    let tags = tag::Manager::find_all(&db.conn).await.unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["rust", "java", "databases", "linux", "career", "open source"]
    );
}

#[async_std::test]
async fn test_find_by_publication_id_expect_only_attached_rows() {
    let db = common::initialize_db().await;
    let author = common::create_user(&db.conn, "alice", 0).await;
    let id = common::insert_publication(&db.conn, author, "attached", &[2, 5], &[1]).await;
    common::insert_publication(&db.conn, author, "other", &[1], &[2, 3]).await;

    let genres = genre::Manager::find_genres_by_publication_id(&db.conn, id)
        .await
        .unwrap();
    let tags = tag::Manager::find_tags_by_publication_id(&db.conn, id)
        .await
        .unwrap();
    assert_eq!(genres.iter().map(|g| g.id).collect::<Vec<_>>(), vec![2, 5]);
    assert_eq!(tags.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
}
