use crate::common;
use habr::db::models::comment::{Manager, NewComment};
use habr::service::comment::CommentService;

#[async_std::test]
async fn test_comments_by_publication_are_oldest_first_with_author() {
    let db = common::initialize_db().await;
    let author = common::create_user(&db.conn, "alice", 0).await;
    let reader = common::create_user(&db.conn, "bob", 4).await;
    let id = common::insert_publication(&db.conn, author, "discussed", &[1], &[]).await;
    let other = common::insert_publication(&db.conn, author, "quiet", &[1], &[]).await;
    let mut inserted = Vec::new();
    for content in ["first", "second", "third"] {
        let new_comment = NewComment {
            publication_id: id,
            user_id: reader,
            content: content.into(),
        };
        inserted.push(db.conn.insert(&new_comment).await.unwrap());
    }

    let service = CommentService::new(db.conn.clone());
    let comments = service.find_comments_by_publication_id(id).await.unwrap();
    assert_eq!(comments.iter().map(|c| c.id).collect::<Vec<_>>(), inserted);
    assert_eq!(comments[0].content, "first");
    let commenter = comments[0].author.as_ref().unwrap();
    assert_eq!(commenter.login, "bob");
    assert_eq!(commenter.karma, 4);
    assert!(service
        .find_comments_by_publication_id(other)
        .await
        .unwrap()
        .is_empty());
}

#[async_std::test]
async fn test_admin_comments_are_paged_newest_first_with_total() {
    let db = common::initialize_db().await;
    let author = common::create_user(&db.conn, "alice", 0).await;
    let id = common::insert_publication(&db.conn, author, "busy", &[], &[]).await;
    let mut inserted = Vec::new();
    for n in 0..12 {
        let new_comment = NewComment {
            publication_id: id,
            user_id: author,
            content: format!("comment {n}"),
        };
        inserted.push(db.conn.insert(&new_comment).await.unwrap());
    }

    let service = CommentService::new(db.conn.clone());
    let first = service.get_all_admin_comments(1).await.unwrap();
    assert_eq!(first.total, 12);
    assert_eq!(first.pages_count(), 2);
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.items[0].id, inserted[11]);
    assert_eq!(first.items[0].publication_header, "busy");
    assert_eq!(first.items[0].user_login.as_deref(), Some("alice"));

    let second = service.get_all_admin_comments(2).await.unwrap();
    let second_ids: Vec<i64> = second.items.iter().map(|c| c.id).collect();
    assert_eq!(second_ids, vec![inserted[1], inserted[0]]);
}

#[async_std::test]
async fn test_delete_by_id_removes_only_that_comment() {
    let db = common::initialize_db().await;
    let author = common::create_user(&db.conn, "alice", 0).await;
    let id = common::insert_publication(&db.conn, author, "post", &[], &[]).await;
    let keep = NewComment {
        publication_id: id,
        user_id: author,
        content: "keep".into(),
    };
    let unwanted = NewComment {
        content: "drop".into(),
        ..keep.clone()
    };
    let kept = db.conn.insert(&keep).await.unwrap();
    let dropped = db.conn.insert(&unwanted).await.unwrap();

    let service = CommentService::new(db.conn.clone());
    assert_eq!(service.get_rows_count().await.unwrap(), 2);
    service.delete_by_id(dropped).await.unwrap();
    assert_eq!(service.get_rows_count().await.unwrap(), 1);
    let remaining = service.find_comments_by_publication_id(id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept);
}

#[async_std::test]
async fn test_insert_comment_when_publication_missing_expect_error() {
    let db = common::initialize_db().await;
    let author = common::create_user(&db.conn, "alice", 0).await;
    let orphan = NewComment {
        publication_id: 404,
        user_id: author,
        content: "nowhere".into(),
    };
    assert!(db.conn.insert(&orphan).await.is_err());
}

#[async_std::test]
async fn test_comment_without_author_is_listed_with_no_author() {
    let db = common::initialize_db().await;
    let author = common::create_user(&db.conn, "alice", 0).await;
    let id = common::insert_publication(&db.conn, author, "open thread", &[1], &[]).await;
    let anonymous = common::insert_anonymous_comment(&db.conn, id, "who am i").await;

    let service = CommentService::new(db.conn.clone());
    let comments = service.find_comments_by_publication_id(id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, anonymous);
    assert!(comments[0].author.is_none());

    let admin = service.get_all_admin_comments(1).await.unwrap();
    assert_eq!(admin.items.len(), 1);
    assert_eq!(admin.items[0].user_login, None);

    let listed = habr::db::models::publication::Manager::find_all(&db.conn)
        .await
        .unwrap();
    assert_eq!(listed[0].comments.len(), 1);
    assert!(listed[0].comments[0].author.is_none());
}

#[async_std::test]
async fn test_admin_comments_when_page_past_the_end_expect_empty_page() {
    let db = common::initialize_db().await;
    let author = common::create_user(&db.conn, "alice", 0).await;
    let id = common::insert_publication(&db.conn, author, "post", &[], &[]).await;
    common::insert_anonymous_comment(&db.conn, id, "lonely").await;

    let service = CommentService::new(db.conn.clone());
    let page = service.get_all_admin_comments(i64::MAX).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 1);
}
