use axum::body::Body;
use axum::http::{Request, StatusCode};
use pagecrate::filtering::Predicate;
use pagecrate::{EntityRepository, FindOverrides, Page, PaginationRequest, Paginator};
use serde_json::Value;
use tower::ServiceExt;

mod common;
use common::{Post, path_and_query, post_entity, setup_seeded_db, setup_test_app, test_config};

async fn get_json(app: &axum::Router, uri: &str) -> Value {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn ids(page: &Value) -> Vec<i64> {
    page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_first_page_then_short_page() {
    let db = setup_seeded_db(3).await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let first = get_json(&app, "/api/v1/posts?take=2&order__createdAt=ASC").await;
    assert_eq!(ids(&first), vec![1, 2]);
    assert_eq!(first["count"], 2);
    assert_eq!(first["cursor"]["after"], 2);
    assert_eq!(
        first["next"],
        "http://localhost:3000/api/v1/posts?take=2&order__createdAt=ASC&where__id__more_than=2"
    );
    assert!(first.get("total").is_none());

    let next = path_and_query(first["next"].as_str().unwrap());
    let second = get_json(&app, &next).await;
    assert_eq!(ids(&second), vec![3]);
    assert_eq!(second["count"], 1);
    assert_eq!(second["cursor"]["after"], Value::Null);
    assert_eq!(second["next"], Value::Null);
}

#[tokio::test]
async fn test_empty_filter_keeps_query_shape_across_pages() {
    let db = setup_seeded_db(3).await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let first = get_json(&app, "/api/v1/posts?take=2&where__title=").await;
    assert_eq!(ids(&first), vec![1, 2]);
    assert_eq!(
        first["next"],
        "http://localhost:3000/api/v1/posts?take=2&order__createdAt=ASC&where__id__more_than=2"
    );

    let second = get_json(&app, &path_and_query(first["next"].as_str().unwrap())).await;
    assert_eq!(ids(&second), vec![3]);
    assert_eq!(second["next"], Value::Null);
}

#[tokio::test]
async fn test_exact_multiple_of_take_ends_with_empty_page() {
    let db = setup_seeded_db(4).await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let first = get_json(&app, "/api/v1/posts?take=2").await;
    assert_eq!(ids(&first), vec![1, 2]);

    let second = get_json(&app, &path_and_query(first["next"].as_str().unwrap())).await;
    assert_eq!(ids(&second), vec![3, 4]);
    assert!(second["next"].is_string(), "a full page always offers a next page");

    let third = get_json(&app, &path_and_query(second["next"].as_str().unwrap())).await;
    assert_eq!(ids(&third), Vec::<i64>::new());
    assert_eq!(third["count"], 0);
    assert_eq!(third["next"], Value::Null);
    assert_eq!(third["cursor"]["after"], Value::Null);
}

#[tokio::test]
async fn test_default_order_is_emitted_in_next_url() {
    let db = setup_seeded_db(3).await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let first = get_json(&app, "/api/v1/posts?take=1").await;
    assert_eq!(
        first["next"],
        "http://localhost:3000/api/v1/posts?take=1&order__createdAt=ASC&where__id__more_than=1"
    );
}

#[tokio::test]
async fn test_descending_walk_uses_less_than() {
    let db = setup_seeded_db(5).await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let first = get_json(&app, "/api/v1/posts?take=2&order__createdAt=DESC").await;
    assert_eq!(ids(&first), vec![5, 4]);
    let next = first["next"].as_str().unwrap();
    assert!(next.ends_with("where__id__less_than=4"), "{next}");
    assert!(!next.contains("more_than"), "{next}");

    let second = get_json(&app, &path_and_query(next)).await;
    assert_eq!(ids(&second), vec![3, 2]);
    assert!(ids(&second).iter().all(|id| *id < 4));

    let third = get_json(&app, &path_and_query(second["next"].as_str().unwrap())).await;
    assert_eq!(ids(&third), vec![1]);
    assert_eq!(third["next"], Value::Null);
}

#[tokio::test]
async fn test_walk_never_crosses_boundary_and_keeps_filters() {
    let db = setup_seeded_db(9).await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    // published posts are the even ids
    let mut uri = "/api/v1/posts?take=2&where__published=true".to_string();
    let mut seen = Vec::new();
    loop {
        let page = get_json(&app, &uri).await;
        let page_ids = ids(&page);
        if let Some(last) = seen.last() {
            assert!(page_ids.iter().all(|id| id > last), "{page_ids:?} after {last}");
        }
        seen.extend(page_ids);
        match page["next"].as_str() {
            Some(next) => {
                assert!(next.contains("where__published=true"), "{next}");
                uri = path_and_query(next);
            }
            None => break,
        }
    }

    assert_eq!(seen, vec![2, 4, 6, 8]);
}

#[tokio::test]
async fn test_stale_boundary_is_replaced() {
    let db = setup_seeded_db(6).await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let page = get_json(&app, "/api/v1/posts?take=2&where__id__more_than=1").await;
    assert_eq!(ids(&page), vec![2, 3]);
    let next = page["next"].as_str().unwrap();
    assert_eq!(next.matches("where__id__more_than").count(), 1, "{next}");
    assert!(next.ends_with("where__id__more_than=3"), "{next}");
}

#[tokio::test]
async fn test_paginator_with_overrides() {
    let db = setup_seeded_db(6).await.expect("Failed to setup test database");
    let repository = EntityRepository::<post_entity::Entity, _>::new(&db);
    let paginator = Paginator::new(test_config());

    let request = PaginationRequest::new(2).with_param("where__author", "1");
    let overrides = FindOverrides::new().filter(
        "author",
        post_entity::Column::AuthorId,
        Predicate::Equal(2_i64.into()),
    );

    let page = paginator
        .paginate::<Post, _>(&request, &repository, overrides, "posts")
        .await
        .unwrap();

    let Page::Cursor(page) = page else {
        panic!("expected a cursor page");
    };
    let page_ids: Vec<i32> = page.data.iter().map(|post| post.id).collect();
    assert_eq!(page_ids, vec![4, 5]);
    assert!(page.data.iter().all(|post| post.author_id == 2));
    assert_eq!(page.cursor.after, Some(5));
    assert_eq!(
        page.next.as_deref(),
        Some("http://localhost:3000/api/v1/posts?take=2&order__createdAt=ASC&where__author=1&where__id__more_than=5")
    );
}
