//! Integration tests for the articles resource: create, list, like, search.

mod common;

use common::{BACKENDS, TestServer};
use serde_json::json;

#[tokio::test]
async fn test_create_article_defaults() {
    for backend in BACKENDS {
        let server = TestServer::spawn(backend).await.expect("Failed to spawn test server");
        let client = server.client();

        let created = client
            .post_json("/articles", &json!({ "title": "Hello", "content": "First post" }))
            .await;
        assert_eq!(created.status, 201, "{backend:?}");
        assert_eq!(created.body["message"], "Article created");
        assert_eq!(created.body["id"], 1);

        let article = &created.body["article"];
        assert_eq!(article["title"], "Hello");
        assert_eq!(article["content"], "First post");
        assert_eq!(article["author"], "Anonymous");
        assert_eq!(article["likes"], 0);
        assert!(article["created_at"].is_string());
    }
}

#[tokio::test]
async fn test_author_is_earliest_user() {
    for backend in BACKENDS {
        let server = TestServer::spawn(backend).await.expect("Failed to spawn test server");
        let client = server.client();

        client.create_user("alice", "alice@example.com").await;
        client.create_user("bob", "bob@example.com").await;
        client.create_article("By someone", "text").await;

        let listed = client.get("/articles").await;
        assert_eq!(listed.body["articles"][0]["author"], "alice", "{backend:?}");
    }
}

#[tokio::test]
async fn test_list_articles() {
    for backend in BACKENDS {
        let server = TestServer::spawn(backend).await.expect("Failed to spawn test server");
        let client = server.client();

        assert_eq!(client.get("/articles").await.body["count"], 0);

        client.create_article("One", "1").await;
        client.create_article("Two", "2").await;

        let listed = client.get("/articles").await;
        assert_eq!(listed.status, 200);
        assert_eq!(listed.body["count"], 2, "{backend:?}");
        let titles: Vec<_> = listed.body["articles"]
            .as_array()
            .expect("articles array")
            .iter()
            .map(|a| a["title"].as_str().unwrap_or_default().to_string())
            .collect();
        assert!(titles.contains(&"One".to_string()));
        assert!(titles.contains(&"Two".to_string()));
    }
}

#[tokio::test]
async fn test_like_n_times() {
    for backend in BACKENDS {
        let server = TestServer::spawn(backend).await.expect("Failed to spawn test server");
        let client = server.client();

        for n in [0_i64, 1, 7] {
            let id = client.create_article(&format!("Liked {n} times"), "body").await;
            for i in 1..=n {
                let liked = client.post(&format!("/articles/{id}/like")).await;
                assert_eq!(liked.status, 200, "{backend:?}");
                assert_eq!(liked.body["likes"], i);
                assert_eq!(liked.body["message"], format!("Like added to article {id}"));
            }

            let listed = client.get("/articles").await;
            let article = listed.body["articles"]
                .as_array()
                .expect("articles array")
                .iter()
                .find(|a| a["id"] == id)
                .cloned()
                .expect("article listed");
            assert_eq!(article["likes"], n, "{backend:?}");
        }
    }
}

#[tokio::test]
async fn test_like_missing_article_is_not_found() {
    for backend in BACKENDS {
        let server = TestServer::spawn(backend).await.expect("Failed to spawn test server");
        let response = server.client().post("/articles/5/like").await;
        assert_eq!(response.status, 404, "{backend:?}");
        assert_eq!(response.body["error"], "Article 5 not found");
    }
}

#[tokio::test]
async fn test_concurrent_likes_are_counted() {
    for backend in BACKENDS {
        let server = TestServer::spawn(backend).await.expect("Failed to spawn test server");
        let client = server.client();
        let id = client.create_article("Popular", "body").await;

        let mut tasks = Vec::new();
        for _ in 0..20 {
            let client = client.clone();
            tasks.push(tokio::spawn(async move {
                client.post(&format!("/articles/{id}/like")).await.status
            }));
        }
        for task in tasks {
            assert_eq!(task.await.expect("like task panicked"), 200);
        }

        let listed = client.get("/articles").await;
        assert_eq!(listed.body["articles"][0]["likes"], 20, "{backend:?}");
    }
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    for backend in BACKENDS {
        let server = TestServer::spawn(backend).await.expect("Failed to spawn test server");
        let client = server.client();

        client.create_article("Hello World", "a").await;
        client.create_article("hello world", "b").await;
        client.create_article("Goodbye", "c").await;

        let response = client.get("/articles/search?q=Hello").await;
        assert_eq!(response.status, 200, "{backend:?}");
        assert_eq!(response.body["query"], "Hello");
        assert_eq!(response.body["count"], 2, "{backend:?}");

        let response = client.get("/articles/search?q=BYE").await;
        assert_eq!(response.body["count"], 1, "{backend:?}");
        assert_eq!(response.body["results"][0]["title"], "Goodbye");

        let response = client.get("/articles/search?q=nothing").await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body["count"], 0);
        assert_eq!(response.body["results"], json!([]));
    }
}

#[tokio::test]
async fn test_empty_search_returns_nothing() {
    for backend in BACKENDS {
        let server = TestServer::spawn(backend).await.expect("Failed to spawn test server");
        let client = server.client();
        client.create_article("Hello World", "a").await;

        let empty = client.get("/articles/search?q=").await;
        assert_eq!(empty.status, 200, "{backend:?}");
        assert_eq!(empty.body["query"], "");
        assert_eq!(empty.body["count"], 0);

        let absent = client.get("/articles/search").await;
        assert_eq!(absent.status, 200, "{backend:?}");
        assert_eq!(absent.body["count"], 0);
    }
}

#[tokio::test]
async fn test_search_wildcards_are_literal() {
    for backend in BACKENDS {
        let server = TestServer::spawn(backend).await.expect("Failed to spawn test server");
        let client = server.client();
        client.create_article("100% organic", "a").await;
        client.create_article("1000 ways", "b").await;

        let response = client.get("/articles/search?q=%25").await;
        assert_eq!(response.body["count"], 1, "{backend:?}");
        assert_eq!(response.body["results"][0]["title"], "100% organic");

        let response = client.get("/articles/search?q=_").await;
        assert_eq!(response.body["count"], 0, "{backend:?}");
    }
}

#[tokio::test]
async fn test_search_folds_unicode_case() {
    for backend in BACKENDS {
        let server = TestServer::spawn(backend).await.expect("Failed to spawn test server");
        let client = server.client();
        client.create_article("Привет мир", "a").await;
        client.create_article("Café Olé", "b").await;
        client.create_article("Hello", "c").await;

        // q=привет
        let response = client
            .get("/articles/search?q=%D0%BF%D1%80%D0%B8%D0%B2%D0%B5%D1%82")
            .await;
        assert_eq!(response.status, 200, "{backend:?}");
        assert_eq!(response.body["query"], "привет");
        assert_eq!(response.body["count"], 1, "{backend:?}");
        assert_eq!(response.body["results"][0]["title"], "Привет мир");

        // q=CAFÉ
        let response = client.get("/articles/search?q=CAF%C3%89").await;
        assert_eq!(response.body["count"], 1, "{backend:?}");
        assert_eq!(response.body["results"][0]["title"], "Café Olé");
    }
}

#[tokio::test]
async fn test_create_article_validation() {
    let server = TestServer::spawn(common::BACKENDS[1])
        .await
        .expect("Failed to spawn test server");
    let client = server.client();

    let blank = client
        .post_json("/articles", &json!({ "title": "", "content": "x" }))
        .await;
    assert_eq!(blank.status, 422);
    assert_eq!(blank.body["error"], "field 'title' must not be empty");

    let missing = client.post_json("/articles", &json!({ "title": "x" })).await;
    assert_eq!(missing.status, 422);

    assert_eq!(client.get("/articles").await.body["count"], 0);
}
