//! HTTP API tests
//!
//! Drive the full router (extractors, validation, services, error envelope)
//! over the in-memory store.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = TestApp::new();
    let response = app.get("/api/nope", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_message(), "route not found");
}

#[tokio::test]
async fn test_register_and_login() {
    let app = TestApp::new();
    let response = app
        .post(
            "/api/users",
            None,
            json!({"user": {"username": "jake", "email": "jake@jake.jake", "password": "jakejake"}}),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let user = &response.body["user"];
    assert_eq!(user["username"], "jake");
    assert_eq!(user["email"], "jake@jake.jake");
    assert!(user["bio"].is_null());
    assert!(user.get("password").is_none());
    assert!(user["token"].as_str().is_some_and(|t| !t.is_empty()));

    let login = app
        .post(
            "/api/users/login",
            None,
            json!({"user": {"email": "jake@jake.jake", "password": "jakejake"}}),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["user"]["username"], "jake");
}

#[tokio::test]
async fn test_register_duplicates() {
    let app = TestApp::new();
    app.register("jake").await;

    let same_email = app
        .post(
            "/api/users",
            None,
            json!({"user": {"username": "other", "email": "jake@conduit.io", "password": "password123"}}),
        )
        .await;
    assert_eq!(same_email.status, StatusCode::CONFLICT);
    assert_eq!(same_email.error_message(), "email has already been taken");

    let same_username = app
        .post(
            "/api/users",
            None,
            json!({"user": {"username": "jake", "email": "other@conduit.io", "password": "password123"}}),
        )
        .await;
    assert_eq!(same_username.status, StatusCode::CONFLICT);
    assert_eq!(same_username.error_message(), "username has already been taken");
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();
    let short_password = app
        .post(
            "/api/users",
            None,
            json!({"user": {"username": "jake", "email": "jake@jake.jake", "password": "short"}}),
        )
        .await;
    assert_eq!(short_password.status, StatusCode::UNPROCESSABLE_ENTITY);

    let missing_field = app
        .post("/api/users", None, json!({"user": {"username": "jake"}}))
        .await;
    assert_eq!(missing_field.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(missing_field.error_message().starts_with("malformed request"));
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user() {
    let app = TestApp::new();
    app.register("jake").await;

    let wrong = app
        .post(
            "/api/users/login",
            None,
            json!({"user": {"email": "jake@conduit.io", "password": "wrong-password"}}),
        )
        .await;
    let unknown = app
        .post(
            "/api/users/login",
            None,
            json!({"user": {"email": "ghost@conduit.io", "password": "password123"}}),
        )
        .await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.error_message(), unknown.error_message());
}

#[tokio::test]
async fn test_login_by_username_containing_at_sign() {
    let app = TestApp::new();
    let registered = app
        .post(
            "/api/users",
            None,
            json!({"user": {"username": "jake@home", "email": "jake@jake.jake", "password": "jakejake"}}),
        )
        .await;
    assert_eq!(registered.status, StatusCode::CREATED);

    let by_username = app
        .post(
            "/api/users/login",
            None,
            json!({"user": {"username": "jake@home", "password": "jakejake"}}),
        )
        .await;
    assert_eq!(by_username.status, StatusCode::OK, "{}", by_username.body);
    assert_eq!(by_username.body["user"]["username"], "jake@home");

    let username_as_email = app
        .post(
            "/api/users/login",
            None,
            json!({"user": {"email": "jake@home", "password": "jakejake"}}),
        )
        .await;
    assert_eq!(username_as_email.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_user_requires_token() {
    let app = TestApp::new();
    let token = app.register("jake").await;

    assert_eq!(app.get("/api/user", None).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.get("/api/user", Some("garbage")).await.status,
        StatusCode::UNAUTHORIZED
    );

    let response = app.get("/api/user", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["username"], "jake");
}

#[tokio::test]
async fn test_update_user_partial_and_clear() {
    let app = TestApp::new();
    let token = app.register("jake").await;

    let set = app
        .put(
            "/api/user",
            Some(&token),
            json!({"user": {"bio": "I like to skateboard", "image": "https://i.stack.imgur.com/xHWG8.jpg"}}),
        )
        .await;
    assert_eq!(set.status, StatusCode::OK);
    assert_eq!(set.body["user"]["bio"], "I like to skateboard");

    let cleared = app
        .put("/api/user", Some(&token), json!({"user": {"image": null}}))
        .await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert_eq!(cleared.body["user"]["bio"], "I like to skateboard");
    assert!(cleared.body["user"]["image"].is_null());
    assert_eq!(cleared.body["user"]["email"], "jake@conduit.io");
}

#[tokio::test]
async fn test_token_issued_before_rename_is_rejected() {
    let app = TestApp::new();
    let old_token = app.register("jake").await;
    let anna = app.register("anna").await;
    let slug = app.create_article(&anna, "Still listed", &[]).await;

    let renamed = app
        .put("/api/user", Some(&old_token), json!({"user": {"username": "jacob"}}))
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    let new_token = renamed.body["user"]["token"].as_str().unwrap().to_string();

    let create = app
        .post(
            "/api/articles",
            Some(&old_token),
            json!({"article": {"title": "Ghost", "description": "d", "body": "b"}}),
        )
        .await;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);

    let favorite = app
        .post(&format!("/api/articles/{}/favorite", slug), Some(&old_token), json!({}))
        .await;
    assert_eq!(favorite.status, StatusCode::UNAUTHORIZED);

    let follow = app
        .post("/api/profiles/anna/follow", Some(&old_token), json!({}))
        .await;
    assert_eq!(follow.status, StatusCode::UNAUTHORIZED);

    assert_eq!(
        app.get("/api/articles", Some(&old_token)).await.status,
        StatusCode::UNAUTHORIZED
    );

    let listed = app.get("/api/articles", None).await;
    assert_eq!(listed.status, StatusCode::OK, "{}", listed.body);
    assert_eq!(listed.body["articlesCount"], 1);
    assert_eq!(listed.body["articles"][0]["favoritesCount"], 0);

    let current = app.get("/api/user", Some(&new_token)).await;
    assert_eq!(current.status, StatusCode::OK);
    assert_eq!(current.body["user"]["username"], "jacob");
}

#[tokio::test]
async fn test_profiles_and_following() {
    let app = TestApp::new();
    let jake = app.register("jake").await;
    app.register("anna").await;

    let anonymous = app.get("/api/profiles/anna", None).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert_eq!(anonymous.body["profile"]["following"], false);

    let followed = app
        .request(axum::http::Method::POST, "/api/profiles/anna/follow", Some(&jake), None)
        .await;
    assert_eq!(followed.status, StatusCode::OK);
    assert_eq!(followed.body["profile"]["following"], true);

    let again = app
        .request(axum::http::Method::POST, "/api/profiles/anna/follow", Some(&jake), None)
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let self_follow = app
        .request(axum::http::Method::POST, "/api/profiles/jake/follow", Some(&jake), None)
        .await;
    assert_eq!(self_follow.status, StatusCode::BAD_REQUEST);

    let viewed = app.get("/api/profiles/anna", Some(&jake)).await;
    assert_eq!(viewed.body["profile"]["following"], true);

    let unfollowed = app.delete("/api/profiles/anna/follow", Some(&jake)).await;
    assert_eq!(unfollowed.status, StatusCode::OK);
    assert_eq!(unfollowed.body["profile"]["following"], false);

    assert_eq!(
        app.get("/api/profiles/ghost", None).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_article_lifecycle() {
    let app = TestApp::new();
    let jake = app.register("jake").await;
    let anna = app.register("anna").await;

    let slug = app
        .create_article(&jake, "How to train your dragon", &["dragons", "training"])
        .await;
    assert!(slug.starts_with("how-to-train-your-dragon-"));

    let fetched = app.get(&format!("/api/articles/{}", slug), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    let article = &fetched.body["article"];
    assert_eq!(article["tagList"], json!(["dragons", "training"]));
    assert_eq!(article["favoritesCount"], 0);
    assert_eq!(article["favorited"], false);
    assert_eq!(article["author"]["username"], "jake");
    assert!(article["createdAt"].is_string());

    let forbidden = app
        .put(
            &format!("/api/articles/{}", slug),
            Some(&anna),
            json!({"article": {"body": "hijacked"}}),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let updated = app
        .put(
            &format!("/api/articles/{}", slug),
            Some(&jake),
            json!({"article": {"title": "Did you train your dragon?"}}),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    let new_slug = updated.body["article"]["slug"].as_str().unwrap().to_string();
    assert!(new_slug.starts_with("did-you-train-your-dragon-"));
    assert_eq!(updated.body["article"]["body"], "How to train your dragon body");

    assert_eq!(
        app.get(&format!("/api/articles/{}", slug), None).await.status,
        StatusCode::NOT_FOUND
    );

    assert_eq!(
        app.delete(&format!("/api/articles/{}", new_slug), Some(&anna))
            .await
            .status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.delete(&format!("/api/articles/{}", new_slug), Some(&jake))
            .await
            .status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.get(&format!("/api/articles/{}", new_slug), None).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_create_article_validation() {
    let app = TestApp::new();
    let jake = app.register("jake").await;

    let blank_title = app
        .post(
            "/api/articles",
            Some(&jake),
            json!({"article": {"title": " ", "description": "d", "body": "b"}}),
        )
        .await;
    assert_eq!(blank_title.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(blank_title.error_message(), "title can't be blank");

    let duplicate_tags = app
        .post(
            "/api/articles",
            Some(&jake),
            json!({"article": {"title": "t", "description": "d", "body": "b", "tagList": ["a", "a"]}}),
        )
        .await;
    assert_eq!(duplicate_tags.status, StatusCode::UNPROCESSABLE_ENTITY);

    let anonymous = app
        .post(
            "/api/articles",
            None,
            json!({"article": {"title": "t", "description": "d", "body": "b"}}),
        )
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_articles_pagination_and_filters() {
    let app = TestApp::new();
    let jake = app.register("jake").await;
    let anna = app.register("anna").await;

    for i in 0..10 {
        app.create_article(&jake, &format!("Article {}", i), &["rust"])
            .await;
    }
    app.create_article(&anna, "Anna writes", &["go"]).await;

    let page = app.get("/api/articles?limit=5&offset=0", None).await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["articles"].as_array().unwrap().len(), 5);
    assert_eq!(page.body["articlesCount"], 11);
    assert_eq!(page.body["articles"][0]["title"], "Anna writes");

    let by_tag = app.get("/api/articles?tag=go", None).await;
    assert_eq!(by_tag.body["articlesCount"], 1);

    let by_author = app.get("/api/articles?author=jake&limit=25", None).await;
    assert_eq!(by_author.body["articlesCount"], 10);
    assert_eq!(by_author.body["articles"][0]["title"], "Article 9");

    let everyone = app.get("/api/articles?limit=25", Some(&anna)).await;
    let authors: Vec<&str> = everyone.body["articles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|article| article["author"]["username"].as_str().unwrap())
        .collect();
    assert_eq!(authors.len(), 11);
    assert_eq!(authors.iter().filter(|name| **name == "jake").count(), 10);
    assert_eq!(authors[0], "anna");
}

#[tokio::test]
async fn test_list_articles_rejects_out_of_range_pagination() {
    let app = TestApp::new();
    for query in ["limit=-29", "limit=29", "offset=-29", "limit=0", "limit=abc"] {
        let response = app.get(&format!("/api/articles?{}", query), None).await;
        assert_eq!(
            response.status,
            StatusCode::UNPROCESSABLE_ENTITY,
            "query {} should be rejected",
            query
        );
    }
}

#[tokio::test]
async fn test_feed() {
    let app = TestApp::new();
    let jake = app.register("jake").await;
    let anna = app.register("anna").await;
    let bob = app.register("bob").await;

    app.create_article(&jake, "By jake", &[]).await;
    app.create_article(&anna, "By anna", &[]).await;
    app.request(axum::http::Method::POST, "/api/profiles/jake/follow", Some(&bob), None)
        .await;

    let feed = app.get("/api/articles/feed", Some(&bob)).await;
    assert_eq!(feed.status, StatusCode::OK);
    assert_eq!(feed.body["articlesCount"], 1);
    assert_eq!(feed.body["articles"][0]["title"], "By jake");
    assert_eq!(feed.body["articles"][0]["author"]["following"], true);

    assert_eq!(
        app.get("/api/articles/feed", None).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_favorite_and_unfavorite() {
    let app = TestApp::new();
    let jake = app.register("jake").await;
    let anna = app.register("anna").await;
    let slug = app.create_article(&jake, "Favorite me", &[]).await;
    let uri = format!("/api/articles/{}/favorite", slug);

    let first = app
        .request(axum::http::Method::POST, &uri, Some(&anna), None)
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["article"]["favorited"], true);
    assert_eq!(first.body["article"]["favoritesCount"], 1);

    let second = app
        .request(axum::http::Method::POST, &uri, Some(&anna), None)
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["article"]["favoritesCount"], 1);

    let favorited = app.get("/api/articles?favorited=anna", Some(&anna)).await;
    assert_eq!(favorited.body["articlesCount"], 1);
    assert_eq!(favorited.body["articles"][0]["favorited"], true);

    let removed = app.delete(&uri, Some(&anna)).await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.body["article"]["favorited"], false);
    assert_eq!(removed.body["article"]["favoritesCount"], 0);
}

#[tokio::test]
async fn test_comments() {
    let app = TestApp::new();
    let jake = app.register("jake").await;
    let anna = app.register("anna").await;
    let slug = app.create_article(&jake, "Discuss", &[]).await;
    let uri = format!("/api/articles/{}/comments", slug);

    let created = app
        .post(&uri, Some(&anna), json!({"comment": {"body": "Thank you so much!"}}))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["comment"]["id"].as_str().unwrap().to_string();
    assert_eq!(created.body["comment"]["author"]["username"], "anna");

    let blank = app
        .post(&uri, Some(&anna), json!({"comment": {"body": ""}}))
        .await;
    assert_eq!(blank.status, StatusCode::UNPROCESSABLE_ENTITY);

    let listed = app.get(&uri, None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["comments"].as_array().unwrap().len(), 1);

    let comment_uri = format!("{}/{}", uri, id);
    assert_eq!(
        app.delete(&comment_uri, Some(&jake)).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.delete(&comment_uri, Some(&anna)).await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.delete(&comment_uri, Some(&anna)).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.delete(&format!("{}/not-a-uuid", uri), Some(&anna))
            .await
            .status,
        StatusCode::NOT_FOUND
    );

    let missing_article = app
        .post(
            "/api/articles/missing/comments",
            Some(&anna),
            json!({"comment": {"body": "hello"}}),
        )
        .await;
    assert_eq!(missing_article.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tags() {
    let app = TestApp::new();
    let jake = app.register("jake").await;
    app.create_article(&jake, "One", &["zeta", "alpha"]).await;
    app.create_article(&jake, "Two", &["alpha"]).await;

    let response = app.get("/api/tags", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["tags"], json!(["alpha", "zeta"]));
}

#[tokio::test]
async fn test_bearer_scheme_accepted() {
    let app = TestApp::new();
    let token = app.register("jake").await;

    let response = app
        .get_with_authorization("/api/user", &format!("Bearer {}", token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let wrong_scheme = app
        .get_with_authorization("/api/user", &format!("Basic {}", token))
        .await;
    assert_eq!(wrong_scheme.status, StatusCode::UNAUTHORIZED);
}
