use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};

mod support;
use support::{admin_token, build_test_app, cookie, login, register};

const UNKNOWN_ID: &str = "5f1d7c2e9a3b4c5d6e7f8a9b";

fn rover() -> Value {
    json!({
        "name": "Curiosity",
        "launchDate": "2011-11-26",
        "constructionDate": "2004-04-01",
        "roverConstructor": "JPL",
        "image": "https://example.com/curiosity.jpg",
    })
}

#[tokio::test]
async fn rover_crud_round_trip() -> Result<()> {
    let app = build_test_app().await?;
    let session = cookie(&admin_token(&app.server).await);

    let created = app
        .server
        .post("/rovers")
        .add_header("Cookie", session.clone())
        .json(&rover())
        .await;
    created.assert_status_ok();
    let created: Value = created.json();
    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(id.len(), 24);
    assert_eq!(created["name"], "Curiosity");

    let listed: Value = app.server.get("/rovers").await.json();
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let fetched = app.server.get(&format!("/rovers/{id}")).await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>(), created);

    let updated = app
        .server
        .put(&format!("/rovers/{id}"))
        .add_header("Cookie", session.clone())
        .json(&json!({ "name": "Perseverance" }))
        .await;
    updated.assert_status_ok();
    let updated: Value = updated.json();
    assert_eq!(updated["name"], "Perseverance");
    assert_eq!(updated["roverConstructor"], "JPL");

    let deleted = app
        .server
        .delete(&format!("/rovers/{id}"))
        .add_header("Cookie", session)
        .await;
    deleted.assert_status_ok();
    assert_eq!(deleted.json::<Value>()["id"], id.as_str());

    app.server
        .get(&format!("/rovers/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn writes_require_a_session() -> Result<()> {
    let app = build_test_app().await?;

    app.server
        .post("/missions")
        .json(&json!({
            "country": "USA",
            "startDate": "2012-08-06",
            "endDate": "2030-01-01",
            "rovers": "Curiosity",
        }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .delete(&format!("/missions/{UNKNOWN_ID}"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn identifiers_are_checked_before_the_store() -> Result<()> {
    let app = build_test_app().await?;
    let session = cookie(&admin_token(&app.server).await);

    let bad_update = app
        .server
        .put("/rovers/not-an-id")
        .add_header("Cookie", session.clone())
        .json(&json!({ "name": "x" }))
        .await;
    bad_update.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = bad_update.json();
    assert!(
        body["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("invalid identifier"))
    );

    app.server
        .delete("/rovers/zzzzzzzzzzzzzzzzzzzzzzzz")
        .add_header("Cookie", session.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .put(&format!("/rovers/{UNKNOWN_ID}"))
        .add_header("Cookie", session.clone())
        .json(&json!({ "name": "x" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .delete(&format!("/rovers/{UNKNOWN_ID}"))
        .add_header("Cookie", session)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // Reads treat a malformed identifier as a record that cannot exist.
    app.server
        .get("/rovers/not-an-id")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_names_every_missing_field() -> Result<()> {
    let app = build_test_app().await?;
    let session = cookie(&admin_token(&app.server).await);

    let response = app
        .server
        .post("/rovers")
        .add_header("Cookie", session.clone())
        .json(&json!({ "name": "Sojourner" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let message = response.json::<Value>()["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    for field in ["launchDate", "constructionDate", "roverConstructor", "image"] {
        assert!(message.contains(field), "{field} not named in {message}");
    }

    app.server
        .put(&format!("/rovers/{UNKNOWN_ID}"))
        .add_header("Cookie", session)
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn registration_rejects_duplicate_handles() -> Result<()> {
    let app = build_test_app().await?;
    register(&app.server, "alice", "pw1234").await;

    app.server
        .post("/users")
        .json(&json!({
            "handle": "alice",
            "email": "other@example.com",
            "secret": "another",
        }))
        .await
        .assert_status(StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn registration_cannot_self_grant_privilege() -> Result<()> {
    let app = build_test_app().await?;

    app.server
        .post("/users")
        .json(&json!({
            "handle": "mallory",
            "email": "mallory@example.com",
            "secret": "pw",
            "isPrivileged": true,
        }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let session = cookie(&admin_token(&app.server).await);
    let granted = app
        .server
        .post("/users")
        .add_header("Cookie", session)
        .json(&json!({
            "handle": "deputy",
            "email": "deputy@example.com",
            "secret": "pw",
            "isPrivileged": true,
        }))
        .await;
    granted.assert_status_ok();
    assert_eq!(granted.json::<Value>()["isPrivileged"], true);
    Ok(())
}

#[tokio::test]
async fn identities_are_visible_to_owner_or_privileged_only() -> Result<()> {
    let app = build_test_app().await?;
    let alice = register(&app.server, "alice", "pw1234").await;
    let bob = register(&app.server, "bob", "hunter2").await;
    let alice_id = alice["id"].as_str().unwrap_or_default();
    let bob_id = bob["id"].as_str().unwrap_or_default();
    let alice_session = cookie(&login(&app.server, "alice", "pw1234").await);

    app.server
        .get(&format!("/users/{alice_id}"))
        .add_header("Cookie", alice_session.clone())
        .await
        .assert_status_ok();
    app.server
        .get(&format!("/users/{bob_id}"))
        .add_header("Cookie", alice_session.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.server
        .get("/users")
        .add_header("Cookie", alice_session)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.server
        .get("/users")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let admin_session = cookie(&admin_token(&app.server).await);
    let listed = app
        .server
        .get("/users")
        .add_header("Cookie", admin_session)
        .await;
    listed.assert_status_ok();
    let listed: Value = listed.json();
    let users = listed.as_array().cloned().unwrap_or_default();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|user| user.get("secretHash").is_none()));
    Ok(())
}

#[tokio::test]
async fn secret_update_is_rehashed() -> Result<()> {
    let app = build_test_app().await?;
    let alice = register(&app.server, "alice", "pw1234").await;
    let alice_id = alice["id"].as_str().unwrap_or_default();
    let session = cookie(&login(&app.server, "alice", "pw1234").await);

    let updated = app
        .server
        .put(&format!("/users/{alice_id}"))
        .add_header("Cookie", session.clone())
        .json(&json!({ "secret": "new-secret" }))
        .await;
    updated.assert_status_ok();
    assert!(updated.json::<Value>().get("secretHash").is_none());

    app.server
        .post("/login")
        .json(&json!({ "handle": "alice", "secret": "pw1234" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    login(&app.server, "alice", "new-secret").await;

    app.server
        .put(&format!("/users/{alice_id}"))
        .add_header("Cookie", session)
        .json(&json!({ "isPrivileged": true }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn owner_can_delete_their_identity() -> Result<()> {
    let app = build_test_app().await?;
    let alice = register(&app.server, "alice", "pw1234").await;
    let alice_id = alice["id"].as_str().unwrap_or_default();
    let session = cookie(&login(&app.server, "alice", "pw1234").await);

    app.server
        .delete(&format!("/users/{alice_id}"))
        .add_header("Cookie", session)
        .await
        .assert_status_ok();

    app.server
        .post("/login")
        .json(&json!({ "handle": "alice", "secret": "pw1234" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}
