/// End-to-end tests for the HTTP API
///
/// These tests require a running PostgreSQL database.
/// Run with: cargo test -p notebook-api --test integration_test -- --ignored
///
/// Every test registers its own users, so tests can share one database.

mod common;

use axum::http::{Method, StatusCode};
use common::{parse_id, TestContext};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_follow_unfollow_flow() {
    let ctx = TestContext::new().await.unwrap();
    let note = ctx.create_note("public").await;
    let follow = format!("/note/{}/follow", note);

    let (status, body) = ctx.send(Method::POST, &follow, Some(ctx.other.id), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = ctx.send(Method::POST, &follow, Some(ctx.other.id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Already following");

    let (_, followers) = ctx
        .send(Method::GET, &format!("/note/{}/followers", note), None, None)
        .await;
    assert_eq!(followers.as_array().unwrap().len(), 1);
    assert_eq!(followers[0]["userId"], ctx.other.id.to_string());

    let (_, stats) = ctx
        .send(Method::GET, &format!("/note/{}/stats", note), None, None)
        .await;
    assert_eq!(stats["followerCount"], 1);

    let (status, _) = ctx.send(Method::DELETE, &follow, Some(ctx.other.id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx.send(Method::DELETE, &follow, Some(ctx.other.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not following");

    let (_, stats) = ctx
        .send(Method::GET, &format!("/note/{}/stats", note), None, None)
        .await;
    assert_eq!(stats["followerCount"], 0);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_follow_private_note_is_forbidden() {
    let ctx = TestContext::new().await.unwrap();
    let note = ctx.create_note("private").await;

    let (status, body) = ctx
        .send(Method::POST, &format!("/note/{}/follow", note), Some(ctx.other.id), None)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Can only follow public notes");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_follow_missing_note_is_not_found() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send(
            Method::POST,
            &format!("/note/{}/follow", uuid::Uuid::new_v4()),
            Some(ctx.other.id),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Note not found");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_views_and_stats() {
    let ctx = TestContext::new().await.unwrap();
    let note = ctx.create_note("private").await;
    let view = format!("/note/{}/view", note);

    for _ in 0..3 {
        let (status, _) = ctx.send(Method::POST, &view, Some(ctx.other.id), None).await;
        assert_eq!(status, StatusCode::OK);
    }
    ctx.send(Method::POST, &view, Some(ctx.owner.id), None).await;

    let (_, viewers) = ctx
        .send(Method::GET, &format!("/note/{}/viewers?limit=10", note), None, None)
        .await;
    let viewers = viewers.as_array().unwrap();
    assert_eq!(viewers.len(), 2);
    assert_eq!(viewers[0]["userId"], ctx.owner.id.to_string());
    assert_eq!(viewers[1]["viewCount"], 3);

    let (_, stats) = ctx
        .send(Method::GET, &format!("/note/{}/stats", note), None, None)
        .await;
    assert_eq!(stats["viewerCount"], 2);
    assert_eq!(stats["totalViews"], 4);
    assert_eq!(stats["status"], "private");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_archive_note_owner_only() {
    let ctx = TestContext::new().await.unwrap();
    let note = ctx.create_note("public").await;
    let archive = format!("/note/{}/archive", note);

    let (status, _) = ctx
        .send(Method::PATCH, &archive, Some(ctx.other.id), Some(json!({ "archived": true })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .send(Method::PATCH, &archive, Some(ctx.owner.id), Some(json!({ "archived": true })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "archived": true }));

    let (_, note_body) = ctx
        .send(Method::GET, &format!("/notes/{}", note), Some(ctx.owner.id), None)
        .await;
    assert_eq!(note_body["archived"], true);
    assert!(note_body["archivedAt"].is_string());

    ctx.send(Method::PATCH, &archive, Some(ctx.owner.id), Some(json!({ "archived": false })))
        .await;
    let (_, note_body) = ctx
        .send(Method::GET, &format!("/notes/{}", note), Some(ctx.owner.id), None)
        .await;
    assert_eq!(note_body["archived"], false);
    assert!(note_body["archivedAt"].is_null());
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_invitation_lifecycle() {
    let ctx = TestContext::new().await.unwrap();
    let workspace = ctx.create_workspace("private").await;
    let third = ctx.new_user("third").await;
    let invite = format!("/workspace/{}/invite", workspace);

    let (status, _) = ctx
        .send(
            Method::POST,
            &invite,
            Some(ctx.other.id),
            Some(json!({ "userIds": [third.id], "role": "member" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .send(
            Method::POST,
            &invite,
            Some(ctx.owner.id),
            Some(json!({ "userIds": [ctx.other.id, third.id], "role": "member" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "success": true, "invited": 2 }));

    let (status, _) = ctx
        .send(
            Method::POST,
            &invite,
            Some(ctx.owner.id),
            Some(json!({ "userIds": [third.id] })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let respond = format!("/workspace/{}/invitation", workspace);
    let (status, body) = ctx
        .send(Method::PATCH, &respond, Some(ctx.other.id), Some(json!({ "action": "accept" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "status": "active" }));

    let (_, body) = ctx
        .send(Method::PATCH, &respond, Some(third.id), Some(json!({ "action": "decline" })))
        .await;
    assert_eq!(body["status"], "declined");

    let (status, _) = ctx
        .send(Method::PATCH, &respond, Some(third.id), Some(json!({ "action": "accept" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stats) = ctx
        .send(Method::GET, &format!("/workspace/{}/stats", workspace), None, None)
        .await;
    assert_eq!(stats["memberCount"], 1);
    assert_eq!(stats["visibility"], "private");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_workspace_follow_requires_public() {
    let ctx = TestContext::new().await.unwrap();
    let workspace = ctx.create_workspace("private").await;
    let follow = format!("/workspace/{}/follow", workspace);

    let (status, _) = ctx.send(Method::POST, &follow, Some(ctx.other.id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .send(
            Method::PATCH,
            &format!("/workspace/{}/visibility", workspace),
            Some(ctx.owner.id),
            Some(json!({ "visibility": "public" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["visibility"], "public");

    let (status, _) = ctx.send(Method::POST, &follow, Some(ctx.other.id), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, stats) = ctx
        .send(Method::GET, &format!("/workspace/{}/stats", workspace), None, None)
        .await;
    assert_eq!(stats["followerCount"], 1);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_workspace_creation_moves_notes() {
    let ctx = TestContext::new().await.unwrap();
    let note = ctx.create_note("private").await;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/workspaces",
            Some(ctx.owner.id),
            Some(json!({ "name": "Thesis", "noteIds": [note] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let workspace = parse_id(&body);

    let (_, note_body) = ctx
        .send(Method::GET, &format!("/notes/{}", note), Some(ctx.owner.id), None)
        .await;
    assert_eq!(note_body["workspaceId"], workspace.to_string());

    let (_, listed) = ctx.send(Method::GET, "/workspaces", Some(ctx.owner.id), None).await;
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|w| w["id"] == workspace.to_string()));
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_tags_on_workspace_notes() {
    let ctx = TestContext::new().await.unwrap();
    let workspace = ctx.create_workspace("private").await;

    let (status, note_body) = ctx
        .send(
            Method::POST,
            "/notes",
            Some(ctx.owner.id),
            Some(json!({ "title": "Draft", "content": "x", "workspaceId": workspace })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let note = parse_id(&note_body);

    let (status, tag_body) = ctx
        .send(
            Method::POST,
            &format!("/workspace/{}/tags", workspace),
            Some(ctx.owner.id),
            Some(json!({ "name": "draft" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let tag = parse_id(&tag_body);

    let attach = format!("/note/{}/tags/{}", note, tag);
    let (status, _) = ctx.send(Method::PUT, &attach, Some(ctx.owner.id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.send(Method::PUT, &attach, Some(ctx.owner.id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, tags) = ctx
        .send(Method::GET, &format!("/note/{}/tags", note), None, None)
        .await;
    assert_eq!(tags[0]["name"], "draft");

    let (status, _) = ctx.send(Method::DELETE, &attach, Some(ctx.owner.id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_health_reports_database() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["pool"]["idleConnections"].is_number());
    assert!(body["pool"]["activeConnections"].is_number());
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_unknown_caller_is_unauthorized() {
    let ctx = TestContext::new().await.unwrap();
    let note = ctx.create_note("public").await;
    let stranger = Some(Uuid::new_v4());

    let (status, body) = ctx
        .send(Method::POST, &format!("/note/{}/follow", note), stranger, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = ctx
        .send(Method::POST, &format!("/note/{}/view", note), stranger, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .send(
            Method::POST,
            "/notes",
            stranger,
            Some(json!({ "title": "Orphan", "content": "No author" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, stats) = ctx
        .send(Method::GET, &format!("/note/{}/stats", note), None, None)
        .await;
    assert_eq!(stats["followerCount"], 0);
    assert_eq!(stats["viewerCount"], 0);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_users_delete_only_themselves() {
    let ctx = TestContext::new().await.unwrap();
    let doomed = ctx.new_user("doomed").await;
    let uri = format!("/users/{}", doomed.id);

    let (status, _) = ctx.send(Method::DELETE, &uri, Some(ctx.other.id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx.send(Method::DELETE, &uri, Some(doomed.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = ctx.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_posts_crud() {
    let ctx = TestContext::new().await.unwrap();

    let (status, created) = ctx
        .send(
            Method::POST,
            "/posts",
            None,
            Some(json!({ "title": "Hello", "content": "First post" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().expect("integer id");
    let uri = format!("/posts/{}", id);

    let (status, fetched) = ctx.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Hello");

    let (_, listed) = ctx.send(Method::GET, "/posts", None, None).await;
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|post| post["id"].as_i64() == Some(id)));

    let (status, updated) = ctx
        .send(Method::PATCH, &uri, None, Some(json!({ "content": "Edited" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Hello");
    assert_eq!(updated["content"], "Edited");

    let (status, deleted) = ctx.send(Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "success": true, "id": id }));

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = ctx.send(method, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Post not found");
    }

    let (status, _) = ctx
        .send(Method::PATCH, &uri, None, Some(json!({ "title": "Gone" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
