use crate::fixtures::test_app::TestApp;
use datecard_db::models::Response;
use serde_json::Value;

#[tokio::test]
async fn accept_after_view_is_terminal() {
    let app = TestApp::spawn().await;
    let invite = app.seed_invitation("A").await;
    app.view_invitation(&invite.invite_id).await;

    let resp = app.respond(&invite.invite_id, "accepted").await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "accepted");

    let resp = app.respond(&invite.invite_id, "rejected").await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "accepted");

    let audit = app.invitations().responses_for(&invite.invite_id).await.unwrap();
    assert_eq!(audit.len(), 2);
    assert_eq!(audit[0].response, Response::Accepted);
    assert_eq!(audit[1].response, Response::Rejected);
}

#[tokio::test]
async fn full_lifecycle_example() {
    let app = TestApp::spawn().await;
    let invite = app.seed_invitation("A").await;

    let dao = app.invitations();
    let stored = dao
        .base
        .find_one(bson::doc! { "invite_id": &invite.invite_id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status.as_str(), "sent");
    assert_eq!(stored.view_count, 0);

    let json: Value = app
        .view_invitation(&invite.invite_id)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(json["invite"]["status"], "seen");
    assert_eq!(json["invite"]["viewCount"], 1);

    let json: Value = app
        .respond(&invite.invite_id, "accepted")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(json["status"], "accepted");

    let json: Value = app
        .respond(&invite.invite_id, "rejected")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(json["status"], "accepted");

    let records = dao
        .responses
        .count(bson::doc! { "invite_id": &invite.invite_id })
        .await
        .unwrap();
    assert_eq!(records, 2);
}

#[tokio::test]
async fn respond_to_unviewed_invitation_applies() {
    let app = TestApp::spawn().await;
    let invite = app.seed_invitation("A").await;

    let json: Value = app
        .respond(&invite.invite_id, "rejected")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(json["status"], "rejected");
}

#[tokio::test]
async fn every_response_is_audited() {
    let app = TestApp::spawn().await;
    let invite = app.seed_invitation("A").await;

    for answer in ["accepted", "accepted", "rejected"] {
        app.respond(&invite.invite_id, answer).await;
    }

    let audit = app.invitations().responses_for(&invite.invite_id).await.unwrap();
    assert_eq!(audit.len(), 3);
    assert!(audit.iter().all(|r| r.invite_id == invite.invite_id));
}

#[tokio::test]
async fn audit_records_forwarded_address() {
    let app = TestApp::spawn().await;
    let invite = app.seed_invitation("A").await;

    app.client
        .post(app.url(&format!("/invitations/{}/respond", invite.invite_id)))
        .header("X-Forwarded-For", "198.51.100.4, 10.0.0.2")
        .json(&serde_json::json!({ "response": "accepted" }))
        .send()
        .await
        .unwrap();
    app.respond(&invite.invite_id, "rejected").await;

    let audit = app.invitations().responses_for(&invite.invite_id).await.unwrap();
    assert_eq!(audit[0].ip_address.as_deref(), Some("198.51.100.4"));
    // Without a proxy header the loopback peer is recorded
    assert_eq!(audit[1].ip_address.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn respond_to_unknown_invitation_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app.respond("ZZZZZZ", "accepted").await;
    assert_eq!(resp.status().as_u16(), 404);

    let audit = app.invitations().responses_for("ZZZZZZ").await.unwrap();
    assert!(audit.is_empty());
}

#[tokio::test]
async fn respond_rejects_invalid_body() {
    let app = TestApp::spawn().await;
    let invite = app.seed_invitation("A").await;

    let resp = app.respond(&invite.invite_id, "maybe").await;
    assert_eq!(resp.status().as_u16(), 400);

    let resp = app
        .client
        .post(app.url(&format!("/invitations/{}/respond", invite.invite_id)))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let audit = app.invitations().responses_for(&invite.invite_id).await.unwrap();
    assert!(audit.is_empty());
}
