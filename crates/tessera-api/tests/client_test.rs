#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.
//
// The refresh-and-retry behavior is exercised end to end: mocks are keyed
// on the Authorization header so the first attempt (stale token) and the
// retry (fresh token) hit different stubs.

use std::sync::Arc;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tessera_api::types::{CardPayload, ListQuery, PersonalInfoPayload};
use tessera_api::{ApiClient, AuthSession, Error, SessionState, TokenPair};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient, Arc<AuthSession>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let session = Arc::new(AuthSession::new());
    let client = ApiClient::with_client(reqwest::Client::new(), base_url, Arc::clone(&session));
    (server, client, session)
}

fn sign_in(session: &AuthSession, access: &str, refresh: &str) {
    session.install(TokenPair {
        access: access.to_owned().into(),
        refresh: refresh.to_owned().into(),
    });
}

fn card_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": 7,
        "personal_info": {
            "id": 1,
            "digital_card_id": id,
            "name": "Ada Lovelace",
            "title": "Engineer",
            "location": null,
            "photo": null,
            "created_at": "2024-06-15T10:30:00Z",
            "updated_at": "2024-06-15T10:30:00Z"
        },
        "contact_info": null,
        "about_info": null,
        "is_active": true,
        "is_public": false,
        "slug": "ada-lovelace",
        "created_at": "2024-06-15T10:30:00Z",
        "updated_at": "2024-06-15T10:30:00Z"
    })
}

fn user_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Admin",
        "email": "admin@example.com",
        "role": "administrador",
        "is_active": true,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

// ── Bearer attachment ───────────────────────────────────────────────

#[tokio::test]
async fn request_carries_bearer_header_when_signed_in() {
    let (server, client, session) = setup().await;
    sign_in(&session, "tok-1", "ref-1");

    Mock::given(method("GET"))
        .and(path("/api/digital-cards/5"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": card_json(5) })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let card = client.get_card(5).await.unwrap();
    assert_eq!(card.id, 5);
    assert_eq!(card.display_name(), "Ada Lovelace");
}

#[tokio::test]
async fn request_is_sent_bare_when_signed_out() {
    let (server, client, _session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/digital-cards/5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": card_json(5) })),
        )
        .mount(&server)
        .await;

    client.get_card(5).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(
        !requests[0].headers.contains_key("authorization"),
        "expected no Authorization header on anonymous request"
    );
}

// ── Refresh-and-retry ───────────────────────────────────────────────

#[tokio::test]
async fn expired_token_is_refreshed_and_the_request_retried_once() {
    let (server, client, session) = setup().await;
    sign_in(&session, "stale", "ref-1");

    Mock::given(method("GET"))
        .and(path("/api/digital-cards/1"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_partial_json(json!({ "refresh_token": "ref-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh",
            "refresh_token": "ref-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/digital-cards/1"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": card_json(1) })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let card = client.get_card(1).await.unwrap();
    assert_eq!(card.id, 1);

    // The rotated pair is installed.
    assert_eq!(session.state(), SessionState::SignedIn);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3, "original + refresh + retry");
}

#[tokio::test]
async fn second_401_is_not_refreshed_again() {
    let (server, client, session) = setup().await;
    sign_in(&session, "stale", "ref-1");

    // Both attempts answer 401, whatever the token.
    Mock::given(method("GET"))
        .and(path("/api/digital-cards/1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh",
            "refresh_token": "ref-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.get_card(1).await;

    // The retry's 401 propagates as a plain API error; the session is not
    // torn down because the refresh itself succeeded.
    match result {
        Err(Error::Api { status: 401, .. }) => {}
        other => panic!("expected Api 401 error, got: {other:?}"),
    }
    assert_eq!(session.state(), SessionState::SignedIn);
}

#[tokio::test]
async fn failed_refresh_expires_the_session() {
    let (server, client, session) = setup().await;
    sign_in(&session, "stale", "ref-1");

    Mock::given(method("GET"))
        .and(path("/api/digital-cards/1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.get_card(1).await;

    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
    assert_eq!(session.state(), SessionState::Expired);
    assert!(session.access_token().is_none());
}

#[tokio::test]
async fn refresh_without_usable_token_expires_the_session() {
    let (server, client, session) = setup().await;
    sign_in(&session, "stale", "ref-1");

    Mock::given(method("GET"))
        .and(path("/api/digital-cards/1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    // Backend answers success but without a token.
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = client.get_card(1).await;

    assert!(matches!(result, Err(Error::SessionExpired)));
    assert_eq!(session.state(), SessionState::Expired);
}

#[tokio::test]
async fn anonymous_401_is_never_treated_as_refreshable() {
    let (server, client, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/digital-cards/1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.get_card(1).await;

    match result {
        Err(Error::Api { status: 401, .. }) => {}
        other => panic!("expected Api 401 error, got: {other:?}"),
    }
    assert_eq!(session.state(), SessionState::SignedOut);
}

// ── Authentication endpoints ────────────────────────────────────────

#[tokio::test]
async fn login_installs_the_token_pair() {
    let (server, client, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({ "email": "admin@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "refresh_token": "ref-1",
            "user": user_json(1)
        })))
        .mount(&server)
        .await;

    let password: secrecy::SecretString = "hunter2".to_owned().into();
    let user = client.login("admin@example.com", &password).await.unwrap();

    assert_eq!(user.email, "admin@example.com");
    assert_eq!(session.state(), SessionState::SignedIn);
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn login_failure_maps_to_authentication_error() {
    let (server, client, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let password: secrecy::SecretString = "wrong".to_owned().into();
    let result = client.login("admin@example.com", &password).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("Invalid credentials"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn logout_clears_the_session_even_if_the_server_is_down() {
    let (server, client, session) = setup().await;
    sign_in(&session, "tok-1", "ref-1");

    // No logout stub mounted: the request 404s, the session clears anyway.
    drop(server);
    client.logout().await;

    assert_eq!(session.state(), SessionState::SignedOut);
    assert!(!session.is_authenticated());
}

// ── Resource endpoints ──────────────────────────────────────────────

#[tokio::test]
async fn list_cards_parses_the_paginator_envelope() {
    let (server, client, session) = setup().await;
    sign_in(&session, "tok-1", "ref-1");

    Mock::given(method("GET"))
        .and(path("/api/digital-cards"))
        .and(query_param("page", "2"))
        .and(query_param("search", "ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [card_json(1), card_json(2)],
            "links": { "first": "f", "last": "l", "prev": "p", "next": null },
            "meta": {
                "current_page": 2,
                "from": 16,
                "last_page": 2,
                "per_page": 15,
                "to": 17,
                "total": 17
            }
        })))
        .mount(&server)
        .await;

    let page = client
        .list_cards(&ListQuery {
            page: Some(2),
            search: Some("ada".into()),
            per_page: None,
        })
        .await
        .unwrap();

    assert_eq!(page.data.len(), 2);
    assert_eq!(page.meta.current_page, 2);
    assert_eq!(page.meta.total, 17);
    assert!(page.links.next.is_none());
}

#[tokio::test]
async fn create_card_validation_failure_carries_field_errors() {
    let (server, client, session) = setup().await;
    sign_in(&session, "tok-1", "ref-1");

    Mock::given(method("POST"))
        .and(path("/api/digital-cards"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The given data was invalid.",
            "errors": { "personalInfo.name": ["The name field is required."] }
        })))
        .mount(&server)
        .await;

    let result = client.create_card(&CardPayload::default()).await;

    match result {
        Err(Error::Validation { ref errors, .. }) => {
            assert!(errors.contains_key("personalInfo.name"));
        }
        other => panic!("expected Validation error, got: {other:?}"),
    }
}

#[tokio::test]
async fn update_card_uses_the_post_update_route() {
    let (server, client, session) = setup().await;
    sign_in(&session, "tok-1", "ref-1");

    Mock::given(method("POST"))
        .and(path("/api/digital-cards/3/update"))
        .and(body_partial_json(
            json!({ "personalInfo": { "name": "Grace Hopper" } }),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": card_json(3) })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let payload = CardPayload {
        personal_info: Some(PersonalInfoPayload {
            name: Some("Grace Hopper".into()),
            ..PersonalInfoPayload::default()
        }),
        ..CardPayload::default()
    };

    client.update_card(3, &payload).await.unwrap();
}

#[tokio::test]
async fn delete_card_returns_the_backend_message() {
    let (server, client, session) = setup().await;
    sign_in(&session, "tok-1", "ref-1");

    Mock::given(method("DELETE"))
        .and(path("/api/digital-cards/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Card deleted" })),
        )
        .mount(&server)
        .await;

    let message = client.delete_card(3).await.unwrap();
    assert_eq!(message, "Card deleted");
}

#[tokio::test]
async fn upload_card_image_posts_multipart() {
    let (server, client, session) = setup().await;
    sign_in(&session, "tok-1", "ref-1");

    Mock::given(method("POST"))
        .and(path("/api/digital-cards/3/upload-image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Image uploaded",
            "image_url": "cards/3/photo.png",
            "full_url": "https://cards.example.com/storage/cards/3/photo.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let upload = client
        .upload_card_image(3, "photo.png", vec![0x89, 0x50, 0x4e, 0x47])
        .await
        .unwrap();

    assert_eq!(upload.image_url, "cards/3/photo.png");
}

#[tokio::test]
async fn forbidden_and_server_errors_pass_through_unchanged() {
    let (server, client, session) = setup().await;
    sign_in(&session, "tok-1", "ref-1");

    Mock::given(method("DELETE"))
        .and(path("/api/users/9"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "Forbidden" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.delete_user(9).await;

    match result {
        Err(ref err @ Error::Api { status: 403, .. }) => {
            assert_eq!(err.status(), Some(403));
        }
        other => panic!("expected Api 403 error, got: {other:?}"),
    }
    // Pass-through failures never touch the session.
    assert_eq!(session.state(), SessionState::SignedIn);
}
