//! Integration tests for the Valentine Link HTTP surface.
//!
//! Each test spins up an Axum server on a random port and drives the real
//! HTML and JSON contract over reqwest.

use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use valentine_link::config::ServerConfig;
use valentine_link::web::{AppState, app_routes};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Comfortably outside the decline settle window.
const BETWEEN_DECLINES: Duration = Duration::from_millis(350);

/// Start an Axum server on a random port, return its base URL.
async fn start_server() -> String {
    let state = AppState::new(ServerConfig::default());
    let app = app_routes(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{port}")
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

async fn post_json(url: &str, body: Value) -> (reqwest::StatusCode, Value) {
    let resp = client().post(url).json(&body).send().await.unwrap();
    let status = resp.status();
    let json = resp.json().await.unwrap_or(Value::Null);
    (status, json)
}

// ── Tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let json: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "valentine-link");
        assert_eq!(json["sessions"]["presentation"], 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn generated_link_round_trips_to_the_question() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;

        let (status, created) = post_json(
            &format!("{base}/api/links"),
            json!({"name": "sam", "sender": "+1 555 000 1111"}),
        )
        .await;
        assert_eq!(status, 200);
        let link = created["link"].as_str().unwrap().to_string();
        assert!(link.starts_with(&format!("{base}/valentine?t=")));

        // The link opens the question screen with the normalized name.
        let html = client().get(&link).send().await.unwrap().text().await.unwrap();
        assert!(html.contains("Hey Sam!"));
        assert!(html.contains("Will You Be My Valentine?"));

        // And decodes back to the same invitation.
        let query = link.split_once('?').unwrap().1;
        let read: Value = client()
            .get(format!("{base}/api/invitations?{query}"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(read["status"], "present");
        assert_eq!(read["source"], "query_token");
        assert_eq!(read["invitation"]["recipient_name"], "Sam");
        assert_eq!(read["invitation"]["sender_contact"], "15550001111");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn path_token_link_opens_the_question() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let (_, created) = post_json(
            &format!("{base}/api/links"),
            json!({"name": "mary-jane", "shape": "path"}),
        )
        .await;
        let link = created["link"].as_str().unwrap();
        assert!(link.starts_with(&format!("{base}/v/")));

        let html = client().get(link).send().await.unwrap().text().await.unwrap();
        assert!(html.contains("Hey Mary-Jane!"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn bare_and_legacy_links() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;

        let html = client()
            .get(format!("{base}/valentine"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(html.contains("Hey You!"));

        let read: Value = client()
            .get(format!("{base}/api/invitations?name=Jane"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(read["status"], "present");
        assert_eq!(read["source"], "plain_params");
        assert_eq!(read["greeting"], "Hey Jane!");
        assert!(read["invitation"]["sender_contact"].is_null());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn repeated_link_params_keep_the_first_value() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;

        let resp = client()
            .get(format!("{base}/valentine?name=Jane&name=Jim&utm_source=chat"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert!(resp.text().await.unwrap().contains("Hey Jane!"));

        let resp = client()
            .get(format!("{base}/valentine?t=abc&t=def"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert!(resp.text().await.unwrap().contains("Hey You!"));

        let read: Value = client()
            .get(format!("{base}/api/invitations?name=Jane&name=Jim"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(read["status"], "present");
        assert_eq!(read["greeting"], "Hey Jane!");

        let (_, created) =
            post_json(&format!("{base}/api/links"), json!({"name": "sam"})).await;
        let token = created["token"].as_str().unwrap();
        let read: Value = client()
            .get(format!("{base}/api/invitations?t={token}&t=garbage"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(read["invitation"]["recipient_name"], "Sam");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn garbage_token_is_invalid_not_an_error() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let resp = client()
            .get(format!("{base}/api/invitations?t=%25%25not-base64%25%25"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let read: Value = resp.json().await.unwrap();
        assert_eq!(read["status"], "invalid");
        assert_eq!(read["greeting"], "Hey You!");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn decline_escalates_then_accept_celebrates() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;

        let (_, created) = post_json(
            &format!("{base}/api/links"),
            json!({"name": "sam", "sender": "+1 555 000 1111"}),
        )
        .await;
        let token = created["token"].as_str().unwrap();

        let (status, opened) =
            post_json(&format!("{base}/api/presentations"), json!({"t": token})).await;
        assert_eq!(status, 200);
        assert_eq!(opened["view"]["declines"], 0);
        assert_eq!(opened["view"]["decline_label"], "No");
        let id = opened["id"].as_str().unwrap().to_string();
        let decline_url = format!("{base}/api/presentations/{id}/decline");

        // Desktop pointer: one move per decline.
        let (_, first) = post_json(&decline_url, json!({"hover": true})).await;
        assert_eq!(first["counted"], true);
        assert_eq!(first["moves"].as_array().unwrap().len(), 1);
        assert_eq!(first["view"]["declines"], 1);

        // A repeat inside the settle window does not count.
        let (_, repeat) = post_json(&decline_url, json!({"hover": true})).await;
        assert_eq!(repeat["counted"], false);
        assert_eq!(repeat["view"]["declines"], 1);

        // Touch pointer: three moves, still one decline.
        tokio::time::sleep(BETWEEN_DECLINES).await;
        let (_, touch) = post_json(&decline_url, json!({"hover": false})).await;
        assert_eq!(touch["counted"], true);
        assert_eq!(touch["moves"].as_array().unwrap().len(), 3);
        assert_eq!(touch["view"]["declines"], 2);
        assert!(touch["view"]["accept_scale"].as_f64().unwrap() > 1.0);

        let (status, accepted) =
            post_json(&format!("{base}/api/presentations/{id}/accept"), json!({})).await;
        assert_eq!(status, 200);
        assert_eq!(accepted["view"]["phase"], "accepted");
        assert_eq!(accepted["celebration"]["headline"], "I Knew You'd Say Yes!");
        assert!(
            accepted["celebration"]["reply_uri"]
                .as_str()
                .unwrap()
                .starts_with("https://wa.me/15550001111?text=")
        );

        // Accepted is terminal for declines.
        tokio::time::sleep(BETWEEN_DECLINES).await;
        let (status, _) = post_json(&decline_url, json!({})).await;
        assert_eq!(status, 409);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn composer_wizard_over_the_api() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;

        let (_, opened) = post_json(&format!("{base}/api/composer"), json!({})).await;
        assert_eq!(opened["view"]["step"], "name");
        let id = opened["id"].as_str().unwrap().to_string();
        let api = format!("{base}/api/composer/{id}");

        // Advancing without a name is refused.
        let (status, _) = post_json(&format!("{api}/next"), json!({})).await;
        assert_eq!(status, 422);

        post_json(&format!("{api}/name"), json!({"value": "sam"})).await;
        let (_, step) = post_json(&format!("{api}/next"), json!({})).await;
        assert_eq!(step["view"]["step"], "contact");

        post_json(&format!("{api}/contact"), json!({"value": "+1 555 000 1111"})).await;
        let (_, ready) = post_json(&format!("{api}/next"), json!({})).await;
        assert_eq!(ready["view"]["ready"], true);
        assert!(ready["view"]["link"].as_str().unwrap().contains("/valentine?t="));

        let (_, copied) = post_json(&format!("{api}/copy"), json!({"ok": true})).await;
        assert_eq!(copied["view"]["copied"], true);

        let (status, shared) =
            post_json(&format!("{api}/share"), json!({"recipient": "+44 7700 900123"})).await;
        assert_eq!(status, 200);
        assert!(
            shared["reply_uri"]
                .as_str()
                .unwrap()
                .starts_with("https://wa.me/447700900123?text=")
        );

        // Editing the name invalidates the link.
        let (_, edited) = post_json(&format!("{api}/name"), json!({"value": "alex"})).await;
        assert_eq!(edited["view"]["ready"], false);
        assert!(edited["view"]["link"].is_null());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn html_compose_and_share_flow() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;

        let resp = client()
            .post(format!("{base}/compose"))
            .form(&[("name", "sam"), ("contact", "+1 555 000 1111")])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let html = resp.text().await.unwrap();
        assert!(html.contains("Your link is ready"));
        assert!(html.contains("/valentine?t="));

        let resp = client()
            .post(format!("{base}/compose"))
            .form(&[("name", ""), ("contact", "")])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 422);

        let resp = client()
            .post(format!("{base}/share"))
            .form(&[("link", "http://x/valentine?t=abc"), ("recipient", "+1 555 000 2222")])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 303);
        let location = resp.headers()["location"].to_str().unwrap();
        assert!(location.starts_with("https://wa.me/15550002222?text="));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn html_decline_and_accept() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;

        let html = client()
            .get(format!("{base}/valentine?name=Jane"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        let start = html.find("/valentine/").unwrap() + "/valentine/".len();
        let id = &html[start..start + 36];

        let html = client()
            .post(format!("{base}/valentine/{id}/decline"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(html.contains("Are you sure?"));

        let html = client()
            .post(format!("{base}/valentine/{id}/accept"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(html.contains("I Knew You'd Say Yes!"));
        assert!(html.contains("Jane, you just made me the happiest person"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unknown_sessions_are_not_found() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let missing = uuid::Uuid::new_v4();

        let (status, json) = post_json(
            &format!("{base}/api/presentations/{missing}/decline"),
            json!({}),
        )
        .await;
        assert_eq!(status, 404);
        assert!(json["error"].as_str().unwrap().contains(&missing.to_string()));

        let resp = client()
            .post(format!("{base}/valentine/{missing}/accept"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    })
    .await
    .expect("test timed out");
}
