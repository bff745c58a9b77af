//! Tavily client against a local mock server.

mod init_logging;

use pantry::{CollaboratorError, TavilyClient, WebOutcome, WebSearch};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn posts_query_with_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", "Bearer tvly-test"))
        .and(body_partial_json(json!({"query": "thai meal with tofu", "max_results": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"title": "Pad see ew", "url": "https://food.example/pad", "content": " Stir-fry noodles. "},
                {"title": "Blank", "url": "https://food.example/blank", "content": "   "}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TavilyClient::new(Some("tvly-test".into()))
        .with_base_url(server.uri())
        .with_max_results(2);
    let outcome = client.search("thai meal with tofu").await.unwrap();

    let snippets = match outcome {
        WebOutcome::Found(snippets) => snippets,
        other => panic!("expected snippets, got {other:?}"),
    };
    assert_eq!(snippets.len(), 1);
    assert_eq!(snippets[0].title.as_deref(), Some("Pad see ew"));
    assert_eq!(snippets[0].url.as_deref(), Some("https://food.example/pad"));
    assert_eq!(snippets[0].content, "Stir-fry noodles.");
}

#[tokio::test]
async fn no_hits_is_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let client = TavilyClient::new(Some("k".into())).with_base_url(server.uri());
    assert_eq!(client.search("anything").await.unwrap(), WebOutcome::NoResults);
}

#[tokio::test]
async fn unauthorized_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let client = TavilyClient::new(Some("bad".into())).with_base_url(server.uri());
    let err = client.search("soup").await.unwrap_err();
    assert!(matches!(err, CollaboratorError::Status { status: 401, .. }));
}
