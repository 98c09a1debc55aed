//! Dispatcher contract, exercised against a local mock of the detector API.

use hearsay_client::{DetectorClient, VerdictType};
use hearsay_common::HearsayError;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> DetectorClient {
    DetectorClient::new(&server.uri()).expect("mock server uri is a valid base")
}

#[tokio::test]
async fn success_body_reaches_the_caller_typed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({"text": "The moon landing was faked"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "The moon landing was faked",
            "prediction": "FAKE",
            "label": 0,
            "confidence": 92.0,
            "probabilities": {"fake": 92.0, "true": 8.0},
            "decision_source": "NLP Model",
            "wordnet_hits": 4,
            "wordnet_total": 6,
            "api_matches": [],
            "api_count": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .await
        .check_claim("The moon landing was faked")
        .await
        .unwrap();

    assert_eq!(reply.label, 0);
    assert_eq!(reply.confidence, 92.0);
    assert_eq!(reply.probabilities.fake, 92.0);
    assert_eq!(reply.decision_source, "NLP Model");
    assert!(!reply.is_known_site);
}

#[tokio::test]
async fn input_is_trimmed_before_dispatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({"text": "no padding"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "no padding",
            "prediction": "TRUE",
            "label": 1,
            "confidence": 70.0,
            "probabilities": {"fake": 30.0, "true": 70.0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .await
        .check_claim("   no padding \n")
        .await
        .unwrap();
    assert_eq!(reply.label, 1);
}

#[tokio::test]
async fn domain_error_in_2xx_body_is_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "rate limited"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .check_claim("some claim")
        .await
        .unwrap_err();
    assert!(matches!(err, HearsayError::Domain(ref m) if m == "rate limited"));
}

#[tokio::test]
async fn domain_error_in_4xx_body_is_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/url"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": "Access denied (403 Forbidden). The website is blocking automated requests."
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .check_url("https://example.com/article")
        .await
        .unwrap_err();
    assert!(
        matches!(err, HearsayError::Domain(ref m) if m.starts_with("Access denied (403 Forbidden)"))
    );
}

#[tokio::test]
async fn bare_5xx_becomes_transport_error_with_status_phrase() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .check_claim("some claim")
        .await
        .unwrap_err();
    match err {
        HearsayError::Transport(m) => assert_eq!(m, "Internal Server Error"),
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_2xx_body_becomes_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>surprise</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .check_claim("some claim")
        .await
        .unwrap_err();
    assert!(matches!(err, HearsayError::Decode(_)));
}

#[tokio::test]
async fn validation_failure_blocks_dispatch_entirely() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would 404 and, worse, show up below.

    let client = client_for(&server).await;

    let err = client.check_claim("   ").await.unwrap_err();
    assert!(matches!(err, HearsayError::Validation(_)));

    let err = client.check_url("www.bbc.com/news").await.unwrap_err();
    assert!(matches!(err, HearsayError::Validation(_)));

    assert!(
        server.received_requests().await.unwrap().is_empty(),
        "rejected input must never produce a request"
    );
}

#[tokio::test]
async fn known_site_reply_round_trips() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://theonion.com/story",
            "prediction": "Intentional Satire",
            "label": -1,
            "confidence": 100.0,
            "probabilities": {"fake": 0, "true": 0},
            "decision_source": "Known Site Database",
            "api_matches": [],
            "api_count": 0,
            "is_known_site": true,
            "verdict_type": "satire"
        })))
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .await
        .check_url("https://theonion.com/story")
        .await
        .unwrap();
    assert!(reply.is_known_site);
    assert_eq!(reply.verdict_type, Some(VerdictType::Satire));
    assert_eq!(reply.url.as_deref(), Some("https://theonion.com/story"));
    assert!(reply.text.is_none());
}

#[tokio::test]
async fn explain_reply_decodes_through_the_same_union() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/explain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cleaned_text": "moon landing faked",
            "top_positive_features": [],
            "top_negative_features": [
                {"feature": "faked", "tfidf": 0.61, "coef": -2.1, "contrib": -1.28}
            ]
        })))
        .mount(&server)
        .await;

    let report = client_for(&server)
        .await
        .explain("The moon landing was faked")
        .await
        .unwrap();
    assert_eq!(report.cleaned_text, "moon landing faked");
    assert_eq!(report.top_negative_features.len(), 1);

    let server2 = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/explain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "Could not locate vectorizer and classifier inside the saved pipeline."
        })))
        .mount(&server2)
        .await;

    let err = client_for(&server2)
        .await
        .explain("anything")
        .await
        .unwrap_err();
    assert!(matches!(err, HearsayError::Domain(_)));
}

#[tokio::test]
async fn health_reflects_status_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "message": "up"})),
        )
        .mount(&server)
        .await;
    assert!(client_for(&server).await.health().await);

    let server2 = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server2)
        .await;
    assert!(!client_for(&server2).await.health().await);
}
