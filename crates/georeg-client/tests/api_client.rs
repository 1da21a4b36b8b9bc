//! Mock-server integration tests for the backend client.

use std::time::Duration;

use georeg_client::{ApiClient, ApiError};
use georeg_core::route;
use georeg_core::verdict::GeoDecision;
use georeg_core::{FeatureArtifact, RegionConstraint};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn verdict_json() -> serde_json::Value {
    json!({
        "needs_geo_logic": "yes",
        "reasoning": "Utah curfew law applies to minors.",
        "laws": [{"name": "Utah Social Media Regulation Act", "region": "US-UT"}],
        "confidence": 0.8,
        "provenance": {
            "rules_hit": ["asl", "gh"],
            "rules_input": ["asl"],
            "regions_inferred": ["US-UT"],
            "region_filter_used": true
        }
    })
}

#[tokio::test]
async fn explicit_single_posts_to_classify() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .and(body_partial_json(json!({"rule_hits": ["asl", "gh"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(verdict_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let artifact =
        FeatureArtifact::new("Curfew login blocker", vec!["asl".into(), "gh".into()]);
    let plan = route::plan_single(&artifact, &RegionConstraint::none());

    let verdict = client.classify(&plan).await.unwrap();
    assert_eq!(verdict.needs_geo_logic, GeoDecision::Yes);
    assert_eq!(verdict.provenance.regions_inferred, vec!["US-UT"]);
}

#[tokio::test]
async fn auto_single_sends_assumption_text_and_regions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify_auto"))
        .and(body_partial_json(json!({
            "feature_text": "geo blocker\n\n[Assumption: operating in US-CA]",
            "regions": ["US-CA"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(verdict_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let plan = route::plan_single(
        &FeatureArtifact::text_only("geo blocker"),
        &RegionConstraint::assume("US-CA"),
    );
    client.classify(&plan).await.unwrap();
}

#[tokio::test]
async fn mixed_batch_posts_to_explicit_endpoint_and_passes_csv_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/batch_classify"))
        .and(body_partial_json(json!({"k": 5, "csv": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [
                {
                    "feature_text": "tagged row",
                    "needs_geo_logic": "yes",
                    "reasoning": "",
                    "laws": [],
                    "confidence": 0.7,
                    "rule_hits": ["gh"]
                },
                {
                    "feature_text": "untagged row",
                    "needs_geo_logic": "no",
                    "reasoning": "",
                    "laws": [],
                    "confidence": 0.6,
                    "rule_hits": []
                }
            ],
            "csv": "feature_text,needs_geo_logic\ntagged row,yes\nuntagged row,no\n"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let artifacts = vec![
        FeatureArtifact::new("tagged row", vec!["gh".into()]),
        FeatureArtifact::text_only("untagged row"),
    ];
    let plan = route::plan_batch(artifacts, &RegionConstraint::none(), route::DEFAULT_K, true);

    let outcome = client.batch_classify(&plan).await.unwrap();
    assert_eq!(outcome.rows.len(), 2);
    assert!(outcome.csv.as_deref().unwrap().starts_with("feature_text,"));
}

#[tokio::test]
async fn untagged_batch_posts_to_auto_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/batch_classify_auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let plan = route::plan_batch(
        vec![FeatureArtifact::text_only("plain row")],
        &RegionConstraint::none(),
        route::DEFAULT_K,
        false,
    );
    let outcome = client.batch_classify(&plan).await.unwrap();
    assert!(outcome.rows.is_empty());
    assert!(outcome.csv.is_none());
}

#[tokio::test]
async fn server_error_surfaces_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify_auto"))
        .respond_with(ResponseTemplate::new(500).set_body_string("retrieval backend exploded"))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let plan = route::plan_single(
        &FeatureArtifact::text_only("anything"),
        &RegionConstraint::none(),
    );
    let err = client.classify(&plan).await.unwrap_err();
    match err {
        ApiError::Server { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "retrieval backend exploded");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_backend_hits_the_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify_auto"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(verdict_json())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = ApiClient::with_timeout(server.uri(), Duration::from_millis(50)).unwrap();
    let plan = route::plan_single(
        &FeatureArtifact::text_only("anything"),
        &RegionConstraint::none(),
    );
    assert!(matches!(
        client.classify(&plan).await,
        Err(ApiError::Http(_))
    ));
}

#[tokio::test]
async fn search_returns_docs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({"query": "minor curfew", "k": 3, "mmr": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [{
                "content": "Section 13-63-102 ...",
                "metadata": {"law_name": "Utah SMRA", "region": "US-UT"}
            }]
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let docs = client.search("minor curfew", 3, false).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].metadata["law_name"], "Utah SMRA");
}

#[tokio::test]
async fn laws_listing_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/laws"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "laws": [{
                "file_path": "laws/utah_smra.txt",
                "law_name": "Utah SMRA",
                "region": "US-UT",
                "source": "https://le.utah.gov"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/laws/delete"))
        .and(body_partial_json(json!({"file_path": "laws/utah_smra.txt"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let laws = client.laws().await.unwrap();
    assert_eq!(laws.len(), 1);
    assert_eq!(laws[0].law_name, "Utah SMRA");
    client.delete_law("laws/utah_smra.txt").await.unwrap();
}

#[tokio::test]
async fn health_reflects_backend_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    assert!(client.health().await.unwrap());
}
