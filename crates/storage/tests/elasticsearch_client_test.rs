//! Elasticsearch engine tests against a mock HTTP server

use bizsearch_core::{compile, config::EngineConfig, Error, REVIEWS_FIELD};
use bizsearch_storage::{DocumentEngine, ElasticsearchEngine, ElasticsearchEngineBuilder};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(server: &MockServer) -> ElasticsearchEngine {
    ElasticsearchEngineBuilder::from_config(EngineConfig::default())
        .url(server.uri())
        .index("business")
        .timeout_ms(500)
        .build()
        .expect("engine builds")
}

#[tokio::test]
async fn test_search_posts_function_score_body() {
    let server = MockServer::start().await;
    let request = compile("Pizza", Some("Las Vegas"));

    Mock::given(method("POST"))
        .and(path("/business/_search"))
        .and(body_json(json!({
            "size": 50,
            "query": {
                "function_score": {
                    "query": {
                        "bool": {
                            "must": {
                                "multi_match": {
                                    "query": "pizza",
                                    "fields": ["name", "city", "state", "categories", "reviews"]
                                }
                            },
                            "filter": { "term": { "city": "las" } }
                        }
                    },
                    "functions": [
                        { "field_value_factor": { "field": "stars", "factor": 100.0, "missing": 1.0 } },
                        { "field_value_factor": {
                            "field": "review_count", "factor": 1.2, "modifier": "sqrt", "missing": 1.0
                        } }
                    ]
                }
            },
            "_source": [
                "business_id", "name", "address", "city", "state",
                "latitude", "longitude", "stars", "review_count", "categories"
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 3,
            "hits": {
                "total": { "value": 2, "relation": "eq" },
                "hits": [
                    { "_id": "b1", "_score": 12.5, "_source": { "business_id": "b1", "name": "Pizza Rock" } },
                    { "_id": "b2", "_score": 7.0, "_source": { "business_id": "b2", "name": "Secret Pizza" } }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hits = engine_for(&server).search(&request).await.unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "b1");
    assert_eq!(hits[0].score, Some(12.5));
    assert_eq!(hits[0].source["name"], json!("Pizza Rock"));
    assert_eq!(hits[1].id, "b2");
}

#[tokio::test]
async fn test_search_with_no_hits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/business/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hits": { "hits": [] } })))
        .mount(&server)
        .await;

    let hits = engine_for(&server)
        .search(&compile("nothing", None))
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_get_document_requests_only_reviews() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/business/_doc/b1"))
        .and(query_param("_source_includes", "reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "business",
            "_id": "b1",
            "found": true,
            "_source": { "reviews": [{ "stars": 5, "text": "Great" }] }
        })))
        .mount(&server)
        .await;

    let source = engine_for(&server)
        .get_document("b1", &[REVIEWS_FIELD])
        .await
        .unwrap()
        .expect("document found");
    assert_eq!(source["reviews"], json!([{ "stars": 5, "text": "Great" }]));
}

#[tokio::test]
async fn test_get_document_escapes_reserved_characters_in_id() {
    let server = MockServer::start().await;
    // The whole id stays one path segment; unmatched requests answer 404
    Mock::given(method("GET"))
        .and(path("/business/_doc/a%2Fb%3Fc"))
        .and(query_param("_source_includes", "reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "business",
            "_id": "a/b?c",
            "found": true,
            "_source": { "reviews": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = engine_for(&server)
        .get_document("a/b?c", &[REVIEWS_FIELD])
        .await
        .unwrap()
        .expect("document found");
    assert_eq!(source["reviews"], json!([]));
}

#[tokio::test]
async fn test_get_document_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/business/_doc/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "_index": "business",
            "_id": "missing",
            "found": false
        })))
        .mount(&server)
        .await;

    let result = engine_for(&server)
        .get_document("missing", &[REVIEWS_FIELD])
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("cluster red"))
        .mount(&server)
        .await;

    let err = engine_for(&server)
        .search(&compile("pizza", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EngineUnavailable(_)));
}

#[tokio::test]
async fn test_bad_request_is_engine_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("parsing_exception"))
        .mount(&server)
        .await;

    let err = engine_for(&server)
        .search(&compile("pizza", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Engine(_)));
}

#[tokio::test]
async fn test_malformed_response_is_engine_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = engine_for(&server)
        .search(&compile("pizza", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Engine(_)));
}

#[tokio::test]
async fn test_slow_engine_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "hits": { "hits": [] } }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let err = engine_for(&server)
        .search(&compile("pizza", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EngineTimeout(500)));
}

#[tokio::test]
async fn test_unreachable_engine_is_unavailable() {
    let engine = ElasticsearchEngineBuilder::from_config(EngineConfig::default())
        .url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let err = engine.health_check().await.unwrap_err();
    assert!(matches!(err, Error::EngineUnavailable(_)));
}

#[tokio::test]
async fn test_credentials_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(basic_auth("elastic", "changeme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tagline": "You Know, for Search" })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = ElasticsearchEngineBuilder::from_config(EngineConfig::default())
        .url(server.uri())
        .credentials("elastic", "changeme")
        .build()
        .unwrap();

    engine.health_check().await.unwrap();
}

#[test]
fn test_builder_rejects_invalid_url() {
    let result = ElasticsearchEngineBuilder::from_config(EngineConfig::default())
        .url("not a url")
        .build();
    assert!(matches!(result, Err(Error::Config(_))));
}
