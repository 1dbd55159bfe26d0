mod common;

use std::time::Duration;

use common::mocks::{MockHttpResponse, MockHttpServer};
use common::test_helpers::{faulty_wordpress_export, wordpress_export, write_xml};
use tempfile::TempDir;
use xmlcheck::{DocumentSource, HttpClientConfig, ValidationOptions, XmlCheckError, validate};

fn http_config(timeout_seconds: u64) -> HttpClientConfig {
    HttpClientConfig {
        timeout_seconds,
        ..HttpClientConfig::default()
    }
}

#[tokio::test]
async fn test_remote_document_is_validated() {
    let server = MockHttpServer::start(MockHttpResponse::ok(faulty_wordpress_export(3))).await;

    let source = DocumentSource::parse(server.url()).unwrap();
    assert!(source.is_remote());

    let document = source.load(&http_config(5)).await.unwrap();
    assert_eq!(document.name(), server.url());

    let result = validate(document.as_bytes(), &ValidationOptions::default());
    assert_eq!(result.total_found, 5);
    assert_eq!(result.issues.len(), 5);
}

#[tokio::test]
async fn test_non_200_is_fatal_and_not_retried() {
    let server = MockHttpServer::start(MockHttpResponse::status(503, "Service Unavailable")).await;

    let source = DocumentSource::parse(server.url()).unwrap();
    let result = source.load(&http_config(5)).await;

    match result {
        Err(XmlCheckError::HttpStatus { status, url, .. }) => {
            assert_eq!(status, 503);
            assert_eq!(url, server.url());
        }
        other => panic!("Expected HttpStatus error, got {:?}", other),
    }
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockHttpServer::start(
        MockHttpResponse::ok(wordpress_export(1)).delayed(Duration::from_secs(5)),
    )
    .await;

    let source = DocumentSource::parse(server.url()).unwrap();
    let result = source.load(&http_config(1)).await;

    assert!(
        matches!(
            result,
            Err(XmlCheckError::Timeout { timeout_seconds: 1, .. }) | Err(XmlCheckError::Http(_))
        ),
        "Expected a timeout, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_local_document_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let export = wordpress_export(5);
    let path = write_xml(temp_dir.path(), "export.xml", export.as_bytes());

    let source = DocumentSource::parse(path.to_str().unwrap()).unwrap();
    assert!(!source.is_remote());

    let document = source.load(&HttpClientConfig::default()).await.unwrap();
    assert_eq!(document.as_bytes(), export.as_bytes());
    assert!(validate(document.as_bytes(), &ValidationOptions::default()).is_clean());
}

#[tokio::test]
async fn test_missing_local_document() {
    let source = DocumentSource::parse("/nonexistent/xmlcheck/missing.xml").unwrap();
    assert!(matches!(
        source.load(&HttpClientConfig::default()).await,
        Err(XmlCheckError::Io(_))
    ));
}
