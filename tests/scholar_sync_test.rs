use httpmock::prelude::*;
use pubsync::{HttpScholarClient, LocalStorage, ScholarSyncPipeline, SyncConfig, SyncEngine};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;
use tokio_test::assert_ok;

const USER_ID: &str = "NfwzqKoAAAAJ";

fn mock_gateway(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path(format!("/authors/{}", USER_ID));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "name": "Mock Author",
                "publications": [
                    {"author_pub_id": "p1", "bib": {"title": "Test Paper 1", "pub_year": "2023"}, "num_citations": 5},
                    {"author_pub_id": "p2", "bib": {"title": "Test Paper 2", "pub_year": "2024"}, "num_citations": 10},
                    {"author_pub_id": "p3", "bib": {"title": "Unreachable Paper"}}
                ]
            }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/publications/p1");
        then.status(200).json_body(json!({
            "author_pub_id": "p1",
            "num_citations": 5,
            "pub_url": "https://doi.org/10.1000/p1",
            "bib": {
                "title": "Test Paper 1",
                "author": "Quan Tran and Minh Le",
                "pub_year": "2023",
                "journal": "IEEE Access",
                "volume": "11",
                "pages": "1--12"
            }
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/publications/p2");
        then.status(200).json_body(json!({
            "author_pub_id": "p2",
            "num_citations": 10,
            "bib": {"title": "Test Paper 2", "pub_year": "2024"}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/publications/p3");
        then.status(502);
    });
}

fn build_pipeline(
    server: &MockServer,
    base_dir: &str,
) -> ScholarSyncPipeline<LocalStorage, SyncConfig, HttpScholarClient> {
    let mut config = SyncConfig::default();
    config.paths.base_dir = base_dir.to_string();
    config.defaults.author = "Tran, Quan".to_string();

    let source =
        HttpScholarClient::new(&server.base_url(), Duration::from_secs(5), Duration::from_secs(5))
            .unwrap();
    let storage = LocalStorage::new(base_dir.to_string());
    ScholarSyncPipeline::new(storage, config, source, USER_ID.to_string())
}

#[tokio::test]
async fn test_scholar_sync_end_to_end_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let base_dir = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start();
    mock_gateway(&server);

    let first = assert_ok!(SyncEngine::new(build_pipeline(&server, &base_dir)).run().await);
    assert_eq!(first.added, 2);

    let bib_path = temp_dir.path().join("_bibliography/papers.bib");
    let content = std::fs::read_to_string(&bib_path).unwrap();

    assert!(content.starts_with(
        "@article{quan2023,\n  title={Test Paper 1},\n  author={Quan Tran and Minh Le},\n  year={2023},\n  journal={IEEE Access},\n  volume={11},\n  pages={1--12},\n  doi={https://doi.org/10.1000/p1},\n}\n\n"
    ));
    // 沒有作者時使用預設作者
    assert!(content.contains("@article{tran2024,\n  title={Test Paper 2},\n  author={Tran, Quan},\n  year={2024},\n}\n\n"));
    assert!(!content.contains("Unreachable Paper"));

    let second = assert_ok!(SyncEngine::new(build_pipeline(&server, &base_dir)).run().await);
    assert_eq!(second.added, 0);
    assert_eq!(std::fs::read_to_string(&bib_path).unwrap(), content);
}

#[tokio::test]
async fn test_existing_paper_in_store_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let base_dir = temp_dir.path().to_str().unwrap().to_string();
    let bib_path = temp_dir.path().join("_bibliography/papers.bib");
    std::fs::create_dir_all(bib_path.parent().unwrap()).unwrap();
    std::fs::write(&bib_path, "title={Test Paper 1},").unwrap();

    let server = MockServer::start();
    mock_gateway(&server);

    let summary = assert_ok!(SyncEngine::new(build_pipeline(&server, &base_dir)).run().await);
    assert_eq!(summary.added, 1);
    assert_eq!(summary.skipped, 1);

    let content = std::fs::read_to_string(&bib_path).unwrap();
    assert!(content.starts_with("title={Test Paper 1},\n@article{tran2024,"));
    assert_eq!(content.matches("Test Paper 1").count(), 1);
}

#[tokio::test]
async fn test_author_lookup_failure_aborts_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let base_dir = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/authors/{}", USER_ID));
        then.status(503);
    });

    let result = SyncEngine::new(build_pipeline(&server, &base_dir)).run().await;

    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(!temp_dir.path().join("_bibliography/papers.bib").exists());
}
