//! Unit tests for repository transports

use super::*;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_repository(server: &MockServer) -> HttpRepository {
    let url = Url::parse(&server.uri()).unwrap();
    HttpRepository::new(&url).unwrap()
}

#[tokio::test]
async fn test_fetch_success_returns_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/com/example/lib/1.0/lib-1.0.pom"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"<project/>".to_vec()))
        .mount(&server)
        .await;

    let repository = server_repository(&server).await;
    let bytes = repository
        .fetch(Utf8Path::new("com/example/lib/1.0/lib-1.0.pom"))
        .await
        .unwrap();
    assert_eq!(bytes, Some(b"<project/>".to_vec()));
}

#[tokio::test]
async fn test_fetch_not_found_is_absent_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/com/example/lib/1.0/lib-1.0.pom"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let repository = server_repository(&server).await;
    let result = repository
        .fetch(Utf8Path::new("com/example/lib/1.0/lib-1.0.pom"))
        .await;
    assert!(matches!(result, Ok(None)));
}

#[tokio::test]
async fn test_fetch_server_error_is_resource_access() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let repository = server_repository(&server).await;
    let err = repository
        .fetch(Utf8Path::new("com/example/lib/1.0/lib-1.0.pom"))
        .await
        .unwrap_err();
    assert!(matches!(err, TrussError::ResourceAccess { .. }));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer sesame"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .mount(&server)
        .await;

    let url = Url::parse(&server.uri()).unwrap();
    let auth = AuthConfig {
        token: Some("sesame".to_string()),
        username: None,
        password: None,
    };
    let repository = HttpRepository::with_auth(&url, auth).unwrap();
    let bytes = repository.fetch(Utf8Path::new("anything")).await.unwrap();
    assert_eq!(bytes, Some(b"ok".to_vec()));
}

#[tokio::test]
async fn test_dir_repository_reads_files() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    std::fs::create_dir_all(root.join("com/example")).unwrap();
    std::fs::write(root.join("com/example/file.pom"), b"<project/>").unwrap();

    let repository = DirRepository::new(root);
    let bytes = repository
        .fetch(Utf8Path::new("com/example/file.pom"))
        .await
        .unwrap();
    assert_eq!(bytes, Some(b"<project/>".to_vec()));
}

#[tokio::test]
async fn test_dir_repository_missing_file_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

    let repository = DirRepository::new(root);
    let result = repository.fetch(Utf8Path::new("missing.pom")).await;
    assert!(matches!(result, Ok(None)));
}
