//! Run-from-zip deployment tests

use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use kudu_client::utils::FixedClock;
use kudu_client::{KuduClient, KuduClientSettings, KuduError, ZipRunOptions, DEFAULT_VALIDATION_PATH};
use regex::Regex;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};
use zip::ZipArchive;

const ARTIFACT_PATH: &str = r"^/api/vfs/d:/home/data/SitePackages/\d{8}_\d{6}_[0-9a-f]{32}\.zip$";
const VERSION_PATH: &str = "/api/vfs/d:/home/data/SitePackages/siteversion.txt";

fn client_for(server: &MockServer) -> KuduClient {
    let settings = KuduClientSettings::new(server.uri(), "$site", "secret").unwrap();
    KuduClient::new(settings).unwrap()
}

fn site_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), b"0123456789").unwrap();
    dir
}

/// Remembers the body of the version pointer upload
#[derive(Clone, Default)]
struct CaptureVersion(Arc<Mutex<String>>);

impl Respond for CaptureVersion {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        *self.0.lock().unwrap() = String::from_utf8_lossy(&request.body).into_owned();
        ResponseTemplate::new(201)
    }
}

/// Answers the validation command with the captured version, as the
/// deployed site would
struct EchoVersion(Arc<Mutex<String>>);

impl Respond for EchoVersion {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let version = self.0.lock().unwrap().clone();
        ResponseTemplate::new(200).set_body_json(json!({
            "Output": format!("{version}\r\n"),
            "Error": "",
            "ExitCode": 0
        }))
    }
}

async fn mount_uploads(server: &MockServer) -> CaptureVersion {
    let capture = CaptureVersion::default();
    Mock::given(method("PUT"))
        .and(path_regex(ARTIFACT_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .and(path(VERSION_PATH))
        .respond_with(capture.clone())
        .expect(1)
        .mount(server)
        .await;
    capture
}

fn requests_to<'a>(requests: &'a [Request], route: &str) -> Vec<&'a Request> {
    requests.iter().filter(|r| r.url.path() == route).collect()
}

#[tokio::test]
async fn test_skipped_validation_uploads_package_and_version() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let site = site_dir();
    let capture = mount_uploads(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/command"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let artifact = client
        .zip_run_from_directory(site.path(), &ZipRunOptions::skip_validation())
        .await
        .unwrap();

    let pattern = Regex::new(r"^d:/home/data/SitePackages/\d{8}_\d{6}_[0-9a-f]{32}\.zip$").unwrap();
    assert!(pattern.is_match(artifact.as_str()), "{artifact}");
    assert_eq!(*capture.0.lock().unwrap(), artifact.file_name());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let package = requests
        .iter()
        .find(|r| r.url.path() != VERSION_PATH)
        .unwrap();
    let mut archive = ZipArchive::new(Cursor::new(package.body.clone())).unwrap();
    let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(names, vec![DEFAULT_VALIDATION_PATH, "index.html"]);

    let mut marker = String::new();
    archive
        .by_name(DEFAULT_VALIDATION_PATH)
        .unwrap()
        .read_to_string(&mut marker)
        .unwrap();
    assert_eq!(marker, artifact.file_name());

    server.verify().await;
}

#[tokio::test]
async fn test_validation_passes_when_site_serves_new_version() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let site = site_dir();
    let capture = mount_uploads(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/command"))
        .respond_with(EchoVersion(capture.0.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let artifact = client
        .zip_run_from_directory(site.path(), &ZipRunOptions::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let commands = requests_to(&requests, "/api/command");
    assert_eq!(commands.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&commands[0].body).unwrap();
    assert_eq!(body["dir"], "site");
    let command = body["command"].as_str().unwrap();
    assert!(command.starts_with("\"powershell\" -Command"));
    assert!(command.contains(&format!("https://%WEBSITE_HOSTNAME%/{DEFAULT_VALIDATION_PATH}")));

    assert!(artifact.as_str().ends_with(&*capture.0.lock().unwrap()));
    server.verify().await;
}

#[tokio::test]
async fn test_validation_mismatch_fails_deployment() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let site = site_dir();
    mount_uploads(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/command"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Output": "20200101_000000_old.zip\r\n",
            "Error": "",
            "ExitCode": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .zip_run_from_directory(site.path(), &ZipRunOptions::default())
        .await;

    match result {
        Err(KuduError::ValidationMismatch { expected, actual, .. }) => {
            assert!(expected.ends_with(".zip"));
            assert_ne!(expected, actual);
            assert_eq!(actual, "20200101_000000_old.zip");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_output_fails_with_exit_code() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let site = site_dir();
    mount_uploads(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/command"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Output": "",
            "Error": "Invoke-RestMethod : 404",
            "ExitCode": 1
        })))
        .mount(&server)
        .await;

    let result = client
        .zip_run_from_directory(site.path(), &ZipRunOptions::default())
        .await;

    assert!(matches!(
        result,
        Err(KuduError::ValidationMismatch { ref actual, exit_code: 1, .. }) if actual.is_empty()
    ));
}

#[tokio::test]
async fn test_custom_validation_path_and_value() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let site = site_dir();
    mount_uploads(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/command"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Output": "healthy\n",
            "Error": null,
            "ExitCode": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = ZipRunOptions {
        skip_validation: false,
        validation_relative_path: "health/version.txt".to_string(),
        expected_value: Some("healthy".to_string()),
    };
    client
        .zip_run_from_directory(site.path(), &options)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let package = requests
        .iter()
        .find(|r| Regex::new(ARTIFACT_PATH).unwrap().is_match(r.url.path()))
        .unwrap();
    let archive = ZipArchive::new(Cursor::new(package.body.clone())).unwrap();
    assert!(archive.file_names().any(|n| n == "health/version.txt"));

    let command: serde_json::Value =
        serde_json::from_slice(&requests_to(&requests, "/api/command")[0].body).unwrap();
    assert!(command["command"]
        .as_str()
        .unwrap()
        .contains("https://%WEBSITE_HOSTNAME%/health/version.txt;"));
}

#[tokio::test]
async fn test_fixed_clock_stamps_artifact() {
    let server = MockServer::start().await;
    let instant = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 58).unwrap();
    let client = client_for(&server).with_clock(Arc::new(FixedClock(instant)));
    let site = site_dir();
    mount_uploads(&server).await;

    let artifact = client
        .zip_run_from_directory(site.path(), &ZipRunOptions::skip_validation())
        .await
        .unwrap();
    assert!(artifact.file_name().starts_with("20240229_235958_"));
}

#[tokio::test]
async fn test_missing_directory_makes_no_requests() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let dir = tempfile::tempdir().unwrap();

    let result = client
        .zip_run_from_directory(dir.path().join("site"), &ZipRunOptions::default())
        .await;

    assert!(matches!(result, Err(KuduError::DirectoryNotFound(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_upload_stops_before_version_pointer() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let site = site_dir();

    Mock::given(method("PUT"))
        .and(path_regex(ARTIFACT_PATH))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(VERSION_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let result = client
        .zip_run_from_directory(site.path(), &ZipRunOptions::skip_validation())
        .await;

    assert!(matches!(
        result,
        Err(KuduError::RemoteRequestFailed { status, url: None, .. }) if status.as_u16() == 409
    ));
    server.verify().await;
}

#[tokio::test]
async fn test_marker_already_in_tree_makes_no_requests() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let site = site_dir();
    std::fs::write(site.path().join(DEFAULT_VALIDATION_PATH), b"stale").unwrap();

    let result = client
        .zip_run_from_directory(site.path(), &ZipRunOptions::default())
        .await;

    assert!(matches!(result, Err(KuduError::UnsupportedOperation(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_expected_value_is_rejected() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let site = site_dir();
    let options = ZipRunOptions {
        expected_value: Some("  ".to_string()),
        ..Default::default()
    };

    let result = client.zip_run_from_directory(site.path(), &options).await;

    assert!(matches!(result, Err(KuduError::InvalidArgument(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}
