//! Integration tests for the project configuration provider using wiremock

use chrono::Utc;
use esgissue::errors::IssueError;
use esgissue::projects::{ConfigCache, ConfigProvider, DEFAULT_CONFIG_TTL};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CMIP6_INI: &str = "\
[project:cmip6]
dataset_id = %(mip_era)s.%(activity_id)s.%(source_id)s.%(version)s
member_id_pattern = r\\d+i\\d+p\\d+f\\d+
";

async fn mock_config_repo(mock_server: &MockServer, expected_fetches: u64) {
    Mock::given(method("GET"))
        .and(path("/contents/esg.cmip6.ini"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "esg.cmip6.ini",
            "download_url": format!("{}/raw/esg.cmip6.ini", mock_server.uri()),
        })))
        .expect(expected_fetches)
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/raw/esg.cmip6.ini"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CMIP6_INI))
        .expect(expected_fetches)
        .mount(mock_server)
        .await;
}

fn provider_for(mock_server: &MockServer, cache_dir: &std::path::Path) -> ConfigProvider {
    let cache = ConfigCache::new(cache_dir, DEFAULT_CONFIG_TTL, Utc::now());
    let template = format!("{}/contents/esg.{{project}}.ini", mock_server.uri());
    ConfigProvider::new(template, cache).unwrap()
}

#[tokio::test]
async fn fetches_and_parses_the_remote_configuration() {
    let mock_server = MockServer::start().await;
    mock_config_repo(&mock_server, 1).await;
    let temp_dir = tempfile::tempdir().unwrap();

    let provider = provider_for(&mock_server, temp_dir.path());
    let pattern = provider.get_pattern("cmip6").await.unwrap();
    assert_eq!(
        pattern.template(),
        "%(mip_era)s.%(activity_id)s.%(source_id)s.%(version)s"
    );
    assert_eq!(
        pattern.translate(),
        r"(?P<mip_era>[\w-]+).(?P<activity_id>[\w-]+).(?P<source_id>[\w-]+).(?P<version>v[\d]+|latest)"
    );
}

#[tokio::test]
async fn second_lookup_is_served_from_the_local_cache() {
    let mock_server = MockServer::start().await;
    mock_config_repo(&mock_server, 1).await;
    let temp_dir = tempfile::tempdir().unwrap();

    let provider = provider_for(&mock_server, temp_dir.path());
    let first = provider.get_pattern("cmip6").await.unwrap();

    // A fresh provider over the same cache directory must not refetch.
    let provider = provider_for(&mock_server, temp_dir.path());
    let second = provider.get_pattern("cmip6").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn project_names_are_lowercased_before_lookup() {
    let mock_server = MockServer::start().await;
    mock_config_repo(&mock_server, 1).await;
    let temp_dir = tempfile::tempdir().unwrap();

    let provider = provider_for(&mock_server, temp_dir.path());
    let pattern = provider.get_pattern("CMIP6").await.unwrap();
    assert_eq!(
        pattern.template(),
        "%(mip_era)s.%(activity_id)s.%(source_id)s.%(version)s"
    );
}

#[tokio::test]
async fn missing_remote_file_is_config_unavailable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contents/esg.cordex.ini"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    let temp_dir = tempfile::tempdir().unwrap();

    let provider = provider_for(&mock_server, temp_dir.path());
    let err = provider.get_pattern("cordex").await.unwrap_err();
    assert_eq!(err.exit_code(), 14);
    match err {
        IssueError::ConfigUnavailable { project, detail } => {
            assert_eq!(project, "cordex");
            assert!(detail.contains("404"));
        }
        other => panic!("expected ConfigUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn remote_file_without_the_project_section_is_not_supported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contents/esg.obs4mips.ini"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "download_url": format!("{}/raw/esg.obs4mips.ini", mock_server.uri()),
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/esg.obs4mips.ini"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[project:other]\ndataset_id = %(x)s\n"))
        .mount(&mock_server)
        .await;
    let temp_dir = tempfile::tempdir().unwrap();

    let provider = provider_for(&mock_server, temp_dir.path());
    let err = provider.get_pattern("obs4mips").await.unwrap_err();
    assert!(matches!(err, IssueError::ProjectNotSupported { .. }));
}
