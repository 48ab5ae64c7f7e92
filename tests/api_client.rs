//! HTTP behaviour of the skylab client against a mock server.

use std::time::Duration;

use rocketseat_downloader::api::{
    ContentSource, Fetched, Lookup, RetryPolicy, SessionStore, SkylabApi,
};
use rocketseat_downloader::config::HttpConfig;
use rocketseat_downloader::content::LessonResolver;
use rocketseat_downloader::Error;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_config(server: &MockServer) -> HttpConfig {
    HttpConfig {
        api_base: server.uri(),
        web_base: server.uri(),
        ..HttpConfig::default()
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        backoff: Duration::from_millis(5),
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/sessions"))
        .and(body_json(json!({"email": "dev@example.com", "password": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "bearer",
            "token": "access-123",
            "refreshToken": "refresh-456"
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("authorization", "Bearer access-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Dev"})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_sets_authorization_and_cookies() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let mut api = SkylabApi::unauthenticated(&http_config(&server), Duration::from_secs(5)).unwrap();
    let account = api.login("dev@example.com", "s3cret").await.unwrap();

    assert_eq!(account.name, "Dev");
    let session = api.session();
    assert_eq!(session.header("Authorization"), Some("Bearer access-123"));
    assert!(session.header("user-agent").is_some());

    let cookies: Vec<_> = session
        .cookies
        .iter()
        .map(|c| (c.name.as_str(), c.value.as_str()))
        .collect();
    assert!(cookies.contains(&("skylab_next_access_token_v4", "access-123")));
    assert!(cookies.contains(&("skylab_next_refresh_token_v4", "refresh-456")));
}

#[tokio::test]
async fn test_login_cookies_reach_web_host() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/classroom/solo"))
        .and(header_regex("cookie", "skylab_next_access_token_v4=access-123"))
        .and(header_regex("cookie", "skylab_next_refresh_token_v4=refresh-456"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>classroom</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/journey/node-js/contents"))
        .and(header_regex("cookie", "skylab_next_access_token_v4=access-123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>journey</html>"))
        .expect(1)
        .mount(&server)
        .await;

    // Same server under two host names, so the cookie jar treats them as different sites.
    let config = HttpConfig {
        api_base: server.uri(),
        web_base: server.uri().replace("127.0.0.1", "localhost"),
        ..HttpConfig::default()
    };
    let mut api = SkylabApi::unauthenticated(&config, Duration::from_secs(5)).unwrap();
    api.login("dev@example.com", "s3cret").await.unwrap();

    let page = api
        .fetch(&Lookup::ClassroomPage { slug: "solo".into() })
        .await
        .unwrap();
    assert!(matches!(page, Fetched::Page(ref html) if html.contains("classroom")));

    let journey = api
        .fetch(&Lookup::JourneyPage { slug: "node-js".into() })
        .await
        .unwrap();
    assert!(matches!(journey, Fetched::Page(ref html) if html.contains("journey")));
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut api = SkylabApi::unauthenticated(&http_config(&server), Duration::from_secs(5)).unwrap();
    let err = api.login("dev@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));
}

#[tokio::test]
async fn test_saved_session_sends_same_credentials() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let temp = TempDir::new().unwrap();
    let store = SessionStore::new(temp.path().join(".session.json"));

    let mut api = SkylabApi::unauthenticated(&http_config(&server), Duration::from_secs(5)).unwrap();
    api.login("dev@example.com", "s3cret").await.unwrap();
    store.save(api.session()).unwrap();

    Mock::given(method("GET"))
        .and(path("/catalog/list"))
        .and(header("authorization", "Bearer access-123"))
        .and(header_regex("cookie", "skylab_next_access_token_v4=access-123"))
        .and(header_regex("cookie", "skylab_next_refresh_token_v4=refresh-456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let restored = store.load().unwrap().unwrap();
    let api = SkylabApi::new(&http_config(&server), Duration::from_secs(5), restored).unwrap();
    assert!(api.list_catalog().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_catalog_query_and_parse() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog/list"))
        .and(query_param("types[0]", "SPECIALIZATION"))
        .and(query_param("types[1]", "COURSE"))
        .and(query_param("types[2]", "EXTRA"))
        .and(query_param("limit", "1000"))
        .and(query_param("sort_by", "relevance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [
            {"slug": "formacao-node", "title": "Formação Node.js", "type": "SPECIALIZATION"},
            {"slug": "git", "title": "Git", "type": "COURSE"}
        ]})))
        .expect(1)
        .mount(&server)
        .await;

    let api = SkylabApi::unauthenticated(&http_config(&server), Duration::from_secs(5)).unwrap();
    let items = api.list_catalog().await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].slug, "formacao-node");
    assert_eq!(items[1].title, "Git");
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/journey-nodes/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/journey-nodes/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let api = SkylabApi::unauthenticated(&http_config(&server), Duration::from_secs(5))
        .unwrap()
        .with_retry_policy(fast_retry());

    let fetched = api.fetch(&Lookup::Node { slug: "flaky".into() }).await.unwrap();
    assert_eq!(fetched.as_json(), Some(&json!({"ok": true})));
}

#[tokio::test]
async fn test_retries_give_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/journey-nodes/down"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let api = SkylabApi::unauthenticated(&http_config(&server), Duration::from_secs(5))
        .unwrap()
        .with_retry_policy(fast_retry());

    let err = api.fetch(&Lookup::Node { slug: "down".into() }).await.unwrap_err();
    assert!(matches!(err, Error::Status { status: 502, .. }));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/journey-nodes/locked"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let api = SkylabApi::unauthenticated(&http_config(&server), Duration::from_secs(5))
        .unwrap()
        .with_retry_policy(fast_retry());

    let err = api.fetch(&Lookup::Node { slug: "locked".into() }).await.unwrap_err();
    assert!(err.is_access_or_missing());
}

#[tokio::test]
async fn test_lookup_routes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/journey-nodes/creators"))
        .and(query_param("slug", "aws-cluster-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"from": "creators"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/journey-nodes/aws"))
        .and(query_param("slug", "aws-cluster-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"from": "parent"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/classroom/aws-cluster-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>page</html>"))
        .mount(&server)
        .await;

    let api = SkylabApi::unauthenticated(&http_config(&server), Duration::from_secs(5)).unwrap();

    let creators = api
        .fetch(&Lookup::Creators { slug: "aws-cluster-1".into() })
        .await
        .unwrap();
    assert_eq!(creators.as_json(), Some(&json!({"from": "creators"})));

    let parent = api
        .fetch(&Lookup::Parent {
            parent: "aws".into(),
            slug: "aws-cluster-1".into(),
        })
        .await
        .unwrap();
    assert_eq!(parent.as_json(), Some(&json!({"from": "parent"})));

    let page = api
        .fetch(&Lookup::ClassroomPage { slug: "aws-cluster-1".into() })
        .await
        .unwrap();
    assert!(matches!(page, Fetched::Page(ref html) if html.contains("page")));
}

#[tokio::test]
async fn test_non_json_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/journey-nodes/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let api = SkylabApi::unauthenticated(&http_config(&server), Duration::from_secs(5)).unwrap();
    let err = api.fetch(&Lookup::Node { slug: "html".into() }).await.unwrap_err();
    assert!(matches!(err, Error::Api(_)));
}

#[tokio::test]
async fn test_resolver_over_http_falls_back_to_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/journey-nodes/solo"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/journey-nodes/creators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/classroom/solo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<video src="https://vz-dc851587-83d.b-cdn.net/xyz789f01e/playlist.m3u8"></video>"#,
        ))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let api = SkylabApi::unauthenticated(&http_config(&server), Duration::from_secs(5)).unwrap();
    let resolver = LessonResolver::new(&api, Some(temp.path().to_path_buf()));

    let groups = resolver.resolve("solo", None).await;

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].lessons[0].resource.as_deref(), Some("xyz789f01e"));
    assert!(temp.path().join("solo_cluster_details.json").exists());
}
