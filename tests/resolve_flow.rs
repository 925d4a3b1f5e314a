//! End-to-end resolution against a mock image server.

use std::sync::Arc;

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wishcache::application::{ResolveImagesUseCase, ResolveRequest};
use wishcache::domain::{ImageCachePort, LocalImageHandle, ResolveOutcome};
use wishcache::infrastructure::{
    CacheLayout, HttpImageDownloader, ImageCache, ImageDownloaderConfig, LocalFileStorage,
    MetadataLayout,
};

fn create_cache(temp: &TempDir, layout: MetadataLayout) -> Arc<ImageCache> {
    let fetcher = HttpImageDownloader::new(&ImageDownloaderConfig::default()).expect("client");
    let layout = CacheLayout::new(temp.path().join("cache")).with_metadata_layout(layout);
    Arc::new(ImageCache::new(
        Arc::new(LocalFileStorage::new()),
        Arc::new(fetcher),
        layout,
    ))
}

async fn serve(server: &MockServer, route: &str, body: &[u8], times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn first_then_repeat_load_hits_network_once() {
    let server = MockServer::start().await;
    serve(&server, "/u42/avatar.png", b"avatar-v1", 1).await;

    let temp = TempDir::new().unwrap();
    let cache = create_cache(&temp, MetadataLayout::Shared);
    let url = format!("{}/u42/avatar.png", server.uri());

    let first = cache.resolve_with_outcome(&url, None).await;
    let second = cache.resolve_with_outcome(&url, None).await;

    let expected = temp.path().join("cache/images/avatar.png.jpg");
    assert_eq!(first.outcome, ResolveOutcome::Downloaded);
    assert_eq!(second.outcome, ResolveOutcome::Hit);
    assert_eq!(first.handle, LocalImageHandle::Local(expected.clone()));
    assert_eq!(first.handle, second.handle);
    assert_eq!(std::fs::read(&expected).unwrap(), b"avatar-v1");

    let metadata: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp.path().join("cache/metadata.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(metadata["avatar.png"]["sourceUrl"], url.as_str());
    assert_eq!(metadata["avatar.png"]["usageCount"], 1);
}

#[tokio::test]
async fn owner_avatar_change_replaces_content() {
    let server = MockServer::start().await;
    serve(&server, "/u42/avatar.png", b"avatar-v1", 1).await;
    serve(&server, "/u42/avatar_v2.png", b"avatar-v2", 1).await;

    let temp = TempDir::new().unwrap();
    let cache = create_cache(&temp, MetadataLayout::PerOwner);
    let v1 = format!("{}/u42/avatar.png", server.uri());
    let v2 = format!("{}/u42/avatar_v2.png", server.uri());

    let old = cache.resolve(&v1, Some("42")).await;
    let new = cache.resolve_with_outcome(&v2, Some("42")).await;

    assert_eq!(new.outcome, ResolveOutcome::Downloaded);
    let path = new.handle.local_path().unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"avatar-v2");
    assert_eq!(old.local_path(), Some(path));
    assert_eq!(path, temp.path().join("cache/images/users/42.jpg"));
    assert!(temp
        .path()
        .join("cache/metadata/user_42_metadata.json")
        .exists());
}

#[tokio::test]
async fn server_error_falls_back_to_remote_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let cache = create_cache(&temp, MetadataLayout::Shared);
    let url = format!("{}/events/banner.png", server.uri());

    let handle = cache.resolve(&url, None).await;

    assert_eq!(handle, LocalImageHandle::Remote(url.clone()));
    assert!(cache.entries().await.is_empty());
    assert!(!temp.path().join("cache/images/banner.png.jpg").exists());
}

#[tokio::test]
async fn batch_resolves_event_images() {
    let server = MockServer::start().await;
    serve(&server, "/events/a.png", b"a", 1).await;
    serve(&server, "/events/b.png", b"b", 1).await;

    let temp = TempDir::new().unwrap();
    let use_case = ResolveImagesUseCase::new(create_cache(&temp, MetadataLayout::Shared), 2);
    let requests = vec![
        ResolveRequest::new(format!("{}/events/a.png", server.uri())),
        ResolveRequest::new(format!("{}/events/b.png", server.uri())),
        ResolveRequest::new(format!("{}/events/a.png", server.uri())),
    ];

    let resolutions = use_case.execute_batch(requests).await;

    assert_eq!(resolutions.len(), 3);
    assert!(resolutions.iter().all(|r| !r.handle.is_fallback()));
    assert_eq!(resolutions[0].handle, resolutions[2].handle);
    assert_eq!(use_case.entries().await.len(), 2);
}
