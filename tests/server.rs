//! HTTP tests against a live server on an ephemeral port.

mod common;

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use chnroutes::server::serve;
use common::{zip_entries, Fixture};

struct TestServer {
    base: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<anyhow::Result<()>>,
    // Keeps the temp directory alive for the server's lifetime
    _fixture: Fixture,
}

impl TestServer {
    async fn start(fixture: Fixture) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let service = Arc::new(fixture.service());
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(listener, service, async move {
            let _ = rx.await;
        }));

        Self {
            base: format!("http://{}", addr),
            shutdown: Some(tx),
            handle,
            _fixture: fixture,
        }
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(format!("{}{}", self.base, path)).await.unwrap()
    }

    async fn json(&self, path: &str) -> serde_json::Value {
        let response = self.get(path).await;
        assert_eq!(response.status(), 200);
        serde_json::from_str(&response.text().await.unwrap()).unwrap()
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_index_lists_all_platforms_with_auto_gateway() {
    let server = TestServer::start(Fixture::new()).await;
    let listing = server.json("/").await;

    assert_eq!(listing["platform"], "all");
    assert_eq!(listing["gateway"], "");
    let items = listing["items"].as_array().unwrap();
    assert_eq!(items.len(), 20);
    assert_eq!(items[0]["url"], "/f/auto/linux/routes-up.sh");
    assert_eq!(items[0]["platform"], "Linux");
    server.stop().await;
}

#[tokio::test]
async fn test_listing_for_gateway_and_platform() {
    let server = TestServer::start(Fixture::new()).await;

    let listing = server.json("/l/10.0.0.1/routeros").await;
    assert_eq!(listing["platform"], "routeros");
    assert_eq!(listing["gateway"], "10.0.0.1");
    let urls: Vec<&str> = listing["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["url"].as_str().unwrap())
        .collect();
    assert_eq!(
        urls,
        vec![
            "/f/10.0.0.1/routeros/routeros-address-list.rsc",
            "/f/10.0.0.1/routeros/routeros.rsc",
            "/f/10.0.0.1/routeros/package.zip",
        ]
    );

    // Unknown platforms list everything
    let listing = server.json("/l/10.0.0.1/plan9").await;
    assert_eq!(listing["platform"], "all");
    assert_eq!(listing["items"].as_array().unwrap().len(), 20);

    let listing = server.json("/l/192.168.1.1").await;
    assert!(listing["items"][0]["url"]
        .as_str()
        .unwrap()
        .starts_with("/f/192.168.1.1/"));
    server.stop().await;
}

#[tokio::test]
async fn test_download_single_file() {
    let server = TestServer::start(Fixture::new()).await;
    let response = server.get("/f/10.0.0.1/linux/routes-up.sh").await;

    assert_eq!(response.status(), 200);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
    let body = response.text().await.unwrap();
    assert!(body.contains("route add 1.0.1.0/24 via 10.0.0.1\n"));
    server.stop().await;
}

#[tokio::test]
async fn test_download_bundle() {
    let server = TestServer::start(Fixture::new()).await;
    let response = server.get("/f/auto/routeros/package.zip").await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/zip");
    let bytes = response.bytes().await.unwrap();
    let entries = zip_entries(&bytes);
    assert_eq!(entries.len(), 2);
    let routes = String::from_utf8(entries[1].1.clone()).unwrap();
    assert!(routes.contains("gateway=$gateway"));
    server.stop().await;
}

#[tokio::test]
async fn test_not_found_cases() {
    let server = TestServer::start(Fixture::new()).await;
    for path in [
        "/f/auto/beos/routes-up.sh",
        "/f/auto/linux/routes-up.bat",
        "/f/auto/linux/..%2F..%2Fapnic.txt",
        "/f/auto/windows/cmroute.dll",
        "/f/auto/windows/package.zip",
    ] {
        assert_eq!(server.get(path).await.status(), 404, "{}", path);
    }
    server.stop().await;
}

#[tokio::test]
async fn test_template_error_is_500_and_server_survives() {
    let fixture = Fixture::new();
    fixture.write_asset("mac/routes-up.sh", b"{{range}}{{bogus}}{{end}}");
    let server = TestServer::start(fixture).await;

    assert_eq!(server.get("/f/auto/mac/routes-up.sh").await.status(), 500);
    assert_eq!(server.get("/f/auto/mac/package.zip").await.status(), 500);
    assert_eq!(server.get("/f/auto/mac/routes-down.sh").await.status(), 200);
    server.stop().await;
}

#[tokio::test]
async fn test_healthz_reports_snapshot() {
    let server = TestServer::start(Fixture::new()).await;
    let health = server.json("/healthz").await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["country"], "CN");
    assert_eq!(health["ranges"], 2);
    assert_eq!(health["skipped_unaligned"], 1);
    assert!(health["loaded_at"].as_str().unwrap().contains('T'));
    server.stop().await;
}

#[tokio::test]
async fn test_concurrent_downloads() {
    let server = TestServer::start(Fixture::new()).await;
    let url = format!("{}/f/10.0.0.1/chinadns/chnroute.txt", server.base);

    let requests: Vec<_> = (0..16)
        .map(|_| {
            let url = url.clone();
            tokio::spawn(async move { reqwest::get(url).await.unwrap().text().await.unwrap() })
        })
        .collect();
    for request in requests {
        assert_eq!(request.await.unwrap(), "1.0.1.0/24\n1.0.2.0/23\n");
    }
    server.stop().await;
}
