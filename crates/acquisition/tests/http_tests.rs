//! Gateway catalog and raster download against a local HTTP stub.

use std::time::Duration;

use acquisition::{
    acquire_lst, AcquisitionConfig, AcquisitionError, HttpSceneCatalog, LstSource, RasterFetcher,
    SceneCatalog, SceneQuery, SourcePreference,
};
use lst_common::GeoPoint;
use test_utils::npy_f32;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve each request with the response chosen by `route` from its request line.
async fn spawn_stub<F>(route: F) -> String
where
    F: Fn(&str) -> (u16, &'static str, Vec<u8>) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let request = String::from_utf8_lossy(&buf);
            let line = request.lines().next().unwrap_or_default().to_string();

            let (status, content_type, body) = route(&line);
            let head = format!(
                "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                content_type,
                body.len()
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&body).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", addr)
}

fn query() -> SceneQuery {
    SceneQuery::new(GeoPoint::new(20.9515, 85.2157).unwrap())
}

#[tokio::test]
async fn test_scene_count_parses_json() {
    let base = spawn_stub(|line| {
        assert!(line.starts_with("GET /scenes?"), "unexpected request: {}", line);
        (200, "application/json", br#"{"count": 7}"#.to_vec())
    })
    .await;

    let catalog = HttpSceneCatalog::new(base, Duration::from_secs(5)).unwrap();
    let source = LstSource::Landsat.default_definition();
    assert_eq!(catalog.scene_count(&source, &query()).await.unwrap(), 7);
}

#[tokio::test]
async fn test_scene_count_http_error() {
    let base = spawn_stub(|_| (503, "text/plain", b"down".to_vec())).await;

    let catalog = HttpSceneCatalog::new(base, Duration::from_secs(5)).unwrap();
    let source = LstSource::Landsat.default_definition();
    let err = catalog.scene_count(&source, &query()).await.unwrap_err();
    assert!(matches!(err, AcquisitionError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_acquire_falls_back_and_calibrates() {
    // Landsat has no scenes; Sentinel serves a 2x2 Kelvin raster
    let npy = npy_f32(&[2, 2], &[300.0, 301.0, f32::NAN, 310.0]);
    let base = spawn_stub(move |line| {
        if line.starts_with("GET /scenes?") {
            let count = if line.contains("source=landsat") { "0" } else { "4" };
            (200, "application/json", format!(r#"{{"count": {}}}"#, count).into_bytes())
        } else if line.starts_with("GET /median.npy?") {
            (200, "application/octet-stream", npy.clone())
        } else {
            (404, "text/plain", Vec::new())
        }
    })
    .await;

    let config = AcquisitionConfig::with_gateway(base.clone());
    let catalog = HttpSceneCatalog::new(base, config.timeout()).unwrap();
    let fetcher = RasterFetcher::new(config.timeout()).unwrap();

    let acquired = acquire_lst(&catalog, &fetcher, &config, SourcePreference::Auto, &query())
        .await
        .unwrap();

    assert_eq!(acquired.source, LstSource::Sentinel);
    assert_eq!(acquired.raster.shape(), (2, 2));
    let data = acquired.raster.data();
    assert!((data[0] - 26.85).abs() < 1e-4);
    assert!((data[3] - 36.85).abs() < 1e-4);
    assert!(data[2].is_nan());
    assert!(acquired.download_url.contains("/median.npy?"));
}

#[tokio::test]
async fn test_fetch_rejects_non_npy_payload() {
    let base = spawn_stub(|_| (200, "text/html", b"<html>quota exceeded</html>".to_vec())).await;

    let fetcher = RasterFetcher::new(Duration::from_secs(5)).unwrap();
    let source = LstSource::Landsat.default_definition();
    let err = fetcher
        .fetch(&format!("{}/median.npy", base), &source)
        .await
        .unwrap_err();
    assert!(matches!(err, AcquisitionError::Decode(_)));
}
