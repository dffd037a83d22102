use std::sync::Arc;

use archivist::fetcher::download::{DownloadRequest, HttpDownloader, DOWNLOAD_USER_AGENT};
use archivist::fetcher::parallel::ParallelDownloader;
use archivist::fetcher::Endpoints;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_download_streams_to_directory_with_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/some-item/track%2001.mp3"))
        .and(header("user-agent", DOWNLOAD_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 4096]))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let endpoints = Endpoints::new(&server.uri()).unwrap();
    let downloader =
        HttpDownloader::new(temp_dir.path().to_path_buf(), DOWNLOAD_USER_AGENT.into()).unwrap();

    let outcome = downloader
        .download(&DownloadRequest {
            url: endpoints.download("some-item", "track 01.mp3"),
            file_name: "track 01.mp3".into(),
        })
        .await
        .unwrap();

    assert_eq!(outcome.bytes, 4096);
    assert_eq!(outcome.path, temp_dir.path().join("track 01.mp3"));
    assert_eq!(std::fs::read(&outcome.path).unwrap().len(), 4096);
    assert!(!temp_dir.path().join("track 01.mp3.part").exists());
}

#[tokio::test]
async fn test_parallel_downloads_report_each_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/item/a.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("alpha"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/item/b.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/item/c.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("gamma"))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let endpoints = Endpoints::new(&server.uri()).unwrap();
    let downloader = Arc::new(
        HttpDownloader::new(temp_dir.path().to_path_buf(), DOWNLOAD_USER_AGENT.into()).unwrap(),
    );
    let parallel = ParallelDownloader::with_workers(downloader, 2);

    let requests = ["a.txt", "b.txt", "c.txt"]
        .iter()
        .map(|name| DownloadRequest {
            url: endpoints.download("item", name),
            file_name: name.to_string(),
        })
        .collect();
    let results = parallel.download_all(requests).await;

    let names: Vec<&str> = results.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    assert!(results[0].1.is_ok());
    assert!(results[1].1.is_err());
    assert!(results[2].1.is_ok());

    assert!(!temp_dir.path().join("b.txt").exists());
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("c.txt")).unwrap(),
        "gamma"
    );
}

#[test]
fn test_invalid_url_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let downloader =
        HttpDownloader::new(temp_dir.path().to_path_buf(), DOWNLOAD_USER_AGENT.into()).unwrap();

    let result = tokio_test::block_on(downloader.download(&DownloadRequest {
        url: "not-a-valid-url".into(),
        file_name: "x.bin".into(),
    }));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_same_base_name_in_different_folders_kept_apart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/album/disc1%2Ftrack.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("first disc"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/album/disc2%2Ftrack.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("two"))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let endpoints = Endpoints::new(&server.uri()).unwrap();
    let downloader = Arc::new(
        HttpDownloader::new(temp_dir.path().to_path_buf(), DOWNLOAD_USER_AGENT.into()).unwrap(),
    );
    let parallel = ParallelDownloader::with_workers(downloader, 2);

    let requests = ["disc1/track.mp3", "disc2/track.mp3"]
        .iter()
        .map(|name| DownloadRequest {
            url: endpoints.download("album", name),
            file_name: name.to_string(),
        })
        .collect();
    let results = parallel.download_all(requests).await;

    let first = results[0].1.as_ref().unwrap();
    let second = results[1].1.as_ref().unwrap();
    assert_ne!(first.path, second.path);
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("disc1").join("track.mp3")).unwrap(),
        "first disc"
    );
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("disc2").join("track.mp3")).unwrap(),
        "two"
    );
}

#[tokio::test]
async fn test_escaping_file_name_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let downloader =
        HttpDownloader::new(temp_dir.path().join("out"), DOWNLOAD_USER_AGENT.into()).unwrap();

    let result = downloader
        .download(&DownloadRequest {
            url: "http://127.0.0.1:9/never".into(),
            file_name: "../outside.txt".into(),
        })
        .await;

    assert!(result.is_err());
    assert!(!temp_dir.path().join("outside.txt").exists());
}

#[tokio::test]
async fn test_failed_rename_leaves_no_partial_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/item/blocked.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 64]))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    // A non-empty directory where the file should go makes the final rename fail.
    let blocker = temp_dir.path().join("blocked.bin");
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("keep"), "x").unwrap();

    let endpoints = Endpoints::new(&server.uri()).unwrap();
    let downloader =
        HttpDownloader::new(temp_dir.path().to_path_buf(), DOWNLOAD_USER_AGENT.into()).unwrap();

    let result = downloader
        .download(&DownloadRequest {
            url: endpoints.download("item", "blocked.bin"),
            file_name: "blocked.bin".into(),
        })
        .await;

    assert!(result.is_err());
    assert!(!temp_dir.path().join("blocked.bin.part").exists());
    assert!(blocker.join("keep").exists());
}
