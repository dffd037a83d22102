use archivist::aggregator::SearchQuery;
use archivist::app::ArchiveError;
use archivist::config::ArchiveSettings;
use archivist::fetcher::http_fetcher::HttpArchiveClient;
use archivist::fetcher::ArchiveClient;
use archivist::normalizer::FeedParser;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Internet Archive</title>
    <item>
      <title>Apollo 11 Launch</title>
      <link>https://archive.org/details/apollo-11-launch</link>
      <category>movies/nasa</category>
      <dc:creator>NASA</dc:creator>
    </item>
  </channel>
</rss>"#;

fn client_for(server: &MockServer) -> HttpArchiveClient {
    let settings = ArchiveSettings {
        base_url: server.uri(),
        timeout_secs: Some(5),
        ..ArchiveSettings::default()
    };
    HttpArchiveClient::new(&settings).unwrap()
}

#[tokio::test]
async fn test_latest_rss_asks_for_xml() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/collection-rss.php"))
        .and(header("accept", "application/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RSS))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.base_url().ends_with('/'));

    let xml = client.latest_rss().await.unwrap();
    let items = FeedParser::new().parse(&xml).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].identifier, "apollo-11-launch");
}

#[tokio::test]
async fn test_search_sends_query_parameters() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "response": {
            "numFound": 120,
            "start": 50,
            "docs": [
                {"identifier": "moon-1", "title": "Moon One", "mediatype": "movies"},
                {"identifier": "moon-2", "title": ["Moon", "Two"], "mediatype": "audio"}
            ]
        }
    });
    Mock::given(method("GET"))
        .and(path("/advancedsearch.php"))
        .and(query_param("q", "(moon) AND (mediatype:movies)"))
        .and(query_param("rows", "50"))
        .and(query_param("page", "2"))
        .and(query_param("output", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = SearchQuery::text("moon", &["movies".to_string()], 2, 50);
    let response = client.search(&query).await.unwrap();

    assert_eq!(response.response.num_found, 120);
    assert!(!response.is_last_page());

    let items = response.to_archive_items(client.base_url());
    assert_eq!(items[1].title, "Moon, Two");
    assert_eq!(items[0].link, format!("{}/details/moon-1", server.uri()));
}

#[tokio::test]
async fn test_metadata_tolerates_loose_types() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "files": [
            {"name": "track01.mp3", "size": "2048", "format": "VBR MP3"},
            {"name": "cover.jpg", "size": 512},
            {"name": "item_meta.xml"}
        ],
        "metadata": {
            "identifier": "some-album",
            "title": "Some Album",
            "creator": ["A", "B"],
            "mediatype": "audio"
        },
        "server": "ia800000.us.archive.org",
        "dir": "/1/items/some-album"
    });
    Mock::given(method("GET"))
        .and(path("/metadata/some-album"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.metadata("some-album").await.unwrap();

    assert_eq!(response.files.len(), 3);
    assert_eq!(response.files[0].size, 2048);
    assert_eq!(response.files[1].size, 512);
    assert_eq!(response.files[2].size, 0);
    assert_eq!(response.metadata.creator, "A, B");
    assert_eq!(response.dir, "/1/items/some-album");
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/collection-rss.php"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.latest_rss().await;
    assert!(matches!(result, Err(ArchiveError::Http(_))));
}
