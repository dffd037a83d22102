use url::Url;

use crate::aggregator::SearchQuery;
use crate::app::Result;

pub const DEFAULT_BASE_URL: &str = "https://archive.org/";

/// URL layout of the archive service, relative to one base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    /// Base URL, always ending in `/`.
    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    pub fn latest_rss(&self) -> Result<Url> {
        Ok(self.base.join("services/collection-rss.php")?)
    }

    pub fn search(&self, query: &SearchQuery) -> Result<Url> {
        let mut url = self.base.join("advancedsearch.php")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &query.query);
            for field in &query.fields {
                pairs.append_pair("fl[]", field);
            }
            for sort in &query.sorts {
                pairs.append_pair("sort[]", sort);
            }
            pairs.append_pair("rows", &query.rows.to_string());
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("output", "json");
        }
        Ok(url)
    }

    pub fn metadata(&self, identifier: &str) -> Result<Url> {
        Ok(self
            .base
            .join(&format!("metadata/{}", urlencoding::encode(identifier)))?)
    }

    pub fn download(&self, identifier: &str, file_name: &str) -> String {
        format!(
            "{}download/{}/{}",
            self.base,
            identifier,
            urlencoding::encode(file_name)
        )
    }

    pub fn thumbnail(&self, identifier: &str) -> String {
        format!("{}services/img/{}", self.base, identifier)
    }

    pub fn details(&self, identifier: &str) -> String {
        format!("{}details/{}", self.base, identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HotPeriod;
    use chrono::NaiveDate;

    #[test]
    fn test_base_gets_trailing_slash() {
        let endpoints = Endpoints::new("http://localhost:8080/mirror").unwrap();
        assert_eq!(endpoints.base(), "http://localhost:8080/mirror/");
        assert_eq!(
            endpoints.latest_rss().unwrap().as_str(),
            "http://localhost:8080/mirror/services/collection-rss.php"
        );
    }

    #[test]
    fn test_search_url_repeats_list_params() {
        let endpoints = Endpoints::new(DEFAULT_BASE_URL).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let url = endpoints
            .search(&SearchQuery::hot(HotPeriod::Week, today, 50))
            .unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let values = |key: &str| -> Vec<String> {
            pairs
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .collect()
        };

        assert_eq!(values("q"), vec!["addeddate:[2024-06-08 TO 2024-06-15]"]);
        assert_eq!(values("fl[]").len(), 5);
        assert_eq!(values("sort[]"), vec!["-downloads", "-addeddate"]);
        assert_eq!(values("rows"), vec!["50"]);
        assert_eq!(values("page"), vec!["1"]);
        assert_eq!(values("output"), vec!["json"]);
    }

    #[test]
    fn test_download_url_encodes_file_name() {
        let endpoints = Endpoints::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            endpoints.download("my-item", "Track 01 & more.mp3"),
            "https://archive.org/download/my-item/Track%2001%20%26%20more.mp3"
        );
    }

    #[test]
    fn test_thumbnail_and_details() {
        let endpoints = Endpoints::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(endpoints.thumbnail("x"), "https://archive.org/services/img/x");
        assert_eq!(endpoints.details("x"), "https://archive.org/details/x");
    }
}
