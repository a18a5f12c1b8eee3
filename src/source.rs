use std::time::Duration;

use tracing::debug;

use crate::planner::SearchQuery;
use crate::record::{RawListing, SearchPage};
use crate::settings::Settings;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("source returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Adzuna job-search client. One instance per run.
pub struct AdzunaClient {
    client: reqwest::Client,
    base_url: String,
    country: String,
    app_id: String,
    app_key: String,
    results_per_page: u32,
    max_pages: u32,
}

impl AdzunaClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: settings.adzuna_base_url.trim_end_matches('/').to_string(),
            country: settings.adzuna_country.clone(),
            app_id: settings.adzuna_app_id.clone(),
            app_key: settings.adzuna_api_key.clone(),
            results_per_page: settings.results_per_page.max(1),
            max_pages: settings.max_pages.max(1),
        })
    }

    /// All listings for one query. Pages are read in order until `max_pages`
    /// or a short page. Any failure discards the whole query.
    pub async fn search(&self, query: &SearchQuery, delay: Duration) -> Result<Vec<RawListing>> {
        let mut listings = Vec::new();

        for page in 1..=self.max_pages {
            if page > 1 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let results = self.search_page(query, page).await?;
            let short = results.len() < self.results_per_page as usize;
            listings.extend(results);
            if short {
                break;
            }
        }

        Ok(listings)
    }

    async fn search_page(&self, query: &SearchQuery, page: u32) -> Result<Vec<RawListing>> {
        let url = format!("{}/{}/search/{}", self.base_url, self.country, page);
        let per_page = self.results_per_page.to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("app_id", self.app_id.as_str()),
            ("app_key", self.app_key.as_str()),
            ("results_per_page", per_page.as_str()),
            ("what", query.what.as_str()),
            ("content-type", "application/json"),
        ];
        if let Some(loc) = &query.location {
            params.push(("where", loc.as_str()));
        }

        debug!(what = %query.what, location = ?query.location, page, "Querying source");
        let resp = self.client.get(&url).query(&params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: SearchPage = resp.json().await?;
        Ok(body.results)
    }
}
