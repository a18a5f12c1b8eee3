use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::Category;

// ── Source shapes ──

/// Response envelope of the Adzuna search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub results: Vec<RawListing>,
}

/// One listing as the source returns it. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListing {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company: Option<DisplayName>,
    pub location: Option<DisplayName>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub contract_type: Option<String>,
    pub created: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub redirect_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayName {
    pub display_name: Option<String>,
}

impl RawListing {
    pub fn company_name(&self) -> Option<&str> {
        self.company.as_ref()?.display_name.as_deref()
    }

    pub fn location_name(&self) -> Option<&str> {
        self.location.as_ref()?.display_name.as_deref()
    }
}

// ── Sink shape ──

/// One row of the snapshots table. Built once by the normalizer, never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedRecord {
    pub id: Uuid,
    pub date: String,
    pub role: String,
    pub job_title: String,
    pub region: String,
    pub platform: String,
    pub category: Category,
    pub skills: Vec<&'static str>,
    pub keyword_hits: Vec<&'static str>,
    pub keyword_score: u8,
    pub seniority_hint: bool,
    pub description: Option<String>,
    pub preview_snippet: Option<String>,
    pub company_name: Option<String>,
    pub location_detail: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub contract_type: Option<String>,
    pub redirect_url: Option<String>,
    pub captured_at: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_fixture() {
        let json = std::fs::read_to_string("tests/fixtures/adzuna_search.json").unwrap();
        let page: SearchPage = serde_json::from_str(&json).unwrap();
        assert_eq!(page.results.len(), 3);

        let first = &page.results[0];
        assert_eq!(first.title.as_deref(), Some("Senior Data Analyst"));
        assert_eq!(first.company_name(), Some("Acme Analytics Ltd"));
        assert_eq!(first.location_name(), Some("Shoreditch, London"));
        assert_eq!(first.salary_min, Some(55000.0));
    }

    #[test]
    fn bare_listing_parses() {
        let raw: RawListing = serde_json::from_str("{}").unwrap();
        assert!(raw.title.is_none());
        assert!(raw.company_name().is_none());
    }

    #[test]
    fn missing_results_is_empty_page() {
        let page: SearchPage = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert!(page.results.is_empty());
    }
}
