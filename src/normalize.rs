use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::classify;
use crate::planner::SearchQuery;
use crate::record::{NormalizedRecord, RawListing};
use crate::settings::Settings;

const REMOTE_DETAIL: &str = "Remote";
const SNIPPET_CHARS: usize = 200;

/// Turn one source listing into a snapshot row. Never fails: absent source
/// fields come out as `None`.
pub fn normalize(raw: &RawListing, query: &SearchQuery, settings: &Settings) -> NormalizedRecord {
    normalize_at(raw, query, settings, Utc::now())
}

pub fn normalize_at(
    raw: &RawListing,
    query: &SearchQuery,
    settings: &Settings,
    captured_at: DateTime<Utc>,
) -> NormalizedRecord {
    let title = raw.title.clone().unwrap_or_default();
    let description = raw.description.clone();

    let category = classify::classify(&title);
    let skills = classify::extract_skills(&title, description.as_deref());

    // Remote listings are filed under one region with a uniform detail,
    // whatever office address the source attached.
    let (region, location_detail) = if query.is_remote() {
        (settings.remote_region.clone(), Some(REMOTE_DETAIL.to_string()))
    } else {
        (query.origin.clone(), raw.location_name().map(str::to_string))
    };

    NormalizedRecord {
        id: Uuid::new_v4(),
        date: listing_date(raw.created.as_deref(), captured_at),
        role: title.clone(),
        job_title: title.clone(),
        region,
        platform: settings.platform.clone(),
        category,
        keyword_score: classify::keyword_score(skills.len()),
        seniority_hint: classify::seniority_hint(&title),
        keyword_hits: skills.clone(),
        skills,
        preview_snippet: description.as_deref().map(snippet),
        description,
        company_name: raw.company_name().map(str::to_string),
        location_detail,
        salary_min: raw.salary_min,
        salary_max: raw.salary_max,
        contract_type: raw.contract_type.clone(),
        redirect_url: raw.redirect_url.clone(),
        captured_at,
        latitude: raw.latitude,
        longitude: raw.longitude,
    }
}

/// `YYYY-MM-DD` prefix of the source timestamp, or the capture date when the
/// source gave nothing usable.
fn listing_date(created: Option<&str>, captured_at: DateTime<Utc>) -> String {
    match created {
        Some(c) if c.chars().count() >= 10 => c.chars().take(10).collect(),
        _ => captured_at.format("%Y-%m-%d").to_string(),
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use crate::planner::plan;
    use crate::record::{DisplayName, SearchPage};
    use chrono::TimeZone;

    fn fixture() -> Vec<RawListing> {
        let json = std::fs::read_to_string("tests/fixtures/adzuna_search.json").unwrap();
        serde_json::from_str::<SearchPage>(&json).unwrap().results
    }

    fn query(term: &str, location: &str) -> SearchQuery {
        plan(&[term], &[location]).remove(0)
    }

    fn captured() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 12, 6, 30, 0).unwrap()
    }

    #[test]
    fn data_analyst_in_london() {
        let raw = &fixture()[0];
        let r = normalize_at(raw, &query("Data Analyst", "London"), &Settings::default(), captured());

        assert_eq!(r.category, Category::ProductAnalyst);
        assert_eq!(r.skills, vec!["SQL", "Tableau"]);
        assert_eq!(r.keyword_hits, r.skills);
        assert_eq!(r.region, "London");
        assert_eq!(r.location_detail.as_deref(), Some("Shoreditch, London"));
        assert_eq!(r.date, "2026-02-11");
        assert_eq!(r.role, "Senior Data Analyst");
        assert_eq!(r.job_title, r.role);
        assert_eq!(r.company_name.as_deref(), Some("Acme Analytics Ltd"));
        assert_eq!(r.salary_max, Some(65000.0));
        assert_eq!(r.platform, "Adzuna");
        assert!(r.seniority_hint);
    }

    #[test]
    fn remote_overrides_region_and_detail() {
        let s = Settings::default();
        for raw in fixture() {
            let r = normalize_at(&raw, &query("Analyst", "Remote"), &s, captured());
            assert_eq!(r.location_detail.as_deref(), Some("Remote"));
            assert_eq!(r.region, "United Kingdom");
        }
    }

    #[test]
    fn empty_listing_is_total() {
        let r = normalize_at(
            &RawListing::default(),
            &query("Analyst", "Manchester"),
            &Settings::default(),
            captured(),
        );
        assert!(r.salary_min.is_none());
        assert!(r.salary_max.is_none());
        assert!(r.description.is_none());
        assert!(r.preview_snippet.is_none());
        assert!(r.location_detail.is_none());
        assert_eq!(r.category, Category::Others);
        assert!(r.skills.is_empty());
        assert_eq!(r.date, "2026-02-12");

        let json = serde_json::to_value(&r).unwrap();
        assert!(json["salary_min"].is_null());
        assert!(json["description"].is_null());
        assert_eq!(json["category"], "Others");
    }

    #[test]
    fn short_created_falls_back_to_capture_date() {
        let raw = RawListing {
            created: Some("2026-02".into()),
            ..Default::default()
        };
        let r = normalize_at(&raw, &query("Analyst", "London"), &Settings::default(), captured());
        assert_eq!(r.date, "2026-02-12");
    }

    #[test]
    fn ids_are_unique() {
        let s = Settings::default();
        let q = query("Analyst", "London");
        let a = normalize(&fixture()[0], &q, &s);
        let b = normalize(&fixture()[1], &q, &s);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn snippet_is_bounded() {
        let raw = RawListing {
            title: Some("Analyst".into()),
            description: Some("é".repeat(500)),
            location: Some(DisplayName { display_name: None }),
            ..Default::default()
        };
        let r = normalize_at(&raw, &query("Analyst", "London"), &Settings::default(), captured());
        assert_eq!(r.preview_snippet.unwrap().chars().count(), 200);
        assert_eq!(r.description.unwrap().chars().count(), 500);
    }
}
