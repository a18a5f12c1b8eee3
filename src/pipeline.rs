use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::normalize::normalize;
use crate::planner::SearchQuery;
use crate::record::NormalizedRecord;
use crate::settings::Settings;
use crate::source::AdzunaClient;

/// Collection stats returned after all queries ran.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectStats {
    pub queries: usize,
    pub ok: usize,
    pub failed: usize,
    pub listings: usize,
}

/// One run's snapshot: every normalized record plus how the queries went.
pub struct Collection {
    pub records: Vec<NormalizedRecord>,
    pub stats: CollectStats,
}

/// Run the planned queries one at a time and normalize what comes back.
///
/// A fixed delay precedes every query. A failed query is logged and
/// contributes nothing; it never stops the run.
pub async fn collect(
    client: &AdzunaClient,
    queries: &[SearchQuery],
    settings: &Settings,
) -> Result<Collection> {
    let delay = settings.request_delay();

    let pb = ProgressBar::new(queries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut records = Vec::new();
    let mut stats = CollectStats {
        queries: queries.len(),
        ..CollectStats::default()
    };

    for query in queries {
        pb.set_message(format!("{} in {}", query.term, query.origin));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match client.search(query, delay).await {
            Ok(listings) => {
                stats.ok += 1;
                stats.listings += listings.len();
                info!(
                    term = %query.term,
                    location = %query.origin,
                    count = listings.len(),
                    "Collected listings"
                );
                records.extend(listings.iter().map(|raw| normalize(raw, query, settings)));
            }
            Err(e) => {
                stats.failed += 1;
                warn!(
                    term = %query.term,
                    location = %query.origin,
                    error = %e,
                    "Query failed, skipping"
                );
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Ran {} queries ({} ok, {} failed), {} listings",
        stats.queries, stats.ok, stats.failed, stats.listings
    );

    Ok(Collection { records, stats })
}
