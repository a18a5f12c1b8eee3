mod classify;
mod normalize;
mod pipeline;
mod planner;
mod record;
mod settings;
mod sink;
mod source;
#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;

use record::NormalizedRecord;
use settings::Settings;

const SPILL_DIR: &str = "data";

#[derive(Parser)]
#[command(name = "job_collector", about = "Adzuna job listing collector for the Supabase snapshots table")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every planned query, classify, then upload one batch
    Run {
        /// Collect and classify but skip the upload
        #[arg(long)]
        dry_run: bool,
        /// Also write the batch to this JSON file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List the planned queries without calling the source
    Plan,
    /// Classify a single title (and optional description)
    Classify {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { dry_run, out } => {
            let settings = Settings::load()?;
            run(&settings, dry_run, out.as_deref()).await
        }
        Commands::Plan => {
            let settings = Settings::load()?;
            let queries = planner::plan(&settings.search_terms, &settings.locations);

            println!("{:>3} | {:<32} | {:<12} | {:<40}", "#", "Term", "Location", "what / where");
            println!("{}", "-".repeat(95));
            for (i, q) in queries.iter().enumerate() {
                let sent = match &q.location {
                    Some(loc) => format!("{} / {}", q.what, loc),
                    None => format!("{} / -", q.what),
                };
                println!(
                    "{:>3} | {:<32} | {:<12} | {:<40}",
                    i + 1,
                    truncate(&q.term, 32),
                    truncate(&q.origin, 12),
                    truncate(&sent, 40)
                );
            }
            println!("\n{} queries", queries.len());
            Ok(())
        }
        Commands::Classify { title, description } => {
            let category = classify::classify(&title);
            let skills = classify::extract_skills(&title, description.as_deref());
            println!("Category:  {}", category);
            println!("Skills:    {}", skills.join(", "));
            println!("Score:     {}", classify::keyword_score(skills.len()));
            println!("Seniority: {}", classify::seniority_hint(&title));
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run(settings: &Settings, dry_run: bool, out: Option<&Path>) -> anyhow::Result<()> {
    let queries = planner::plan(&settings.search_terms, &settings.locations);
    if queries.is_empty() {
        println!("No queries planned. Check search_terms and locations.");
        return Ok(());
    }

    let client = source::AdzunaClient::new(settings).context("Failed to build source client")?;

    // Phase 1: collect
    let t_collect = Instant::now();
    println!("Collecting {} queries...", queries.len());
    let collection = pipeline::collect(&client, &queries, settings).await?;
    let stats = &collection.stats;
    println!(
        "Collected {} listings from {} queries ({} ok, {} failed) in {:.1}s",
        stats.listings,
        stats.queries,
        stats.ok,
        stats.failed,
        t_collect.elapsed().as_secs_f64()
    );

    let batch = collection.records;
    if let Some(path) = out {
        write_batch(path, &batch)?;
        println!("Wrote {} records to {}", batch.len(), path.display());
    }

    if batch.is_empty() {
        println!("No listings collected, nothing to upload.");
        return Ok(());
    }
    if dry_run {
        println!("Dry run: skipping upload of {} records.", batch.len());
        return Ok(());
    }

    // Phase 2: upload
    let sink = sink::SupabaseSink::new(settings);
    println!("Uploading {} records to {}...", batch.len(), sink.endpoint());
    match sink.upload(batch).await {
        Ok(n) => {
            println!("Uploaded {} records.", n);
            Ok(())
        }
        Err(e) => {
            if let Some(status) = e.status() {
                error!(status, "Sink rejected the batch");
            }
            let path = spill_path();
            match write_batch(&path, e.batch()) {
                Ok(()) => eprintln!("Unsent batch saved to {}", path.display()),
                Err(w) => eprintln!("Could not save unsent batch: {:#}", w),
            }
            Err(e.into())
        }
    }
}

fn spill_path() -> PathBuf {
    let ts = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    Path::new(SPILL_DIR).join(format!("unsent-{}.json", ts))
}

fn write_batch(path: &Path, batch: &[NormalizedRecord]) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(batch)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(std::time::Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(std::time::Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(std::time::Duration::from_secs(3725)), "1h 2m 5s");
    }

    #[test]
    fn truncation_is_char_safe() {
        assert_eq!(truncate("Manchester", 12), "Manchester");
        assert_eq!(truncate("Île-de-France", 3), "Île...");
    }

    #[test]
    fn spill_file_lands_in_data_dir() {
        let p = spill_path();
        assert!(p.starts_with(SPILL_DIR));
        assert!(p.to_string_lossy().ends_with(".json"));
    }

    #[test]
    fn cli_parses_run_flags() {
        let cli = Cli::try_parse_from(["job_collector", "run", "--dry-run", "-o", "batch.json"]).unwrap();
        match cli.command {
            Commands::Run { dry_run, out } => {
                assert!(dry_run);
                assert_eq!(out.as_deref(), Some(Path::new("batch.json")));
            }
            _ => panic!("expected run"),
        }
    }
}
