use std::time::Duration;

use clap::{Parser, Subcommand};
use insightflow_client::{InsightClient, InsightParams};
use insightflow_feed::{FeedOptions, InsightFeed};

#[derive(Debug, Parser)]
#[command(name = "insightflow-cli")]
#[command(about = "Fetch and watch social-insight analysis results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one insight flow and print the normalized result as JSON.
    Fetch {
        /// Platform to analyze; repeat for multiple (default: twitter).
        #[arg(long = "platform")]
        platforms: Vec<String>,
        #[arg(long, default_value = "standard")]
        preset: String,
        #[arg(long, default_value = "professional")]
        tone: String,
        #[arg(long, default_value = "2025-04-01 to 2025-04-11")]
        date_range: String,
        /// Keyword to focus the analysis on; repeat for multiple.
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },
    /// Poll the backend continuously and log snapshot changes until Ctrl-C.
    Watch {
        /// Poll cadence override in milliseconds.
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

fn build_params(
    platforms: Vec<String>,
    preset: String,
    tone: String,
    date_range: String,
    keywords: Vec<String>,
) -> InsightParams {
    let defaults = InsightParams::default();
    InsightParams {
        platforms: if platforms.is_empty() {
            defaults.platforms
        } else {
            platforms
        },
        preset,
        tone,
        date_range,
        keywords: if keywords.is_empty() {
            None
        } else {
            Some(keywords)
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = insightflow_core::load_app_config_from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_level))
        .init();

    let client = InsightClient::new(&config.api_base_url, config.request_timeout_secs)?;

    match cli.command {
        Commands::Fetch {
            platforms,
            preset,
            tone,
            date_range,
            keywords,
        } => {
            let params = build_params(platforms, preset, tone, date_range, keywords);
            let result = client.run_flow(&params).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Watch { interval_ms } => {
            let poll_interval =
                Duration::from_millis(interval_ms.unwrap_or(config.poll_interval_ms));
            let feed = InsightFeed::spawn(
                client,
                InsightParams::default(),
                FeedOptions {
                    poll_interval,
                    realtime: true,
                },
            );
            let mut snapshots = feed.subscribe();

            loop {
                tokio::select! {
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = snapshots.borrow_and_update().clone();
                        if let Some(error) = &snapshot.error {
                            tracing::warn!(%error, "fetch failed, showing cached data");
                        }
                        if let Some(data) = &snapshot.data {
                            tracing::info!(
                                insights = data.insights.len(),
                                new_insights = snapshot.has_new_insights,
                                "insight snapshot updated"
                            );
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("shutting down watch loop");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
