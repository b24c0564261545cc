use std::sync::Arc;

use clayscore::{
    scoring::{parse_tally, Discipline, Gauge, ScoringEngine, Station},
    stats::{InMemoryScoreRepository, StatsFilter, StatsService},
    AppError,
};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "clayscore <discipline> <gauge> <starting-station> <tally> [shooter]";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clayscore=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args).await {
        error!(error = %e, "clayscore failed");
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(args: &[String]) -> Result<(), AppError> {
    let [discipline, gauge, station, tally, rest @ ..] = args else {
        return Err(AppError::Usage(USAGE.to_string()));
    };
    let shooter_id = rest.first().map(String::as_str).unwrap_or("shooter");

    let discipline: Discipline = discipline.parse()?;
    let gauge: Gauge = gauge.parse()?;
    let station: Station = station
        .parse()
        .map_err(|_| AppError::Usage(format!("starting station must be a number: {}", station)))?;

    let engine = ScoringEngine::replay(discipline, station, &parse_tally(tally)?)?;
    info!(progress = ?engine.progress(), "Tally replayed");
    let record = engine.finish(gauge)?;

    // Scores only live for this invocation; the real store is external.
    let service = StatsService::builder(Arc::new(InMemoryScoreRepository::new())).build();
    let stored = service.submit(shooter_id, record).await?;
    let personal = service
        .personal_stats(shooter_id, &StatsFilter::all())
        .await?;

    let output = json!({
        "score": stored,
        "tally": stored.record.tally(),
        "personal_stats": personal,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
