// Rank companies by Sustainability Score
//
// Usage: cargo run --bin rank_companies
//
// Configuration from environment variables:
//   SCORER_DATA_FILE  dataset CSV (default: Sample_Company_Sustainability_Metrics_Dataset.csv)
//   SCORER_CONFIG     scoring config JSON (default: built-in weights)
//   SCORER_MIN_SCORE  lower bound (default: lowest observed score)
//   SCORER_MAX_SCORE  upper bound (default: highest observed score)
//   SCORER_COMPANY    company to show in detail (optional)
//   SCORER_OUTPUT     "text" or "json" (default: text)

use anyhow::{Context, Result};
use std::path::PathBuf;
use sustainability_scorer::{DetailValue, ScoreRange, ScoringConfig, SustainabilityScorer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn env_f64(name: &str) -> Result<Option<f64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .with_context(|| format!("{} is not a number: {}", name, raw)),
        Err(_) => Ok(None),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sustainability_scorer=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_file = PathBuf::from(
        std::env::var("SCORER_DATA_FILE")
            .unwrap_or_else(|_| "Sample_Company_Sustainability_Metrics_Dataset.csv".to_string()),
    );

    let config = match std::env::var("SCORER_CONFIG") {
        Ok(path) => ScoringConfig::load(&PathBuf::from(&path))
            .with_context(|| format!("Failed to load scoring config: {}", path))?,
        Err(_) => ScoringConfig::default(),
    };

    let json_output = std::env::var("SCORER_OUTPUT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let scorer = SustainabilityScorer::from_csv(&data_file, config)
        .with_context(|| format!("Failed to score dataset: {:?}", data_file))?;

    let default_range = scorer.default_range()?;
    let range = ScoreRange::new(
        env_f64("SCORER_MIN_SCORE")?.unwrap_or(default_range.min_score),
        env_f64("SCORER_MAX_SCORE")?.unwrap_or(default_range.max_score),
    );
    tracing::info!("Score range: [{}, {}]", range.min_score, range.max_score);

    let ranked = scorer.qualifying_companies(range)?;

    let mut detail_miss = None;
    let detail = match std::env::var("SCORER_COMPANY") {
        Ok(company) => match scorer.company_detail(&company) {
            Ok(detail) => Some(detail),
            Err(e) if e.is_recoverable() => {
                tracing::warn!("{}", e);
                detail_miss = Some(e.to_string());
                None
            }
            Err(e) => return Err(e.into()),
        },
        Err(_) => None,
    };

    if json_output {
        let output = serde_json::json!({
            "range": range,
            "qualifying_companies": ranked,
            "detail": detail,
            "detail_error": detail_miss,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Qualifying Companies");
    if ranked.is_empty() {
        println!("  No companies have a score in [{:.2}, {:.2}]", range.min_score, range.max_score);
    } else {
        println!("  {:<40} {:>20}", "Company", "Sustainability Score");
        for entry in &ranked {
            println!("  {:<40} {:>20.4}", entry.company, entry.score);
        }
    }

    if let Some(detail) = detail {
        println!("\nDetailed Metrics for {}", detail.company);
        for field in &detail.fields {
            let value = match &field.value {
                DetailValue::Number(n) => format!("{:.4}", n),
                DetailValue::Text(t) => t.clone(),
                DetailValue::Missing => "-".to_string(),
            };
            match scorer.config().weight_of(&field.column) {
                Some(weight) => {
                    println!("  {:<45} {:<20} (weight {:+.2})", field.column, value, weight)
                }
                None => println!("  {:<45} {}", field.column, value),
            }
        }
    } else if let Some(miss) = detail_miss {
        println!("\nNo data available: {}", miss);
    }

    Ok(())
}
