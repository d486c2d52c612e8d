//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use groundcheck_core::{extract_claims, score_answer, unsupported_claim, SupportScorer};
use groundcheck_embed::{EmbedderRegistry, LazyEmbedder};

use crate::config::EvalConfig;
use crate::records::{
    read_records, write_scored, write_scored_to, AnswerMetrics, PredictionRecord, ScoredRecord,
    ScoringMeta,
};

/// Scorer over a lazily initialized backend. Nothing is downloaded or
/// loaded here; the backend comes up on the first scoring call.
fn build_scorer(config: &EvalConfig) -> SupportScorer {
    let lazy = LazyEmbedder::from_registry(
        EmbedderRegistry::with_defaults(),
        &config.provider,
        config.provider_config(),
    );
    SupportScorer::new(Arc::new(lazy))
}

/// Batch-score a JSONL file of prediction records.
pub fn run_score(
    input: &Path,
    output: Option<&Path>,
    heuristic: bool,
    config: EvalConfig,
) -> Result<()> {
    let records = read_records(input)?;
    info!(
        records = records.len(),
        input = %input.display(),
        "loaded prediction records"
    );

    let scored = if heuristic {
        score_with_heuristic(records)
    } else {
        score_with_embedder(records, &config)?
    };

    match output {
        Some(path) => {
            write_scored(path, &scored)?;
            info!(records = scored.len(), output = %path.display(), "wrote scored records");
        }
        None => {
            let stdout = std::io::stdout();
            write_scored_to(stdout.lock(), &scored, "stdout")?;
        }
    }
    Ok(())
}

fn score_with_embedder(
    records: Vec<PredictionRecord>,
    config: &EvalConfig,
) -> Result<Vec<ScoredRecord>> {
    let scorer = build_scorer(config);
    let mut scored = Vec::with_capacity(records.len());

    for record in records {
        // A record that fails to score aborts the run; there are no
        // partial results.
        let scores = score_answer(
            &scorer,
            &record.model_answer,
            record.context.as_deref(),
            config.threshold,
        )
        .with_context(|| format!("scoring record '{}'", record.id))?;

        scored.push(ScoredRecord {
            metrics: AnswerMetrics::Support {
                ucr: scores.ucr.rate,
                unsupported_claims: scores.ucr.unsupported,
                total_claims: scores.ucr.total,
                faithfulness: scores.faithfulness,
            },
            meta: ScoringMeta::support(config, Utc::now()),
            record,
        });
    }

    if !scored.is_empty() {
        let answers = scored.len();
        let mut total_claims = 0usize;
        let mut ucr_sum = 0.0f32;
        let mut faithfulness_sum = 0.0f32;
        for entry in &scored {
            if let AnswerMetrics::Support {
                ucr,
                total_claims: claims,
                faithfulness,
                ..
            } = &entry.metrics
            {
                total_claims += claims;
                ucr_sum += ucr;
                faithfulness_sum += faithfulness;
            }
        }
        info!(
            answers,
            total_claims,
            mean_ucr = ucr_sum / answers as f32,
            mean_faithfulness = faithfulness_sum / answers as f32,
            "dataset summary"
        );
    }

    Ok(scored)
}

fn score_with_heuristic(records: Vec<PredictionRecord>) -> Vec<ScoredRecord> {
    let mut scored = Vec::with_capacity(records.len());
    let mut flagged = 0usize;

    for record in records {
        let flag = unsupported_claim(&record.model_answer, record.context.as_deref());
        if flag {
            flagged += 1;
        }
        scored.push(ScoredRecord {
            metrics: AnswerMetrics::Heuristic {
                unsupported_claim: flag,
            },
            meta: ScoringMeta::heuristic(Utc::now()),
            record,
        });
    }

    info!(answers = scored.len(), flagged, "dataset summary (length heuristic)");
    scored
}

/// Score a single answer/context pair and print the metrics as JSON.
pub fn run_check(answer: &str, context: Option<&str>, config: EvalConfig) -> Result<()> {
    let scorer = build_scorer(&config);
    let scores = score_answer(&scorer, answer, context, config.threshold)
        .context("scoring answer")?;

    let output = serde_json::json!({
        "ucr": scores.ucr.rate,
        "unsupported_claims": scores.ucr.unsupported,
        "total_claims": scores.ucr.total,
        "faithfulness": scores.faithfulness,
        "threshold": config.threshold,
        "provider": config.provider,
        "model": config.model,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print extracted claims one per line. Needs no provider.
pub fn run_claims(text: &str) -> Result<()> {
    for claim in extract_claims(text) {
        println!("{claim}");
    }
    Ok(())
}
