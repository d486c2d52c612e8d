//! Prediction records in, scored records out, as JSON lines.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EvalConfig;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: malformed record: {source}")]
    Malformed {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize record '{id}': {source}")]
    Serialize {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One prediction to score. `context` is nullable and may be absent;
/// `reference_answer` is optional. Fields beyond the consumed schema
/// (confidence, decoding parameters, run metadata) are carried through
/// to the scored record untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub context: Option<String>,
    pub model_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_answer: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Metrics attached to a scored record. Either the embedding-based pair
/// or the zero-dependency length heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMetrics {
    Support {
        ucr: f32,
        unsupported_claims: usize,
        total_claims: usize,
        faithfulness: f32,
    },
    Heuristic {
        unsupported_claim: bool,
    },
}

/// How a record was scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
    pub scored_at: DateTime<Utc>,
}

impl ScoringMeta {
    /// Metadata for an embedding-based scoring pass.
    pub fn support(config: &EvalConfig, scored_at: DateTime<Utc>) -> Self {
        Self {
            provider: Some(config.provider.clone()),
            model: Some(config.model.clone()),
            threshold: Some(config.threshold),
            scored_at,
        }
    }

    /// Metadata for a heuristic-only pass; no provider was involved.
    pub fn heuristic(scored_at: DateTime<Utc>) -> Self {
        Self {
            provider: None,
            model: None,
            threshold: None,
            scored_at,
        }
    }
}

/// A prediction record with its metrics and scoring metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: PredictionRecord,
    pub metrics: AnswerMetrics,
    pub meta: ScoringMeta,
}

/// Read prediction records from a JSONL file. Blank lines are skipped; a
/// malformed line fails the whole read with its line number.
pub fn read_records(path: &Path) -> Result<Vec<PredictionRecord>, RecordError> {
    let label = path.display().to_string();
    let file = File::open(path).map_err(|source| RecordError::Read {
        path: label.clone(),
        source,
    })?;
    parse_records(BufReader::new(file), &label)
}

fn parse_records<R: BufRead>(reader: R, path: &str) -> Result<Vec<PredictionRecord>, RecordError> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| RecordError::Read {
            path: path.to_string(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| RecordError::Malformed {
            path: path.to_string(),
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Write scored records to a JSONL file.
pub fn write_scored(path: &Path, records: &[ScoredRecord]) -> Result<(), RecordError> {
    let label = path.display().to_string();
    let file = File::create(path).map_err(|source| RecordError::Write {
        path: label.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_scored_to(&mut writer, records, &label)?;
    writer.flush().map_err(|source| RecordError::Write {
        path: label,
        source,
    })
}

/// Write scored records as JSON lines to any writer.
pub fn write_scored_to<W: Write>(
    mut writer: W,
    records: &[ScoredRecord],
    path: &str,
) -> Result<(), RecordError> {
    for record in records {
        let json = serde_json::to_string(record).map_err(|source| RecordError::Serialize {
            id: record.record.id.clone(),
            source,
        })?;
        writeln!(writer, "{json}").map_err(|source| RecordError::Write {
            path: path.to_string(),
            source,
        })?;
    }
    Ok(())
}
