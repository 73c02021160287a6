//! Ingestion boundary.
//!
//! Validates rows and resolves the wire timestamp format before anything
//! reaches the engine. Malformed rows are rejected here with their row
//! number; the engine never sees them.

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDateTime;
use muleflow::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const REQUIRED_COLUMNS: [&str; 5] = [
    "transaction_id",
    "sender_id",
    "receiver_id",
    "amount",
    "timestamp",
];

/// A wire-format record, shared by the CSV and JSON readers.
#[derive(Debug, Deserialize)]
struct RawRecord {
    transaction_id: String,
    sender_id: String,
    receiver_id: String,
    amount: f64,
    timestamp: String,
}

impl RawRecord {
    fn into_transaction(self, row: usize) -> anyhow::Result<Transaction> {
        if self.transaction_id.is_empty() {
            bail!("row {row}: empty transaction_id");
        }
        if self.sender_id.is_empty() || self.receiver_id.is_empty() {
            bail!("row {row}: empty account id");
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            bail!("row {row}: amount must be strictly positive");
        }
        let timestamp = parse_timestamp(&self.timestamp)
            .with_context(|| format!("row {row}: bad timestamp {:?}", self.timestamp))?;

        Ok(Transaction::new(
            self.transaction_id,
            self.sender_id,
            self.receiver_id,
            self.amount,
            timestamp,
        ))
    }
}

/// Parse a wire timestamp (`YYYY-MM-DD HH:MM:SS`, naive UTC) into epoch
/// milliseconds.
fn parse_timestamp(value: &str) -> anyhow::Result<i64> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)?;
    Ok(naive.and_utc().timestamp_millis())
}

/// Read a header-mapped CSV batch. Extra columns are ignored; missing
/// required columns are an error.
pub fn read_csv(path: &Path) -> anyhow::Result<Vec<Transaction>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut lines = content.lines().enumerate();

    let (_, header) = lines
        .next()
        .ok_or_else(|| anyhow!("{}: empty file", path.display()))?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();

    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| anyhow!("{}: missing column {name}", path.display()))?;
    }

    let mut transactions = Vec::new();
    for (line_idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let row = line_idx + 1;
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let field = |slot: usize| -> anyhow::Result<&str> {
            fields
                .get(positions[slot])
                .copied()
                .ok_or_else(|| anyhow!("row {row}: too few fields"))
        };

        let record = RawRecord {
            transaction_id: field(0)?.to_string(),
            sender_id: field(1)?.to_string(),
            receiver_id: field(2)?.to_string(),
            amount: field(3)?
                .parse()
                .with_context(|| format!("row {row}: bad amount"))?,
            timestamp: field(4)?.to_string(),
        };
        transactions.push(record.into_transaction(row)?);
    }

    Ok(transactions)
}

/// Read a JSON batch: an array of wire-format records.
pub fn read_json(path: &Path) -> anyhow::Result<Vec<Transaction>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let records: Vec<RawRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))?;

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| record.into_transaction(i + 1))
        .collect()
}
