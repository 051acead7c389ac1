//! Interval partitioning for region fan-out
//!
//! Splits a sequence length into bounded-size contiguous sub-intervals
//! so a pipeline stage can be fanned out over regions of a chromosome.
//! Intervals are 1-indexed and inclusive; a partitioning of `[1, n]`
//! tiles the range exactly, with no gap or overlap, and no interval
//! longer than the requested maximum.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from interval partitioning
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntervalError {
    #[error("invalid range: length and max size must be positive (length={length}, max_size={max_size})")]
    InvalidRange { length: u64, max_size: u64 },

    #[error("invalid sequence table line: {0:?}")]
    MalformedTableLine(String),
}

/// One contiguous inclusive sub-range, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

impl Interval {
    /// Number of positions covered. Never zero; start <= end by construction.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// One row of a sequence table: a named sequence and its length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRow {
    pub name: String,
    pub length: u64,
}

/// Partition `[1, length]` into contiguous inclusive intervals, none
/// longer than `max_size`.
///
/// With `k = ceil(length / max_size)` and `base = floor(length / k)`,
/// intervals of length `base` are emitted from position 1; a final
/// partial tail is absorbed into the last base-sized interval whenever
/// the combined length still fits under `max_size`, so e.g. a length of
/// 11 with max 5 splits as `1-3, 4-6, 7-11` rather than leaving a
/// two-position runt.
pub fn partition(length: u64, max_size: u64) -> Result<Vec<Interval>, IntervalError> {
    if length == 0 || max_size == 0 {
        return Err(IntervalError::InvalidRange { length, max_size });
    }

    let pieces = length.div_ceil(max_size);
    let base = length / pieces;

    let mut intervals = Vec::new();
    let mut start = 1;
    while start <= length {
        let mut end = (start + base - 1).min(length);
        let tail = length - end;
        if tail > 0 && tail < base && (end - start + 1) + tail <= max_size {
            end = length;
        }
        intervals.push(Interval { start, end });
        start = end + 1;
    }
    Ok(intervals)
}

/// Partition every row of a sequence table, producing flat
/// `name:start-end` tokens in table row order, partitioner order within
/// each row.
pub fn partition_table(
    rows: &[SequenceRow],
    max_size: u64,
) -> Result<Vec<String>, IntervalError> {
    let mut tokens = Vec::new();
    for row in rows {
        for interval in partition(row.length, max_size)? {
            tokens.push(format!("{}:{}", row.name, interval));
        }
    }
    Ok(tokens)
}

/// Parse a two-column `name<ws>length` table (chromosome-sizes format).
/// Blank lines are skipped.
pub fn parse_table(text: &str) -> Result<Vec<SequenceRow>, IntervalError> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let row = match (fields.next(), fields.next()) {
            (Some(name), Some(length)) => SequenceRow {
                name: name.to_string(),
                length: length
                    .parse()
                    .map_err(|_| IntervalError::MalformedTableLine(line.to_string()))?,
            },
            _ => return Err(IntervalError::MalformedTableLine(line.to_string())),
        };
        rows.push(row);
    }
    Ok(rows)
}
