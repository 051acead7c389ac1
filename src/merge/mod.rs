//! Result merging: fold engine output and run metadata into a descriptor
//!
//! Produces a new descriptor value; the pre-run descriptor is never
//! mutated, so the pre- and post-run documents never alias. Each merge
//! appends exactly one engine-output record, which is how a multi-stage
//! pipeline accumulates one record per stage across repeated merges.

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

use crate::descriptor::RunDescriptor;

/// Errors from result merging
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("missing required section: Job.Output.results must be a list")]
    MissingRequiredSection,
}

/// Externally supplied run metadata. Every field is optional; absent
/// fields leave the corresponding descriptor field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunMetadata {
    pub status: Option<String>,
    pub instance_id: Option<String>,
    pub end_time: Option<String>,
    pub total_input_size: Option<String>,
    pub total_tmp_size: Option<String>,
    pub total_output_size: Option<String>,
}

impl RunMetadata {
    /// Read metadata from the environment variables the execution host
    /// exports (`JOB_STATUS`, `INSTANCE_ID`, `INPUTSIZE`, `TEMPSIZE`,
    /// `OUTPUTSIZE`).
    pub fn from_env() -> Self {
        Self {
            status: std::env::var("JOB_STATUS").ok(),
            instance_id: std::env::var("INSTANCE_ID").ok(),
            end_time: None,
            total_input_size: std::env::var("INPUTSIZE").ok(),
            total_tmp_size: std::env::var("TEMPSIZE").ok(),
            total_output_size: std::env::var("OUTPUTSIZE").ok(),
        }
    }

    /// Set the end time to the current wall clock.
    pub fn with_end_time_now(mut self) -> Self {
        self.end_time = Some(timestamp_now());
        self
    }
}

/// Current wall clock in the descriptor timestamp format.
pub fn timestamp_now() -> String {
    Utc::now().format("%Y%m%d-%H:%M:%S-UTC").to_string()
}

/// Merge one engine-output record and run metadata into a descriptor.
///
/// The returned descriptor equals the original in every field except
/// `Job.Output.results` (record appended, never replaced) and the
/// metadata fields named by `metadata`. Fails with
/// [`MergeError::MissingRequiredSection`] when the original descriptor
/// has no `Job.Output.results` list to append to.
pub fn merge_result(
    descriptor: &RunDescriptor,
    record: Value,
    metadata: &RunMetadata,
) -> Result<RunDescriptor, MergeError> {
    let mut merged = descriptor.clone();

    let results = merged
        .job
        .output
        .results
        .as_mut()
        .ok_or(MergeError::MissingRequiredSection)?;
    results.push(record);

    let job = &mut merged.job;
    if let Some(status) = &metadata.status {
        job.status = Some(status.clone());
    }
    if let Some(instance_id) = &metadata.instance_id {
        job.instance_id = Some(instance_id.clone());
    }
    if let Some(end_time) = &metadata.end_time {
        job.end_time = Some(end_time.clone());
    }
    if let Some(size) = &metadata.total_input_size {
        job.total_input_size = Some(size.clone());
    }
    if let Some(size) = &metadata.total_tmp_size {
        job.total_tmp_size = Some(size.clone());
    }
    if let Some(size) = &metadata.total_output_size {
        job.total_output_size = Some(size.clone());
    }

    tracing::info!(
        records = job.output.results.as_ref().map(Vec::len).unwrap_or(0),
        status = job.status.as_deref().unwrap_or(""),
        "merged engine output into descriptor"
    );
    Ok(merged)
}
