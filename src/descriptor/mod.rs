//! Run descriptor model and parser
//!
//! The run descriptor is the JSON document describing one pipeline
//! execution: input file locations, workflow definition location, and
//! output destination. Planning consumes the typed model read-only;
//! the result merger produces a new descriptor value rather than
//! mutating the original.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Input category holding primary data files.
pub const CATEGORY_DATA: &str = "Input_files_data";

/// Input category holding reference files (genomes, indices, annotation).
pub const CATEGORY_REFERENCE: &str = "Input_files_reference";

/// Input category holding secondary files that accompany a primary input.
pub const CATEGORY_SECONDARY: &str = "Secondary_files_data";

/// Errors from descriptor parsing and validation
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("malformed descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for DescriptorError {
    fn from(e: serde_json::Error) -> Self {
        DescriptorError::MalformedDescriptor(e.to_string())
    }
}

/// One or many relative storage keys for a single logical input.
///
/// A bare string and a one-element list are equivalent; every consumer
/// iterates via [`PathSpec::elements`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSpec {
    Single(String),
    Many(Vec<String>),
}

impl PathSpec {
    /// All path elements in declared order.
    pub fn elements(&self) -> Vec<&str> {
        match self {
            PathSpec::Single(p) => vec![p.as_str()],
            PathSpec::Many(ps) => ps.iter().map(String::as_str).collect(),
        }
    }

    /// Whether this spec was declared as a list (even a one-element one).
    pub fn is_list(&self) -> bool {
        matches!(self, PathSpec::Many(_))
    }
}

fn default_class() -> String {
    "File".to_string()
}

/// One logical input file (or group of peer files sharing a class).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Relative key or ordered list of keys within `location`
    pub path: PathSpec,

    /// Bucket name, optionally with a key prefix (`bucket/sub/dir`)
    pub location: String,

    /// Named credential scope for fetching this entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Class tag required for manifest emission (defaults to "File")
    #[serde(default = "default_class")]
    pub class: String,

    /// Fields this tool does not interpret, preserved across a merge
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `Job.Input` section: category name -> item name -> entry.
///
/// Iteration order is pinned: the three file categories in declared
/// order (data, reference, secondary), items lexicographically by name.
/// Every generated artifact inherits this order, so output is stable
/// across runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobInput {
    #[serde(default, rename = "Input_files_data")]
    pub data_files: BTreeMap<String, FileEntry>,

    #[serde(default, rename = "Input_files_reference")]
    pub reference_files: BTreeMap<String, FileEntry>,

    #[serde(default, rename = "Secondary_files_data")]
    pub secondary_files: BTreeMap<String, FileEntry>,

    #[serde(default, rename = "Input_parameters")]
    pub parameters: BTreeMap<String, Value>,
}

impl JobInput {
    /// File categories in enumeration order.
    pub fn file_categories(&self) -> [(&'static str, &BTreeMap<String, FileEntry>); 3] {
        [
            (CATEGORY_DATA, &self.data_files),
            (CATEGORY_REFERENCE, &self.reference_files),
            (CATEGORY_SECONDARY, &self.secondary_files),
        ]
    }
}

/// The `Job.App` section: where the workflow definition lives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct App {
    #[serde(default, rename = "App_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, rename = "App_version", skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Base bucket/URL under which all workflow files are found
    #[serde(default)]
    pub workflow_url: String,

    /// Main workflow file name
    #[serde(default)]
    pub main_workflow: String,

    /// Auxiliary workflow file names referenced by the main file
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workflow_files: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `Job.Output` section: destination plus accumulated results.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobOutput {
    /// Destination bucket/directory for outputs and logs
    #[serde(default)]
    pub output_bucket_directory: String,

    /// Engine-output records, one appended per pipeline stage.
    /// Absent on descriptors that were never prepared for merging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `Job` section of a run descriptor.
///
/// Run metadata fields (`status`, `end_time`, sizes, instance id) are
/// absent until the result merger sets them after execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, rename = "JOBID", skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    #[serde(rename = "App")]
    pub app: App,

    #[serde(rename = "Input")]
    pub input: JobInput,

    #[serde(rename = "Output")]
    pub output: JobOutput,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_input_size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tmp_size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_output_size: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A complete run descriptor: the `Job` section plus free-form config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDescriptor {
    #[serde(rename = "Job")]
    pub job: Job,

    /// Free-form flags (e.g. `public_postrun_json`); boolean flags are
    /// projected into the environment bindings normalized to "1"/"0".
    #[serde(default, rename = "Config", skip_serializing_if = "Map::is_empty")]
    pub config: Map<String, Value>,
}

impl RunDescriptor {
    /// Parse a descriptor from a JSON byte buffer.
    ///
    /// Fails with [`DescriptorError::MalformedDescriptor`] when the
    /// `Job.Input`, `Job.App`, or `Job.Output` sections are absent, or
    /// when a file entry lacks `path` or `location`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DescriptorError> {
        let descriptor: RunDescriptor = serde_json::from_slice(bytes)?;
        Ok(descriptor)
    }

    /// Parse a descriptor from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        Self::from_slice(json.as_bytes())
    }

    /// Load a descriptor from a file.
    pub fn from_file(path: &Path) -> Result<Self, DescriptorError> {
        let bytes = fs::read(path)?;
        Self::from_slice(&bytes)
    }

    /// Serialize to JSON (pretty printed)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
