//! Workflow-engine input manifest
//!
//! The manifest is the hand-off boundary to the external workflow
//! engine: a flat object of item name -> scalar, `{class, path}` record,
//! or list of records. Storage locations and credential profiles never
//! cross this boundary.

use serde_json::{json, Map, Value};

use crate::descriptor::{FileEntry, Job};
use crate::plan::INPUT_DIR;

/// Local materialized path for a storage key, identical to the fetch
/// planner's target so the manifest points at what the script fetched.
fn local_path(key: &str) -> String {
    format!("{}/{}", INPUT_DIR, key.trim_end_matches('/'))
}

fn file_record(class: &str, key: &str) -> Value {
    json!({ "class": class, "path": local_path(key) })
}

fn entry_value(entry: &FileEntry) -> Value {
    if entry.path.is_list() {
        Value::Array(
            entry
                .path
                .elements()
                .into_iter()
                .map(|key| file_record(&entry.class, key))
                .collect(),
        )
    } else {
        file_record(&entry.class, entry.path.elements()[0])
    }
}

/// Build the flat input object consumed by the workflow engine.
///
/// Scalar parameters pass through unchanged. Data and reference entries
/// are rewritten to their local targets; secondary files are excluded,
/// the engine resolves them next to their primary file.
pub fn build_manifest(job: &Job) -> Value {
    let mut manifest = Map::new();
    for (name, value) in &job.input.parameters {
        manifest.insert(name.clone(), value.clone());
    }
    for (name, entry) in job
        .input
        .data_files
        .iter()
        .chain(job.input.reference_files.iter())
    {
        manifest.insert(name.clone(), entry_value(entry));
    }
    Value::Object(manifest)
}

/// Render the manifest as the `inputs.yml` artifact body.
///
/// JSON output, as consumed by the engine runner (valid YAML).
pub fn render_manifest(job: &Job) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&build_manifest(job))
}
