//! Environment-binding projection
//!
//! Fixed App/Output fields plus normalized boolean config flags as
//! line-oriented `KEY=VALUE` text. Pure projection, no branching logic.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde_json::Value;

use crate::descriptor::RunDescriptor;

/// Render the environment-binding file body for a descriptor.
///
/// Boolean config flags are emitted as `UPPERCASED_NAME=1|0`;
/// `public_postrun_json` is always present, defaulting to `0`.
pub fn render_env(descriptor: &RunDescriptor) -> String {
    let app = &descriptor.job.app;
    let mut out = String::new();

    // write! to a String cannot fail
    let _ = writeln!(out, "WORKFLOW_URL={}", app.workflow_url);
    let _ = writeln!(out, "MAIN_WORKFLOW={}", app.main_workflow);
    let _ = writeln!(out, "WORKFLOW_FILES=\"{}\"", app.workflow_files.join(" "));
    let _ = writeln!(
        out,
        "OUTBUCKET={}",
        descriptor.job.output.output_bucket_directory
    );

    let mut flags: BTreeMap<&str, bool> = BTreeMap::new();
    flags.insert("public_postrun_json", false);
    for (name, value) in &descriptor.config {
        if let Value::Bool(b) = value {
            flags.insert(name.as_str(), *b);
        }
    }
    for (name, enabled) in flags {
        let _ = writeln!(
            out,
            "{}={}",
            name.to_uppercase(),
            if enabled { "1" } else { "0" }
        );
    }

    out
}
