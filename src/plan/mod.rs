//! Planning: turn a parsed run descriptor into execution artifacts
//!
//! Three independent, read-only consumers of the Job model:
//! - [`download`] emits the fetch script (conditional copy + unzip blocks),
//! - [`manifest`] emits the flat input object for the workflow engine,
//! - [`env`] emits the `KEY=VALUE` environment bindings.
//!
//! All three are pure transforms: the planner performs no storage I/O.
//! The single-object-vs-prefix decision is deferred into the generated
//! shell logic, which probes storage at execution time.

pub mod download;
pub mod env;
pub mod manifest;

pub use download::{plan_downloads, render_download_script, Codec, FetchDirective};
pub use env::render_env;
pub use manifest::{build_manifest, render_manifest};

/// Directory on the execution host into which inputs are materialized.
pub const INPUT_DIR: &str = "/data1/input";

/// File name of the generated fetch script.
pub const DOWNLOAD_LIST_FILENAME: &str = "download_command_list.txt";

/// File name of the generated workflow-engine input manifest.
pub const INPUT_MANIFEST_FILENAME: &str = "inputs.yml";

/// File name of the generated environment-binding file.
pub const ENV_FILENAME: &str = "env_command_list.txt";
