//! runprep - pipeline run-descriptor materializer
//!
//! Turns a declarative run descriptor (a JSON document describing one
//! bioinformatics pipeline execution) into the artifacts an execution
//! host consumes: a fetch script, a workflow-engine input manifest, and
//! an environment-binding file. After execution, it merges the engine
//! output and run metadata back into a new descriptor. A companion
//! partitioner splits sequence lengths into bounded regions for fan-out.

pub mod artifact;
pub mod descriptor;
pub mod interval;
pub mod logging;
pub mod merge;
pub mod plan;

pub use artifact::{ArtifactError, ArtifactSet};
pub use descriptor::{DescriptorError, FileEntry, Job, PathSpec, RunDescriptor};
pub use interval::{partition, partition_table, Interval, IntervalError, SequenceRow};
pub use merge::{merge_result, MergeError, RunMetadata};
pub use plan::{
    build_manifest, plan_downloads, render_download_script, render_env, Codec, FetchDirective,
};
