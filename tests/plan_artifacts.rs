//! End-to-end planning: descriptor in, three artifacts out.

use serde_json::{json, Value};

use runprep::descriptor::RunDescriptor;
use runprep::plan::{
    self, DOWNLOAD_LIST_FILENAME, ENV_FILENAME, INPUT_MANIFEST_FILENAME,
};
use runprep::ArtifactSet;

fn fixture_descriptor() -> RunDescriptor {
    RunDescriptor::from_json(
        &json!({
            "Job": {
                "JOBID": "3kQp7wNv2bXs",
                "App": {
                    "App_name": "hic-processing",
                    "App_version": "0.2.6",
                    "workflow_url": "wf-bucket/pipelines/hic",
                    "main_workflow": "hic.cwl",
                    "workflow_files": ["pairs.cwl", "cooler.cwl"]
                },
                "Input": {
                    "Input_files_data": {
                        "fastq_r1": {
                            "class": "File",
                            "location": "data-bucket/run42",
                            "path": "sample_R1.fastq.gz"
                        },
                        "fastq_r2": {
                            "class": "File",
                            "location": "data-bucket/run42",
                            "path": "sample_R2.fastq.gz",
                            "profile": "collab"
                        }
                    },
                    "Input_files_reference": {
                        "genome_index": {
                            "class": "File",
                            "location": "ref-bucket",
                            "path": ["hg38.fa", "hg38.fa.fai"]
                        }
                    },
                    "Input_parameters": { "n_threads": 16 }
                },
                "Output": {
                    "output_bucket_directory": "out-bucket/hic-results",
                    "results": []
                },
                "start_time": "20260829-08:15:00-UTC"
            },
            "Config": { "public_postrun_json": true }
        })
        .to_string(),
    )
    .unwrap()
}

#[test]
fn plan_publishes_three_artifacts() {
    let descriptor = fixture_descriptor();
    let directives = plan::plan_downloads(&descriptor.job);

    let mut artifacts = ArtifactSet::new();
    artifacts.add(
        DOWNLOAD_LIST_FILENAME,
        plan::render_download_script(&directives),
    );
    artifacts.add(
        INPUT_MANIFEST_FILENAME,
        plan::render_manifest(&descriptor.job).unwrap(),
    );
    artifacts.add(ENV_FILENAME, plan::render_env(&descriptor));

    let outdir = tempfile::tempdir().unwrap();
    let published = artifacts.publish(outdir.path()).unwrap();
    assert_eq!(published.len(), 3);

    for name in [DOWNLOAD_LIST_FILENAME, INPUT_MANIFEST_FILENAME, ENV_FILENAME] {
        assert!(outdir.path().join(name).is_file(), "missing {}", name);
    }
}

#[test]
fn fetch_script_covers_every_path_element() {
    let descriptor = fixture_descriptor();
    let directives = plan::plan_downloads(&descriptor.job);

    // two data files + two reference path elements
    assert_eq!(directives.len(), 4);

    let script = plan::render_download_script(&directives);
    assert!(script.contains("s3://data-bucket/run42/sample_R1.fastq.gz"));
    assert!(script.contains("s3://data-bucket/run42/sample_R2.fastq.gz"));
    assert!(script.contains("s3://ref-bucket/hg38.fa "));
    assert!(script.contains("s3://ref-bucket/hg38.fa.fai"));

    // codec and profile handling survive end to end
    assert!(script.contains("gunzip /data1/input/sample_R1.fastq.gz;"));
    assert!(script.contains("--profile collab"));
}

#[test]
fn fetch_targets_are_pairwise_disjoint() {
    let descriptor = fixture_descriptor();
    let mut targets: Vec<String> = plan::plan_downloads(&descriptor.job)
        .into_iter()
        .map(|d| d.target)
        .collect();
    let total = targets.len();
    targets.sort();
    targets.dedup();
    assert_eq!(targets.len(), total);
}

#[test]
fn manifest_matches_engine_contract() {
    let descriptor = fixture_descriptor();
    let manifest = plan::build_manifest(&descriptor.job);

    assert_eq!(manifest["n_threads"], json!(16));
    assert_eq!(
        manifest["fastq_r1"]["path"],
        json!("/data1/input/sample_R1.fastq.gz")
    );
    assert_eq!(
        manifest["genome_index"],
        json!([
            { "class": "File", "path": "/data1/input/hg38.fa" },
            { "class": "File", "path": "/data1/input/hg38.fa.fai" }
        ])
    );

    fn contains_key(value: &Value, forbidden: &str) -> bool {
        match value {
            Value::Object(map) => {
                map.contains_key(forbidden) || map.values().any(|v| contains_key(v, forbidden))
            }
            Value::Array(items) => items.iter().any(|v| contains_key(v, forbidden)),
            _ => false,
        }
    }
    assert!(!contains_key(&manifest, "location"));
    assert!(!contains_key(&manifest, "profile"));
}

#[test]
fn env_bindings_project_app_and_output() {
    let descriptor = fixture_descriptor();
    let env = plan::render_env(&descriptor);

    assert!(env.contains("WORKFLOW_URL=wf-bucket/pipelines/hic\n"));
    assert!(env.contains("MAIN_WORKFLOW=hic.cwl\n"));
    assert!(env.contains("WORKFLOW_FILES=\"pairs.cwl cooler.cwl\"\n"));
    assert!(env.contains("OUTBUCKET=out-bucket/hic-results\n"));
    assert!(env.contains("PUBLIC_POSTRUN_JSON=1\n"));
}

#[test]
fn planning_is_deterministic() {
    let descriptor = fixture_descriptor();
    let first = plan::render_download_script(&plan::plan_downloads(&descriptor.job));
    let second = plan::render_download_script(&plan::plan_downloads(&descriptor.job));
    assert_eq!(first, second);

    assert_eq!(
        plan::render_manifest(&descriptor.job).unwrap(),
        plan::render_manifest(&descriptor.job).unwrap()
    );
}
