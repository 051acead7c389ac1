//! Pre-run to post-run descriptor lifecycle across merges.

use serde_json::json;

use runprep::descriptor::RunDescriptor;
use runprep::merge::{merge_result, RunMetadata};

fn prerun_descriptor() -> RunDescriptor {
    RunDescriptor::from_json(
        &json!({
            "Job": {
                "JOBID": "9sVm1cHd4yKe",
                "App": {
                    "workflow_url": "wf-bucket/pipelines",
                    "main_workflow": "variant-call.cwl"
                },
                "Input": {
                    "Input_files_data": {
                        "aligned_bam": {
                            "class": "File",
                            "location": "data-bucket",
                            "path": "sample.bam"
                        }
                    },
                    "Input_parameters": { "region": "chr7:1-159345973" }
                },
                "Output": {
                    "output_bucket_directory": "out-bucket/calls",
                    "results": []
                },
                "Instance_type": "r5.2xlarge",
                "start_time": "20260829-06:00:00-UTC"
            },
            "Config": { "public_postrun_json": false }
        })
        .to_string(),
    )
    .unwrap()
}

#[test]
fn two_stage_pipeline_accumulates_two_records() {
    let descriptor = prerun_descriptor();

    let stage1 = json!({ "vcf": { "class": "File", "path": "/data1/out/calls.vcf.gz" } });
    let stage2 = json!({ "report": { "class": "File", "path": "/data1/out/stats.txt" } });

    let after_stage1 = merge_result(
        &descriptor,
        stage1.clone(),
        &RunMetadata {
            status: Some("0".to_string()),
            instance_id: Some("i-0f00ba4".to_string()),
            ..RunMetadata::default()
        },
    )
    .unwrap();
    let after_stage2 = merge_result(
        &after_stage1,
        stage2.clone(),
        &RunMetadata {
            status: Some("0".to_string()),
            end_time: Some("20260829-07:45:12-UTC".to_string()),
            total_input_size: Some("8.4G".to_string()),
            total_tmp_size: Some("21G".to_string()),
            total_output_size: Some("640M".to_string()),
            ..RunMetadata::default()
        },
    )
    .unwrap();

    assert_eq!(
        after_stage2.job.output.results,
        Some(vec![stage1, stage2])
    );
    // metadata from the first merge survives the second
    assert_eq!(after_stage2.job.instance_id.as_deref(), Some("i-0f00ba4"));
    assert_eq!(after_stage2.job.end_time.as_deref(), Some("20260829-07:45:12-UTC"));
    assert_eq!(after_stage2.job.total_output_size.as_deref(), Some("640M"));
}

#[test]
fn merge_preserves_fields_it_does_not_understand() {
    let descriptor = prerun_descriptor();
    let merged = merge_result(&descriptor, json!({}), &RunMetadata::default()).unwrap();

    let body: serde_json::Value = serde_json::from_str(&merged.to_json().unwrap()).unwrap();
    assert_eq!(body["Job"]["Instance_type"], json!("r5.2xlarge"));
    assert_eq!(body["Job"]["start_time"], json!("20260829-06:00:00-UTC"));
    assert_eq!(body["Config"]["public_postrun_json"], json!(false));
}

#[test]
fn merged_descriptor_parses_back_identically() {
    let merged = merge_result(
        &prerun_descriptor(),
        json!({ "vcf": { "path": "/data1/out/calls.vcf.gz" } }),
        &RunMetadata {
            status: Some("0".to_string()),
            end_time: Some("20260829-07:45:12-UTC".to_string()),
            ..RunMetadata::default()
        },
    )
    .unwrap();

    let reparsed = RunDescriptor::from_json(&merged.to_json().unwrap()).unwrap();
    assert_eq!(reparsed, merged);

    // and the reparsed descriptor is still plannable
    let directives = runprep::plan::plan_downloads(&reparsed.job);
    assert_eq!(directives.len(), 1);
}

#[test]
fn merge_without_results_list_fails_before_writing_anything() {
    let descriptor = RunDescriptor::from_json(
        &json!({
            "Job": {
                "App": {},
                "Input": {},
                "Output": { "output_bucket_directory": "out-bucket" }
            }
        })
        .to_string(),
    )
    .unwrap();

    assert!(merge_result(&descriptor, json!({}), &RunMetadata::default()).is_err());
}
