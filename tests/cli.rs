use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::{TempDir, tempdir};

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("aws.yml");
    fs::write(&path, contents).expect("write config");
    path
}

fn infraval() -> Command {
    let mut cmd = Command::cargo_bin("infraval").expect("binary built");
    cmd.env_remove("INFRAVAL_FORMAT");
    cmd
}

#[test]
fn valid_config_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_config(
        &dir,
        r#"
s3_buckets:
  - name: assets
vpcs:
  - name: main
    cidr_block: 10.0.0.0/16
"#,
    );

    infraval()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
    Ok(())
}

#[test]
fn empty_mapping_is_valid() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_config(&dir, "{}\n");

    infraval().arg(&path).assert().success();
    Ok(())
}

#[test]
fn invalid_config_lists_every_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_config(
        &dir,
        r#"
s3_buckets:
  - {}
lambda_functions:
  - name: worker
    handler: index.handler
    runtime: nodejs20.x
    role_arn: arn:aws:iam::123456789012:role/worker
vpcs:
  - name: v1
    cidr_block: "10.0.0.0"
"#,
    );

    infraval()
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "  - Bucket at index 0: S3 bucket missing required 'name' field",
        ))
        .stdout(predicate::str::contains(
            "Function at index 0: Lambda function must specify either 'filename' or both 's3_bucket' and 's3_key'",
        ))
        .stdout(predicate::str::contains(
            "VPC at index 0: VPC CIDR block '10.0.0.0' is not in valid format",
        ));
    Ok(())
}

#[test]
fn json_output_reports_errors() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_config(&dir, "s3_buckets:\n  - {}\n");

    let output = infraval()
        .args(["--format", "json"])
        .arg(&path)
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output)?;

    assert_eq!(json["valid"], false);
    assert_eq!(
        json["errors"]["s3_buckets"],
        serde_json::json!(["Bucket at index 0: S3 bucket missing required 'name' field"])
    );
    Ok(())
}

#[test]
fn json_output_for_valid_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_config(&dir, "vpcs:\n  - name: v1\n    cidr_block: 10.0.0.0/16\n");

    let output = infraval()
        .arg(&path)
        .env("INFRAVAL_FORMAT", "json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output)?;
    assert_eq!(json, serde_json::json!({ "valid": true }));
    Ok(())
}

#[test]
fn missing_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    infraval()
        .arg(dir.path().join("nope.yml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
    Ok(())
}

#[test]
fn malformed_yaml_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_config(&dir, "s3_buckets: [\n  name: x\n");

    infraval()
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error parsing YAML file"));
    Ok(())
}

#[test]
fn non_mapping_root_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_config(&dir, "- s3_buckets\n- vpcs\n");

    infraval()
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "configuration root must be a mapping",
        ));
    Ok(())
}

#[test]
fn wrong_collection_shape_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_config(&dir, "ec2_instances:\n  name: web\n");

    infraval()
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "ec2_instances must be a list, got mapping",
        ));
    Ok(())
}

#[test]
fn null_collection_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_config(&dir, "s3_buckets:\n");

    infraval()
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("s3_buckets must be a list, got null"));
    Ok(())
}
