//! Rendering of validation reports for people and for machines.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::validation::ValidationReport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render(report: &ValidationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => render_json(report),
    }
}

pub fn render_text(report: &ValidationReport) -> String {
    if report.is_valid() {
        return format!("{}\n", "✅ Configuration is valid!".green());
    }

    let mut out = format!(
        "{}\n",
        "❌ Configuration validation failed with the following errors:"
            .red()
            .bold()
    );
    for (resource_type, entries) in report.iter() {
        out.push_str(&format!("\n{}:\n", resource_type.key().bold()));
        for entry in entries {
            out.push_str(&format!("  - {entry}\n"));
        }
    }
    out
}

/// Summaries grouped by resource type, serialized in checking order.
struct ErrorGroups<'a>(&'a ValidationReport);

impl Serialize for ErrorGroups<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, summaries) in self.0.summaries() {
            map.serialize_entry(key, &summaries)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ErrorGroups<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    findings: Vec<JsonFinding>,
}

#[derive(Serialize)]
struct JsonFinding {
    resource_type: &'static str,
    index: usize,
    path: String,
    message: String,
}

pub fn render_json(report: &ValidationReport) -> Result<String> {
    let json = JsonReport {
        valid: report.is_valid(),
        errors: (!report.is_valid()).then_some(ErrorGroups(report)),
        findings: report
            .findings()
            .map(|(resource_type, index, finding)| JsonFinding {
                resource_type: resource_type.key(),
                index,
                path: finding.path.to_string(),
                message: finding.to_string(),
            })
            .collect(),
    };
    let mut rendered =
        serde_json::to_string_pretty(&json).context("Failed to serialize validation report")?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_value;
    use crate::value::Value;

    fn report(source: &str) -> ValidationReport {
        let raw: serde_yaml::Value = serde_yaml::from_str(source).unwrap();
        validate_value(Value::try_from(raw).unwrap()).unwrap()
    }

    #[test]
    fn text_groups_entries_by_resource_type() {
        let text = render_text(&report("vpcs:\n  - name: v\ns3_buckets:\n  - {}\n"));
        assert!(text.contains("s3_buckets"));
        assert!(text.contains("  - Bucket at index 0: S3 bucket missing required 'name' field\n"));
        assert!(text.contains("  - VPC at index 0: VPC missing required 'cidr_block' field\n"));
        assert!(text.find("s3_buckets").unwrap() < text.find("vpcs").unwrap());
    }

    #[test]
    fn text_confirms_success() {
        assert!(render_text(&report("{}")).contains("Configuration is valid"));
    }

    #[test]
    fn json_for_valid_document_only_has_flag() {
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&report("{}")).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "valid": true }));
    }

    #[test]
    fn json_lists_errors_and_findings() {
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&report("s3_buckets:\n  - {}\n")).unwrap())
                .unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(
            json["errors"]["s3_buckets"][0],
            "Bucket at index 0: S3 bucket missing required 'name' field"
        );
        assert_eq!(json["findings"][0]["resource_type"], "s3_buckets");
        assert_eq!(json["findings"][0]["index"], 0);
        assert_eq!(json["findings"][0]["path"], "name");
    }

    #[test]
    fn json_errors_follow_checking_order() {
        let rendered = render_json(&report(
            "dynamodb_tables:\n  - {}\nec2_instances:\n  - {}\n",
        ))
        .unwrap();
        let ec2 = rendered.find("\"ec2_instances\"").unwrap();
        let dynamodb = rendered.find("\"dynamodb_tables\"").unwrap();
        assert!(ec2 < dynamodb, "errors out of order:\n{rendered}");

        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["findings"][0]["resource_type"], "ec2_instances");
    }

    #[test]
    fn text_lists_each_entry_on_its_own_line() {
        let text = render_text(&report("vpcs:\n  - {}\n  - name: v\n"));
        let lines: Vec<&str> = text.lines().filter(|l| l.starts_with("  - ")).collect();
        assert_eq!(
            lines,
            vec![
                "  - VPC at index 0: VPC missing required 'name' field, VPC missing required 'cidr_block' field",
                "  - VPC at index 1: VPC missing required 'cidr_block' field",
            ]
        );
    }
}
