//! Per-resource rule sets.
//!
//! Adding a resource type means adding a [`ResourceType`] variant and one
//! entry in [`SPECS`]; the document validator iterates the table uniformly.

use std::fmt;

use crate::value::{Kind, Mapping};

use super::report::{FieldPath, Finding};
use super::rules::Rule;

/// Resource collections recognised at the document root, in checking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceType {
    S3Buckets,
    Ec2Instances,
    DynamodbTables,
    LambdaFunctions,
    Vpcs,
}

impl ResourceType {
    pub const ALL: [ResourceType; 5] = [
        ResourceType::S3Buckets,
        ResourceType::Ec2Instances,
        ResourceType::DynamodbTables,
        ResourceType::LambdaFunctions,
        ResourceType::Vpcs,
    ];

    /// The document key holding this collection.
    pub fn key(self) -> &'static str {
        match self {
            ResourceType::S3Buckets => "s3_buckets",
            ResourceType::Ec2Instances => "ec2_instances",
            ResourceType::DynamodbTables => "dynamodb_tables",
            ResourceType::LambdaFunctions => "lambda_functions",
            ResourceType::Vpcs => "vpcs",
        }
    }

    pub fn spec(self) -> &'static ResourceTypeSpec {
        &SPECS[self as usize]
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug)]
pub struct ResourceTypeSpec {
    pub resource_type: ResourceType,
    /// Subject used in finding messages, e.g. "S3 bucket".
    pub subject: &'static str,
    /// Prefix of a per-element summary, e.g. "Bucket at index 0".
    pub element_label: &'static str,
    pub rules: &'static [Rule],
}

impl ResourceTypeSpec {
    /// Runs every rule against one element, in declaration order.
    pub fn check(&self, descriptor: &Mapping) -> Vec<Finding> {
        let mut findings = Vec::new();
        let root = FieldPath::root();
        for rule in self.rules {
            rule.apply(descriptor, self.subject, &root, &mut findings);
        }
        findings
    }
}

pub const ATTRIBUTE_TYPES: &[&str] = &["S", "N", "B"];

const S3_BUCKET_RULES: &[Rule] = &[
    Rule::Required("name"),
    Rule::Type("name", Kind::String),
    Rule::Type("tags", Kind::Mapping),
];

const EC2_INSTANCE_RULES: &[Rule] = &[
    Rule::Required("name"),
    Rule::Required("ami"),
    Rule::Required("instance_type"),
    Rule::Type("root_block_device", Kind::Mapping),
    Rule::Type("tags", Kind::Mapping),
];

const DYNAMODB_ATTRIBUTE_RULES: &[Rule] = &[
    Rule::Required("name"),
    Rule::Required("type"),
    Rule::Enum {
        field: "type",
        allowed: ATTRIBUTE_TYPES,
    },
];

const DYNAMODB_TABLE_RULES: &[Rule] = &[
    Rule::Required("name"),
    Rule::Required("hash_key"),
    Rule::Required("attributes"),
    Rule::Type("attributes", Kind::Sequence),
    Rule::Items {
        field: "attributes",
        label: "DynamoDB attribute",
        rules: DYNAMODB_ATTRIBUTE_RULES,
    },
];

const LAMBDA_FUNCTION_RULES: &[Rule] = &[
    Rule::Required("name"),
    Rule::Required("handler"),
    Rule::Required("runtime"),
    Rule::Required("role_arn"),
    Rule::Either {
        option: "filename",
        group: &["s3_bucket", "s3_key"],
    },
];

const VPC_RULES: &[Rule] = &[
    Rule::Required("name"),
    Rule::Required("cidr_block"),
    Rule::Cidr("cidr_block"),
];

/// Indexed by `ResourceType as usize`.
pub static SPECS: [ResourceTypeSpec; 5] = [
    ResourceTypeSpec {
        resource_type: ResourceType::S3Buckets,
        subject: "S3 bucket",
        element_label: "Bucket",
        rules: S3_BUCKET_RULES,
    },
    ResourceTypeSpec {
        resource_type: ResourceType::Ec2Instances,
        subject: "EC2 instance",
        element_label: "Instance",
        rules: EC2_INSTANCE_RULES,
    },
    ResourceTypeSpec {
        resource_type: ResourceType::DynamodbTables,
        subject: "DynamoDB table",
        element_label: "Table",
        rules: DYNAMODB_TABLE_RULES,
    },
    ResourceTypeSpec {
        resource_type: ResourceType::LambdaFunctions,
        subject: "Lambda function",
        element_label: "Function",
        rules: LAMBDA_FUNCTION_RULES,
    },
    ResourceTypeSpec {
        resource_type: ResourceType::Vpcs,
        subject: "VPC",
        element_label: "VPC",
        rules: VPC_RULES,
    },
];
