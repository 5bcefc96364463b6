//! Attribute schema for the node_pool resource

use std::sync::LazyLock;

use regex::Regex;
use talus_core::provider::ResourceType;
use talus_core::resource::Value;
use talus_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

static VSWITCH_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^vsw-[a-z0-9]*$").expect("valid pattern"));

static NODE_NAME_MODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^customized,[a-z0-9]([-a-z0-9\.])*,([5-9]|[1][0-2]),([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$",
    )
    .expect("valid pattern")
});

const DATA_DISK_CATEGORIES: &[&str] = &[
    "all",
    "cloud",
    "ephemeral_ssd",
    "cloud_essd",
    "cloud_efficiency",
    "cloud_ssd",
    "local_disk",
];

/// The node_pool resource type
pub struct NodePoolType;

impl ResourceType for NodePoolType {
    fn name(&self) -> &'static str {
        "node_pool"
    }

    fn schema(&self) -> ResourceSchema {
        node_pool()
    }
}

/// Build the node_pool attribute schema
pub fn node_pool() -> ResourceSchema {
    ResourceSchema::new("node_pool")
        .with_description("A worker node pool in a managed Kubernetes cluster")
        .attribute(AttributeSchema::new("cluster_id", AttributeType::String).required())
        .attribute(AttributeSchema::new("name", AttributeType::String).required())
        .attribute(AttributeSchema::new("node_count", types::non_negative_int()).required())
        .attribute(
            AttributeSchema::new(
                "vswitch_ids",
                AttributeType::Custom {
                    name: "VswitchIdList".to_string(),
                    base: Box::new(AttributeType::List(Box::new(AttributeType::String))),
                    validate: validate_vswitch_ids,
                },
            )
            .required(),
        )
        .attribute(
            AttributeSchema::new(
                "instance_types",
                AttributeType::Custom {
                    name: "InstanceTypeList".to_string(),
                    base: Box::new(AttributeType::List(Box::new(AttributeType::String))),
                    validate: validate_instance_types,
                },
            )
            .required(),
        )
        .attribute(
            AttributeSchema::new("password", AttributeType::String)
                .conflicts_with(&["key_name", "kms_encrypted_password"])
                .with_provider_name("login_password"),
        )
        .attribute(
            AttributeSchema::new("key_name", AttributeType::String)
                .conflicts_with(&["password", "kms_encrypted_password"])
                .with_provider_name("key_pair"),
        )
        .attribute(
            AttributeSchema::new("kms_encrypted_password", AttributeType::String)
                .conflicts_with(&["password", "key_name"]),
        )
        .attribute(AttributeSchema::new(
            "kms_encryption_context",
            AttributeType::Map(Box::new(AttributeType::String)),
        ))
        .attribute(
            AttributeSchema::new("security_group_id", AttributeType::String).computed(),
        )
        .attribute(
            AttributeSchema::new(
                "system_disk_category",
                AttributeType::Enum(vec![
                    "cloud_efficiency".to_string(),
                    "cloud_ssd".to_string(),
                ]),
            )
            .with_default(Value::String("cloud_efficiency".to_string())),
        )
        .attribute(
            AttributeSchema::new(
                "system_disk_size",
                AttributeType::Custom {
                    name: "SystemDiskSize".to_string(),
                    base: Box::new(AttributeType::Int),
                    validate: validate_system_disk_size,
                },
            )
            .with_default(Value::Int(40)),
        )
        .attribute(AttributeSchema::new("image_id", AttributeType::String).computed())
        .attribute(AttributeSchema::new(
            "data_disks",
            AttributeType::Custom {
                name: "DataDiskList".to_string(),
                base: Box::new(AttributeType::List(Box::new(AttributeType::Map(
                    Box::new(AttributeType::String),
                )))),
                validate: validate_data_disks,
            },
        ))
        .attribute(AttributeSchema::new(
            "tags",
            AttributeType::Custom {
                name: "TagList".to_string(),
                base: Box::new(AttributeType::List(Box::new(AttributeType::Map(
                    Box::new(AttributeType::String),
                )))),
                validate: validate_key_value_list,
            },
        ))
        .attribute(AttributeSchema::new(
            "labels",
            AttributeType::Custom {
                name: "LabelList".to_string(),
                base: Box::new(AttributeType::List(Box::new(AttributeType::Map(
                    Box::new(AttributeType::String),
                )))),
                validate: validate_key_value_list,
            },
        ))
        .attribute(AttributeSchema::new(
            "taints",
            AttributeType::Custom {
                name: "TaintList".to_string(),
                base: Box::new(AttributeType::List(Box::new(AttributeType::Map(
                    Box::new(AttributeType::String),
                )))),
                validate: validate_key_value_list,
            },
        ))
        .attribute(
            AttributeSchema::new(
                "node_name_mode",
                AttributeType::Custom {
                    name: "NodeNameMode".to_string(),
                    base: Box::new(AttributeType::String),
                    validate: validate_node_name_mode,
                },
            )
            .computed(),
        )
        .attribute(AttributeSchema::new("user_data", AttributeType::String))
        .attribute(AttributeSchema::new(
            "enable_auto_scaling",
            AttributeType::Bool,
        ))
        .attribute(AttributeSchema::new("min", types::non_negative_int()))
        .attribute(AttributeSchema::new("max", types::non_negative_int()))
        .attribute(AttributeSchema::new(
            "scaling_type",
            AttributeType::String,
        ))
        .attribute(AttributeSchema::new("vpc_id", AttributeType::String).computed())
}

fn validate_vswitch_ids(value: &Value) -> Result<(), String> {
    let Some(items) = value.as_list() else {
        return Err("Expected a list of vswitch ids".to_string());
    };
    if items.is_empty() {
        return Err("At least one vswitch id is required".to_string());
    }
    for item in items {
        let Some(id) = item.as_str() else {
            return Err("Vswitch ids must be strings".to_string());
        };
        if !VSWITCH_ID_RE.is_match(id) {
            return Err(format!("'{}' should start with 'vsw-'", id));
        }
    }
    Ok(())
}

fn validate_instance_types(value: &Value) -> Result<(), String> {
    let Some(items) = value.as_list() else {
        return Err("Expected a list of instance types".to_string());
    };
    if items.is_empty() || items.len() > 10 {
        return Err("Between 1 and 10 instance types are required".to_string());
    }
    for item in items {
        if item.as_str().is_none() {
            return Err("Instance types must be strings".to_string());
        }
    }
    Ok(())
}

fn validate_system_disk_size(value: &Value) -> Result<(), String> {
    match value.as_int() {
        Some(n) if (20..=32768).contains(&n) => Ok(()),
        Some(n) => Err(format!("System disk size {} must be between 20 and 32768", n)),
        None => Err("Expected integer".to_string()),
    }
}

fn validate_node_name_mode(value: &Value) -> Result<(), String> {
    let Some(mode) = value.as_str() else {
        return Err("Expected string".to_string());
    };
    if NODE_NAME_MODE_RE.is_match(mode) {
        Ok(())
    } else {
        Err(format!(
            "'{}' must look like 'customized,<prefix>,<ip substring length 5-12>,<suffix>'",
            mode
        ))
    }
}

fn validate_data_disks(value: &Value) -> Result<(), String> {
    let Some(disks) = value.as_list() else {
        return Err("Expected a list of data disks".to_string());
    };
    for disk in disks {
        let Some(fields) = disk.as_map() else {
            return Err("Each data disk must be a map".to_string());
        };
        if let Some(category) = fields.get("category") {
            let Some(category) = category.as_str() else {
                return Err("Data disk category must be a string".to_string());
            };
            if !DATA_DISK_CATEGORIES.contains(&category) {
                return Err(format!(
                    "Data disk category '{}' must be one of: {}",
                    category,
                    DATA_DISK_CATEGORIES.join(", ")
                ));
            }
        }
        if let Some(size) = fields.get("size")
            && size.as_int().is_none_or(|n| n <= 0)
        {
            return Err("Data disk size must be a positive integer".to_string());
        }
    }
    Ok(())
}

/// Tags, labels, and taints share the shape: a list of maps where "key"
/// is required and the remaining fields are optional strings
fn validate_key_value_list(value: &Value) -> Result<(), String> {
    let Some(items) = value.as_list() else {
        return Err("Expected a list of key/value entries".to_string());
    };
    for item in items {
        let Some(fields) = item.as_map() else {
            return Err("Each entry must be a map".to_string());
        };
        match fields.get("key") {
            Some(key) if key.as_str().is_some_and(|k| !k.is_empty()) => {}
            _ => return Err("Each entry requires a non-empty 'key'".to_string()),
        }
    }
    Ok(())
}
