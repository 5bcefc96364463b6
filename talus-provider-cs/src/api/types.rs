//! Request and response structures for the node-pool API
//!
//! Update requests serialize only the fields that were staged; absent
//! fields are omitted from the body so the remote side treats the
//! request as a partial update.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body for `POST /clusters/{cluster_id}/nodepools`
#[derive(Debug, Clone, Serialize)]
pub struct CreateNodePoolRequest {
    pub region_id: String,
    pub name: String,
    pub count: i64,
    pub vpc_id: String,
    pub vswitch_ids: Vec<String>,
    pub instance_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_pair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_group_id: Option<String>,
    pub system_disk_category: String,
    pub system_disk_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_disks: Vec<DataDisk>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<Taint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scaling: Option<AutoScaling>,
}

/// Body for `PUT /clusters/{cluster_id}/nodepools/{nodepool_id}`
///
/// `count` carries the node delta (new minus old), not the absolute
/// count.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateNodePoolRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vswitch_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_pair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_disk_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_disk_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_disks: Option<Vec<DataDisk>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Label>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taints: Option<Vec<Taint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scaling: Option<AutoScaling>,
}

/// Response from `POST /clusters/{cluster_id}/nodepools`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNodePoolResponse {
    pub nodepool_id: String,
}

/// Response from `GET /clusters/{cluster_id}/nodepools/{nodepool_id}`
#[derive(Debug, Clone, Deserialize)]
pub struct DescribeNodePoolResponse {
    pub nodepool_id: String,
    pub name: String,
    /// Lifecycle status, e.g. "initial", "scaling", "active", "deleting"
    pub state: String,
    pub total_nodes: i64,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub vswitch_ids: Vec<String>,
    #[serde(default)]
    pub instance_types: Vec<String>,
    #[serde(default)]
    pub security_group_id: Option<String>,
    #[serde(default)]
    pub system_disk_category: Option<String>,
    #[serde(default)]
    pub system_disk_size: Option<i64>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub data_disks: Vec<DataDisk>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub taints: Vec<Taint>,
    #[serde(default)]
    pub node_name_mode: Option<String>,
    #[serde(default)]
    pub user_data: Option<String>,
    #[serde(default)]
    pub auto_scaling: Option<AutoScaling>,
}

/// A data disk attached to each node in the pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataDisk {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub snapshot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kms_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub encrypted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub auto_snapshot_policy_id: Option<String>,
}

/// A key/value tag applied to pool instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
}

/// A Kubernetes label applied to pool nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
}

/// A Kubernetes taint applied to pool nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taint {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub effect: Option<String>,
}

/// Autoscaling settings for the pool's scaling group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoScaling {
    pub enable: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_instances: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_instances: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub scaling_type: Option<String>,
}

/// Response from `GET /vswitches/{vswitch_id}`
#[derive(Debug, Clone, Deserialize)]
pub struct Vswitch {
    pub vswitch_id: String,
    pub vpc_id: String,
}

/// Body for `POST /kms/decrypt`
#[derive(Debug, Clone, Serialize)]
pub struct DecryptRequest {
    pub ciphertext_blob: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub encryption_context: HashMap<String, String>,
}

/// Response from `POST /kms/decrypt`
#[derive(Debug, Clone, Deserialize)]
pub struct DecryptResponse {
    pub plaintext: String,
}

/// Error body returned by the control plane on failures
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_serializes_only_staged_fields() {
        let request = UpdateNodePoolRequest {
            count: Some(2),
            ..Default::default()
        };

        let json = serde_json::to_value(&request).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object.get("count"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn empty_update_request_serializes_to_empty_object() {
        let request = UpdateNodePoolRequest::default();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn auto_scaling_type_field_renamed() {
        let scaling = AutoScaling {
            enable: true,
            min_instances: Some(1),
            max_instances: Some(10),
            scaling_type: Some("cpu".to_string()),
        };

        let json = serde_json::to_value(&scaling).unwrap();
        assert_eq!(json.get("type"), Some(&serde_json::json!("cpu")));
    }

    #[test]
    fn describe_response_tolerates_missing_optionals() {
        let json = serde_json::json!({
            "nodepool_id": "np-1234",
            "name": "default",
            "state": "active",
            "total_nodes": 3
        });

        let response: DescribeNodePoolResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.state, "active");
        assert!(response.vswitch_ids.is_empty());
        assert!(response.auto_scaling.is_none());
    }
}
