//! Node-pool lifecycle implementation
//!
//! Create, Read, Update, and Delete against the container-service control
//! plane. Updates are partial: only fields whose declared value differs
//! from the prior state are staged into the request body.

use std::collections::HashMap;
use std::time::Duration;

use tracing::info;

use talus_core::differ::changed_attributes;
use talus_core::provider::{BoxFuture, Provider, ProviderError, ProviderResult, ResourceType};
use talus_core::resource::{Resource, ResourceId, State, Value};

use crate::api::{
    AutoScaling, CreateNodePoolRequest, CsApiError, CsClient, CsConfig, DataDisk, DecryptRequest,
    Label, Tag, Taint, UpdateNodePoolRequest,
};
use crate::poller::StatusPoller;
use crate::schema::{self, NodePoolType};
use crate::user_data::encode_user_data;

const POLL_INTERVAL: Duration = Duration::from_secs(10);
const CREATE_TIMEOUT: Duration = Duration::from_secs(90 * 60);
const UPDATE_TIMEOUT: Duration = Duration::from_secs(60 * 60);
const DELETE_TIMEOUT: Duration = Duration::from_secs(60 * 60);
const DELETE_RETRY_WINDOW: Duration = Duration::from_secs(30 * 60);
const DELETE_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Provider for container-service node pools
pub struct CsProvider {
    client: CsClient,
}

impl CsProvider {
    pub fn new(client: CsClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: CsConfig) -> Self {
        Self::new(CsClient::new(config))
    }

    async fn do_create(&self, resource: Resource) -> ProviderResult<State> {
        let id = resource.id.clone();
        validate(&resource)?;

        let cluster_id = require_str(&resource, "cluster_id")?;
        let vswitch_ids = require_string_list(&resource, "vswitch_ids")?;
        let login_password = self.resolve_password(&resource).await?;
        let vpc_id = self.derive_vpc_id(&id, &vswitch_ids[0]).await?;

        let request = CreateNodePoolRequest {
            region_id: self.client.region_id().to_string(),
            name: require_str(&resource, "name")?,
            count: require_int(&resource, "node_count")?,
            vpc_id,
            vswitch_ids,
            instance_types: require_string_list(&resource, "instance_types")?,
            login_password,
            key_pair: resource.get_str("key_name").map(String::from),
            security_group_id: resource.get_str("security_group_id").map(String::from),
            system_disk_category: resource
                .get_str("system_disk_category")
                .unwrap_or("cloud_efficiency")
                .to_string(),
            system_disk_size: resource.get_int("system_disk_size").unwrap_or(40),
            image_id: resource.get_str("image_id").map(String::from),
            data_disks: build_data_disks(&resource.attributes),
            tags: build_tags(&resource.attributes),
            labels: build_labels(&resource.attributes),
            taints: build_taints(&resource.attributes),
            node_name_mode: resource.get_str("node_name_mode").map(String::from),
            user_data: resource.get_str("user_data").map(encode_user_data),
            auto_scaling: build_auto_scaling(&resource.attributes),
        };

        let created = self
            .client
            .create_node_pool(&cluster_id, &request)
            .await
            .map_err(|e| remote_error("create node pool", e).for_resource(id.clone()))?;
        let nodepool_id = created.nodepool_id;
        info!(%id, %nodepool_id, "node pool created, waiting for active");

        let poller = StatusPoller::new(POLL_INTERVAL, CREATE_TIMEOUT)
            .pending(&["initial"])
            .target(&["active"])
            .failure(&["deleting", "failed"]);
        self.poll_node_pool(&cluster_id, &nodepool_id, poller, "create", &id)
            .await?;

        // Run the update pass to settle anything the creation call could
        // not carry, seeding the credential and user-data fields we just
        // sent so they do not read as changes.
        let mut current = self.do_read(resource.clone(), Some(nodepool_id.clone())).await?;
        for key in [
            "password",
            "key_name",
            "kms_encrypted_password",
            "kms_encryption_context",
            "user_data",
        ] {
            if let Some(value) = resource.attributes.get(key) {
                current.attributes.insert(key.to_string(), value.clone());
            }
        }
        self.do_update(id, nodepool_id, current, resource).await
    }

    async fn do_update(
        &self,
        id: ResourceId,
        identifier: String,
        from: State,
        to: Resource,
    ) -> ProviderResult<State> {
        validate(&to)?;
        let cluster_id = require_str(&to, "cluster_id")?;

        let old_count = from.get_int("node_count").unwrap_or(0);
        let new_count = require_int(&to, "node_count")?;
        if new_count < old_count {
            return Err(ProviderError::new(format!(
                "node_count cannot shrink from {} to {}; remove unwanted nodes before scaling in",
                old_count, new_count
            ))
            .for_resource(id));
        }

        let computed = schema::node_pool().computed_attribute_names();
        let changed = changed_attributes(&to.attributes, &from.attributes, &computed);
        let is_changed = |key: &str| changed.iter().any(|k| k == key);

        let mut request = UpdateNodePoolRequest::default();
        let mut dirty = false;

        if new_count != old_count {
            // The remote side scales by delta, not absolute count
            request.count = Some(new_count - old_count);
            dirty = true;
        }
        if is_changed("name") {
            request.name = to.get_str("name").map(String::from);
            dirty = true;
        }
        if is_changed("vswitch_ids") {
            let vswitch_ids = require_string_list(&to, "vswitch_ids")?;
            request.vpc_id = Some(self.derive_vpc_id(&id, &vswitch_ids[0]).await?);
            request.vswitch_ids = Some(vswitch_ids);
            dirty = true;
        }
        if is_changed("instance_types") {
            request.instance_types = Some(require_string_list(&to, "instance_types")?);
            dirty = true;
        }
        if is_changed("security_group_id") {
            request.security_group_id = to.get_str("security_group_id").map(String::from);
            dirty = true;
        }
        if is_changed("system_disk_category") {
            request.system_disk_category = to.get_str("system_disk_category").map(String::from);
            dirty = true;
        }
        if is_changed("system_disk_size") {
            request.system_disk_size = to.get_int("system_disk_size");
            dirty = true;
        }
        if is_changed("image_id") {
            request.image_id = to.get_str("image_id").map(String::from);
            dirty = true;
        }
        if is_changed("data_disks") {
            request.data_disks = Some(build_data_disks(&to.attributes));
            dirty = true;
        }
        if is_changed("tags") {
            request.tags = Some(build_tags(&to.attributes));
            dirty = true;
        }
        if is_changed("labels") {
            request.labels = Some(build_labels(&to.attributes));
            dirty = true;
        }
        if is_changed("taints") {
            request.taints = Some(build_taints(&to.attributes));
            dirty = true;
        }
        if is_changed("node_name_mode") {
            request.node_name_mode = to.get_str("node_name_mode").map(String::from);
            dirty = true;
        }
        if is_changed("user_data") {
            // A removed user_data declaration clears the remote payload
            request.user_data = Some(
                to.get_str("user_data")
                    .map(encode_user_data)
                    .unwrap_or_default(),
            );
            dirty = true;
        }
        if is_changed("enable_auto_scaling")
            || is_changed("min")
            || is_changed("max")
            || is_changed("scaling_type")
        {
            request.auto_scaling = build_auto_scaling(&to.attributes);
            dirty = true;
        }
        if is_changed("password") || is_changed("kms_encrypted_password") || is_changed("key_name")
        {
            dirty = true;
        }

        if dirty {
            // The remote update always requires the node credential
            request.login_password = self.resolve_password(&to).await?;
            request.key_pair = to.get_str("key_name").map(String::from);

            self.client
                .update_node_pool(&cluster_id, &identifier, &request)
                .await
                .map_err(|e| remote_error("update node pool", e).for_resource(id.clone()))?;
            info!(%id, nodepool_id = %identifier, "node pool update accepted, waiting for active");

            let poller = StatusPoller::new(POLL_INTERVAL, UPDATE_TIMEOUT)
                .pending(&["scaling"])
                .target(&["active"])
                .failure(&["deleting", "failed"]);
            self.poll_node_pool(&cluster_id, &identifier, poller, "update", &id)
                .await?;
        }

        self.do_read(to, Some(identifier)).await
    }

    async fn do_read(
        &self,
        resource: Resource,
        identifier: Option<String>,
    ) -> ProviderResult<State> {
        let id = resource.id.clone();
        let Some(identifier) = identifier else {
            return Ok(State::not_found(id));
        };
        let cluster_id = require_str(&resource, "cluster_id")?;

        let remote = self
            .client
            .describe_node_pool(&cluster_id, &identifier)
            .await
            .map_err(|e| remote_error("describe node pool", e).for_resource(id.clone()))?;
        let Some(remote) = remote else {
            return Ok(State::not_found(id));
        };

        let mut attrs = HashMap::new();
        attrs.insert("cluster_id".to_string(), Value::String(cluster_id));
        attrs.insert("name".to_string(), Value::String(remote.name));
        attrs.insert("node_count".to_string(), Value::Int(remote.total_nodes));
        attrs.insert(
            "vswitch_ids".to_string(),
            Value::List(remote.vswitch_ids.into_iter().map(Value::String).collect()),
        );
        attrs.insert(
            "instance_types".to_string(),
            Value::List(
                remote
                    .instance_types
                    .into_iter()
                    .map(Value::String)
                    .collect(),
            ),
        );
        if let Some(vpc_id) = remote.vpc_id {
            attrs.insert("vpc_id".to_string(), Value::String(vpc_id));
        }
        if let Some(group) = remote.security_group_id {
            attrs.insert("security_group_id".to_string(), Value::String(group));
        }
        if let Some(category) = remote.system_disk_category {
            attrs.insert("system_disk_category".to_string(), Value::String(category));
        }
        if let Some(size) = remote.system_disk_size {
            attrs.insert("system_disk_size".to_string(), Value::Int(size));
        }
        if let Some(image_id) = remote.image_id {
            attrs.insert("image_id".to_string(), Value::String(image_id));
        }
        if let Some(mode) = remote.node_name_mode {
            attrs.insert("node_name_mode".to_string(), Value::String(mode));
        }
        if let Some(user_data) = remote.user_data {
            attrs.insert("user_data".to_string(), Value::String(user_data));
        }
        if !remote.data_disks.is_empty() {
            attrs.insert(
                "data_disks".to_string(),
                Value::List(remote.data_disks.iter().map(disk_to_value).collect()),
            );
        }
        if !remote.tags.is_empty() {
            attrs.insert(
                "tags".to_string(),
                Value::List(remote.tags.iter().map(tag_to_value).collect()),
            );
        }
        if !remote.labels.is_empty() {
            attrs.insert(
                "labels".to_string(),
                Value::List(remote.labels.iter().map(label_to_value).collect()),
            );
        }
        if !remote.taints.is_empty() {
            attrs.insert(
                "taints".to_string(),
                Value::List(remote.taints.iter().map(taint_to_value).collect()),
            );
        }
        // Autoscaling settings are mirrored only when declared locally,
        // so undeclared pools do not accumulate remote defaults
        if let Some(scaling) = remote.auto_scaling {
            if resource.attributes.contains_key("enable_auto_scaling") {
                attrs.insert(
                    "enable_auto_scaling".to_string(),
                    Value::Bool(scaling.enable),
                );
            }
            if resource.attributes.contains_key("min")
                && let Some(min) = scaling.min_instances
            {
                attrs.insert("min".to_string(), Value::Int(min));
            }
            if resource.attributes.contains_key("max")
                && let Some(max) = scaling.max_instances
            {
                attrs.insert("max".to_string(), Value::Int(max));
            }
            if resource.attributes.contains_key("scaling_type")
                && let Some(kind) = scaling.scaling_type
            {
                attrs.insert("scaling_type".to_string(), Value::String(kind));
            }
        }

        Ok(State::existing(id, attrs).with_identifier(identifier))
    }

    async fn do_delete(&self, resource: Resource, identifier: String) -> ProviderResult<()> {
        let id = resource.id.clone();
        let cluster_id = require_str(&resource, "cluster_id")?;

        let deadline = tokio::time::Instant::now() + DELETE_RETRY_WINDOW;
        loop {
            match self.client.delete_node_pool(&cluster_id, &identifier).await {
                Ok(()) => break,
                Err(e)
                    if e.is_transient()
                        && tokio::time::Instant::now() + DELETE_RETRY_INTERVAL < deadline =>
                {
                    tokio::time::sleep(DELETE_RETRY_INTERVAL).await;
                }
                Err(e) => return Err(remote_error("delete node pool", e).for_resource(id)),
            }
        }
        info!(%id, nodepool_id = %identifier, "node pool deletion accepted, waiting for removal");

        let poller = StatusPoller::new(POLL_INTERVAL, DELETE_TIMEOUT).pending(&["active", "deleting"]);
        self.poll_node_pool(&cluster_id, &identifier, poller, "delete", &id)
            .await
    }

    async fn poll_node_pool(
        &self,
        cluster_id: &str,
        nodepool_id: &str,
        poller: StatusPoller,
        operation: &str,
        id: &ResourceId,
    ) -> ProviderResult<()> {
        poller
            .wait_for(|| {
                let client = &self.client;
                async move {
                    client
                        .describe_node_pool(cluster_id, nodepool_id)
                        .await
                        .map(|remote| remote.map(|r| r.state))
                }
            })
            .await
            .map(|_| ())
            .map_err(|e| {
                ProviderError::new(format!("{} did not converge: {}", operation, e))
                    .for_resource(id.clone())
            })
    }

    async fn resolve_password(&self, resource: &Resource) -> ProviderResult<Option<String>> {
        if let Some(password) = resource.get_str("password") {
            return Ok(Some(password.to_string()));
        }
        let Some(ciphertext) = resource.get_str("kms_encrypted_password") else {
            return Ok(None);
        };

        let encryption_context = resource
            .attributes
            .get("kms_encryption_context")
            .and_then(Value::as_map)
            .map(|context| {
                context
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        let plaintext = self
            .client
            .kms_decrypt(&DecryptRequest {
                ciphertext_blob: ciphertext.to_string(),
                encryption_context,
            })
            .await
            .map_err(|e| {
                remote_error("decrypt login password", e).for_resource(resource.id.clone())
            })?;
        Ok(Some(plaintext))
    }

    async fn derive_vpc_id(&self, id: &ResourceId, vswitch_id: &str) -> ProviderResult<String> {
        let vswitch = self
            .client
            .describe_vswitch(vswitch_id)
            .await
            .map_err(|e| remote_error("describe vswitch", e).for_resource(id.clone()))?;
        Ok(vswitch.vpc_id)
    }
}

impl Provider for CsProvider {
    fn name(&self) -> &'static str {
        "cs"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        vec![Box::new(NodePoolType)]
    }

    fn read(
        &self,
        resource: &Resource,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        let identifier = identifier.map(String::from);
        Box::pin(async move { self.do_read(resource, identifier).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.do_create(resource).await })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move { self.do_update(id, identifier, from, to).await })
    }

    fn delete(&self, resource: &Resource, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let resource = resource.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.do_delete(resource, identifier).await })
    }
}

fn validate(resource: &Resource) -> ProviderResult<()> {
    schema::node_pool().validate(&resource.attributes).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        ProviderError::new(format!("validation failed: {}", messages.join("; ")))
            .for_resource(resource.id.clone())
    })
}

fn remote_error(operation: &str, err: CsApiError) -> ProviderError {
    ProviderError::new(format!("{} failed: {}", operation, err)).with_cause(err)
}

fn require_str(resource: &Resource, key: &str) -> ProviderResult<String> {
    resource.get_str(key).map(String::from).ok_or_else(|| {
        ProviderError::new(format!("attribute '{}' is required", key))
            .for_resource(resource.id.clone())
    })
}

fn require_int(resource: &Resource, key: &str) -> ProviderResult<i64> {
    resource.get_int(key).ok_or_else(|| {
        ProviderError::new(format!("attribute '{}' is required", key))
            .for_resource(resource.id.clone())
    })
}

fn require_string_list(resource: &Resource, key: &str) -> ProviderResult<Vec<String>> {
    let items: Option<Vec<String>> = resource
        .attributes
        .get(key)
        .and_then(Value::as_list)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        });
    match items {
        Some(items) if !items.is_empty() => Ok(items),
        _ => Err(
            ProviderError::new(format!("attribute '{}' requires at least one entry", key))
                .for_resource(resource.id.clone()),
        ),
    }
}

fn map_str(fields: &HashMap<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(String::from)
}

fn build_data_disks(attrs: &HashMap<String, Value>) -> Vec<DataDisk> {
    attrs
        .get("data_disks")
        .and_then(Value::as_list)
        .map(|disks| {
            disks
                .iter()
                .filter_map(Value::as_map)
                .map(|fields| DataDisk {
                    category: map_str(fields, "category"),
                    size: fields.get("size").and_then(Value::as_int),
                    snapshot_id: map_str(fields, "snapshot_id"),
                    name: map_str(fields, "name"),
                    device: map_str(fields, "device"),
                    kms_key_id: map_str(fields, "kms_key_id"),
                    encrypted: fields.get("encrypted").and_then(Value::as_bool),
                    auto_snapshot_policy_id: map_str(fields, "auto_snapshot_policy_id"),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn build_tags(attrs: &HashMap<String, Value>) -> Vec<Tag> {
    attrs
        .get("tags")
        .and_then(Value::as_list)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_map)
                .filter_map(|fields| {
                    Some(Tag {
                        key: map_str(fields, "key")?,
                        value: map_str(fields, "value"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn build_labels(attrs: &HashMap<String, Value>) -> Vec<Label> {
    attrs
        .get("labels")
        .and_then(Value::as_list)
        .map(|labels| {
            labels
                .iter()
                .filter_map(Value::as_map)
                .filter_map(|fields| {
                    Some(Label {
                        key: map_str(fields, "key")?,
                        value: map_str(fields, "value"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn build_taints(attrs: &HashMap<String, Value>) -> Vec<Taint> {
    attrs
        .get("taints")
        .and_then(Value::as_list)
        .map(|taints| {
            taints
                .iter()
                .filter_map(Value::as_map)
                .filter_map(|fields| {
                    Some(Taint {
                        key: map_str(fields, "key")?,
                        value: map_str(fields, "value"),
                        effect: map_str(fields, "effect"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn build_auto_scaling(attrs: &HashMap<String, Value>) -> Option<AutoScaling> {
    let declared = ["enable_auto_scaling", "min", "max", "scaling_type"]
        .iter()
        .any(|key| attrs.contains_key(*key));
    if !declared {
        return None;
    }
    // Bounds stage even without the enable flag, which defaults to off
    Some(AutoScaling {
        enable: attrs
            .get("enable_auto_scaling")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        min_instances: attrs.get("min").and_then(Value::as_int),
        max_instances: attrs.get("max").and_then(Value::as_int),
        scaling_type: attrs.get("scaling_type").and_then(Value::as_str).map(String::from),
    })
}

fn disk_to_value(disk: &DataDisk) -> Value {
    let mut fields = HashMap::new();
    if let Some(ref category) = disk.category {
        fields.insert("category".to_string(), Value::String(category.clone()));
    }
    if let Some(size) = disk.size {
        fields.insert("size".to_string(), Value::Int(size));
    }
    if let Some(ref snapshot_id) = disk.snapshot_id {
        fields.insert("snapshot_id".to_string(), Value::String(snapshot_id.clone()));
    }
    if let Some(ref name) = disk.name {
        fields.insert("name".to_string(), Value::String(name.clone()));
    }
    if let Some(ref device) = disk.device {
        fields.insert("device".to_string(), Value::String(device.clone()));
    }
    if let Some(ref kms_key_id) = disk.kms_key_id {
        fields.insert("kms_key_id".to_string(), Value::String(kms_key_id.clone()));
    }
    if let Some(encrypted) = disk.encrypted {
        fields.insert("encrypted".to_string(), Value::Bool(encrypted));
    }
    if let Some(ref policy) = disk.auto_snapshot_policy_id {
        fields.insert(
            "auto_snapshot_policy_id".to_string(),
            Value::String(policy.clone()),
        );
    }
    Value::Map(fields)
}

fn tag_to_value(tag: &Tag) -> Value {
    let mut fields = HashMap::new();
    fields.insert("key".to_string(), Value::String(tag.key.clone()));
    if let Some(ref value) = tag.value {
        fields.insert("value".to_string(), Value::String(value.clone()));
    }
    Value::Map(fields)
}

fn label_to_value(label: &Label) -> Value {
    let mut fields = HashMap::new();
    fields.insert("key".to_string(), Value::String(label.key.clone()));
    if let Some(ref value) = label.value {
        fields.insert("value".to_string(), Value::String(value.clone()));
    }
    Value::Map(fields)
}

fn taint_to_value(taint: &Taint) -> Value {
    let mut fields = HashMap::new();
    fields.insert("key".to_string(), Value::String(taint.key.clone()));
    if let Some(ref value) = taint.value {
        fields.insert("value".to_string(), Value::String(value.clone()));
    }
    if let Some(ref effect) = taint.effect {
        fields.insert("effect".to_string(), Value::String(effect.clone()));
    }
    Value::Map(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_scaling_absent_when_nothing_declared() {
        assert!(build_auto_scaling(&HashMap::new()).is_none());
    }

    #[test]
    fn auto_scaling_bounds_stage_without_enable_flag() {
        let mut attrs = HashMap::new();
        attrs.insert("min".to_string(), Value::Int(1));
        attrs.insert("max".to_string(), Value::Int(10));

        let scaling = build_auto_scaling(&attrs).unwrap();
        assert!(!scaling.enable);
        assert_eq!(scaling.min_instances, Some(1));
        assert_eq!(scaling.max_instances, Some(10));

        attrs.insert("enable_auto_scaling".to_string(), Value::Bool(true));
        assert!(build_auto_scaling(&attrs).unwrap().enable);
    }

    #[test]
    fn tags_without_key_are_dropped() {
        let mut keyless = HashMap::new();
        keyless.insert("value".to_string(), Value::String("orphan".to_string()));
        let mut tagged = HashMap::new();
        tagged.insert("key".to_string(), Value::String("env".to_string()));
        tagged.insert("value".to_string(), Value::String("prod".to_string()));

        let mut attrs = HashMap::new();
        attrs.insert(
            "tags".to_string(),
            Value::List(vec![Value::Map(keyless), Value::Map(tagged)]),
        );

        let tags = build_tags(&attrs);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].key, "env");
    }

    #[test]
    fn data_disk_values_round_trip() {
        let disk = DataDisk {
            category: Some("cloud_essd".to_string()),
            size: Some(100),
            snapshot_id: None,
            name: Some("scratch".to_string()),
            device: None,
            kms_key_id: None,
            encrypted: Some(true),
            auto_snapshot_policy_id: None,
        };

        let mut attrs = HashMap::new();
        attrs.insert("data_disks".to_string(), Value::List(vec![disk_to_value(&disk)]));

        assert_eq!(build_data_disks(&attrs), vec![disk]);
    }
}
