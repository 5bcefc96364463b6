//! State file structures for persisting infrastructure state

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use talus_core::resource::Value;

/// The main state file structure that persists to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// State file format version
    pub version: u32,
    /// Monotonically increasing number for each state modification
    pub serial: u64,
    /// Unique identifier for this state lineage (prevents accidental overwrites)
    pub lineage: String,
    /// Version of Talus that last modified this state
    pub talus_version: String,
    /// All managed resources and their current state
    pub resources: Vec<ResourceState>,
}

impl StateFile {
    /// Current state file format version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new empty state file
    pub fn new() -> Self {
        Self::with_lineage(uuid::Uuid::new_v4().to_string())
    }

    /// Create a new state file with a specific lineage (for initialization)
    pub fn with_lineage(lineage: String) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            serial: 0,
            lineage,
            talus_version: env!("CARGO_PKG_VERSION").to_string(),
            resources: Vec::new(),
        }
    }

    /// Increment serial and update talus version for a new state write
    pub fn increment_serial(&mut self) {
        self.serial += 1;
        self.talus_version = env!("CARGO_PKG_VERSION").to_string();
    }

    /// Find a resource by type and name
    pub fn find_resource(&self, resource_type: &str, name: &str) -> Option<&ResourceState> {
        self.resources
            .iter()
            .find(|r| r.resource_type == resource_type && r.name == name)
    }

    /// Find a resource mutably by type and name
    pub fn find_resource_mut(
        &mut self,
        resource_type: &str,
        name: &str,
    ) -> Option<&mut ResourceState> {
        self.resources
            .iter_mut()
            .find(|r| r.resource_type == resource_type && r.name == name)
    }

    /// Add or update a resource in the state
    pub fn upsert_resource(&mut self, resource: ResourceState) {
        if let Some(existing) = self.find_resource_mut(&resource.resource_type, &resource.name) {
            *existing = resource;
        } else {
            self.resources.push(resource);
        }
    }

    /// Remove a resource from the state
    pub fn remove_resource(&mut self, resource_type: &str, name: &str) -> Option<ResourceState> {
        if let Some(pos) = self
            .resources
            .iter()
            .position(|r| r.resource_type == resource_type && r.name == name)
        {
            Some(self.resources.remove(pos))
        } else {
            None
        }
    }
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}

/// State of a single managed resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    /// Resource type (e.g., "node_pool")
    pub resource_type: String,
    /// Resource name (from the manifest)
    pub name: String,
    /// Provider name (e.g., "cs")
    pub provider: String,
    /// Remote identifier captured at creation time (e.g., np-1234)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// All attributes of the resource as JSON values
    pub attributes: HashMap<String, serde_json::Value>,
}

impl ResourceState {
    /// Create a new resource state
    pub fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            provider: provider.into(),
            identifier: None,
            attributes: HashMap::new(),
        }
    }

    /// Set the remote identifier
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set an attribute value
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Build a ResourceState from core attribute values
    pub fn from_values(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        provider: impl Into<String>,
        attributes: &HashMap<String, Value>,
    ) -> Self {
        let mut state = Self::new(resource_type, name, provider);
        for (key, value) in attributes {
            state.attributes.insert(key.clone(), value_to_json(value));
        }
        state
    }

    /// Convert the stored attributes back into core values
    pub fn to_values(&self) -> HashMap<String, Value> {
        self.attributes
            .iter()
            .filter_map(|(k, v)| json_to_value(v).map(|v| (k.clone(), v)))
            .collect()
    }
}

/// Convert a core attribute value to JSON for persistence
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Int(n) => serde_json::Value::Number((*n).into()),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert a persisted JSON value back into a core attribute value
///
/// Floats and nulls have no core representation and are dropped.
pub fn json_to_value(value: &serde_json::Value) -> Option<Value> {
    match value {
        serde_json::Value::String(s) => Some(Value::String(s.clone())),
        serde_json::Value::Number(n) => n.as_i64().map(Value::Int),
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_json::Value::Array(items) => {
            Some(Value::List(items.iter().filter_map(json_to_value).collect()))
        }
        serde_json::Value::Object(map) => Some(Value::Map(
            map.iter()
                .filter_map(|(k, v)| json_to_value(v).map(|v| (k.clone(), v)))
                .collect(),
        )),
        serde_json::Value::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_file_new() {
        let state = StateFile::new();
        assert_eq!(state.version, StateFile::CURRENT_VERSION);
        assert_eq!(state.serial, 0);
        assert!(!state.lineage.is_empty());
        assert!(state.resources.is_empty());
    }

    #[test]
    fn test_state_file_increment_serial() {
        let mut state = StateFile::new();
        assert_eq!(state.serial, 0);
        state.increment_serial();
        assert_eq!(state.serial, 1);
        state.increment_serial();
        assert_eq!(state.serial, 2);
    }

    #[test]
    fn test_state_file_upsert_resource() {
        let mut state = StateFile::new();

        let resource1 = ResourceState::new("node_pool", "default", "cs")
            .with_attribute("node_count", serde_json::json!(3));

        state.upsert_resource(resource1);
        assert_eq!(state.resources.len(), 1);

        // Update the same resource
        let resource2 = ResourceState::new("node_pool", "default", "cs")
            .with_attribute("node_count", serde_json::json!(5));

        state.upsert_resource(resource2);
        assert_eq!(state.resources.len(), 1);
        assert_eq!(
            state.resources[0].attributes.get("node_count"),
            Some(&serde_json::json!(5))
        );
    }

    #[test]
    fn test_state_file_remove_resource() {
        let mut state = StateFile::new();

        let resource = ResourceState::new("node_pool", "default", "cs");
        state.upsert_resource(resource);
        assert_eq!(state.resources.len(), 1);

        let removed = state.remove_resource("node_pool", "default");
        assert!(removed.is_some());
        assert_eq!(state.resources.len(), 0);

        // Removing non-existent resource returns None
        let removed = state.remove_resource("node_pool", "other");
        assert!(removed.is_none());
    }

    #[test]
    fn test_state_file_serialization() {
        let mut state = StateFile::new();
        let resource = ResourceState::new("node_pool", "default", "cs")
            .with_identifier("np-1234")
            .with_attribute("node_count", serde_json::json!(3))
            .with_attribute("cluster_id", serde_json::json!("c-abc123"));

        state.upsert_resource(resource);

        let json = serde_json::to_string_pretty(&state).unwrap();
        let deserialized: StateFile = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.version, state.version);
        assert_eq!(deserialized.serial, state.serial);
        assert_eq!(deserialized.lineage, state.lineage);
        assert_eq!(deserialized.resources.len(), 1);
        assert_eq!(
            deserialized.resources[0].identifier,
            Some("np-1234".to_string())
        );
    }

    #[test]
    fn test_value_json_round_trip() {
        let mut map = HashMap::new();
        map.insert("key".to_string(), Value::String("team".to_string()));
        let value = Value::List(vec![Value::Map(map), Value::Int(7), Value::Bool(true)]);

        let json = value_to_json(&value);
        let back = json_to_value(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_resource_state_from_values() {
        let mut attrs = HashMap::new();
        attrs.insert("node_count".to_string(), Value::Int(3));
        attrs.insert(
            "vswitch_ids".to_string(),
            Value::List(vec![Value::String("vsw-abc".to_string())]),
        );

        let state = ResourceState::from_values("node_pool", "default", "cs", &attrs);
        assert_eq!(state.attributes.get("node_count"), Some(&serde_json::json!(3)));

        let values = state.to_values();
        assert_eq!(values, attrs);
    }
}
