//! Differ - Compare desired state with current state to generate a Plan
//!
//! Compares the "desired state" declared in the manifest with the "current
//! state" fetched from the Provider, and generates a list of required
//! Effects (Plan).

use std::collections::{HashMap, HashSet};

use crate::effect::Effect;
use crate::plan::Plan;
use crate::resource::{Resource, ResourceId, State, Value};

/// Result of a diff operation
#[derive(Debug, Clone, PartialEq)]
pub enum Diff {
    /// Resource does not exist -> needs creation
    Create(Resource),
    /// Resource exists with differences -> needs update
    Update {
        id: ResourceId,
        from: State,
        to: Resource,
        changed_attributes: Vec<String>,
    },
    /// Resource exists with no differences -> no action needed
    NoChange(ResourceId),
}

impl Diff {
    /// Returns whether this Diff involves a change
    pub fn is_change(&self) -> bool {
        !matches!(self, Diff::NoChange(_))
    }
}

/// Compare desired state with current state to compute a Diff
pub fn diff(desired: &Resource, current: &State, computed: &HashSet<String>) -> Diff {
    if !current.exists {
        return Diff::Create(desired.clone());
    }

    let changed = changed_attributes(&desired.attributes, &current.attributes, computed);

    if changed.is_empty() {
        Diff::NoChange(desired.id.clone())
    } else {
        Diff::Update {
            id: desired.id.clone(),
            from: current.clone(),
            to: desired.clone(),
            changed_attributes: changed,
        }
    }
}

/// Find attributes whose desired value differs from the current state.
///
/// An attribute present in the current state but no longer declared counts
/// as changed too, so dropping e.g. tags from the manifest clears them
/// remotely. Attributes in `computed` are exempt from that rule: the remote
/// side fills them in (vpc_id, security_group_id defaults) and their
/// absence from the manifest is not a removal.
pub fn changed_attributes(
    desired: &HashMap<String, Value>,
    current: &HashMap<String, Value>,
    computed: &HashSet<String>,
) -> Vec<String> {
    let mut changed = Vec::new();

    for (key, desired_value) in desired {
        match current.get(key) {
            Some(current_value) if current_value == desired_value => {}
            _ => changed.push(key.clone()),
        }
    }

    for key in current.keys() {
        if !desired.contains_key(key) && !computed.contains(key) {
            changed.push(key.clone());
        }
    }

    changed.sort();
    changed
}

/// Compute Diff for multiple resources and generate a Plan
pub fn create_plan(
    desired: &[Resource],
    current_states: &HashMap<ResourceId, State>,
    computed: &HashSet<String>,
) -> Plan {
    let mut plan = Plan::new();

    for resource in desired {
        let current = current_states
            .get(&resource.id)
            .cloned()
            .unwrap_or_else(|| State::not_found(resource.id.clone()));

        match diff(resource, &current, computed) {
            Diff::Create(r) => plan.add(Effect::Create(r)),
            Diff::Update { id, from, to, .. } => {
                plan.add(Effect::Update { id, from, to });
            }
            Diff::NoChange(_) => {}
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_computed() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn diff_create_when_not_exists() {
        let desired = Resource::new("node_pool", "default");
        let current = State::not_found(ResourceId::new("node_pool", "default"));

        let result = diff(&desired, &current, &no_computed());
        assert!(matches!(result, Diff::Create(_)));
    }

    #[test]
    fn diff_no_change_when_same() {
        let desired =
            Resource::new("node_pool", "default").with_attribute("node_count", Value::Int(3));

        let mut attrs = HashMap::new();
        attrs.insert("node_count".to_string(), Value::Int(3));
        let current = State::existing(ResourceId::new("node_pool", "default"), attrs);

        let result = diff(&desired, &current, &no_computed());
        assert!(matches!(result, Diff::NoChange(_)));
    }

    #[test]
    fn diff_update_when_different() {
        let desired =
            Resource::new("node_pool", "default").with_attribute("node_count", Value::Int(5));

        let mut attrs = HashMap::new();
        attrs.insert("node_count".to_string(), Value::Int(3));
        let current = State::existing(ResourceId::new("node_pool", "default"), attrs);

        let result = diff(&desired, &current, &no_computed());
        match result {
            Diff::Update {
                changed_attributes, ..
            } => {
                assert_eq!(changed_attributes, vec!["node_count".to_string()]);
            }
            _ => panic!("Expected Update"),
        }
    }

    #[test]
    fn changing_one_field_marks_only_that_field() {
        let mut desired = HashMap::new();
        desired.insert("node_count".to_string(), Value::Int(3));
        desired.insert(
            "image_id".to_string(),
            Value::String("img-2024".to_string()),
        );
        desired.insert(
            "instance_types".to_string(),
            Value::List(vec![Value::String("ecs.g6.large".to_string())]),
        );

        let mut current = desired.clone();
        current.insert(
            "image_id".to_string(),
            Value::String("img-2023".to_string()),
        );

        let changed = changed_attributes(&desired, &current, &no_computed());
        assert_eq!(changed, vec!["image_id".to_string()]);
    }

    #[test]
    fn removed_attribute_is_detected() {
        let mut desired = HashMap::new();
        desired.insert("node_count".to_string(), Value::Int(3));

        let mut current = desired.clone();
        current.insert(
            "tags".to_string(),
            Value::List(vec![Value::Map(HashMap::from([(
                "key".to_string(),
                Value::String("env".to_string()),
            )]))]),
        );

        let changed = changed_attributes(&desired, &current, &no_computed());
        assert_eq!(changed, vec!["tags".to_string()]);
    }

    #[test]
    fn computed_attributes_do_not_produce_diffs() {
        let mut desired = HashMap::new();
        desired.insert("node_count".to_string(), Value::Int(3));

        let mut current = desired.clone();
        // vpc_id is remote-computed and never declared in the manifest
        current.insert("vpc_id".to_string(), Value::String("vpc-abc".to_string()));

        let computed = HashSet::from(["vpc_id".to_string()]);
        assert!(changed_attributes(&desired, &current, &computed).is_empty());
    }

    #[test]
    fn create_plan_from_resources() {
        let resources = vec![
            Resource::new("node_pool", "new-pool"),
            Resource::new("node_pool", "existing-pool").with_attribute("node_count", Value::Int(4)),
        ];

        let mut current_states = HashMap::new();
        let mut attrs = HashMap::new();
        attrs.insert("node_count".to_string(), Value::Int(2));
        current_states.insert(
            ResourceId::new("node_pool", "existing-pool"),
            State::existing(ResourceId::new("node_pool", "existing-pool"), attrs),
        );

        let plan = create_plan(&resources, &current_states, &no_computed());

        assert_eq!(plan.effects().len(), 2);
        assert!(matches!(plan.effects()[0], Effect::Create(_)));
        assert!(matches!(plan.effects()[1], Effect::Update { .. }));
    }
}
