//! Effect - Side effects as values
//!
//! An Effect describes one remote operation without performing it.
//! Effects are collected into a Plan and executed by the Interpreter.

use crate::resource::{Resource, ResourceId, State};

/// A single remote operation to be performed
#[derive(Debug, Clone)]
pub enum Effect {
    /// Fetch the current remote state of a resource
    Read(Resource),
    /// Create a resource that does not exist yet
    Create(Resource),
    /// Update an existing resource in place
    Update {
        id: ResourceId,
        from: State,
        to: Resource,
    },
    /// Delete a resource
    ///
    /// Carries the last recorded declaration (delete endpoints need
    /// attributes like cluster_id) and the remote identifier. A missing
    /// identifier means the resource was never created remotely.
    Delete {
        resource: Resource,
        identifier: Option<String>,
    },
}

impl Effect {
    /// Returns whether this Effect mutates remote state
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Effect::Read(_))
    }

    /// The identity of the resource this Effect targets
    pub fn resource_id(&self) -> &ResourceId {
        match self {
            Effect::Read(r) | Effect::Create(r) | Effect::Delete { resource: r, .. } => &r.id,
            Effect::Update { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_is_not_mutating() {
        let effect = Effect::Read(Resource::new("node_pool", "default"));
        assert!(!effect.is_mutating());
    }

    #[test]
    fn create_update_delete_are_mutating() {
        let id = ResourceId::new("node_pool", "default");
        assert!(Effect::Create(Resource::new("node_pool", "default")).is_mutating());
        assert!(
            Effect::Update {
                id: id.clone(),
                from: State::not_found(id.clone()),
                to: Resource::new("node_pool", "default"),
            }
            .is_mutating()
        );
        assert!(
            Effect::Delete {
                resource: Resource::new("node_pool", "default"),
                identifier: Some("np-1".to_string()),
            }
            .is_mutating()
        );
    }

    #[test]
    fn delete_targets_recorded_resource() {
        let effect = Effect::Delete {
            resource: Resource::new("node_pool", "old"),
            identifier: None,
        };
        assert_eq!(effect.resource_id().to_string(), "node_pool.old");
    }
}
