//! Container-service provider for talus
//!
//! Manages Kubernetes node pools against the container-service ("cs")
//! control plane: typed API bindings, attribute schema, status polling,
//! and the Create/Read/Update/Delete lifecycle.

pub mod api;
pub mod poller;
pub mod provider;
pub mod schema;
pub mod user_data;

pub use api::{CsApiError, CsClient, CsConfig};
pub use provider::CsProvider;
