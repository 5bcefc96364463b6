//! Typed bindings for the container-service control-plane API

mod client;
mod types;

pub use client::{CsApiError, CsClient, CsConfig};
pub use types::*;
