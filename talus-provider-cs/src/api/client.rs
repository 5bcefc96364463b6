//! HTTP client for the container-service control plane
//!
//! Thin reqwest wrapper with bearer-token auth. Not-found responses are
//! surfaced as `None` (describe) or success (delete) so callers never
//! have to sniff status codes.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use super::types::{
    ApiErrorBody, CreateNodePoolRequest, CreateNodePoolResponse, DecryptRequest, DecryptResponse,
    DescribeNodePoolResponse, UpdateNodePoolRequest, Vswitch,
};

/// Remote error code the control plane returns for a missing node pool
const NOT_FOUND_CODE: &str = "ErrorClusterNodePoolNotFound";

/// Errors from the control-plane API
#[derive(Debug, Error)]
pub enum CsApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

impl CsApiError {
    /// Whether this error means the node pool does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status, code, .. } => *status == 404 || code == NOT_FOUND_CODE,
            _ => false,
        }
    }

    /// Whether the request is worth retrying (network failures and
    /// server-side errors)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => *status >= 500,
        }
    }
}

/// Connection settings for the control plane
#[derive(Debug, Clone)]
pub struct CsConfig {
    /// Base URL, e.g. "https://cs.example.com"
    pub endpoint: String,
    pub region_id: String,
    /// Bearer token for authentication
    pub token: String,
}

/// Typed client for node-pool and supporting endpoints
pub struct CsClient {
    http: reqwest::Client,
    config: CsConfig,
}

impl CsClient {
    pub fn new(config: CsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn region_id(&self) -> &str {
        &self.config.region_id
    }

    /// Create a node pool, returning the remote identifier
    pub async fn create_node_pool(
        &self,
        cluster_id: &str,
        request: &CreateNodePoolRequest,
    ) -> Result<CreateNodePoolResponse, CsApiError> {
        let url = format!("{}/clusters/{}/nodepools", self.config.endpoint, cluster_id);
        debug!(cluster_id, name = %request.name, "creating node pool");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(request)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Apply a partial update to a node pool
    pub async fn update_node_pool(
        &self,
        cluster_id: &str,
        nodepool_id: &str,
        request: &UpdateNodePoolRequest,
    ) -> Result<(), CsApiError> {
        let url = format!(
            "{}/clusters/{}/nodepools/{}",
            self.config.endpoint, cluster_id, nodepool_id
        );
        debug!(cluster_id, nodepool_id, "updating node pool");

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.config.token)
            .json(request)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    /// Fetch the node pool's current snapshot, or `None` if it no longer
    /// exists
    pub async fn describe_node_pool(
        &self,
        cluster_id: &str,
        nodepool_id: &str,
    ) -> Result<Option<DescribeNodePoolResponse>, CsApiError> {
        let url = format!(
            "{}/clusters/{}/nodepools/{}",
            self.config.endpoint, cluster_id, nodepool_id
        );
        debug!(cluster_id, nodepool_id, "describing node pool");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        match check_status(response).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a node pool; deleting an already-absent pool succeeds
    pub async fn delete_node_pool(
        &self,
        cluster_id: &str,
        nodepool_id: &str,
    ) -> Result<(), CsApiError> {
        let url = format!(
            "{}/clusters/{}/nodepools/{}",
            self.config.endpoint, cluster_id, nodepool_id
        );
        debug!(cluster_id, nodepool_id, "deleting node pool");

        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        match check_status(response).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Describe a vswitch (used to derive the pool's vpc_id)
    pub async fn describe_vswitch(&self, vswitch_id: &str) -> Result<Vswitch, CsApiError> {
        let url = format!("{}/vswitches/{}", self.config.endpoint, vswitch_id);
        debug!(vswitch_id, "describing vswitch");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Decrypt a KMS-encrypted secret
    pub async fn kms_decrypt(&self, request: &DecryptRequest) -> Result<String, CsApiError> {
        let url = format!("{}/kms/decrypt", self.config.endpoint);
        debug!("decrypting kms ciphertext");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(request)
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: DecryptResponse = response.json().await?;
        Ok(body.plaintext)
    }
}

/// Turn a non-success response into a typed API error
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CsApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: ApiErrorBody = response.json().await.unwrap_or(ApiErrorBody {
        code: String::new(),
        message: String::new(),
    });

    if status == StatusCode::NOT_FOUND && body.code.is_empty() {
        return Err(CsApiError::Api {
            status: status.as_u16(),
            code: NOT_FOUND_CODE.to_string(),
            message: body.message,
        });
    }

    Err(CsApiError::Api {
        status: status.as_u16(),
        code: body.code,
        message: body.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_detected_by_status_or_code() {
        let by_status = CsApiError::Api {
            status: 404,
            code: String::new(),
            message: String::new(),
        };
        assert!(by_status.is_not_found());

        let by_code = CsApiError::Api {
            status: 400,
            code: NOT_FOUND_CODE.to_string(),
            message: String::new(),
        };
        assert!(by_code.is_not_found());

        let other = CsApiError::Api {
            status: 403,
            code: "Forbidden".to_string(),
            message: String::new(),
        };
        assert!(!other.is_not_found());
    }

    #[test]
    fn server_errors_are_transient() {
        let server = CsApiError::Api {
            status: 503,
            code: "Unavailable".to_string(),
            message: String::new(),
        };
        assert!(server.is_transient());

        let client = CsApiError::Api {
            status: 400,
            code: "BadRequest".to_string(),
            message: String::new(),
        };
        assert!(!client.is_transient());
    }
}
