//! Compute Engine v1 REST client
//!
//! Direct REST implementation of the [`ComputeApi`] trait. Lookups
//! translate 404 into `None`; deletes do the same so an already-absent
//! resource never surfaces as an error. All other non-2xx responses
//! become [`GceError::Api`] carrying the message from the standard
//! error envelope when one is present.

use crate::auth;
use crate::error::{GceError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use zncup_cloud::{
    Address, ComputeApi, Firewall, Instance, NetworkInterface, OpScope, Operation,
};

const COMPUTE_API_BASE: &str = "https://compute.googleapis.com/compute/v1";

/// Client for the Compute Engine REST API, bound to one project.
#[derive(Clone)]
pub struct GceClient {
    http: reqwest::Client,
    token: String,
    project: String,
}

impl GceClient {
    pub fn new(project: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            project: project.into(),
        }
    }

    /// Build a client with a token from the environment or gcloud.
    pub async fn from_env(project: impl Into<String>) -> Result<Self> {
        let token = auth::access_token().await?;
        Ok(Self::new(project, token))
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    fn url(&self, path: &str) -> String {
        format!("{COMPUTE_API_BASE}/projects/{}/{path}", self.project)
    }

    async fn get_resource<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.url(path);
        tracing::debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let response = Self::check(response, path).await?;
        Ok(Some(response.json().await?))
    }

    async fn insert_resource<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Operation> {
        let url = self.url(path);
        tracing::debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        let response = Self::check(response, path).await?;
        Ok(response.json().await?)
    }

    async fn delete_resource(&self, path: &str) -> Result<Option<Operation>> {
        let url = self.url(path);
        tracing::debug!("DELETE {url}");
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let response = Self::check(response, path).await?;
        Ok(Some(response.json().await?))
    }

    async fn check(response: reqwest::Response, endpoint: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(GceError::Api {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// Pull the human-readable message out of the GCP error envelope
/// (`{"error": {"code": ..., "message": ...}}`), falling back to the
/// raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl ComputeApi for GceClient {
    async fn get_address(&self, region: &str, name: &str) -> zncup_cloud::Result<Option<Address>> {
        Ok(self
            .get_resource(&format!("regions/{region}/addresses/{name}"))
            .await?)
    }

    async fn insert_address(
        &self,
        region: &str,
        address: &Address,
    ) -> zncup_cloud::Result<Operation> {
        Ok(self
            .insert_resource(&format!("regions/{region}/addresses"), address)
            .await?)
    }

    async fn delete_address(
        &self,
        region: &str,
        name: &str,
    ) -> zncup_cloud::Result<Option<Operation>> {
        Ok(self
            .delete_resource(&format!("regions/{region}/addresses/{name}"))
            .await?)
    }

    async fn get_instance(&self, zone: &str, name: &str) -> zncup_cloud::Result<Option<Instance>> {
        Ok(self
            .get_resource(&format!("zones/{zone}/instances/{name}"))
            .await?)
    }

    async fn insert_instance(
        &self,
        zone: &str,
        instance: &Instance,
    ) -> zncup_cloud::Result<Operation> {
        Ok(self
            .insert_resource(&format!("zones/{zone}/instances"), instance)
            .await?)
    }

    async fn delete_instance(
        &self,
        zone: &str,
        name: &str,
    ) -> zncup_cloud::Result<Option<Operation>> {
        Ok(self
            .delete_resource(&format!("zones/{zone}/instances/{name}"))
            .await?)
    }

    async fn update_network_interface(
        &self,
        zone: &str,
        instance: &str,
        interface: &NetworkInterface,
    ) -> zncup_cloud::Result<Operation> {
        let nic = interface.name.as_deref().unwrap_or(zncup_cloud::DEFAULT_INTERFACE);
        let path = format!(
            "zones/{zone}/instances/{instance}/updateNetworkInterface?networkInterface={nic}"
        );
        let url = self.url(&path);
        tracing::debug!("PATCH {url}");
        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.token)
            .json(interface)
            .send()
            .await
            .map_err(GceError::from)?;

        let response = Self::check(response, &path).await?;
        Ok(response.json().await.map_err(GceError::from)?)
    }

    async fn get_firewall(&self, name: &str) -> zncup_cloud::Result<Option<Firewall>> {
        Ok(self
            .get_resource(&format!("global/firewalls/{name}"))
            .await?)
    }

    async fn insert_firewall(&self, firewall: &Firewall) -> zncup_cloud::Result<Operation> {
        Ok(self.insert_resource("global/firewalls", firewall).await?)
    }

    async fn delete_firewall(&self, name: &str) -> zncup_cloud::Result<Option<Operation>> {
        Ok(self
            .delete_resource(&format!("global/firewalls/{name}"))
            .await?)
    }

    async fn get_operation(&self, scope: &OpScope, name: &str) -> zncup_cloud::Result<Operation> {
        let path = match scope {
            OpScope::Zonal(zone) => format!("zones/{zone}/operations/{name}"),
            OpScope::Regional(region) => format!("regions/{region}/operations/{name}"),
            OpScope::Global => format!("global/operations/{name}"),
        };
        let found: Option<Operation> = self.get_resource(&path).await?;
        found.ok_or_else(|| {
            zncup_cloud::CloudError::Api(format!("operation '{name}' not found in {scope}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_project_scoped() {
        let client = GceClient::new("proj-1", "tok");
        assert_eq!(
            client.url("regions/us-west1/addresses/ip1"),
            "https://compute.googleapis.com/compute/v1/projects/proj-1/regions/us-west1/addresses/ip1"
        );
        assert_eq!(
            client.url("global/firewalls"),
            "https://compute.googleapis.com/compute/v1/projects/proj-1/global/firewalls"
        );
    }

    #[test]
    fn error_message_prefers_envelope() {
        let body = r#"{"error":{"code":403,"message":"Required 'compute.addresses.get' permission"}}"#;
        assert_eq!(
            error_message(body),
            "Required 'compute.addresses.get' permission"
        );
    }

    #[test]
    fn error_message_falls_back_to_body() {
        assert_eq!(error_message("upstream hiccup"), "upstream hiccup");
    }
}
