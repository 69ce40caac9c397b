//! Compute backend trait
//!
//! The reconcile and poll logic is written against this trait so the
//! real REST backend and the test stubs are interchangeable. The
//! project is part of the backend's own configuration; methods only
//! take the scope (zone/region) and resource names.

use crate::error::Result;
use crate::operation::{OpScope, Operation};
use crate::resource::{Address, Firewall, Instance, NetworkInterface};
use async_trait::async_trait;

/// Interface to the compute resource-management API.
///
/// Lookup methods (`get_*`) return `Ok(None)` when the resource does
/// not exist; that is a signal, not an error. Delete methods likewise
/// return `Ok(None)` when there was nothing to delete, and
/// `Ok(Some(op))` with the deletion operation otherwise.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    async fn get_address(&self, region: &str, name: &str) -> Result<Option<Address>>;
    async fn insert_address(&self, region: &str, address: &Address) -> Result<Operation>;
    async fn delete_address(&self, region: &str, name: &str) -> Result<Option<Operation>>;

    async fn get_instance(&self, zone: &str, name: &str) -> Result<Option<Instance>>;
    async fn insert_instance(&self, zone: &str, instance: &Instance) -> Result<Operation>;
    async fn delete_instance(&self, zone: &str, name: &str) -> Result<Option<Operation>>;

    /// Replace a named network interface on an instance. The interface
    /// body must carry the current fingerprint or the API rejects the
    /// write as conflicting.
    async fn update_network_interface(
        &self,
        zone: &str,
        instance: &str,
        interface: &NetworkInterface,
    ) -> Result<Operation>;

    async fn get_firewall(&self, name: &str) -> Result<Option<Firewall>>;
    async fn insert_firewall(&self, firewall: &Firewall) -> Result<Operation>;
    async fn delete_firewall(&self, name: &str) -> Result<Option<Operation>>;

    /// Fetch the current status of an operation via the
    /// scope-appropriate status endpoint.
    async fn get_operation(&self, scope: &OpScope, name: &str) -> Result<Operation>;
}
