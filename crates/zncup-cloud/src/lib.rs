//! zncup compute abstraction
//!
//! Domain types and the reconcile/poll core shared by the zncup CLIs.
//! The real Compute Engine backend lives in `zncup-gce`; everything
//! here is written against the [`ComputeApi`] trait so tests can swap
//! in a stub.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          znc-deploy / znc-undeploy            │
//! └──────────────────┬───────────────────────────┘
//!                    │
//! ┌──────────────────▼───────────────────────────┐
//! │                zncup-cloud                    │
//! │  trait ComputeApi { get/insert/delete ... }   │
//! │  reconcile (lookup → create, 404 = absent)    │
//! │  poll (await terminal operation status)       │
//! └──────────────────┬───────────────────────────┘
//!                    │
//! ┌──────────────────▼───────────────────────────┐
//! │          zncup-gce (Compute v1 REST)          │
//! └──────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod deploy;
pub mod error;
pub mod operation;
pub mod poll;
pub mod reconcile;
pub mod report;
pub mod resource;
pub mod teardown;

// Re-exports
pub use api::ComputeApi;
pub use deploy::{run_deploy, DeployRequest, DEFAULT_INTERFACE};
pub use error::{CloudError, Result};
pub use operation::{OpScope, OpStatus, Operation, OperationError, OperationErrorDetail};
pub use poll::{await_operation, PollOutcome, PollPolicy};
pub use reconcile::{Lookup, LookupPolicy};
pub use report::{DeployReport, ResourceKind, StepOutcome, StepReport, TeardownReport};
pub use resource::{
    AccessConfig, Address, Allowed, AttachedDisk, Firewall, InitializeParams, Instance,
    InstanceSpec, Metadata, MetadataItem, NetworkInterface, Tags,
};
pub use teardown::{run_teardown, TeardownRequest};
