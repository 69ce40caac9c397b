//! In-memory stub backend shared by the flow tests.
//!
//! Records every call by method name so tests can assert how often a
//! create or delete was actually issued.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use zncup_cloud::{
    Address, CloudError, ComputeApi, Firewall, Instance, NetworkInterface, OpScope, OpStatus,
    Operation, OperationError, OperationErrorDetail, Result,
};

/// Address string the stub allocates for every reservation.
pub const STUB_IP: &str = "203.0.113.5";

#[derive(Default)]
struct State {
    addresses: HashMap<(String, String), Address>,
    instances: HashMap<(String, String), Instance>,
    firewalls: HashMap<String, Firewall>,
    calls: HashMap<String, usize>,
    op_counter: u32,
    /// Operations never report DONE; polls run into the ceiling.
    never_done: bool,
    /// Instance deletion completes with an error payload.
    fail_instance_delete: bool,
    /// Address lookups fail with a transport-style error.
    fail_address_lookup: bool,
}

pub struct StubCompute {
    state: Mutex<State>,
}

#[allow(dead_code)]
impl StubCompute {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    pub fn never_done(self) -> Self {
        self.state.lock().unwrap().never_done = true;
        self
    }

    pub fn fail_instance_delete(self) -> Self {
        self.state.lock().unwrap().fail_instance_delete = true;
        self
    }

    pub fn fail_address_lookup(self) -> Self {
        self.state.lock().unwrap().fail_address_lookup = true;
        self
    }

    pub fn seed_address(&self, region: &str, name: &str, ip: &str) {
        let mut state = self.state.lock().unwrap();
        state.addresses.insert(
            (region.to_string(), name.to_string()),
            Address {
                name: name.to_string(),
                address: Some(ip.to_string()),
                ..Default::default()
            },
        );
    }

    pub fn seed_instance(&self, zone: &str, instance: Instance) {
        let mut state = self.state.lock().unwrap();
        state
            .instances
            .insert((zone.to_string(), instance.name.clone()), instance);
    }

    pub fn seed_firewall(&self, firewall: Firewall) {
        let mut state = self.state.lock().unwrap();
        state.firewalls.insert(firewall.name.clone(), firewall);
    }

    /// Number of times a trait method was invoked.
    pub fn calls(&self, method: &str) -> usize {
        *self
            .state
            .lock()
            .unwrap()
            .calls
            .get(method)
            .unwrap_or(&0)
    }

    pub fn instance(&self, zone: &str, name: &str) -> Option<Instance> {
        self.state
            .lock()
            .unwrap()
            .instances
            .get(&(zone.to_string(), name.to_string()))
            .cloned()
    }

    pub fn firewall(&self, name: &str) -> Option<Firewall> {
        self.state.lock().unwrap().firewalls.get(name).cloned()
    }
}

impl State {
    fn record(&mut self, method: &str) {
        *self.calls.entry(method.to_string()).or_insert(0) += 1;
    }

    fn next_op(&mut self) -> Operation {
        self.op_counter += 1;
        Operation {
            name: format!("op-{}", self.op_counter),
            status: if self.never_done {
                OpStatus::Running
            } else {
                OpStatus::Done
            },
            error: None,
        }
    }
}

#[async_trait]
impl ComputeApi for StubCompute {
    async fn get_address(&self, region: &str, name: &str) -> Result<Option<Address>> {
        let mut state = self.state.lock().unwrap();
        state.record("get_address");
        if state.fail_address_lookup {
            return Err(CloudError::Api("stub: address lookup outage".to_string()));
        }
        Ok(state
            .addresses
            .get(&(region.to_string(), name.to_string()))
            .cloned())
    }

    async fn insert_address(&self, region: &str, address: &Address) -> Result<Operation> {
        let mut state = self.state.lock().unwrap();
        state.record("insert_address");
        let mut stored = address.clone();
        stored.address = Some(STUB_IP.to_string());
        state
            .addresses
            .insert((region.to_string(), address.name.clone()), stored);
        Ok(state.next_op())
    }

    async fn delete_address(&self, region: &str, name: &str) -> Result<Option<Operation>> {
        let mut state = self.state.lock().unwrap();
        state.record("delete_address");
        match state
            .addresses
            .remove(&(region.to_string(), name.to_string()))
        {
            Some(_) => Ok(Some(state.next_op())),
            None => Ok(None),
        }
    }

    async fn get_instance(&self, zone: &str, name: &str) -> Result<Option<Instance>> {
        let mut state = self.state.lock().unwrap();
        state.record("get_instance");
        Ok(state
            .instances
            .get(&(zone.to_string(), name.to_string()))
            .cloned())
    }

    async fn insert_instance(&self, zone: &str, instance: &Instance) -> Result<Operation> {
        let mut state = self.state.lock().unwrap();
        state.record("insert_instance");
        // The API names the first interface and stamps a fingerprint;
        // the stub does the same so attachment can find nic0.
        let mut stored = instance.clone();
        for (i, nic) in stored.network_interfaces.iter_mut().enumerate() {
            nic.name.get_or_insert(format!("nic{i}"));
            nic.fingerprint.get_or_insert("fp-0".to_string());
        }
        state
            .instances
            .insert((zone.to_string(), instance.name.clone()), stored);
        Ok(state.next_op())
    }

    async fn delete_instance(&self, zone: &str, name: &str) -> Result<Option<Operation>> {
        let mut state = self.state.lock().unwrap();
        state.record("delete_instance");
        if state.fail_instance_delete {
            let mut op = state.next_op();
            op.status = OpStatus::Done;
            op.error = Some(OperationError {
                errors: vec![OperationErrorDetail {
                    code: "RESOURCE_IN_USE_BY_ANOTHER_RESOURCE".to_string(),
                    message: "stub: instance busy".to_string(),
                }],
            });
            return Ok(Some(op));
        }
        match state.instances.remove(&(zone.to_string(), name.to_string())) {
            Some(_) => Ok(Some(state.next_op())),
            None => Ok(None),
        }
    }

    async fn update_network_interface(
        &self,
        zone: &str,
        instance: &str,
        interface: &NetworkInterface,
    ) -> Result<Operation> {
        let mut state = self.state.lock().unwrap();
        state.record("update_network_interface");
        let key = (zone.to_string(), instance.to_string());
        let Some(stored) = state.instances.get_mut(&key) else {
            return Err(CloudError::Api(format!("stub: no instance '{instance}'")));
        };
        let Some(nic) = stored
            .network_interfaces
            .iter_mut()
            .find(|nic| nic.name == interface.name)
        else {
            return Err(CloudError::Api("stub: no such interface".to_string()));
        };
        nic.access_configs = interface.access_configs.clone();
        Ok(state.next_op())
    }

    async fn get_firewall(&self, name: &str) -> Result<Option<Firewall>> {
        let mut state = self.state.lock().unwrap();
        state.record("get_firewall");
        Ok(state.firewalls.get(name).cloned())
    }

    async fn insert_firewall(&self, firewall: &Firewall) -> Result<Operation> {
        let mut state = self.state.lock().unwrap();
        state.record("insert_firewall");
        state
            .firewalls
            .insert(firewall.name.clone(), firewall.clone());
        Ok(state.next_op())
    }

    async fn delete_firewall(&self, name: &str) -> Result<Option<Operation>> {
        let mut state = self.state.lock().unwrap();
        state.record("delete_firewall");
        match state.firewalls.remove(name) {
            Some(_) => Ok(Some(state.next_op())),
            None => Ok(None),
        }
    }

    async fn get_operation(&self, _scope: &OpScope, name: &str) -> Result<Operation> {
        let mut state = self.state.lock().unwrap();
        state.record("get_operation");
        Ok(Operation {
            name: name.to_string(),
            status: if state.never_done {
                OpStatus::Running
            } else {
                OpStatus::Done
            },
            error: None,
        })
    }
}

/// A deploy request covering the common case in the tests.
#[allow(dead_code)]
pub fn deploy_request(static_ip: Option<&str>) -> zncup_cloud::DeployRequest {
    zncup_cloud::DeployRequest {
        zone: "us-west1-a".to_string(),
        region: "us-west1".to_string(),
        instance: zncup_cloud::InstanceSpec {
            name: "vm1".to_string(),
            machine_type: "e2-micro".to_string(),
            image_project: "debian-cloud".to_string(),
            image_family: "debian-11".to_string(),
            disk_size_gb: 10,
            disk_type: "pd-balanced".to_string(),
            ephemeral_ip: static_ip.is_none(),
            network_tags: vec!["znc".to_string()],
            startup_script: None,
        },
        static_ip_name: static_ip.map(str::to_string),
        firewall_rule_name: Some("allow-znc-access".to_string()),
        allowed_ports: vec!["tcp:6697".to_string()],
        lookup: zncup_cloud::LookupPolicy::Lenient,
    }
}
