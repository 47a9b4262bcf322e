//! Program and instance payloads (compute workloads).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::content::MessageContent;
use crate::message::types::{Chain, MessageType};

/// Runtime capabilities granted to a workload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEnvironment {
    pub reproducible: bool,
    pub internet: bool,
    pub aleph_api: bool,
    pub shared_cache: bool,
}

/// Resources reserved for a workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineResources {
    pub vcpus: u64,
    /// Memory in MiB.
    pub memory: u64,
    pub seconds: u64,
}

impl Default for MachineResources {
    fn default() -> Self {
        Self {
            vcpus: 1,
            memory: 2048,
            seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    #[default]
    Hold,
    Superfluid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub chain: Chain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumePersistence {
    #[default]
    Host,
    Store,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentVolume {
    #[serde(rename = "ref")]
    pub reference: String,
    pub use_latest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootFsVolume {
    pub parent: ParentVolume,
    pub persistence: VolumePersistence,
    pub size_mib: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmutableVolume {
    pub comment: Vec<String>,
    pub mount: Vec<String>,
    #[serde(rename = "ref")]
    pub reference: String,
    pub use_latest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EphemeralVolume {
    pub comment: Vec<String>,
    pub mount: Vec<String>,
    pub ephemeral: bool,
    pub size_mib: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentVolume {
    pub comment: Vec<String>,
    pub mount: Vec<String>,
    pub parent: ParentVolume,
    pub persistence: VolumePersistence,
    pub name: String,
    pub size_mib: u64,
}

/// Any volume a workload can mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Volume {
    Persistent(PersistentVolume),
    Immutable(ImmutableVolume),
    Ephemeral(EphemeralVolume),
}

/// On-demand function workload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramContent {
    pub time: f64,
    pub address: String,
    pub allow_amend: bool,
    pub metadata: BTreeMap<String, String>,
    pub authorized_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
    pub environment: FunctionEnvironment,
    pub resources: MachineResources,
    pub payment: Payment,
    pub volumes: Vec<Volume>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaces: Option<String>,
}

impl MessageContent for ProgramContent {
    const MESSAGE_TYPE: MessageType = MessageType::Program;

    fn stamp(&mut self, address: &str, time: f64) {
        self.address = address.to_string();
        self.time = time;
    }
}

/// Persistent virtual machine workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceContent {
    pub rootfs: RootFsVolume,
    pub time: f64,
    pub address: String,
    pub allow_amend: bool,
    pub metadata: BTreeMap<String, String>,
    pub authorized_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
    pub environment: FunctionEnvironment,
    pub resources: MachineResources,
    pub payment: Payment,
    pub volumes: Vec<Volume>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaces: Option<String>,
}

impl MessageContent for InstanceContent {
    const MESSAGE_TYPE: MessageType = MessageType::Instance;

    fn stamp(&mut self, address: &str, time: f64) {
        self.address = address.to_string();
        self.time = time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rootfs() -> RootFsVolume {
        RootFsVolume {
            parent: ParentVolume {
                reference: "b6ff5c3a8205d1ca4c7c3369300eeafff498b558f71b851aa2114afd0a532717".to_string(),
                use_latest: true,
            },
            persistence: VolumePersistence::Host,
            size_mib: 20_480,
        }
    }

    #[test]
    fn test_instance_wire_shape() {
        let instance = InstanceContent {
            rootfs: rootfs(),
            time: 0.0,
            address: String::new(),
            allow_amend: false,
            metadata: BTreeMap::from([("name".to_string(), "vm".to_string())]),
            authorized_keys: vec!["ssh-ed25519 AAAA".to_string()],
            variables: None,
            environment: FunctionEnvironment::default(),
            resources: MachineResources::default(),
            payment: Payment::default(),
            volumes: Vec::new(),
            replaces: None,
        };

        let value = serde_json::to_value(&instance).unwrap();
        assert_eq!(value["rootfs"]["parent"]["ref"], rootfs().parent.reference);
        assert_eq!(value["rootfs"]["persistence"], "host");
        assert_eq!(value["payment"]["chain"], "ETH");
        assert_eq!(value["payment"]["type"], "hold");
        assert!(value.get("variables").is_none());
        assert!(value.get("replaces").is_none());
    }

    #[test]
    fn test_volume_variants_parse() {
        let raw = r#"[
            {"comment":[],"mount":["/data"],"ephemeral":true,"size_mib":512},
            {"comment":[],"mount":["/opt"],"ref":"abc","use_latest":false},
            {"comment":[],"mount":["/var"],"parent":{"ref":"def","use_latest":true},"persistence":"store","name":"db","size_mib":1024}
        ]"#;
        let volumes: Vec<Volume> = serde_json::from_str(raw).unwrap();
        assert!(matches!(volumes[0], Volume::Ephemeral(_)));
        assert!(matches!(volumes[1], Volume::Immutable(_)));
        assert!(matches!(volumes[2], Volume::Persistent(_)));
    }

    #[test]
    fn test_program_stamp() {
        let mut program = ProgramContent::default();
        program.stamp("0xabc", 10.5);
        assert_eq!(program.address, "0xabc");
        assert_eq!(program.time, 10.5);
        assert_eq!(<ProgramContent as MessageContent>::MESSAGE_TYPE, MessageType::Program);
    }
}
