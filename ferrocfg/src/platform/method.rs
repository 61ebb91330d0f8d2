//! Configurable methods and the form fields each one declares.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, ValidationError};
use crate::template::ParameterSet;

/// Form field names, shared by method specs and template functions.
pub mod fields {
    pub const VLAN_ID: &str = "VLAN ID";
    pub const VLAN_NAME: &str = "VLAN Name";
    pub const NATIVE_VLAN_ID: &str = "Native VLAN ID";
    pub const ALLOWED_VLANS: &str = "Allowed VLANs";
    pub const PROFILE_NAME: &str = "Profile Name";
    pub const COLOR: &str = "Color";
    pub const DESCRIPTION: &str = "Description";
    pub const VLAN_ROUTING: &str = "VLAN Routing";
    pub const VLAN_MODE: &str = "VLAN Mode";
    pub const VLAN_IP: &str = "VLAN IP Address";
    pub const SUBNET_MASK: &str = "Subnet Mask";
    pub const DHCP_SERVER: &str = "DHCP Server";
    pub const START: &str = "start";
    pub const STOP: &str = "stop";
    pub const DESTINATION_NETWORK: &str = "Destination Network";
    pub const NEXT_HOP: &str = "Next Hop IP";
    pub const ROUTING_PROTOCOL: &str = "Routing Protocol";
    pub const PROCESS_ID: &str = "Process ID";
    pub const AREA_ID: &str = "Area ID";
    pub const NETWORKS: &str = "Networks";
    pub const INTERFACE_ROLE: &str = "Interface Role";
    pub const POOL_NAME: &str = "Pool Name";
    pub const POOL_START: &str = "Pool Start IP";
    pub const POOL_END: &str = "Pool End IP";
    pub const ACCESS_LIST: &str = "Access List";
    pub const NETMASK: &str = "Netmask";
    pub const NETWORK: &str = "Network";
    pub const DEFAULT_ROUTER: &str = "Default Router";
    pub const DNS_SERVER: &str = "DNS Server";
    pub const LEASE_TIME: &str = "Lease Time";
    pub const SERVER_IP: &str = "Server IP";
    pub const IMAGE_FILE: &str = "Image File";
    pub const SESSION_ID: &str = "Session ID";
    pub const SOURCE: &str = "Source";
    pub const DESTINATION: &str = "Destination";
}

use fields::*;

/// Every configurable feature, one variant per method identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodId {
    ApplyDataTemplate,
    EnableVlan,
    SetAccessVlan,
    SetTrunkVlan,
    SetNativeVlan,
    CopyVlanSettings,
    ApplyStaticRouting,
    ApplyDynamicRouting,
    ApplyNat,
    ApplyDhcpServer,
    ApplyConfig,
    DefaultInterface,
    RestartRouter,
    UpdateFirmware,
    BackupConfig,
    MonitorTraffic,
    EnableVirtualization,
    ApplyQos,
    EnableRouting,
    OptimizePerformance,
}

impl MethodId {
    pub const ALL: [MethodId; 20] = [
        MethodId::ApplyDataTemplate,
        MethodId::EnableVlan,
        MethodId::SetAccessVlan,
        MethodId::SetTrunkVlan,
        MethodId::SetNativeVlan,
        MethodId::CopyVlanSettings,
        MethodId::ApplyStaticRouting,
        MethodId::ApplyDynamicRouting,
        MethodId::ApplyNat,
        MethodId::ApplyDhcpServer,
        MethodId::ApplyConfig,
        MethodId::DefaultInterface,
        MethodId::RestartRouter,
        MethodId::UpdateFirmware,
        MethodId::BackupConfig,
        MethodId::MonitorTraffic,
        MethodId::EnableVirtualization,
        MethodId::ApplyQos,
        MethodId::EnableRouting,
        MethodId::OptimizePerformance,
    ];

    /// The snake_case identifier used by the catalog.
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodId::ApplyDataTemplate => "apply_data_template",
            MethodId::EnableVlan => "enable_vlan",
            MethodId::SetAccessVlan => "set_access_vlan",
            MethodId::SetTrunkVlan => "set_trunk_vlan",
            MethodId::SetNativeVlan => "set_native_vlan",
            MethodId::CopyVlanSettings => "copy_vlan_settings",
            MethodId::ApplyStaticRouting => "apply_static_routing",
            MethodId::ApplyDynamicRouting => "apply_dynamic_routing",
            MethodId::ApplyNat => "apply_nat",
            MethodId::ApplyDhcpServer => "apply_dhcp_server",
            MethodId::ApplyConfig => "apply_config",
            MethodId::DefaultInterface => "default_interface",
            MethodId::RestartRouter => "restart_router",
            MethodId::UpdateFirmware => "update_firmware",
            MethodId::BackupConfig => "backup_config",
            MethodId::MonitorTraffic => "monitor_traffic",
            MethodId::EnableVirtualization => "enable_virtualization",
            MethodId::ApplyQos => "apply_qos",
            MethodId::EnableRouting => "enable_routing",
            MethodId::OptimizePerformance => "optimize_performance",
        }
    }

    /// Whether a successful render wipes device state (VLANs, port colors).
    pub fn resets_device(&self) -> bool {
        matches!(self, MethodId::RestartRouter)
    }

    /// Field declaration for this method.
    pub fn spec(&self) -> MethodSpec {
        let (fields, optional, requires_ports): (&[&str], &[&str], bool) = match self {
            MethodId::ApplyDataTemplate => (
                &[
                    VLAN_ID,
                    PROFILE_NAME,
                    COLOR,
                    DESCRIPTION,
                    VLAN_ROUTING,
                    VLAN_MODE,
                    VLAN_IP,
                    SUBNET_MASK,
                    DHCP_SERVER,
                    START,
                    STOP,
                ],
                &[
                    COLOR,
                    DESCRIPTION,
                    VLAN_ROUTING,
                    VLAN_MODE,
                    VLAN_IP,
                    SUBNET_MASK,
                    DHCP_SERVER,
                    START,
                    STOP,
                ],
                false,
            ),
            MethodId::EnableVlan => (&[VLAN_ID, VLAN_NAME, DESCRIPTION], &[DESCRIPTION], false),
            MethodId::SetAccessVlan => (
                &[VLAN_ID, VLAN_NAME, DESCRIPTION, COLOR],
                &[VLAN_NAME, DESCRIPTION, COLOR],
                true,
            ),
            MethodId::SetTrunkVlan => (&[ALLOWED_VLANS, DESCRIPTION], &[DESCRIPTION], true),
            MethodId::SetNativeVlan => (
                &[NATIVE_VLAN_ID, VLAN_NAME, ALLOWED_VLANS, DESCRIPTION, COLOR],
                &[VLAN_NAME, ALLOWED_VLANS, DESCRIPTION, COLOR],
                true,
            ),
            MethodId::CopyVlanSettings => (&[VLAN_ID], &[], true),
            MethodId::ApplyStaticRouting => {
                (&[DESTINATION_NETWORK, SUBNET_MASK, NEXT_HOP], &[], false)
            }
            MethodId::ApplyDynamicRouting => (
                &[ROUTING_PROTOCOL, PROCESS_ID, AREA_ID, NETWORKS],
                &[AREA_ID],
                false,
            ),
            MethodId::ApplyNat => (
                &[
                    INTERFACE_ROLE,
                    POOL_NAME,
                    POOL_START,
                    POOL_END,
                    ACCESS_LIST,
                    NETMASK,
                ],
                &[NETMASK],
                false,
            ),
            MethodId::ApplyDhcpServer => (
                &[
                    POOL_NAME,
                    NETWORK,
                    SUBNET_MASK,
                    DEFAULT_ROUTER,
                    DNS_SERVER,
                    LEASE_TIME,
                ],
                &[DNS_SERVER, LEASE_TIME],
                false,
            ),
            MethodId::ApplyConfig => (&[DESCRIPTION], &[DESCRIPTION], true),
            MethodId::DefaultInterface => (&[], &[], true),
            MethodId::RestartRouter => (&[], &[], false),
            MethodId::UpdateFirmware => (&[SERVER_IP, IMAGE_FILE], &[], true),
            MethodId::BackupConfig => (&[], &[], false),
            MethodId::MonitorTraffic => (&[SESSION_ID, SOURCE, DESTINATION], &[], false),
            MethodId::EnableVirtualization => (&[], &[], false),
            MethodId::ApplyQos => (&[], &[], true),
            MethodId::EnableRouting => (&[], &[], false),
            MethodId::OptimizePerformance => (&[], &[], false),
        };

        MethodSpec {
            method: *self,
            fields: fields.to_vec(),
            optional: optional.to_vec(),
            requires_ports,
        }
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // Some catalog entries use the older name.
        if s == "enable_qos" {
            return Ok(MethodId::ApplyQos);
        }
        MethodId::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| RegistryError::InvalidDefinition {
                message: format!("unknown method '{s}'"),
            })
    }
}

/// Input fields declared by one method.
///
/// Drives form generation on the caller side and the presence check every
/// template runs before anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSpec {
    pub method: MethodId,

    /// All input fields, in form order.
    pub fields: Vec<&'static str>,

    /// The subset of `fields` that may be left empty.
    pub optional: Vec<&'static str>,

    /// Whether at least one port must be selected.
    pub requires_ports: bool,
}

impl MethodSpec {
    /// Fields that must be present and non-empty.
    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .copied()
            .filter(|f| !self.optional.contains(f))
    }

    /// Check if a field may be left empty.
    pub fn is_optional(&self, field: &str) -> bool {
        self.optional.contains(&field)
    }

    /// Fail with `"<field> required"` for the first missing required field.
    pub fn check_required(&self, params: &ParameterSet) -> Result<(), ValidationError> {
        match self.required().find(|f| params.present(f).is_none()) {
            Some(missing) => Err(ValidationError::required(missing)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_round_trip() {
        for method in MethodId::ALL {
            assert_eq!(method.as_str().parse::<MethodId>().unwrap(), method);
        }
        assert_eq!("enable_qos".parse::<MethodId>().unwrap(), MethodId::ApplyQos);
        assert!("reticulate_splines".parse::<MethodId>().is_err());
    }

    #[test]
    fn test_optional_is_subset_of_fields() {
        for method in MethodId::ALL {
            let spec = method.spec();
            for opt in &spec.optional {
                assert!(spec.fields.contains(opt), "{method}: {opt}");
            }
        }
    }

    #[test]
    fn test_required_fields() {
        let spec = MethodId::ApplyDynamicRouting.spec();
        let required: Vec<_> = spec.required().collect();
        assert_eq!(required, vec![ROUTING_PROTOCOL, PROCESS_ID, NETWORKS]);
        assert!(spec.is_optional(AREA_ID));
    }

    #[test]
    fn test_check_required_reports_first_missing() {
        let spec = MethodId::ApplyStaticRouting.spec();
        let params = ParameterSet::new()
            .with(DESTINATION_NETWORK, "192.168.2.0")
            .with(SUBNET_MASK, "  ");
        let err = spec.check_required(&params).unwrap_err();
        assert_eq!(err.reason, "Subnet Mask required");
    }

    #[test]
    fn test_port_requirements() {
        assert!(MethodId::DefaultInterface.spec().requires_ports);
        assert!(MethodId::UpdateFirmware.spec().requires_ports);
        assert!(!MethodId::ApplyStaticRouting.spec().requires_ports);
        assert!(!MethodId::RestartRouter.spec().requires_ports);
        assert!(!MethodId::ApplyNat.spec().requires_ports);
    }

    #[test]
    fn test_serde_uses_catalog_names() {
        let json = serde_json::to_string(&MethodId::SetTrunkVlan).unwrap();
        assert_eq!(json, "\"set_trunk_vlan\"");
        let back: MethodId = serde_json::from_str("\"apply_nat\"").unwrap();
        assert_eq!(back, MethodId::ApplyNat);
    }
}
