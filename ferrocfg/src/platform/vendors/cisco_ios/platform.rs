//! Cisco device catalog.
//!
//! Routers are addressed per interface and offer routing, NAT and DHCP
//! features. Catalyst switches add VLAN and port-mode features on top of
//! the common interface methods.

use std::sync::Arc;

use super::CiscoIos;
use super::dialect::FAILURE_PATTERNS;
use crate::platform::{DeviceKind, DeviceModel, MethodId};

fn cisco(name: &str, kind: DeviceKind) -> DeviceModel {
    FAILURE_PATTERNS.iter().fold(
        DeviceModel::new(name, kind, Arc::new(CiscoIos)),
        |model, pattern| model.with_failure_pattern(*pattern),
    )
}

/// Built-in Cisco routers, in catalog order.
pub fn routers() -> Vec<DeviceModel> {
    use MethodId::*;

    vec![
        cisco("Cisco 1841", DeviceKind::Router)
            .with_description("Popular model for learning network configuration in Packet Tracer.")
            .with_interface_range("Fa0/", 0..=1)
            .with_methods([
                ApplyDataTemplate,
                RestartRouter,
                ApplyStaticRouting,
                ApplyDynamicRouting,
                ApplyNat,
                ApplyDhcpServer,
                DefaultInterface,
            ]),
        cisco("Cisco 1941", DeviceKind::Router)
            .with_description("Newer model supporting VLANs, ACLs and WAN technologies.")
            .with_interface_range("Fa0/", 0..=1)
            .with_interface_range("Gi0/", 0..=1)
            .with_methods([
                ApplyConfig,
                UpdateFirmware,
                ApplyStaticRouting,
                ApplyDynamicRouting,
                ApplyNat,
                ApplyDhcpServer,
                DefaultInterface,
            ]),
        cisco("Cisco 2811", DeviceKind::Router)
            .with_description("General-purpose router for small and medium networks.")
            .with_interface_range("Fa0/", 0..=1)
            .with_methods([
                ApplyConfig,
                BackupConfig,
                ApplyStaticRouting,
                ApplyDynamicRouting,
                DefaultInterface,
            ]),
        cisco("Cisco 2911", DeviceKind::Router)
            .with_description("Advanced router with multimedia and QoS support.")
            .with_interface_range("Fa0/", 0..=1)
            .with_interface_range("Gi0/", 0..=1)
            .with_methods([
                ApplyConfig,
                MonitorTraffic,
                ApplyStaticRouting,
                ApplyDynamicRouting,
                ApplyQos,
                DefaultInterface,
            ]),
        cisco("Cisco ISR 4321", DeviceKind::Router)
            .with_description("Next-generation router supporting virtualization.")
            .with_interface_range("Gi0/", 0..=1)
            .with_methods([
                ApplyConfig,
                EnableVirtualization,
                ApplyStaticRouting,
                ApplyDynamicRouting,
                ApplyNat,
                DefaultInterface,
            ]),
    ]
}

/// Built-in Cisco Catalyst switches, in catalog order.
pub fn switches() -> Vec<DeviceModel> {
    use MethodId::*;

    vec![
        cisco("Cisco Catalyst 2960", DeviceKind::Switch)
            .with_description("The most popular switch for learning in Packet Tracer.")
            .with_interface_range("Fa1/0/", 1..=24)
            .with_interface_range("Gi1/0/", 1..=2)
            .with_methods([
                ApplyConfig,
                EnableVlan,
                SetAccessVlan,
                SetTrunkVlan,
                SetNativeVlan,
                CopyVlanSettings,
                ApplyDhcpServer,
                DefaultInterface,
            ]),
        cisco("Cisco Catalyst 3560", DeviceKind::Switch)
            .with_description("Layer 3 switch supporting inter-VLAN routing.")
            .with_interface_range("Fa1/0/", 1..=2)
            .with_interface_range("Gi1/0/", 1..=4)
            .with_methods([
                ApplyConfig,
                ApplyDataTemplate,
                EnableRouting,
                SetAccessVlan,
                SetTrunkVlan,
                CopyVlanSettings,
                ApplyStaticRouting,
                ApplyDynamicRouting,
                DefaultInterface,
            ]),
        cisco("Cisco 2950", DeviceKind::Switch)
            .with_description("Older switch model, still used in basic networks.")
            .with_interface_range("Fa1/0/", 1..=24)
            .with_methods([
                ApplyConfig,
                MonitorTraffic,
                SetAccessVlan,
                SetTrunkVlan,
                DefaultInterface,
            ]),
        cisco("Cisco Catalyst 3650", DeviceKind::Switch)
            .with_description("Advanced layer 3 switch for complex topologies.")
            .with_interface_range("Fa1/0/", 1..=24)
            .with_interface_range("Gi1/0/", 1..=4)
            .with_methods([
                ApplyConfig,
                ApplyQos,
                SetAccessVlan,
                SetTrunkVlan,
                SetNativeVlan,
                CopyVlanSettings,
                ApplyStaticRouting,
                ApplyDynamicRouting,
                DefaultInterface,
            ]),
        cisco("Cisco Catalyst 9200", DeviceKind::Switch)
            .with_description("Modern switch with extensive VLAN and management features.")
            .with_interface_range("Gi1/0/", 1..=48)
            .with_methods([
                ApplyConfig,
                OptimizePerformance,
                EnableVlan,
                SetAccessVlan,
                SetTrunkVlan,
                SetNativeVlan,
                CopyVlanSettings,
                ApplyQos,
                DefaultInterface,
            ]),
    ]
}
