//! Ubiquiti EdgeOS (Vyatta) dialect and EdgeRouter catalog.
//!
//! Configuration statements are `set`/`delete` paths entered between
//! `configure` and `commit` / `save` / `exit`. VLANs live as `vif`s on the
//! hardware switch `switch0`, so only models with a switch chip offer VLAN
//! methods.

use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::error::Result;
use crate::platform::{DeviceKind, DeviceModel, Dialect, MethodId, unsupported};
use crate::template::plan::{
    DhcpPool, FirmwareImage, NatPlan, NatRole, RoutingProcess, RoutingProtocol, StaticRoute,
    SviAddressing, TrunkPlan, VlanDecl, host_at,
};
use crate::transcript::ConfigText;

const SWITCH: &str = "interfaces switch switch0";

/// First source NAT rule number; EdgeOS reserves 5000-9999 for source rules.
const NAT_RULE_BASE: u16 = 5000;

/// EdgeOS dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeOs;

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "'"))
}

impl EdgeOs {
    fn nat_rule(nat: &NatPlan) -> u16 {
        NAT_RULE_BASE + nat.access_list
    }

    fn vlan_aware(out: &mut ConfigText) {
        out.push(format!("set {SWITCH} switch-port vlan-aware enable"));
    }
}

impl Dialect for EdgeOs {
    fn name(&self) -> &'static str {
        "edgeos"
    }

    fn begin(&self, out: &mut ConfigText) {
        out.push("configure");
    }

    fn end(&self, out: &mut ConfigText) {
        out.push("commit");
        out.push("save");
        out.push("exit");
    }

    fn create_vlan(&self, out: &mut ConfigText, vlan: &VlanDecl) -> Result<()> {
        let description = vlan.description.as_deref().unwrap_or(&vlan.name);
        out.push(format!(
            "set {SWITCH} vif {} description {}",
            vlan.id,
            quoted(description)
        ));
        Ok(())
    }

    fn vlan_interface(
        &self,
        out: &mut ConfigText,
        vlan_id: u16,
        addressing: &SviAddressing,
    ) -> Result<()> {
        match addressing {
            SviAddressing::Static(net) => {
                out.push(format!("set {SWITCH} vif {vlan_id} address {net}"));
            }
            SviAddressing::Dynamic => {
                out.push(format!("set {SWITCH} vif {vlan_id} address dhcp"));
            }
        }
        Ok(())
    }

    fn dhcp_pool(&self, out: &mut ConfigText, pool: &DhcpPool) -> Result<()> {
        let net = pool.network;
        let subnet = format!(
            "set service dhcp-server shared-network-name {} subnet {}/{}",
            pool.name,
            net.network(),
            net.prefix()
        );

        // EdgeOS needs an explicit range; default to every host but the router.
        let (start, stop) = match pool.range {
            Some(range) => (range.start_addr(&net), range.stop_addr(&net)),
            None => {
                let first = host_at(&net, 1);
                let start = if first == pool.default_router {
                    host_at(&net, 2)
                } else {
                    first
                };
                let stop = Ipv4Addr::from(u32::from(net.broadcast()).saturating_sub(1));
                (start, stop)
            }
        };

        out.push(format!(
            "set service dhcp-server shared-network-name {} authoritative enable",
            pool.name
        ));
        out.push(format!("{subnet} default-router {}", pool.default_router));
        if let Some(dns) = pool.dns_server {
            out.push(format!("{subnet} dns-server {dns}"));
        }
        if let Some(days) = pool.lease_days {
            out.push(format!("{subnet} lease {}", u64::from(days) * 86_400));
        }
        out.push(format!("{subnet} start {start} stop {stop}"));
        Ok(())
    }

    fn access_port(
        &self,
        out: &mut ConfigText,
        port: &str,
        vlan_id: u16,
        description: &str,
    ) -> Result<()> {
        Self::vlan_aware(out);
        out.push(format!(
            "set {SWITCH} switch-port interface {port} vlan pvid {vlan_id}"
        ));
        if !description.is_empty() {
            out.push(format!(
                "set interfaces ethernet {port} description {}",
                quoted(description)
            ));
        }
        Ok(())
    }

    fn trunk_port(&self, out: &mut ConfigText, port: &str, trunk: &TrunkPlan) -> Result<()> {
        Self::vlan_aware(out);
        if let Some(native) = trunk.native {
            out.push(format!(
                "set {SWITCH} switch-port interface {port} vlan pvid {native}"
            ));
        }
        for vid in &trunk.allowed {
            out.push(format!(
                "set {SWITCH} switch-port interface {port} vlan vid {vid}"
            ));
        }
        if let Some(description) = &trunk.description {
            out.push(format!(
                "set interfaces ethernet {port} description {}",
                quoted(description)
            ));
        }
        Ok(())
    }

    fn static_route(&self, out: &mut ConfigText, route: &StaticRoute) -> Result<()> {
        out.push(format!(
            "set protocols static route {}/{} next-hop {}",
            route.destination.network(),
            route.destination.prefix(),
            route.next_hop
        ));
        Ok(())
    }

    fn routing_process(&self, out: &mut ConfigText, process: &RoutingProcess) -> Result<()> {
        if process.protocol != RoutingProtocol::Ospf {
            return Err(unsupported(self.name(), "EIGRP"));
        }
        let area = process.area.unwrap_or(0);
        for net in &process.networks {
            out.push(format!(
                "set protocols ospf area {area} network {}/{}",
                net.network(),
                net.prefix()
            ));
        }
        Ok(())
    }

    fn nat(&self, out: &mut ConfigText, nat: &NatPlan) -> Result<()> {
        let rule = format!("set service nat rule {}", Self::nat_rule(nat));
        out.push(format!("{rule} type source"));
        out.push(format!("{rule} description {}", quoted(&nat.pool_name)));
        out.push(format!(
            "{rule} translation address {}-{}",
            nat.pool_start, nat.pool_end
        ));
        out.push(format!("{rule} log disable"));
        Ok(())
    }

    fn nat_port(&self, out: &mut ConfigText, port: &str, nat: &NatPlan) -> Result<()> {
        match nat.role {
            NatRole::Outside => {
                out.push(format!(
                    "set service nat rule {} outbound-interface {port}",
                    Self::nat_rule(nat)
                ));
                Ok(())
            }
            NatRole::Inside => Err(unsupported(self.name(), "inside NAT interfaces")),
        }
    }

    fn port_description(
        &self,
        out: &mut ConfigText,
        port: &str,
        description: &str,
        enable: bool,
    ) -> Result<()> {
        if !description.is_empty() {
            out.push(format!(
                "set interfaces ethernet {port} description {}",
                quoted(description)
            ));
        }
        if enable {
            out.push(format!("delete interfaces ethernet {port} disable"));
        }
        Ok(())
    }

    fn default_interface(&self, out: &mut ConfigText, port: &str) -> Result<()> {
        out.push(format!("delete interfaces ethernet {port} address"));
        out.push(format!("delete interfaces ethernet {port} description"));
        Ok(())
    }

    fn factory_reset(&self, out: &mut ConfigText) -> Result<()> {
        out.push("sudo cp /opt/vyatta/etc/config.boot.default /config/config.boot");
        out.push("sudo reboot");
        Ok(())
    }

    fn save_config(&self, out: &mut ConfigText) -> Result<()> {
        out.push("configure");
        out.push("save");
        out.push("exit");
        Ok(())
    }

    fn firmware_update(
        &self,
        out: &mut ConfigText,
        image: &FirmwareImage,
        _mgmt_port: &str,
    ) -> Result<()> {
        out.push(format!("add system image tftp://{}/{}", image.server, image.file));
        Ok(())
    }
}

fn edgerouter(name: &str) -> DeviceModel {
    DeviceModel::new(name, DeviceKind::Router, Arc::new(EdgeOs))
        .with_failure_pattern("Invalid command")
        .with_failure_pattern("Commit failed")
        .with_failure_pattern("Configuration path")
        .with_failure_pattern("is not valid")
}

/// Built-in EdgeRouter models.
pub fn devices() -> Vec<DeviceModel> {
    use MethodId::*;

    vec![
        edgerouter("Ubiquiti EdgeRouter X")
            .with_description("Compact router with a built-in five-port switch.")
            .with_interface_range("eth", 0..=4)
            .with_methods([
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
            ]),
        edgerouter("Ubiquiti EdgeRouter Lite")
            .with_description("Three-port router with hardware-offloaded forwarding.")
            .with_interface_range("eth", 0..=2)
            .with_methods([
                ApplyStaticRouting,
                ApplyDynamicRouting,
                ApplyNat,
                ApplyDhcpServer,
                ApplyConfig,
                DefaultInterface,
                RestartRouter,
                UpdateFirmware,
                BackupConfig,
            ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::plan::AclKind;

    fn render(f: impl FnOnce(&mut ConfigText) -> Result<()>) -> Vec<String> {
        let mut out = ConfigText::new();
        f(&mut out).unwrap();
        out.lines().to_vec()
    }

    fn nat(role: NatRole) -> NatPlan {
        NatPlan {
            role,
            pool_name: "PUBLIC".into(),
            pool_start: "203.0.113.10".parse().unwrap(),
            pool_end: "203.0.113.20".parse().unwrap(),
            netmask: "255.255.255.0".parse().unwrap(),
            access_list: 1,
            acl_kind: AclKind::Standard,
        }
    }

    #[test]
    fn test_begin_end() {
        let mut out = ConfigText::new();
        EdgeOs.begin(&mut out);
        EdgeOs.end(&mut out);
        assert_eq!(out.lines(), ["configure", "commit", "save", "exit"]);
    }

    #[test]
    fn test_vif_with_address() {
        let lines = render(|out| {
            EdgeOs.create_vlan(
                out,
                &VlanDecl {
                    id: 20,
                    name: "GUEST".into(),
                    description: None,
                },
            )?;
            let net = "10.20.0.1/24".parse().unwrap();
            EdgeOs.vlan_interface(out, 20, &SviAddressing::Static(net))
        });
        assert_eq!(
            lines,
            vec![
                "set interfaces switch switch0 vif 20 description \"GUEST\"",
                "set interfaces switch switch0 vif 20 address 10.20.0.1/24",
            ]
        );
    }

    #[test]
    fn test_dhcp_pool_default_range_skips_router() {
        let pool = DhcpPool {
            name: "LAN".into(),
            network: "192.168.1.0/24".parse().unwrap(),
            default_router: "192.168.1.1".parse().unwrap(),
            dns_server: Some("192.168.1.1".parse().unwrap()),
            lease_days: Some(1),
            range: None,
            vlan_id: None,
        };
        let lines = render(|out| EdgeOs.dhcp_pool(out, &pool));
        let subnet = "set service dhcp-server shared-network-name LAN subnet 192.168.1.0/24";
        assert!(lines.contains(&format!("{subnet} lease 86400")));
        assert_eq!(
            lines.last().unwrap(),
            &format!("{subnet} start 192.168.1.2 stop 192.168.1.254")
        );
    }

    #[test]
    fn test_ospf_only() {
        let mut process = RoutingProcess {
            protocol: RoutingProtocol::Ospf,
            process_id: 1,
            area: Some(0),
            networks: vec!["10.0.0.0/8".parse().unwrap()],
        };
        let lines = render(|out| EdgeOs.routing_process(out, &process));
        assert_eq!(lines, vec!["set protocols ospf area 0 network 10.0.0.0/8"]);

        process.protocol = RoutingProtocol::Eigrp;
        let err = EdgeOs
            .routing_process(&mut ConfigText::new(), &process)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: EIGRP is not supported by edgeos"
        );
    }

    #[test]
    fn test_nat_outside_only() {
        let plan = nat(NatRole::Outside);
        let lines = render(|out| {
            EdgeOs.nat(out, &plan)?;
            EdgeOs.nat_port(out, "eth0", &plan)
        });
        assert_eq!(lines[0], "set service nat rule 5001 type source");
        assert_eq!(
            lines.last().unwrap(),
            "set service nat rule 5001 outbound-interface eth0"
        );
        assert!(
            EdgeOs
                .nat_port(&mut ConfigText::new(), "eth1", &nat(NatRole::Inside))
                .is_err()
        );
    }

    #[test]
    fn test_trunk_lists_each_vid() {
        let trunk = TrunkPlan {
            allowed: vec![10, 20],
            native: Some(1),
            description: None,
        };
        let lines = render(|out| EdgeOs.trunk_port(out, "eth2", &trunk));
        assert_eq!(
            lines,
            vec![
                "set interfaces switch switch0 switch-port vlan-aware enable",
                "set interfaces switch switch0 switch-port interface eth2 vlan pvid 1",
                "set interfaces switch switch0 switch-port interface eth2 vlan vid 10",
                "set interfaces switch switch0 switch-port interface eth2 vlan vid 20",
            ]
        );
    }

    #[test]
    fn test_unsupported_statements() {
        assert!(EdgeOs.ip_routing(&mut ConfigText::new()).is_err());
        assert!(EdgeOs.qos_trust(&mut ConfigText::new(), &[]).is_err());
    }

    #[test]
    fn test_catalog() {
        let devices = devices();
        assert_eq!(devices[0].name, "Ubiquiti EdgeRouter X");
        assert_eq!(devices[0].interfaces.len(), 5);
        assert!(!devices[1].supports(MethodId::SetAccessVlan));
        assert!(devices.iter().all(|d| d.dialect.name() == "edgeos"));
    }
}
