//! OpenWrt UCI dialect and catalog.
//!
//! Statements are `uci` commands run from the shell; there is no
//! configuration mode, changes are staged and applied with `uci commit`
//! followed by `reload_config`. VLANs are `bridge-vlan` sections on the
//! DSA bridge `br-lan`.

use std::sync::Arc;

use crate::error::Result;
use crate::platform::{DeviceKind, DeviceModel, Dialect, MethodId};
use crate::template::plan::{
    DhcpPool, FirmwareImage, StaticRoute, SviAddressing, TrunkPlan, VlanDecl,
};
use crate::transcript::ConfigText;

const BRIDGE: &str = "br-lan";

/// OpenWrt (UCI) dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenWrt;

/// UCI section names allow `[A-Za-z0-9_]` only.
fn section(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn uci_set(out: &mut ConfigText, path: &str, value: impl std::fmt::Display) {
    out.push(format!("uci set {path}='{value}'"));
}

impl Dialect for OpenWrt {
    fn name(&self) -> &'static str {
        "openwrt"
    }

    fn begin(&self, _out: &mut ConfigText) {}

    fn end(&self, out: &mut ConfigText) {
        out.push("uci commit");
        out.push("reload_config");
    }

    fn create_vlan(&self, out: &mut ConfigText, vlan: &VlanDecl) -> Result<()> {
        let id = vlan.id;
        out.push(format!("uci set network.vlan{id}=bridge-vlan"));
        uci_set(out, &format!("network.vlan{id}.device"), BRIDGE);
        uci_set(out, &format!("network.vlan{id}.vlan"), id);
        Ok(())
    }

    fn vlan_interface(
        &self,
        out: &mut ConfigText,
        vlan_id: u16,
        addressing: &SviAddressing,
    ) -> Result<()> {
        let iface = format!("network.v{vlan_id}");
        out.push(format!("uci set {iface}=interface"));
        uci_set(out, &format!("{iface}.device"), format!("{BRIDGE}.{vlan_id}"));
        match addressing {
            SviAddressing::Static(net) => {
                uci_set(out, &format!("{iface}.proto"), "static");
                uci_set(out, &format!("{iface}.ipaddr"), net.ip());
                uci_set(out, &format!("{iface}.netmask"), net.mask());
            }
            SviAddressing::Dynamic => uci_set(out, &format!("{iface}.proto"), "dhcp"),
        }
        Ok(())
    }

    fn dhcp_pool(&self, out: &mut ConfigText, pool: &DhcpPool) -> Result<()> {
        let name = format!("dhcp.{}", section(&pool.name));
        let interface = match pool.vlan_id {
            Some(id) => format!("v{id}"),
            None => {
                // Standalone pools get an alias interface on the bridge carrying
                // the pool network, with the default router as its address.
                let alias = format!("pool_{}", section(&pool.name));
                let iface = format!("network.{alias}");
                out.push(format!("uci set {iface}=interface"));
                uci_set(out, &format!("{iface}.device"), BRIDGE);
                uci_set(out, &format!("{iface}.proto"), "static");
                uci_set(out, &format!("{iface}.ipaddr"), pool.default_router);
                uci_set(out, &format!("{iface}.netmask"), pool.network.mask());
                alias
            }
        };
        out.push(format!("uci set {name}=dhcp"));
        uci_set(out, &format!("{name}.interface"), interface);
        if let Some(range) = pool.range {
            uci_set(out, &format!("{name}.start"), range.start);
            uci_set(out, &format!("{name}.limit"), range.stop - range.start + 1);
        }
        match pool.lease_days {
            Some(days) => uci_set(out, &format!("{name}.leasetime"), format!("{days}d")),
            None => uci_set(out, &format!("{name}.leasetime"), "12h"),
        }
        out.push(format!(
            "uci add_list {name}.dhcp_option='3,{}'",
            pool.default_router
        ));
        if let Some(dns) = pool.dns_server {
            out.push(format!("uci add_list {name}.dhcp_option='6,{dns}'"));
        }
        Ok(())
    }

    fn access_port(
        &self,
        out: &mut ConfigText,
        port: &str,
        vlan_id: u16,
        _description: &str,
    ) -> Result<()> {
        out.push(format!("uci add_list network.vlan{vlan_id}.ports='{port}:u*'"));
        Ok(())
    }

    fn trunk_port(&self, out: &mut ConfigText, port: &str, trunk: &TrunkPlan) -> Result<()> {
        if let Some(native) = trunk.native {
            out.push(format!("uci add_list network.vlan{native}.ports='{port}:u*'"));
        }
        for vid in trunk.allowed.iter().filter(|v| Some(**v) != trunk.native) {
            out.push(format!("uci add_list network.vlan{vid}.ports='{port}:t'"));
        }
        Ok(())
    }

    fn static_route(&self, out: &mut ConfigText, route: &StaticRoute) -> Result<()> {
        let dest = route.destination;
        let name = format!(
            "network.route_{}_{}",
            section(&dest.network().to_string()),
            dest.prefix()
        );
        out.push(format!("uci set {name}=route"));
        uci_set(out, &format!("{name}.interface"), "lan");
        uci_set(out, &format!("{name}.target"), dest.network());
        uci_set(out, &format!("{name}.netmask"), dest.mask());
        uci_set(out, &format!("{name}.gateway"), route.next_hop);
        Ok(())
    }

    fn factory_reset(&self, out: &mut ConfigText) -> Result<()> {
        out.push("firstboot -y");
        out.push("reboot");
        Ok(())
    }

    fn save_config(&self, out: &mut ConfigText) -> Result<()> {
        out.push("sysupgrade -b /tmp/backup.tar.gz");
        Ok(())
    }

    fn firmware_update(
        &self,
        out: &mut ConfigText,
        image: &FirmwareImage,
        _mgmt_port: &str,
    ) -> Result<()> {
        out.push(format!(
            "wget -O /tmp/{file} http://{}/{file}",
            image.server,
            file = image.file
        ));
        out.push(format!("sysupgrade -v /tmp/{}", image.file));
        Ok(())
    }
}

/// Built-in OpenWrt models.
pub fn devices() -> Vec<DeviceModel> {
    use MethodId::*;

    vec![
        DeviceModel::new("OpenWrt Router", DeviceKind::Router, Arc::new(OpenWrt))
            .with_description("Generic OpenWrt router with a DSA switch (lan1-lan4, wan).")
            .with_interface_range("lan", 1..=4)
            .with_interface("wan")
            .with_methods([
                ApplyDataTemplate,
                EnableVlan,
                SetAccessVlan,
                SetTrunkVlan,
                SetNativeVlan,
                CopyVlanSettings,
                ApplyStaticRouting,
                ApplyDhcpServer,
                RestartRouter,
                UpdateFirmware,
                BackupConfig,
            ])
            .with_failure_pattern("uci: Invalid argument")
            .with_failure_pattern("uci: Entry not found")
            .with_failure_pattern("Image check failed"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::plan::DhcpRange;

    fn render(f: impl FnOnce(&mut ConfigText) -> Result<()>) -> Vec<String> {
        let mut out = ConfigText::new();
        f(&mut out).unwrap();
        out.lines().to_vec()
    }

    #[test]
    fn test_no_configuration_mode() {
        let mut out = ConfigText::new();
        OpenWrt.begin(&mut out);
        assert!(out.lines().is_empty());
        OpenWrt.end(&mut out);
        assert_eq!(out.lines(), ["uci commit", "reload_config"]);
    }

    #[test]
    fn test_vlan_with_static_interface() {
        let lines = render(|out| {
            OpenWrt.create_vlan(
                out,
                &VlanDecl {
                    id: 10,
                    name: "USERS".into(),
                    description: None,
                },
            )?;
            OpenWrt.vlan_interface(
                out,
                10,
                &SviAddressing::Static("192.168.10.1/24".parse().unwrap()),
            )?;
            OpenWrt.access_port(out, "lan1", 10, "")
        });
        assert_eq!(
            lines,
            vec![
                "uci set network.vlan10=bridge-vlan",
                "uci set network.vlan10.device='br-lan'",
                "uci set network.vlan10.vlan='10'",
                "uci set network.v10=interface",
                "uci set network.v10.device='br-lan.10'",
                "uci set network.v10.proto='static'",
                "uci set network.v10.ipaddr='192.168.10.1'",
                "uci set network.v10.netmask='255.255.255.0'",
                "uci add_list network.vlan10.ports='lan1:u*'",
            ]
        );
    }

    #[test]
    fn test_dhcp_pool_range_as_start_and_limit() {
        let pool = DhcpPool {
            name: "USERS_pool".into(),
            network: "192.168.10.0/24".parse().unwrap(),
            default_router: "192.168.10.1".parse().unwrap(),
            dns_server: None,
            lease_days: None,
            range: Some(DhcpRange {
                start: 100,
                stop: 149,
            }),
            vlan_id: Some(10),
        };
        let lines = render(|out| OpenWrt.dhcp_pool(out, &pool));
        assert_eq!(lines[0], "uci set dhcp.users_pool=dhcp");
        assert!(lines.contains(&"uci set dhcp.users_pool.interface='v10'".to_string()));
        assert!(lines.contains(&"uci set dhcp.users_pool.start='100'".to_string()));
        assert!(lines.contains(&"uci set dhcp.users_pool.limit='50'".to_string()));
        assert!(lines.contains(&"uci set dhcp.users_pool.leasetime='12h'".to_string()));
    }

    #[test]
    fn test_standalone_pool_carries_network() {
        let pool = DhcpPool {
            name: "GUEST".into(),
            network: "10.77.0.0/16".parse().unwrap(),
            default_router: "10.77.0.1".parse().unwrap(),
            dns_server: None,
            lease_days: Some(2),
            range: None,
            vlan_id: None,
        };
        let lines = render(|out| OpenWrt.dhcp_pool(out, &pool));
        assert_eq!(
            &lines[..6],
            [
                "uci set network.pool_guest=interface",
                "uci set network.pool_guest.device='br-lan'",
                "uci set network.pool_guest.proto='static'",
                "uci set network.pool_guest.ipaddr='10.77.0.1'",
                "uci set network.pool_guest.netmask='255.255.0.0'",
                "uci set dhcp.guest=dhcp",
            ]
        );
        assert!(lines.contains(&"uci set dhcp.guest.interface='pool_guest'".to_string()));
        assert!(lines.contains(&"uci set dhcp.guest.leasetime='2d'".to_string()));
        assert!(!lines.iter().any(|l| l.contains("'lan'")));
    }

    #[test]
    fn test_static_route_section() {
        let route = StaticRoute {
            destination: "192.168.2.0/24".parse().unwrap(),
            next_hop: "203.0.113.1".parse().unwrap(),
        };
        let lines = render(|out| OpenWrt.static_route(out, &route));
        assert_eq!(lines[0], "uci set network.route_192_168_2_0_24=route");
        let gateway = "uci set network.route_192_168_2_0_24.gateway='203.0.113.1'";
        assert!(lines.iter().any(|l| l == gateway));
    }

    #[test]
    fn test_trunk_tags_all_but_native() {
        let trunk = TrunkPlan {
            allowed: vec![10, 20],
            native: Some(10),
            description: None,
        };
        let lines = render(|out| OpenWrt.trunk_port(out, "lan4", &trunk));
        assert_eq!(
            lines,
            vec![
                "uci add_list network.vlan10.ports='lan4:u*'",
                "uci add_list network.vlan20.ports='lan4:t'",
            ]
        );
    }

    #[test]
    fn test_unsupported_routing() {
        assert!(OpenWrt.ip_routing(&mut ConfigText::new()).is_err());
        assert!(OpenWrt.default_interface(&mut ConfigText::new(), "lan1").is_err());
    }

    #[test]
    fn test_catalog() {
        let devices = devices();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].interfaces, vec!["lan1", "lan2", "lan3", "lan4", "wan"]);
    }
}
