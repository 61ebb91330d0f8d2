//! Cisco IOS configuration language.
//!
//! Configuration happens between `configure terminal` and `end`. Interface
//! statements are emitted as an `interface <name>` header followed by
//! indented sub-commands:
//!
//! ```text
//! configure terminal
//! vlan 10
//!  name USERS
//! interface Fa1/0/1
//!  switchport mode access
//!  switchport access vlan 10
//!  no shutdown
//! end
//! ```
//!
//! Reload, backup and firmware sequences run from privileged EXEC and are
//! emitted complete.

use std::net::Ipv4Addr;

use crate::error::Result;
use crate::platform::Dialect;
use crate::template::plan::{
    AclKind, DhcpPool, FirmwareImage, NatPlan, RoutingProcess, RoutingProtocol, SpanSession,
    StaticRoute, SviAddressing, TrunkPlan, VlanDecl, host_at,
};
use crate::template::validate::{compress_vlans, wildcard};
use crate::transcript::ConfigText;

/// Output markers for a rejected IOS command.
pub(super) const FAILURE_PATTERNS: [&str; 4] = [
    "% Invalid input",
    "% Incomplete command",
    "% Ambiguous command",
    "% Unknown command",
];

/// Cisco IOS / IOS-XE dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct CiscoIos;

impl CiscoIos {
    fn interface(out: &mut ConfigText, port: &str) {
        out.push(format!("interface {port}"));
    }

    fn description(out: &mut ConfigText, description: &str) {
        if !description.is_empty() {
            out.push(format!(" description {description}"));
        }
    }
}

impl Dialect for CiscoIos {
    fn name(&self) -> &'static str {
        "cisco_ios"
    }

    fn begin(&self, out: &mut ConfigText) {
        out.push("configure terminal");
    }

    fn end(&self, out: &mut ConfigText) {
        out.push("end");
    }

    fn create_vlan(&self, out: &mut ConfigText, vlan: &VlanDecl) -> Result<()> {
        out.push(format!("vlan {}", vlan.id));
        out.push(format!(" name {}", vlan.name));
        Ok(())
    }

    fn vlan_interface(
        &self,
        out: &mut ConfigText,
        vlan_id: u16,
        addressing: &SviAddressing,
    ) -> Result<()> {
        out.push(format!("interface vlan {vlan_id}"));
        match addressing {
            SviAddressing::Static(net) => {
                out.push(format!(" ip address {} {}", net.ip(), net.mask()));
            }
            SviAddressing::Dynamic => out.push(" ip address dhcp"),
        }
        out.push(" no shutdown");
        Ok(())
    }

    fn dhcp_pool(&self, out: &mut ConfigText, pool: &DhcpPool) -> Result<()> {
        // Addresses outside the lease range are excluded from the pool.
        if let Some(range) = pool.range {
            let first = host_at(&pool.network, 1);
            let last = Ipv4Addr::from(u32::from(pool.network.broadcast()).saturating_sub(1));
            if range.start > 1 {
                let before = host_at(&pool.network, range.start - 1);
                out.push(format!("ip dhcp excluded-address {first} {before}"));
            }
            let stop = range.stop_addr(&pool.network);
            if stop < last {
                let after = host_at(&pool.network, range.stop + 1);
                out.push(format!("ip dhcp excluded-address {after} {last}"));
            }
        }

        out.push(format!("ip dhcp pool {}", pool.name));
        out.push(format!(
            " network {} {}",
            pool.network.network(),
            pool.network.mask()
        ));
        out.push(format!(" default-router {}", pool.default_router));
        if let Some(dns) = pool.dns_server {
            out.push(format!(" dns-server {dns}"));
        }
        if let Some(days) = pool.lease_days {
            out.push(format!(" lease {days}"));
        }
        Ok(())
    }

    fn access_port(
        &self,
        out: &mut ConfigText,
        port: &str,
        vlan_id: u16,
        description: &str,
    ) -> Result<()> {
        Self::interface(out, port);
        Self::description(out, description);
        out.push(" switchport mode access");
        out.push(format!(" switchport access vlan {vlan_id}"));
        out.push(" no shutdown");
        Ok(())
    }

    // Router ports are routed; switchport commands are rejected there.
    fn router_port(
        &self,
        out: &mut ConfigText,
        port: &str,
        _vlan_id: u16,
        description: &str,
    ) -> Result<()> {
        self.port_description(out, port, description, true)
    }

    fn trunk_port(&self, out: &mut ConfigText, port: &str, trunk: &TrunkPlan) -> Result<()> {
        Self::interface(out, port);
        if let Some(description) = &trunk.description {
            Self::description(out, description);
        }
        out.push(" switchport mode trunk");
        if let Some(native) = trunk.native {
            out.push(format!(" switchport trunk native vlan {native}"));
        }
        if !trunk.allowed.is_empty() {
            out.push(format!(
                " switchport trunk allowed vlan {}",
                compress_vlans(&trunk.allowed)
            ));
        }
        out.push(" no shutdown");
        Ok(())
    }

    fn static_route(&self, out: &mut ConfigText, route: &StaticRoute) -> Result<()> {
        out.push(format!(
            "ip route {} {} {}",
            route.destination.network(),
            route.destination.mask(),
            route.next_hop
        ));
        Ok(())
    }

    fn routing_process(&self, out: &mut ConfigText, process: &RoutingProcess) -> Result<()> {
        match process.protocol {
            RoutingProtocol::Ospf => {
                out.push(format!("router ospf {}", process.process_id));
                let area = process.area.unwrap_or(0);
                for net in &process.networks {
                    out.push(format!(
                        " network {} {} area {area}",
                        net.network(),
                        wildcard(net.mask())
                    ));
                }
            }
            RoutingProtocol::Eigrp => {
                out.push(format!("router eigrp {}", process.process_id));
                for net in &process.networks {
                    out.push(format!(
                        " network {} {}",
                        net.network(),
                        wildcard(net.mask())
                    ));
                }
            }
        }
        Ok(())
    }

    fn nat(&self, out: &mut ConfigText, nat: &NatPlan) -> Result<()> {
        match nat.acl_kind {
            AclKind::Standard => out.push(format!("access-list {} permit any", nat.access_list)),
            AclKind::Extended => {
                out.push(format!("access-list {} permit ip any any", nat.access_list))
            }
        }
        out.push(format!(
            "ip nat pool {} {} {} netmask {}",
            nat.pool_name, nat.pool_start, nat.pool_end, nat.netmask
        ));
        out.push(format!(
            "ip nat inside source list {} pool {} overload",
            nat.access_list, nat.pool_name
        ));
        Ok(())
    }

    fn nat_port(&self, out: &mut ConfigText, port: &str, nat: &NatPlan) -> Result<()> {
        Self::interface(out, port);
        out.push(format!(" ip nat {}", nat.role));
        Ok(())
    }

    fn port_description(
        &self,
        out: &mut ConfigText,
        port: &str,
        description: &str,
        enable: bool,
    ) -> Result<()> {
        Self::interface(out, port);
        Self::description(out, description);
        if enable {
            out.push(" no shutdown");
        }
        Ok(())
    }

    fn default_interface(&self, out: &mut ConfigText, port: &str) -> Result<()> {
        out.push(format!("default interface {port}"));
        Ok(())
    }

    fn factory_reset(&self, out: &mut ConfigText) -> Result<()> {
        out.push("erase startup-config");
        out.push("delete /force flash:vlan.dat");
        out.push("reload");
        Ok(())
    }

    fn save_config(&self, out: &mut ConfigText) -> Result<()> {
        out.push("copy running-config startup-config");
        Ok(())
    }

    fn firmware_update(
        &self,
        out: &mut ConfigText,
        image: &FirmwareImage,
        mgmt_port: &str,
    ) -> Result<()> {
        self.begin(out);
        out.push(format!("ip tftp source-interface {mgmt_port}"));
        self.end(out);
        out.push(format!(
            "copy tftp://{}/{} flash:{}",
            image.server, image.file, image.file
        ));
        self.begin(out);
        out.push("no boot system");
        out.push(format!("boot system flash:{}", image.file));
        self.end(out);
        out.push("write memory");
        Ok(())
    }

    fn span_session(&self, out: &mut ConfigText, span: &SpanSession) -> Result<()> {
        out.push(format!(
            "monitor session {} source interface {}",
            span.id, span.source
        ));
        out.push(format!(
            "monitor session {} destination interface {}",
            span.id, span.destination
        ));
        Ok(())
    }

    fn qos_trust(&self, out: &mut ConfigText, ports: &[String]) -> Result<()> {
        out.push("mls qos");
        for port in ports {
            Self::interface(out, port);
            out.push(" mls qos trust cos");
        }
        Ok(())
    }

    fn ip_routing(&self, out: &mut ConfigText) -> Result<()> {
        out.push("ip routing");
        Ok(())
    }

    fn virtualization(&self, out: &mut ConfigText) -> Result<()> {
        out.push("iox");
        Ok(())
    }

    fn performance_profile(&self, out: &mut ConfigText) -> Result<()> {
        out.push("sdm prefer advanced");
        Ok(())
    }
}
