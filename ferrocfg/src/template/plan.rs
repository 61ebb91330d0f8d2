//! Validated configuration plans handed to a [`Dialect`](crate::platform::Dialect).
//!
//! Every value here has already passed validation; dialects only format.

use std::fmt;
use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;

/// A VLAN to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanDecl {
    pub id: u16,
    pub name: String,
    pub description: Option<String>,
}

/// Layer-3 addressing for a VLAN interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SviAddressing {
    /// Interface address with its prefix; `ip()` is the host address.
    Static(Ipv4Network),
    /// Address learned via DHCP.
    Dynamic,
}

/// DHCP address range, as host offsets inside the pool network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhcpRange {
    pub start: u32,
    pub stop: u32,
}

impl DhcpRange {
    /// First leased address.
    pub fn start_addr(&self, network: &Ipv4Network) -> Ipv4Addr {
        host_at(network, self.start)
    }

    /// Last leased address.
    pub fn stop_addr(&self, network: &Ipv4Network) -> Ipv4Addr {
        host_at(network, self.stop)
    }
}

/// Address `offset` hosts into `network`.
pub fn host_at(network: &Ipv4Network, offset: u32) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(network.network()).wrapping_add(offset))
}

/// A DHCP server pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpPool {
    pub name: String,
    /// Pool network, host bits cleared.
    pub network: Ipv4Network,
    pub default_router: Ipv4Addr,
    pub dns_server: Option<Ipv4Addr>,
    pub lease_days: Option<u32>,
    pub range: Option<DhcpRange>,
    /// VLAN the pool serves, when created by a VLAN template.
    pub vlan_id: Option<u16>,
}

/// Trunk port membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrunkPlan {
    /// Allowed VLANs, sorted and deduplicated. Empty means "all".
    pub allowed: Vec<u16>,
    pub native: Option<u16>,
    pub description: Option<String>,
}

/// A static route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticRoute {
    pub destination: Ipv4Network,
    pub next_hop: Ipv4Addr,
}

/// Dynamic routing protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingProtocol {
    Ospf,
    Eigrp,
}

impl fmt::Display for RoutingProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingProtocol::Ospf => f.write_str("OSPF"),
            RoutingProtocol::Eigrp => f.write_str("EIGRP"),
        }
    }
}

/// A routing process with its advertised networks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingProcess {
    pub protocol: RoutingProtocol,
    pub process_id: u16,
    /// Present for OSPF.
    pub area: Option<u32>,
    pub networks: Vec<Ipv4Network>,
}

/// Side of the NAT boundary a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NatRole {
    Inside,
    Outside,
}

impl fmt::Display for NatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NatRole::Inside => f.write_str("inside"),
            NatRole::Outside => f.write_str("outside"),
        }
    }
}

/// Numbered ACL family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclKind {
    Standard,
    Extended,
}

impl AclKind {
    /// Classify an IOS ACL number.
    pub fn of(number: u16) -> Option<Self> {
        match number {
            1..=99 | 1300..=1999 => Some(AclKind::Standard),
            100..=199 | 2000..=2699 => Some(AclKind::Extended),
            _ => None,
        }
    }
}

/// Pool-based PAT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatPlan {
    pub role: NatRole,
    pub pool_name: String,
    pub pool_start: Ipv4Addr,
    pub pool_end: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub access_list: u16,
    pub acl_kind: AclKind,
}

/// Firmware image location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareImage {
    pub server: Ipv4Addr,
    pub file: String,
}

/// Port mirroring session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanSession {
    pub id: u8,
    pub source: String,
    pub destination: String,
}
