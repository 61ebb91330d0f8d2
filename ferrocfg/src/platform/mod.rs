//! Device catalog and vendor configuration languages.
//!
//! This module defines the device models the engine knows about, the
//! methods each one offers, and the [`Dialect`] trait vendors implement to
//! turn validated plans into configuration text.

mod definition;
mod method;
mod registry;
pub mod vendors;

pub use definition::{DeviceKind, DeviceModel};
pub use method::{MethodId, MethodSpec, fields};
pub use registry::{DeviceRegistry, get_device, methods_for};

use crate::error::{Result, ValidationError};
use crate::template::plan::{
    DhcpPool, FirmwareImage, NatPlan, RoutingProcess, SpanSession, StaticRoute,
    SviAddressing, TrunkPlan, VlanDecl,
};
use crate::transcript::ConfigText;

/// Vendor-specific rendering of validated configuration plans.
///
/// Templates validate once and then call into the device's dialect. Every
/// statement has a default that rejects it, so a vendor only implements
/// what its configuration language can express.
pub trait Dialect: Send + Sync {
    /// Short identifier (e.g., "cisco_ios").
    fn name(&self) -> &'static str;

    /// Enter configuration mode.
    fn begin(&self, out: &mut ConfigText);

    /// Leave configuration mode, committing where the language needs it.
    fn end(&self, out: &mut ConfigText);

    fn create_vlan(&self, _out: &mut ConfigText, _vlan: &VlanDecl) -> Result<()> {
        Err(unsupported(self.name(), "VLAN creation"))
    }

    fn vlan_interface(
        &self,
        _out: &mut ConfigText,
        _vlan_id: u16,
        _addressing: &SviAddressing,
    ) -> Result<()> {
        Err(unsupported(self.name(), "VLAN interfaces"))
    }

    fn dhcp_pool(&self, _out: &mut ConfigText, _pool: &DhcpPool) -> Result<()> {
        Err(unsupported(self.name(), "DHCP server"))
    }

    fn access_port(
        &self,
        _out: &mut ConfigText,
        _port: &str,
        _vlan_id: u16,
        _description: &str,
    ) -> Result<()> {
        Err(unsupported(self.name(), "access ports"))
    }

    /// Port of a router joining the data template's VLAN. Dialects whose
    /// router ports are bridge members keep the access-port form.
    fn router_port(
        &self,
        out: &mut ConfigText,
        port: &str,
        vlan_id: u16,
        description: &str,
    ) -> Result<()> {
        self.access_port(out, port, vlan_id, description)
    }

    fn trunk_port(&self, _out: &mut ConfigText, _port: &str, _trunk: &TrunkPlan) -> Result<()> {
        Err(unsupported(self.name(), "trunk ports"))
    }

    fn static_route(&self, _out: &mut ConfigText, _route: &StaticRoute) -> Result<()> {
        Err(unsupported(self.name(), "static routing"))
    }

    fn routing_process(&self, _out: &mut ConfigText, _process: &RoutingProcess) -> Result<()> {
        Err(unsupported(self.name(), "dynamic routing"))
    }

    /// Global NAT statements: access list, pool, overload binding.
    fn nat(&self, _out: &mut ConfigText, _nat: &NatPlan) -> Result<()> {
        Err(unsupported(self.name(), "NAT"))
    }

    /// Bind a port to the NAT boundary on the side given by `nat.role`.
    fn nat_port(&self, _out: &mut ConfigText, _port: &str, _nat: &NatPlan) -> Result<()> {
        Err(unsupported(self.name(), "NAT"))
    }

    fn port_description(
        &self,
        _out: &mut ConfigText,
        _port: &str,
        _description: &str,
        _enable: bool,
    ) -> Result<()> {
        Err(unsupported(self.name(), "port descriptions"))
    }

    fn default_interface(&self, _out: &mut ConfigText, _port: &str) -> Result<()> {
        Err(unsupported(self.name(), "interface defaults"))
    }

    /// Complete factory-reset sequence, outside configuration mode.
    fn factory_reset(&self, _out: &mut ConfigText) -> Result<()> {
        Err(unsupported(self.name(), "factory reset"))
    }

    /// Persist or export the running configuration.
    fn save_config(&self, _out: &mut ConfigText) -> Result<()> {
        Err(unsupported(self.name(), "configuration backup"))
    }

    /// Complete firmware download and activation sequence.
    fn firmware_update(
        &self,
        _out: &mut ConfigText,
        _image: &FirmwareImage,
        _mgmt_port: &str,
    ) -> Result<()> {
        Err(unsupported(self.name(), "firmware update"))
    }

    fn span_session(&self, _out: &mut ConfigText, _span: &SpanSession) -> Result<()> {
        Err(unsupported(self.name(), "traffic monitoring"))
    }

    fn qos_trust(&self, _out: &mut ConfigText, _ports: &[String]) -> Result<()> {
        Err(unsupported(self.name(), "QoS"))
    }

    fn ip_routing(&self, _out: &mut ConfigText) -> Result<()> {
        Err(unsupported(self.name(), "IP routing"))
    }

    fn virtualization(&self, _out: &mut ConfigText) -> Result<()> {
        Err(unsupported(self.name(), "virtualization"))
    }

    fn performance_profile(&self, _out: &mut ConfigText) -> Result<()> {
        Err(unsupported(self.name(), "performance tuning"))
    }
}

/// `"<feature> is not supported by <dialect>"`
pub fn unsupported(dialect: &str, feature: &str) -> crate::Error {
    ValidationError::new(format!("{feature} is not supported by {dialect}")).into()
}
