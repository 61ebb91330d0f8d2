//! Template functions: validate a command's parameters and render them
//! through the device's dialect.
//!
//! Every function is all-or-nothing. Parameters are validated first, the
//! ledger is only checked, the text is rendered, and VLANs are allocated
//! last, so a failed call leaves the ledger untouched.
//!
//! # Example
//!
//! ```rust
//! use ferrocfg::{Command, EngineConfig, MethodId, VlanLedger, fields, get_device, render};
//!
//! let device = get_device("Cisco 1841").unwrap();
//! let mut ledger = VlanLedger::new();
//! let command = Command::new(MethodId::ApplyStaticRouting)
//!     .with_param(fields::DESTINATION_NETWORK, "192.168.2.0")
//!     .with_param(fields::SUBNET_MASK, "255.255.255.0")
//!     .with_param(fields::NEXT_HOP, "203.0.113.1");
//!
//! let text = render(&command, &device, &mut ledger, &EngineConfig::default()).unwrap();
//! assert!(text.contains_line("ip route 192.168.2.0 255.255.255.0 203.0.113.1"));
//! ```

mod device;
mod dhcp;
mod nat;
mod params;
pub mod plan;
mod routing;
pub(crate) mod validate;
mod vlan;

pub use params::{ParamValue, ParameterSet};

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{Result, ValidationError};
use crate::ledger::VlanLedger;
use crate::platform::{DeviceModel, Dialect, MethodId};
use crate::transcript::ConfigText;

/// A request to configure one feature on a set of ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub method: MethodId,

    /// Selected ports, in the order they should be configured.
    #[serde(default)]
    pub ports: Vec<String>,

    #[serde(default)]
    pub params: ParameterSet,
}

impl Command {
    /// Create a command with no ports and no parameters.
    pub fn new(method: MethodId) -> Self {
        Self {
            method,
            ports: vec![],
            params: ParameterSet::new(),
        }
    }

    /// Select a port.
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.ports.push(port.into());
        self
    }

    /// Select several ports, keeping order.
    pub fn with_ports<S: Into<String>>(mut self, ports: impl IntoIterator<Item = S>) -> Self {
        self.ports.extend(ports.into_iter().map(Into::into));
        self
    }

    /// Set a parameter.
    pub fn with_param(mut self, field: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(field, value);
        self
    }

    /// Replace all parameters.
    pub fn with_params(mut self, params: ParameterSet) -> Self {
        self.params = params;
        self
    }
}

/// Everything a template function reads.
pub(crate) struct TemplateContext<'a> {
    pub method: MethodId,
    pub device: &'a DeviceModel,
    pub config: &'a EngineConfig,
    pub ports: &'a [String],
    pub params: &'a ParameterSet,
}

impl TemplateContext<'_> {
    pub fn dialect(&self) -> &dyn Dialect {
        &*self.device.dialect
    }

    /// Fresh text already in configuration mode.
    pub fn open(&self) -> ConfigText {
        let mut out = ConfigText::new();
        self.dialect().begin(&mut out);
        out
    }

    /// Leave configuration mode.
    pub fn close(&self, mut out: ConfigText) -> ConfigText {
        self.dialect().end(&mut out);
        out
    }
}

/// Validate `command` for `device` and render its configuration text.
///
/// Checks run in order: the device offers the method, required fields are
/// present, ports are selected when the method needs them, and every port
/// exists on the device exactly once. Then the method's template function
/// runs. VLAN-allocating methods record their VLAN in `ledger` on success.
pub fn render(
    command: &Command,
    device: &DeviceModel,
    ledger: &mut VlanLedger,
    config: &EngineConfig,
) -> Result<ConfigText> {
    let method = command.method;
    if !device.supports(method) {
        return Err(ValidationError::new(format!(
            "{method} is not available on {}",
            device.name
        ))
        .into());
    }

    let spec = method.spec();
    spec.check_required(&command.params)?;

    if spec.requires_ports && command.ports.is_empty() {
        return Err(ValidationError::new("at least one port must be selected").into());
    }

    let mut seen = HashSet::new();
    for port in &command.ports {
        if !device.has_interface(port) {
            return Err(ValidationError::new(format!(
                "{port} is not an interface of {}",
                device.name
            ))
            .into());
        }
        if !seen.insert(port.as_str()) {
            return Err(ValidationError::new(format!("{port} selected more than once")).into());
        }
    }

    debug!(
        "Rendering {} for {} on {} port(s)",
        method,
        device.name,
        command.ports.len()
    );

    let cx = TemplateContext {
        method,
        device,
        config,
        ports: &command.ports,
        params: &command.params,
    };

    match method {
        MethodId::ApplyDataTemplate => vlan::data_template(&cx, ledger),
        MethodId::EnableVlan => vlan::enable_vlan(&cx, ledger),
        MethodId::SetAccessVlan => vlan::access_vlan(&cx, ledger),
        MethodId::SetTrunkVlan => vlan::trunk_vlan(&cx, ledger),
        MethodId::SetNativeVlan => vlan::native_vlan(&cx, ledger),
        MethodId::CopyVlanSettings => vlan::copy_vlan_settings(&cx, ledger),
        MethodId::ApplyStaticRouting => routing::static_routing(&cx),
        MethodId::ApplyDynamicRouting => routing::dynamic_routing(&cx),
        MethodId::ApplyNat => nat::nat(&cx),
        MethodId::ApplyDhcpServer => dhcp::dhcp_server(&cx),
        MethodId::ApplyConfig => device::apply_config(&cx),
        MethodId::DefaultInterface => device::default_interface(&cx),
        MethodId::RestartRouter => device::restart(&cx),
        MethodId::UpdateFirmware => device::update_firmware(&cx),
        MethodId::BackupConfig => device::backup(&cx),
        MethodId::MonitorTraffic => device::monitor_traffic(&cx),
        MethodId::EnableVirtualization => device::virtualization(&cx),
        MethodId::ApplyQos => device::qos(&cx),
        MethodId::EnableRouting => device::ip_routing(&cx),
        MethodId::OptimizePerformance => device::performance(&cx),
    }
}
