//! Engine configuration.

use std::net::Ipv4Addr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{RegistryError, Result};
use crate::ledger::{Color, VLAN_ID_MAX};

/// Tunables shared by the template functions and the session.
///
/// Deserializable so a host application can keep it in its own settings
/// file; missing keys fall back to the defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Highest VLAN ID accepted by VLAN-allocating templates.
    pub vlan_max: u16,

    /// Reject trunk VLAN lists that reference VLANs not yet in the ledger.
    pub require_known_trunk_vlans: bool,

    /// Color used when a color field is absent or malformed.
    pub default_color: Color,

    /// NAT pool netmask used when the form leaves it empty.
    pub default_nat_netmask: Ipv4Addr,

    /// Marker line inserted between transcript entries.
    pub transcript_separator: String,

    /// Timeout for a whole push through the transport collaborator.
    pub push_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vlan_max: VLAN_ID_MAX,
            require_known_trunk_vlans: true,
            default_color: Color::NEUTRAL,
            default_nat_netmask: Ipv4Addr::new(255, 255, 255, 0),
            transcript_separator: "! --- next configuration ---".to_string(),
            push_timeout_secs: 30,
        }
    }
}

impl EngineConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Timeout for [`push_config`](crate::transport::push_config).
    pub fn push_timeout(&self) -> Duration {
        Duration::from_secs(self.push_timeout_secs)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.vlan_max == 0 || self.vlan_max > VLAN_ID_MAX {
            return Err(RegistryError::InvalidDefinition {
                message: format!("vlan_max must be within 1..={VLAN_ID_MAX}"),
            }
            .into());
        }
        if self.transcript_separator.trim().is_empty() {
            return Err(RegistryError::InvalidDefinition {
                message: "transcript separator must not be blank".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Builder for [`EngineConfig`].
///
/// # Example
///
/// ```rust
/// use ferrocfg::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .vlan_max(1024)
///     .require_known_trunk_vlans(false)
///     .build()
///     .unwrap();
/// assert_eq!(config.vlan_max, 1024);
/// ```
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the highest accepted VLAN ID (default: 4094).
    pub fn vlan_max(mut self, vlan_max: u16) -> Self {
        self.config.vlan_max = vlan_max;
        self
    }

    /// Require trunk VLANs to be allocated first (default: true).
    pub fn require_known_trunk_vlans(mut self, require: bool) -> Self {
        self.config.require_known_trunk_vlans = require;
        self
    }

    /// Set the fallback color.
    pub fn default_color(mut self, color: Color) -> Self {
        self.config.default_color = color;
        self
    }

    /// Set the NAT netmask used when none is given.
    pub fn default_nat_netmask(mut self, netmask: Ipv4Addr) -> Self {
        self.config.default_nat_netmask = netmask;
        self
    }

    /// Set the transcript separator line.
    pub fn transcript_separator(mut self, separator: impl Into<String>) -> Self {
        self.config.transcript_separator = separator.into();
        self
    }

    /// Set the push timeout.
    pub fn push_timeout(mut self, timeout: Duration) -> Self {
        self.config.push_timeout_secs = timeout.as_secs();
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
