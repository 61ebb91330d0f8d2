//! Per-device configuration session.
//!
//! A session owns everything that persists between template calls for one
//! device: the VLAN ledger, the transcript of generated text and the colors
//! assigned to ports. It is the single writer for that state; one session
//! per device, never shared.
//!
//! # Example
//!
//! ```rust
//! use ferrocfg::{Command, ConfigSession, EngineConfig, MethodId, fields};
//!
//! let mut session = ConfigSession::open("Cisco Catalyst 2960", EngineConfig::default()).unwrap();
//! session
//!     .submit(
//!         Command::new(MethodId::SetAccessVlan)
//!             .with_port("Fa1/0/1")
//!             .with_param(fields::VLAN_ID, 10)
//!             .with_param(fields::COLOR, "#FF8800"),
//!     )
//!     .unwrap();
//!
//! assert!(session.ledger().contains(10));
//! assert_eq!(session.port_color("Fa1/0/1").unwrap().to_string(), "#FF8800");
//! assert!(session.transcript().as_str().contains("switchport access vlan 10"));
//! ```

use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::ledger::{Color, VLAN_ID_MAX, VlanLedger};
use crate::platform::{DeviceModel, MethodId, fields, get_device};
use crate::template::{Command, render};
use crate::transcript::{ConfigText, Transcript};

/// Ledger, transcript and port colors for one device.
#[derive(Debug)]
pub struct ConfigSession {
    device: DeviceModel,
    config: EngineConfig,
    ledger: VlanLedger,
    transcript: Transcript,
    port_colors: IndexMap<String, Color>,
}

impl ConfigSession {
    /// Start a session for `device`.
    pub fn new(device: DeviceModel, config: EngineConfig) -> Self {
        let transcript = Transcript::new(config.transcript_separator.clone());
        info!("Opened configuration session for {}", device.name);
        Self {
            device,
            config,
            ledger: VlanLedger::new(),
            transcript,
            port_colors: IndexMap::new(),
        }
    }

    /// Start a session for a catalog model.
    pub fn open(name: &str, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(get_device(name)?, config))
    }

    /// Render a command, record it, and return the generated text.
    ///
    /// On error nothing changes: not the ledger, not the transcript, not the
    /// port colors. A successful device restart clears the ledger and the
    /// port colors; the transcript keeps the reset commands.
    pub fn submit(&mut self, command: Command) -> Result<ConfigText> {
        let text = match render(&command, &self.device, &mut self.ledger, &self.config) {
            Ok(text) => text,
            Err(e) => {
                warn!("{} on {} rejected: {}", command.method, self.device.name, e);
                return Err(e);
            }
        };

        self.transcript.append(&text);
        self.record_port_colors(&command);

        if command.method.resets_device() {
            info!("{} reset; clearing VLANs and port colors", self.device.name);
            self.clear_device_state();
        }
        Ok(text)
    }

    /// Ports joined to a VLAN take that VLAN's color.
    fn record_port_colors(&mut self, command: &Command) {
        let field = match command.method {
            MethodId::ApplyDataTemplate | MethodId::SetAccessVlan | MethodId::CopyVlanSettings => {
                fields::VLAN_ID
            }
            MethodId::SetNativeVlan => fields::NATIVE_VLAN_ID,
            MethodId::DefaultInterface => {
                for port in &command.ports {
                    self.port_colors.shift_remove(port);
                }
                return;
            }
            _ => return,
        };
        let Ok(Some(id)) = command.params.opt_int(field, 1..=i64::from(VLAN_ID_MAX)) else {
            return;
        };
        let Some(record) = self.ledger.lookup(id as u16) else {
            return;
        };
        for port in &command.ports {
            debug!("Port {} colored {} (VLAN {})", port, record.color, record.vlan_id);
            self.port_colors.insert(port.clone(), record.color);
        }
    }

    fn clear_device_state(&mut self) {
        self.ledger.clear();
        self.port_colors.clear();
    }

    /// Forget everything, as if the session had just been opened.
    pub fn reset(&mut self) {
        self.clear_device_state();
        self.transcript.reset();
    }

    /// Move the session to another device; all state starts over.
    pub fn switch_device(&mut self, device: DeviceModel) {
        info!("Switching session from {} to {}", self.device.name, device.name);
        self.device = device;
        self.reset();
    }

    /// The device being configured.
    pub fn device(&self) -> &DeviceModel {
        &self.device
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &VlanLedger {
        &self.ledger
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Color of a port, if it has been assigned to a VLAN.
    pub fn port_color(&self, port: &str) -> Option<Color> {
        self.port_colors.get(port).copied()
    }

    /// Port colors in assignment order.
    pub fn port_colors(&self) -> impl Iterator<Item = (&str, Color)> {
        self.port_colors.iter().map(|(p, c)| (p.as_str(), *c))
    }
}
