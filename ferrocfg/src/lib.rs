//! # Ferrocfg
//!
//! Configuration template engine for network devices.
//!
//! Ferrocfg turns structured, untrusted form parameters into vendor
//! configuration text for Cisco IOS, Ubiquiti EdgeOS and OpenWrt devices,
//! validating everything first and tracking VLAN allocations across calls.
//!
//! ## Features
//!
//! - Device catalog with per-model interfaces and configurable methods
//! - One closed set of methods, dispatched exhaustively
//! - Per-session VLAN ledger that rejects duplicate IDs and names
//! - All-or-nothing templates: a rejected command changes nothing
//! - Vendor dialects behind a single trait
//! - Transport-agnostic push helper with failure-marker detection
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrocfg::{Command, ConfigSession, EngineConfig, MethodId, fields};
//!
//! let mut session = ConfigSession::open("Cisco 1841", EngineConfig::default())?;
//!
//! let text = session.submit(
//!     Command::new(MethodId::ApplyDynamicRouting)
//!         .with_param(fields::ROUTING_PROTOCOL, "OSPF")
//!         .with_param(fields::PROCESS_ID, 1)
//!         .with_param(fields::AREA_ID, 0)
//!         .with_param(fields::NETWORKS, "10.0.0.0 0.255.255.255"),
//! )?;
//! println!("{text}");
//!
//! // Everything generated so far, ready to copy or export.
//! println!("{}", session.transcript().snapshot());
//! # Ok::<(), ferrocfg::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod interface;
pub mod ledger;
pub mod platform;
pub mod session;
pub mod template;
pub mod transcript;
pub mod transport;

// Re-export main types for convenience
pub use config::{EngineConfig, EngineConfigBuilder};
pub use error::{Error, Result};
pub use interface::{InterfaceFamily, InterfaceLabel, label_interfaces};
pub use ledger::{Color, VlanLedger, VlanRecord};
pub use platform::{
    DeviceKind, DeviceModel, DeviceRegistry, Dialect, MethodId, MethodSpec, fields, get_device,
    methods_for,
};
pub use session::ConfigSession;
pub use template::{Command, ParamValue, ParameterSet, render};
pub use transcript::{ConfigText, Transcript};
pub use transport::{PushReport, Transport, push_config};
