//! Cisco IOS routers and Catalyst switches.

mod dialect;
mod platform;

pub use dialect::CiscoIos;
pub use platform::{routers, switches};
