//! Built-in vendors: their configuration dialects and device catalogs.

pub mod cisco_ios;
pub mod edgeos;
pub mod openwrt;
