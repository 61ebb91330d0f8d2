//! Session-scoped VLAN allocation ledger.
//!
//! The ledger remembers every VLAN a configuration session has created so
//! later commands cannot reuse an ID or a name. It is owned by one
//! [`ConfigSession`](crate::ConfigSession) and never shared between devices.

use std::fmt;

use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, ValidationError};
use crate::platform::MethodId;

/// Lowest valid 802.1Q VLAN ID.
pub const VLAN_ID_MIN: u16 = 1;

/// Highest valid 802.1Q VLAN ID.
pub const VLAN_ID_MAX: u16 = 4094;

/// VLAN present on every device from factory defaults.
pub const DEFAULT_VLAN: u16 = 1;

static COLOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("static color pattern"));

/// A `#RRGGBB` display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Neutral grey used for unassigned ports.
    pub const NEUTRAL: Color = Color::rgb(0x5F, 0x5F, 0x5F);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if !COLOR_PATTERN.is_match(value) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&value[i..i + 2], 16).ok();
        Some(Self::rgb(channel(1)?, channel(3)?, channel(5)?))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::NEUTRAL
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
            .ok_or_else(|| ValidationError::new(format!("Invalid color '{value}'")))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// One allocated VLAN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlanRecord {
    pub vlan_id: u16,
    pub name: String,
    pub color: Color,
    pub description: String,
    /// The method that allocated this VLAN.
    pub method: MethodId,
}

impl VlanRecord {
    /// Create a record with the neutral color and no description.
    pub fn new(vlan_id: u16, name: impl Into<String>, method: MethodId) -> Self {
        Self {
            vlan_id,
            name: name.into(),
            color: Color::NEUTRAL,
            description: String::new(),
            method,
        }
    }

    /// Set the legend color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// In-memory VLAN ID → record table enforcing ID and name uniqueness.
#[derive(Debug, Default, Clone)]
pub struct VlanLedger {
    records: IndexMap<u16, VlanRecord>,
}

impl VlanLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that `vlan_id` and `name` could be allocated, without mutating.
    pub fn check(&self, vlan_id: u16, name: &str) -> Result<(), LedgerError> {
        if !(VLAN_ID_MIN..=VLAN_ID_MAX).contains(&vlan_id) {
            return Err(LedgerError::OutOfRange {
                id: u32::from(vlan_id),
            });
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        if self.records.contains_key(&vlan_id) {
            return Err(LedgerError::DuplicateVlanId { id: vlan_id });
        }
        if self.contains_name(name) {
            return Err(LedgerError::DuplicateVlanName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Record a new VLAN.
    ///
    /// Fails without touching the ledger when the ID or the name is taken.
    pub fn allocate(&mut self, mut record: VlanRecord) -> Result<&VlanRecord, LedgerError> {
        self.check(record.vlan_id, &record.name)?;
        record.name = record.name.trim().to_string();

        debug!(
            "Allocated VLAN {} '{}' via {}",
            record.vlan_id, record.name, record.method
        );
        let id = record.vlan_id;
        Ok(self.records.entry(id).or_insert(record))
    }

    /// Look up a VLAN by ID.
    pub fn lookup(&self, vlan_id: u16) -> Option<&VlanRecord> {
        self.records.get(&vlan_id)
    }

    /// Check if a VLAN ID is allocated.
    pub fn contains(&self, vlan_id: u16) -> bool {
        self.records.contains_key(&vlan_id)
    }

    /// Check if a VLAN name is allocated.
    pub fn contains_name(&self, name: &str) -> bool {
        let name = name.trim();
        self.records.values().any(|r| r.name == name)
    }

    /// Drop every record. Used when the device context resets.
    pub fn clear(&mut self) {
        if !self.records.is_empty() {
            debug!("Clearing {} VLAN record(s)", self.records.len());
        }
        self.records.clear();
    }

    /// Number of allocated VLANs.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing is allocated.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &VlanRecord> {
        self.records.values()
    }
}
