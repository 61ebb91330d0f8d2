//! Device model definition.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Dialect;
use super::method::{MethodId, MethodSpec};
use crate::interface::{InterfaceLabel, label_interfaces};

/// Broad device class, used for display grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Router,
    Switch,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Router => f.write_str("Router"),
            DeviceKind::Switch => f.write_str("Switch"),
        }
    }
}

/// A catalog entry: what a device model has and what can be configured on it.
///
/// Immutable once registered. The dialect is a trait object so vendors can
/// render the same validated plan into their own configuration language.
#[derive(Clone)]
pub struct DeviceModel {
    /// Model name (e.g., "Cisco Catalyst 2960").
    pub name: String,

    /// Router or switch.
    pub kind: DeviceKind,

    /// Free-text description shown next to the model.
    pub description: String,

    /// Physical interfaces, in front-panel order.
    pub interfaces: Vec<String>,

    /// Supported methods, in display order.
    pub methods: Vec<MethodId>,

    /// Output markers that mean the device rejected a command.
    pub failed_when_contains: Vec<String>,

    /// Configuration language renderer.
    pub dialect: Arc<dyn Dialect>,
}

impl DeviceModel {
    /// Create a new device model with no interfaces or methods.
    pub fn new(name: impl Into<String>, kind: DeviceKind, dialect: Arc<dyn Dialect>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            interfaces: vec![],
            methods: vec![],
            failed_when_contains: vec![],
            dialect,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a physical interface.
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Add a run of numbered interfaces, e.g. `("Fa1/0/", 1..=24)`.
    pub fn with_interface_range(
        mut self,
        prefix: &str,
        range: std::ops::RangeInclusive<u32>,
    ) -> Self {
        self.interfaces.extend(range.map(|n| format!("{prefix}{n}")));
        self
    }

    /// Add a supported method.
    pub fn with_method(mut self, method: MethodId) -> Self {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
        self
    }

    /// Add several supported methods, keeping order.
    pub fn with_methods(self, methods: impl IntoIterator<Item = MethodId>) -> Self {
        methods.into_iter().fold(self, |model, m| model.with_method(m))
    }

    /// Add a failure marker.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Check if the model offers a method.
    pub fn supports(&self, method: MethodId) -> bool {
        self.methods.contains(&method)
    }

    /// Check if the model has a physical interface with this exact name.
    pub fn has_interface(&self, name: &str) -> bool {
        self.interfaces.iter().any(|i| i == name)
    }

    /// Field declarations for every supported method, in display order.
    pub fn method_specs(&self) -> Vec<MethodSpec> {
        self.methods.iter().map(MethodId::spec).collect()
    }

    /// Display labels for the physical interfaces.
    pub fn labeled_interfaces(&self) -> Vec<InterfaceLabel> {
        label_interfaces(self.interfaces.as_slice())
    }
}

impl fmt::Debug for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceModel")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("description", &self.description)
            .field("interfaces", &self.interfaces)
            .field("methods", &self.methods)
            .field("failed_when_contains", &self.failed_when_contains)
            .field("dialect", &self.dialect.name())
            .finish()
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
