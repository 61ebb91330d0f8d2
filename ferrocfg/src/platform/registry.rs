//! Device capability registry.

use std::sync::RwLock;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use super::definition::DeviceModel;
use super::method::MethodSpec;
use super::vendors;
use crate::error::{RegistryError, Result};

/// Global device registry.
static REGISTRY: Lazy<RwLock<DeviceRegistry>> = Lazy::new(|| {
    let mut registry = DeviceRegistry::new();
    registry.register_builtin_devices();
    RwLock::new(registry)
});

/// Catalog of device models, in display order.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: IndexMap<String, DeviceModel>,
}

impl DeviceRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            devices: IndexMap::new(),
        }
    }

    /// Create a registry holding the built-in catalog.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_devices();
        registry
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<DeviceRegistry> {
        &REGISTRY
    }

    fn register_builtin_devices(&mut self) {
        let builtin = vendors::cisco_ios::routers()
            .into_iter()
            .chain(vendors::cisco_ios::switches())
            .chain(vendors::edgeos::devices())
            .chain(vendors::openwrt::devices());

        for device in builtin {
            self.devices.insert(device.name.clone(), device);
        }
    }

    /// Register a device model.
    pub fn register(&mut self, device: DeviceModel) -> Result<()> {
        if self.devices.contains_key(&device.name) {
            return Err(RegistryError::AlreadyRegistered {
                name: device.name.clone(),
            }
            .into());
        }
        if device.methods.is_empty() {
            return Err(RegistryError::InvalidDefinition {
                message: format!("device '{}' offers no methods", device.name),
            }
            .into());
        }
        self.devices.insert(device.name.clone(), device);
        Ok(())
    }

    /// Get a device model by name.
    pub fn get(&self, name: &str) -> Option<&DeviceModel> {
        self.devices.get(name)
    }

    /// Get a device model by name, failing with `UnknownDevice`.
    pub fn device(&self, name: &str) -> Result<&DeviceModel> {
        self.get(name).ok_or_else(|| {
            RegistryError::UnknownDevice {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Check if a device model is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.devices.contains_key(name)
    }

    /// List registered model names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.devices.keys()
    }

    /// Iterate over all models in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceModel> {
        self.devices.values()
    }
}

/// Look up a device model in the global registry.
pub fn get_device(name: &str) -> Result<DeviceModel> {
    let registry = DeviceRegistry::global()
        .read()
        .map_err(|_| RegistryError::InvalidDefinition {
            message: "Failed to acquire registry lock".to_string(),
        })?;
    registry.device(name).cloned()
}

/// Method specs a device offers, in catalog order.
pub fn methods_for(device: &DeviceModel) -> Vec<MethodSpec> {
    device.method_specs()
}
