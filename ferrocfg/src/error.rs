//! Error types for ferrocfg.

use std::time::Duration;

use thiserror::Error;

/// Main error type for ferrocfg operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Device catalog errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Malformed, missing or out-of-range parameters
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// VLAN ledger conflicts
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Errors raised while pushing generated text to a device
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    /// True when the failure was caused by user-supplied input.
    ///
    /// Validation and ledger conflicts are both fixable by editing the
    /// parameters and resubmitting.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Ledger(_))
    }
}

/// Device catalog errors.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No device model with this name
    #[error("Unknown device model '{name}'")]
    UnknownDevice { name: String },

    /// A model with this name is already registered
    #[error("Device model '{name}' is already registered")]
    AlreadyRegistered { name: String },

    /// Invalid device definition
    #[error("Invalid device definition: {message}")]
    InvalidDefinition { message: String },
}

/// A rejected parameter set, carrying a human-readable reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ValidationError {
    pub reason: String,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// `"<field> required"`
    pub fn required(field: &str) -> Self {
        Self::new(format!("{field} required"))
    }
}

/// VLAN allocation ledger errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The VLAN ID is already allocated in this session
    #[error("VLAN ID {id} is already in use")]
    DuplicateVlanId { id: u16 },

    /// The VLAN name is already allocated in this session
    #[error("VLAN name '{name}' is already in use")]
    DuplicateVlanName { name: String },

    /// VLAN ID outside 1..=4094
    #[error("VLAN ID {id} out of range")]
    OutOfRange { id: u32 },

    /// VLAN name is empty
    #[error("VLAN name must not be empty")]
    EmptyName,
}

/// Errors from the transport collaborator used by [`push_config`](crate::transport::push_config).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to reach the device
    #[error("Connection failed to {host}: {message}")]
    ConnectionFailed { host: String, message: String },

    /// The device rejected a command
    #[error("Command failed: {message}")]
    CommandFailed { message: String },

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type alias using ferrocfg's Error.
pub type Result<T> = std::result::Result<T, Error>;
