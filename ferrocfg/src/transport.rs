//! Glue between generated text and a device connection.
//!
//! The engine never opens connections itself. A host application supplies
//! a [`Transport`] (SSH, serial console, a lab simulator) and hands it to
//! [`push_config`] together with a rendered block.
//!
//! # Example
//!
//! ```rust,no_run
//! use ferrocfg::{ConfigText, Result, Transport, get_device, push_config};
//! use std::time::Duration;
//!
//! struct Console;
//!
//! impl Transport for Console {
//!     async fn connect(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     async fn disconnect(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     async fn send(&mut self, lines: &[String]) -> Result<String> {
//!         Ok(lines.join("\n"))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let device = get_device("Cisco 1841")?;
//! let text: ConfigText = ["configure terminal", "ip routing", "end"].into_iter().collect();
//! let report = push_config(&mut Console, &device, &text, Duration::from_secs(30)).await?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::error::{Result, TransportError};
use crate::platform::DeviceModel;
use crate::transcript::ConfigText;

/// A connection to one device.
pub trait Transport: Send {
    /// Open the connection.
    fn connect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Close the connection.
    fn disconnect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Send lines in order and return the raw device output.
    fn send(&mut self, lines: &[String]) -> impl Future<Output = Result<String>> + Send;
}

/// Outcome of a push.
#[derive(Debug, Clone)]
pub struct PushReport {
    /// Device model the text was pushed to.
    pub device: String,

    /// Number of lines sent.
    pub lines_sent: usize,

    /// Raw output returned by the transport.
    pub output: String,

    /// Time taken, connect to disconnect.
    pub elapsed: Duration,

    /// Failure marker found in the output, if any.
    pub failure_message: Option<String>,
}

impl PushReport {
    /// Check if the device accepted every line.
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }

    /// Check if the output contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.output.contains(pattern)
    }
}

/// Send `text` to `device` over `transport`.
///
/// Connects, sends every line, scans the output for the model's failure
/// markers and disconnects. The whole exchange must finish within
/// `timeout`. A rejected command is reported in
/// [`PushReport::failure_message`], not as an error.
pub async fn push_config<T: Transport>(
    transport: &mut T,
    device: &DeviceModel,
    text: &ConfigText,
    timeout: Duration,
) -> Result<PushReport> {
    let lines = text.lines();
    if text.is_empty() {
        debug!("Nothing to push to {}", device.name);
        return Ok(PushReport {
            device: device.name.clone(),
            lines_sent: 0,
            output: String::new(),
            elapsed: Duration::ZERO,
            failure_message: None,
        });
    }

    info!("Pushing {} line(s) to {}", lines.len(), device.name);
    let start = Instant::now();

    let exchange = async {
        transport.connect().await?;
        let sent = transport.send(lines).await;
        if let Err(e) = transport.disconnect().await {
            warn!("Disconnect from {} failed: {}", device.name, e);
        }
        sent
    };

    let output = match tokio::time::timeout(timeout, exchange).await {
        Ok(output) => output?,
        Err(_) => {
            warn!("Push to {} timed out after {:?}", device.name, timeout);
            if tokio::time::timeout(timeout, transport.disconnect())
                .await
                .is_err()
            {
                warn!("Disconnect from {} timed out", device.name);
            }
            return Err(TransportError::Timeout(timeout).into());
        }
    };

    let failure_message = device
        .failed_when_contains
        .iter()
        .find(|pattern| output.contains(pattern.as_str()))
        .cloned();
    if let Some(pattern) = &failure_message {
        warn!("{} rejected configuration: found '{}'", device.name, pattern);
    }

    Ok(PushReport {
        device: device.name.clone(),
        lines_sent: lines.len(),
        output,
        elapsed: start.elapsed(),
        failure_message,
    })
}
