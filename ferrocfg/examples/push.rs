//! Push example
//!
//! Renders a block and pushes it through a simulated console that answers
//! like a Cisco device, showing how a host application plugs its own
//! connection into the engine.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example push
//! cargo run --example push -- --reject
//! ```

use std::env;
use std::time::Duration;

use ferrocfg::{
    Command, ConfigSession, EngineConfig, MethodId, Result, Transport, fields, push_config,
};

/// Echoes every line; optionally rejects `ip route`.
struct SimulatedConsole {
    reject_routes: bool,
}

impl Transport for SimulatedConsole {
    async fn connect(&mut self) -> Result<()> {
        println!("(console) connected");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        println!("(console) disconnected");
        Ok(())
    }

    async fn send(&mut self, lines: &[String]) -> Result<String> {
        let mut output = String::new();
        for line in lines {
            tokio::time::sleep(Duration::from_millis(10)).await;
            output.push_str(&format!("router(config)#{line}\n"));
            if self.reject_routes && line.starts_with("ip route") {
                output.push_str("% Invalid input detected at '^' marker.\n");
            }
        }
        Ok(output)
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let reject_routes = env::args().any(|a| a == "--reject");

    let config = EngineConfig::default();
    let timeout = config.push_timeout();
    let mut session = ConfigSession::open("Cisco 2811", config)?;

    let text = session.submit(
        Command::new(MethodId::ApplyStaticRouting)
            .with_param(fields::DESTINATION_NETWORK, "192.168.2.0")
            .with_param(fields::SUBNET_MASK, "255.255.255.0")
            .with_param(fields::NEXT_HOP, "203.0.113.1"),
    )?;

    let mut console = SimulatedConsole { reject_routes };
    let report = push_config(&mut console, session.device(), &text, timeout).await?;

    println!("\n{}", report.output);
    println!(
        "Sent {} line(s) to {} in {:?}",
        report.lines_sent, report.device, report.elapsed
    );
    match &report.failure_message {
        None => println!("Device accepted the configuration"),
        Some(marker) => println!("Device rejected the configuration: {marker}"),
    }

    Ok(())
}
