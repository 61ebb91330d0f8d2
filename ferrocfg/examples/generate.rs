//! Generate configuration for a device
//!
//! Opens a session for a catalog model, submits a list of commands and
//! prints the resulting transcript. Commands come from a JSON file shaped
//! the way a form layer would submit them:
//!
//! ```json
//! [
//!   {"method": "set_access_vlan", "ports": ["Fa1/0/1"], "params": {"VLAN ID": 10, "VLAN Name": "SALES"}},
//!   {"method": "set_trunk_vlan", "ports": ["Gi1/0/1"], "params": {"Allowed VLANs": "10"}}
//! ]
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --example generate -- --device "Cisco Catalyst 2960" --commands commands.json
//! ```
//!
//! Without `--commands` a built-in VLAN and routing scenario is used.

use std::env;
use std::fs;
use std::path::PathBuf;

use ferrocfg::{Command, ConfigSession, EngineConfig, MethodId, fields};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    println!("=== Ferrocfg Generate Example ===\n");

    let config = match &args.config {
        Some(path) => serde_json::from_str::<EngineConfig>(&fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    let mut session = ConfigSession::open(&args.device, config)?;
    println!("Device: {}", session.device());
    println!("{}\n", session.device().description);

    let commands = match &args.commands {
        Some(path) => serde_json::from_str::<Vec<Command>>(&fs::read_to_string(path)?)?,
        None => scenario(),
    };

    for command in commands {
        let method = command.method;
        match session.submit(command) {
            Ok(text) => println!("[ok]   {method} ({} lines)", text.len()),
            // Rejected commands leave the session untouched; keep going.
            Err(e) if e.is_validation() => println!("[skip] {method}: {e}"),
            Err(e) => return Err(e.into()),
        }
    }

    println!("\n--- VLANs ---");
    for record in session.ledger().iter() {
        println!("{:>4}  {:<16} {}", record.vlan_id, record.name, record.color);
    }

    println!("\n--- Transcript ---");
    print!("{}", session.transcript().snapshot());

    Ok(())
}

fn scenario() -> Vec<Command> {
    vec![
        Command::new(MethodId::SetAccessVlan)
            .with_ports(["Fa1/0/1", "Fa1/0/2"])
            .with_param(fields::VLAN_ID, 10)
            .with_param(fields::VLAN_NAME, "SALES")
            .with_param(fields::COLOR, "#3366FF"),
        Command::new(MethodId::SetAccessVlan)
            .with_port("Fa1/0/3")
            .with_param(fields::VLAN_ID, 20)
            .with_param(fields::VLAN_NAME, "ENGINEERING"),
        // Rejected: VLAN 10 is already allocated.
        Command::new(MethodId::EnableVlan)
            .with_param(fields::VLAN_ID, 10)
            .with_param(fields::VLAN_NAME, "DUPLICATE"),
        Command::new(MethodId::SetTrunkVlan)
            .with_port("Gi1/0/1")
            .with_param(fields::ALLOWED_VLANS, "10,20")
            .with_param(fields::DESCRIPTION, "uplink to core"),
        Command::new(MethodId::ApplyDhcpServer)
            .with_param(fields::POOL_NAME, "SALES_POOL")
            .with_param(fields::NETWORK, "192.168.10.0")
            .with_param(fields::SUBNET_MASK, "255.255.255.0")
            .with_param(fields::DEFAULT_ROUTER, "192.168.10.1")
            .with_param(fields::LEASE_TIME, 7),
    ]
}

struct Args {
    device: String,
    commands: Option<PathBuf>,
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut device = "Cisco Catalyst 2960".to_string();
        let mut commands = None;
        let mut config = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--device" | "-d" => {
                    i += 1;
                    if i < args.len() {
                        device = args[i].clone();
                    }
                }
                "--commands" | "-c" => {
                    i += 1;
                    if i < args.len() {
                        commands = Some(PathBuf::from(&args[i]));
                    }
                }
                "--config" => {
                    i += 1;
                    if i < args.len() {
                        config = Some(PathBuf::from(&args[i]));
                    }
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {}
            }
            i += 1;
        }

        Self {
            device,
            commands,
            config,
        }
    }
}

fn print_help() {
    println!("Ferrocfg generate example");
    println!();
    println!("USAGE:");
    println!("    cargo run --example generate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -d, --device <NAME>     Catalog model [default: Cisco Catalyst 2960]");
    println!("    -c, --commands <FILE>   JSON list of commands");
    println!("        --config <FILE>     JSON engine configuration");
    println!("        --help              Print help");
}
