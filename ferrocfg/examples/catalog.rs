//! Device catalog example
//!
//! Lists every built-in model with its labeled interfaces, or prints the
//! form fields of one model's methods as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example catalog
//! cargo run --example catalog -- "Ubiquiti EdgeRouter X"
//! ```

use std::env;

use ferrocfg::{DeviceRegistry, get_device, methods_for};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Some(name) = env::args().nth(1) {
        let device = get_device(&name)?;
        println!("{}", serde_json::to_string_pretty(&methods_for(&device))?);
        return Ok(());
    }

    let registry = DeviceRegistry::global()
        .read()
        .map_err(|_| "registry lock poisoned")?;

    for device in registry.iter() {
        println!("{} [{}]", device, device.dialect.name());
        println!("  {}", device.description);

        let labels: Vec<String> = device
            .labeled_interfaces()
            .into_iter()
            .map(|l| l.display_label)
            .collect();
        println!("  interfaces: {}", labels.join(" "));

        let methods: Vec<&str> = device.methods.iter().map(|m| m.as_str()).collect();
        println!("  methods:    {}\n", methods.join(", "));
    }

    Ok(())
}
