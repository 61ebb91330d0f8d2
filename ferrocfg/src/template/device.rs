//! Whole-device and per-interface maintenance templates.

use super::TemplateContext;
use super::plan::{FirmwareImage, SpanSession};
use super::validate;
use crate::error::{Result, ValidationError};
use crate::platform::fields::*;
use crate::transcript::ConfigText;

/// Describe and enable the selected ports.
pub(super) fn apply_config(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let description = match cx.params.opt_text(DESCRIPTION) {
        Some(d) => validate::description(DESCRIPTION, &d)?,
        None => String::new(),
    };

    let mut out = cx.open();
    for port in cx.ports {
        cx.dialect().port_description(&mut out, port, &description, true)?;
    }
    Ok(cx.close(out))
}

pub(super) fn default_interface(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let mut out = cx.open();
    for port in cx.ports {
        cx.dialect().default_interface(&mut out, port)?;
    }
    Ok(cx.close(out))
}

/// Factory reset and reboot. The caller clears session state afterwards.
pub(super) fn restart(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let mut out = ConfigText::new();
    cx.dialect().factory_reset(&mut out)?;
    Ok(out)
}

/// Fetch an image and boot it, sourcing the transfer from the first port.
pub(super) fn update_firmware(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let server = validate::unicast(SERVER_IP, cx.params.ipv4(SERVER_IP)?)?;
    let file = validate::file_name(IMAGE_FILE, &cx.params.text(IMAGE_FILE)?)?;
    let mgmt_port = cx
        .ports
        .first()
        .ok_or_else(|| ValidationError::new("at least one port must be selected"))?;

    let mut out = ConfigText::new();
    cx.dialect()
        .firmware_update(&mut out, &FirmwareImage { server, file }, mgmt_port)?;
    Ok(out)
}

pub(super) fn backup(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let mut out = ConfigText::new();
    cx.dialect().save_config(&mut out)?;
    Ok(out)
}

/// Mirror one interface onto another.
pub(super) fn monitor_traffic(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let id = cx.params.int(SESSION_ID, 1..=66)? as u8;
    let source = cx.params.text(SOURCE)?;
    let destination = cx.params.text(DESTINATION)?;
    for (field, port) in [(SOURCE, &source), (DESTINATION, &destination)] {
        if !cx.device.has_interface(port) {
            return Err(ValidationError::new(format!(
                "{field} {port} is not an interface of {}",
                cx.device.name
            ))
            .into());
        }
    }
    if source == destination {
        return Err(ValidationError::new(format!("{SOURCE} and {DESTINATION} must differ")).into());
    }

    let mut out = cx.open();
    cx.dialect().span_session(
        &mut out,
        &SpanSession {
            id,
            source,
            destination,
        },
    )?;
    Ok(cx.close(out))
}

pub(super) fn virtualization(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let mut out = cx.open();
    cx.dialect().virtualization(&mut out)?;
    Ok(cx.close(out))
}

/// Trust CoS markings on the selected ports.
pub(super) fn qos(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let mut out = cx.open();
    cx.dialect().qos_trust(&mut out, cx.ports)?;
    Ok(cx.close(out))
}

pub(super) fn ip_routing(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let mut out = cx.open();
    cx.dialect().ip_routing(&mut out)?;
    Ok(cx.close(out))
}

pub(super) fn performance(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let mut out = cx.open();
    cx.dialect().performance_profile(&mut out)?;
    Ok(cx.close(out))
}

#[cfg(test)]
mod tests {
    use super::super::Command;
    use super::super::testing::{reason, run};
    use crate::ledger::VlanLedger;
    use crate::platform::MethodId;
    use crate::platform::fields::*;

    #[test]
    fn test_default_interface_per_port() {
        let mut ledger = VlanLedger::new();
        let command = Command::new(MethodId::DefaultInterface).with_ports(["Fa0/1", "Fa0/0"]);
        let text = run("Cisco 1841", &command, &mut ledger).unwrap();
        assert_eq!(
            text.lines(),
            [
                "configure terminal",
                "default interface Fa0/1",
                "default interface Fa0/0",
                "end"
            ]
        );
    }

    #[test]
    fn test_restart_is_outside_config_mode() {
        let mut ledger = VlanLedger::new();
        let text = run("Cisco 1841", &Command::new(MethodId::RestartRouter), &mut ledger).unwrap();
        assert!(!text.contains_line("configure terminal"));
        assert_eq!(text.lines().last().unwrap(), "reload");
    }

    #[test]
    fn test_update_firmware_uses_first_port() {
        let mut ledger = VlanLedger::new();
        let command = Command::new(MethodId::UpdateFirmware)
            .with_ports(["Gi0/1", "Gi0/0"])
            .with_param(SERVER_IP, "192.0.2.5")
            .with_param(IMAGE_FILE, "c1900-universalk9-mz.SPA.157-3.M8.bin");
        let text = run("Cisco 1941", &command, &mut ledger).unwrap();
        assert!(text.contains_line("ip tftp source-interface Gi0/1"));

        let bad = command.clone().with_param(SERVER_IP, "255.255.255.255");
        assert!(reason("Cisco 1941", &bad, &mut ledger).contains("not a unicast address"));
        let bad = command.with_param(IMAGE_FILE, "../boot.bin");
        assert_eq!(
            reason("Cisco 1941", &bad, &mut ledger),
            "Image File is not a valid file name"
        );
    }

    #[test]
    fn test_apply_config() {
        let mut ledger = VlanLedger::new();
        let command = Command::new(MethodId::ApplyConfig)
            .with_port("Gi0/0")
            .with_param(DESCRIPTION, "uplink");
        let text = run("Cisco ISR 4321", &command, &mut ledger).unwrap();
        assert_eq!(
            text.lines(),
            [
                "configure terminal",
                "interface Gi0/0",
                " description uplink",
                " no shutdown",
                "end"
            ]
        );
    }

    #[test]
    fn test_backup() {
        let mut ledger = VlanLedger::new();
        let text = run("Cisco 2811", &Command::new(MethodId::BackupConfig), &mut ledger).unwrap();
        assert_eq!(text.lines(), ["copy running-config startup-config"]);
    }

    #[test]
    fn test_monitor_traffic() {
        let mut ledger = VlanLedger::new();
        let command = Command::new(MethodId::MonitorTraffic)
            .with_param(SESSION_ID, 1)
            .with_param(SOURCE, "Fa1/0/1")
            .with_param(DESTINATION, "Fa1/0/24");
        let text = run("Cisco 2950", &command, &mut ledger).unwrap();
        assert!(text.contains_line("monitor session 1 source interface Fa1/0/1"));
        assert!(text.contains_line("monitor session 1 destination interface Fa1/0/24"));

        let same = command.clone().with_param(DESTINATION, "Fa1/0/1");
        assert_eq!(
            reason("Cisco 2950", &same, &mut ledger),
            "Source and Destination must differ"
        );
        let foreign = command.clone().with_param(SOURCE, "Gi0/9");
        assert_eq!(
            reason("Cisco 2950", &foreign, &mut ledger),
            "Source Gi0/9 is not an interface of Cisco 2950"
        );
        let out_of_range = command.with_param(SESSION_ID, 67);
        assert_eq!(
            reason("Cisco 2950", &out_of_range, &mut ledger),
            "Session ID must be between 1 and 66"
        );
    }

    #[test]
    fn test_single_statement_methods() {
        let mut ledger = VlanLedger::new();
        let cases = [
            ("Cisco ISR 4321", MethodId::EnableVirtualization, "iox"),
            ("Cisco Catalyst 3560", MethodId::EnableRouting, "ip routing"),
            ("Cisco Catalyst 9200", MethodId::OptimizePerformance, "sdm prefer advanced"),
        ];
        for (device, method, line) in cases {
            let text = run(device, &Command::new(method), &mut ledger).unwrap();
            assert_eq!(text.lines(), ["configure terminal", line, "end"]);
        }
    }

    #[test]
    fn test_qos_trust() {
        let mut ledger = VlanLedger::new();
        let command = Command::new(MethodId::ApplyQos).with_ports(["Gi1/0/1", "Gi1/0/2"]);
        let text = run("Cisco Catalyst 3650", &command, &mut ledger).unwrap();
        assert_eq!(text.position("mls qos"), Some(1));
        assert_eq!(
            text.lines()
                .iter()
                .filter(|l| *l == " mls qos trust cos")
                .count(),
            2
        );
    }
}
