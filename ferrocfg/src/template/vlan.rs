//! VLAN templates: data template, VLAN creation and port membership.

use ipnetwork::Ipv4Network;

use super::TemplateContext;
use super::plan::{DhcpPool, DhcpRange, SviAddressing, TrunkPlan, VlanDecl};
use super::validate;
use crate::error::{Result, ValidationError};
use crate::ledger::{DEFAULT_VLAN, VlanLedger, VlanRecord};
use crate::platform::DeviceKind;
use crate::platform::fields::*;
use crate::transcript::ConfigText;

const VLAN_MODES: [&str; 2] = ["Static", "Dynamic"];

fn vlan_field(cx: &TemplateContext<'_>, field: &str) -> Result<u16> {
    let id = cx.params.int(field, 1..=i64::from(cx.config.vlan_max))?;
    Ok(id as u16)
}

fn description(cx: &TemplateContext<'_>) -> Result<Option<String>> {
    Ok(cx
        .params
        .opt_text(DESCRIPTION)
        .map(|d| validate::description(DESCRIPTION, &d))
        .transpose()?)
}

/// `VLAN Name` if given, `VLAN0010` style otherwise.
fn vlan_name(cx: &TemplateContext<'_>, id: u16) -> Result<String> {
    match cx.params.opt_text(VLAN_NAME) {
        Some(name) => Ok(validate::name(VLAN_NAME, &name)?),
        None => Ok(format!("VLAN{id:04}")),
    }
}

/// Interface address from `VLAN IP Address` + `Subnet Mask`, which go together.
fn static_address(cx: &TemplateContext<'_>) -> Result<Option<Ipv4Network>> {
    let ip = cx.params.opt_ipv4(VLAN_IP)?;
    let mask = cx.params.opt_netmask(SUBNET_MASK)?;
    match (ip, mask) {
        (Some(ip), Some(mask)) => Ok(Some(validate::host_address(VLAN_IP, ip, mask)?)),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ValidationError::required(SUBNET_MASK).into()),
        (None, Some(_)) => Err(ValidationError::required(VLAN_IP).into()),
    }
}

/// Lease range as host offsets; the interface address must stay outside it.
fn dhcp_range(cx: &TemplateContext<'_>, iface: &Ipv4Network) -> Result<DhcpRange> {
    if iface.prefix() > 30 {
        return Err(ValidationError::new("Subnet Mask leaves no room for a DHCP range").into());
    }
    let last_host = !u32::from(iface.mask()) - 1;
    let (start, stop) = match (cx.params.present(START), cx.params.present(STOP)) {
        (Some(_), Some(_)) => (
            cx.params.int(START, 1..=i64::from(last_host))? as u32,
            cx.params.int(STOP, 1..=i64::from(last_host))? as u32,
        ),
        (None, _) => return Err(ValidationError::required(START).into()),
        (_, None) => return Err(ValidationError::required(STOP).into()),
    };
    if start > stop {
        return Err(ValidationError::new("start must not be greater than stop").into());
    }
    let router = u32::from(iface.ip()) - u32::from(iface.network());
    if (start..=stop).contains(&router) {
        return Err(ValidationError::new(format!(
            "DHCP range must not include the VLAN IP Address {}",
            iface.ip()
        ))
        .into());
    }
    Ok(DhcpRange { start, stop })
}

/// Every ID in `allowed` must already be in the ledger, when the config asks for it.
/// The default VLAN always exists.
fn check_known(
    cx: &TemplateContext<'_>,
    ledger: &VlanLedger,
    allowed: &[u16],
    except: Option<u16>,
) -> Result<()> {
    if !cx.config.require_known_trunk_vlans {
        return Ok(());
    }
    match allowed
        .iter()
        .find(|id| **id != DEFAULT_VLAN && Some(**id) != except && !ledger.contains(**id))
    {
        Some(id) => Err(ValidationError::new(format!(
            "VLAN {id} in {ALLOWED_VLANS} has not been created"
        ))
        .into()),
        None => Ok(()),
    }
}

/// VLAN with optional routed interface, optional DHCP pool and access ports.
pub(super) fn data_template(
    cx: &TemplateContext<'_>,
    ledger: &mut VlanLedger,
) -> Result<ConfigText> {
    let params = cx.params;
    let id = vlan_field(cx, VLAN_ID)?;
    let name = validate::name(PROFILE_NAME, &params.text(PROFILE_NAME)?)?;
    let color = params.color(COLOR, cx.config.default_color);
    let description = description(cx)?;

    let static_addr = static_address(cx)?;
    let addressing = if params.flag(VLAN_ROUTING)? {
        match params.choice(VLAN_MODE, &VLAN_MODES)? {
            "Static" => Some(SviAddressing::Static(
                static_addr.ok_or_else(|| ValidationError::required(VLAN_IP))?,
            )),
            _ => Some(SviAddressing::Dynamic),
        }
    } else {
        static_addr.map(SviAddressing::Static)
    };

    let dhcp = params.flag(DHCP_SERVER)?
        || params.present(START).is_some()
        || params.present(STOP).is_some();
    let pool = if dhcp {
        let Some(SviAddressing::Static(iface)) = addressing else {
            return Err(ValidationError::new(format!(
                "{DHCP_SERVER} requires a static {VLAN_IP} and {SUBNET_MASK}"
            ))
            .into());
        };
        let range = dhcp_range(cx, &iface)?;
        Some(DhcpPool {
            name: format!("{name}_pool"),
            network: Ipv4Network::new(iface.network(), iface.prefix())
                .map_err(|e| ValidationError::new(e.to_string()))?,
            default_router: iface.ip(),
            dns_server: None,
            lease_days: None,
            range: Some(range),
            vlan_id: Some(id),
        })
    } else {
        None
    };

    ledger.check(id, &name)?;

    let port_description = description.clone().unwrap_or_else(|| format!("VLAN {id}"));
    let dialect = cx.dialect();
    let mut out = cx.open();
    dialect.create_vlan(
        &mut out,
        &VlanDecl {
            id,
            name: name.clone(),
            description: description.clone(),
        },
    )?;
    if let Some(addressing) = &addressing {
        dialect.vlan_interface(&mut out, id, addressing)?;
    }
    if let Some(pool) = &pool {
        dialect.dhcp_pool(&mut out, pool)?;
    }
    for port in cx.ports {
        match cx.device.kind {
            DeviceKind::Router => dialect.router_port(&mut out, port, id, &port_description)?,
            DeviceKind::Switch => dialect.access_port(&mut out, port, id, &port_description)?,
        }
    }
    let out = cx.close(out);

    ledger.allocate(
        VlanRecord::new(id, name, cx.method)
            .with_color(color)
            .with_description(description.unwrap_or_default()),
    )?;
    Ok(out)
}

/// Create a VLAN without touching ports.
pub(super) fn enable_vlan(cx: &TemplateContext<'_>, ledger: &mut VlanLedger) -> Result<ConfigText> {
    let id = vlan_field(cx, VLAN_ID)?;
    let name = validate::name(VLAN_NAME, &cx.params.text(VLAN_NAME)?)?;
    let description = description(cx)?;

    ledger.check(id, &name)?;

    let mut out = cx.open();
    cx.dialect().create_vlan(
        &mut out,
        &VlanDecl {
            id,
            name: name.clone(),
            description: description.clone(),
        },
    )?;
    let out = cx.close(out);

    ledger.allocate(
        VlanRecord::new(id, name, cx.method)
            .with_color(cx.config.default_color)
            .with_description(description.unwrap_or_default()),
    )?;
    Ok(out)
}

/// Create a VLAN and make the selected ports access ports in it.
pub(super) fn access_vlan(cx: &TemplateContext<'_>, ledger: &mut VlanLedger) -> Result<ConfigText> {
    let id = vlan_field(cx, VLAN_ID)?;
    let name = vlan_name(cx, id)?;
    let description = description(cx)?;
    let color = cx.params.color(COLOR, cx.config.default_color);

    ledger.check(id, &name)?;

    let port_description = description.clone().unwrap_or_else(|| name.clone());
    let dialect = cx.dialect();
    let mut out = cx.open();
    dialect.create_vlan(
        &mut out,
        &VlanDecl {
            id,
            name: name.clone(),
            description: description.clone(),
        },
    )?;
    for port in cx.ports {
        match cx.device.kind {
            DeviceKind::Router => dialect.router_port(&mut out, port, id, &port_description)?,
            DeviceKind::Switch => dialect.access_port(&mut out, port, id, &port_description)?,
        }
    }
    let out = cx.close(out);

    ledger.allocate(
        VlanRecord::new(id, name, cx.method)
            .with_color(color)
            .with_description(description.unwrap_or_default()),
    )?;
    Ok(out)
}

/// Make the selected ports trunks carrying existing VLANs.
pub(super) fn trunk_vlan(cx: &TemplateContext<'_>, ledger: &VlanLedger) -> Result<ConfigText> {
    let allowed = validate::parse_vlan_list(
        ALLOWED_VLANS,
        &cx.params.text(ALLOWED_VLANS)?,
        cx.config.vlan_max,
    )?;
    check_known(cx, ledger, &allowed, None)?;

    let trunk = TrunkPlan {
        allowed,
        native: None,
        description: description(cx)?,
    };

    let mut out = cx.open();
    for port in cx.ports {
        cx.dialect().trunk_port(&mut out, port, &trunk)?;
    }
    Ok(cx.close(out))
}

/// Create the native VLAN and make the selected ports trunks with it untagged.
pub(super) fn native_vlan(cx: &TemplateContext<'_>, ledger: &mut VlanLedger) -> Result<ConfigText> {
    let native = vlan_field(cx, NATIVE_VLAN_ID)?;
    let name = vlan_name(cx, native)?;
    let description = description(cx)?;
    let color = cx.params.color(COLOR, cx.config.default_color);

    let mut allowed = match cx.params.opt_text(ALLOWED_VLANS) {
        Some(list) => validate::parse_vlan_list(ALLOWED_VLANS, &list, cx.config.vlan_max)?,
        None => vec![],
    };
    check_known(cx, ledger, &allowed, Some(native))?;
    // A restricted trunk must still carry its native VLAN.
    if !allowed.is_empty() && !allowed.contains(&native) {
        allowed.push(native);
        allowed.sort_unstable();
    }

    ledger.check(native, &name)?;

    let trunk = TrunkPlan {
        allowed,
        native: Some(native),
        description: description.clone(),
    };
    let dialect = cx.dialect();
    let mut out = cx.open();
    dialect.create_vlan(
        &mut out,
        &VlanDecl {
            id: native,
            name: name.clone(),
            description: description.clone(),
        },
    )?;
    for port in cx.ports {
        dialect.trunk_port(&mut out, port, &trunk)?;
    }
    let out = cx.close(out);

    ledger.allocate(
        VlanRecord::new(native, name, cx.method)
            .with_color(color)
            .with_description(description.unwrap_or_default()),
    )?;
    Ok(out)
}

/// Put the selected ports into a VLAN created earlier in the session.
pub(super) fn copy_vlan_settings(
    cx: &TemplateContext<'_>,
    ledger: &VlanLedger,
) -> Result<ConfigText> {
    let id = vlan_field(cx, VLAN_ID)?;
    let record = ledger
        .lookup(id)
        .ok_or_else(|| ValidationError::new(format!("VLAN {id} has not been created")))?;
    let port_description = if record.description.is_empty() {
        record.name.as_str()
    } else {
        record.description.as_str()
    };

    let mut out = cx.open();
    for port in cx.ports {
        cx.dialect().access_port(&mut out, port, id, port_description)?;
    }
    Ok(cx.close(out))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{reason, run};
    use super::super::Command;
    use crate::error::{Error, LedgerError};
    use crate::ledger::{Color, VlanLedger};
    use crate::platform::MethodId;
    use crate::platform::fields::*;

    fn data(id: i64, name: &str) -> Command {
        Command::new(MethodId::ApplyDataTemplate)
            .with_param(VLAN_ID, id)
            .with_param(PROFILE_NAME, name)
    }

    fn access(id: i64) -> Command {
        Command::new(MethodId::SetAccessVlan)
            .with_port("Fa1/0/1")
            .with_param(VLAN_ID, id)
    }

    #[test]
    fn test_data_template_full() {
        let mut ledger = VlanLedger::new();
        let command = data(10, "USERS")
            .with_port("Fa0/1")
            .with_param(COLOR, "#00ff00")
            .with_param(VLAN_ROUTING, true)
            .with_param(VLAN_MODE, "static")
            .with_param(VLAN_IP, "192.168.10.1")
            .with_param(SUBNET_MASK, "255.255.255.0")
            .with_param(DHCP_SERVER, true)
            .with_param(START, "100")
            .with_param(STOP, 200);
        let text = run("Cisco 1841", &command, &mut ledger).unwrap();
        let lines = text.lines();

        assert_eq!(lines.first().unwrap(), "configure terminal");
        assert_eq!(lines.last().unwrap(), "end");
        let vlan = text.position("vlan 10").unwrap();
        let svi = text.position("interface vlan 10").unwrap();
        let pool = text.position("ip dhcp pool USERS_pool").unwrap();
        let port = text.position("interface Fa0/1").unwrap();
        assert!(vlan < svi && svi < pool && pool < port);
        assert!(text.contains_line(" ip address 192.168.10.1 255.255.255.0"));
        assert!(text.contains_line(" description VLAN 10"));
        assert!(text.contains_line(" no shutdown"));
        assert!(!lines.iter().any(|l| l.contains("switchport")));

        let record = ledger.lookup(10).unwrap();
        assert_eq!(record.name, "USERS");
        assert_eq!(record.color, Color::rgb(0, 0xFF, 0));
        assert_eq!(record.method, MethodId::ApplyDataTemplate);
    }

    #[test]
    fn test_data_template_switch_ports() {
        let mut ledger = VlanLedger::new();
        let command = data(30, "VOICE").with_port("Gi1/0/2");
        let text = run("Cisco Catalyst 3560", &command, &mut ledger).unwrap();
        assert!(text.contains_line("interface Gi1/0/2"));
        assert!(text.contains_line(" switchport mode access"));
        assert!(text.contains_line(" switchport access vlan 30"));
    }

    #[test]
    fn test_vlan_id_out_of_range() {
        let mut ledger = VlanLedger::new();
        for id in [0, -1, 4095, 100_000] {
            assert_eq!(
                reason("Cisco 1841", &data(id, "X"), &mut ledger),
                "VLAN ID must be between 1 and 4094"
            );
            assert_eq!(
                reason("Cisco Catalyst 2960", &access(id), &mut ledger),
                "VLAN ID must be between 1 and 4094"
            );
            let native = Command::new(MethodId::SetNativeVlan)
                .with_port("Gi1/0/1")
                .with_param(NATIVE_VLAN_ID, id);
            assert_eq!(
                reason("Cisco Catalyst 2960", &native, &mut ledger),
                "Native VLAN ID must be between 1 and 4094"
            );
            let enable = Command::new(MethodId::EnableVlan)
                .with_param(VLAN_ID, id)
                .with_param(VLAN_NAME, "X");
            assert!(run("Cisco Catalyst 2960", &enable, &mut ledger).is_err());
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_duplicate_id_or_name_leaves_ledger_unchanged() {
        let mut ledger = VlanLedger::new();
        run("Cisco 1841", &data(10, "USERS"), &mut ledger).unwrap();
        assert_eq!(ledger.len(), 1);

        let err = run("Cisco 1841", &data(10, "OTHER"), &mut ledger).unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::DuplicateVlanId { id: 10 })));
        assert!(err.is_validation());

        let err = run("Cisco 1841", &data(11, "USERS"), &mut ledger).unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::DuplicateVlanName { .. })));

        assert_eq!(ledger.len(), 1);
        assert!(!ledger.contains(11));
    }

    #[test]
    fn test_failed_dhcp_does_not_allocate() {
        let mut ledger = VlanLedger::new();
        let command = data(20, "GUEST").with_param(DHCP_SERVER, true);
        assert_eq!(
            reason("Cisco 1841", &command, &mut ledger),
            "DHCP Server requires a static VLAN IP Address and Subnet Mask"
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_ip_and_mask_required_together() {
        let mut ledger = VlanLedger::new();
        let command = data(20, "GUEST").with_param(VLAN_IP, "10.0.0.1");
        assert_eq!(
            reason("Cisco 1841", &command, &mut ledger),
            "Subnet Mask required"
        );
        let command = data(20, "GUEST").with_param(VLAN_ROUTING, true);
        assert_eq!(
            reason("Cisco 1841", &command, &mut ledger),
            "VLAN Mode required"
        );
    }

    #[test]
    fn test_dhcp_range_checks() {
        let mut ledger = VlanLedger::new();
        let base = data(30, "LAB")
            .with_param(VLAN_IP, "10.30.0.1")
            .with_param(SUBNET_MASK, "255.255.255.0");

        let reversed = base.clone().with_param(START, 200).with_param(STOP, 100);
        assert_eq!(
            reason("Cisco 1841", &reversed, &mut ledger),
            "start must not be greater than stop"
        );

        let missing = base.clone().with_param(START, 10);
        assert_eq!(reason("Cisco 1841", &missing, &mut ledger), "stop required");

        let overlaps = base.clone().with_param(START, 1).with_param(STOP, 50);
        assert!(reason("Cisco 1841", &overlaps, &mut ledger).contains("must not include"));

        let too_big = base.with_param(START, 10).with_param(STOP, 255);
        assert_eq!(
            reason("Cisco 1841", &too_big, &mut ledger),
            "stop must be between 1 and 254"
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_dynamic_mode_on_edgerouter() {
        let mut ledger = VlanLedger::new();
        let command = data(40, "MGMT")
            .with_port("eth2")
            .with_param(VLAN_ROUTING, "yes")
            .with_param(VLAN_MODE, "Dynamic");
        let text = run("Ubiquiti EdgeRouter X", &command, &mut ledger).unwrap();
        assert_eq!(text.lines()[0], "configure");
        assert!(text.contains_line("set interfaces switch switch0 vif 40 address dhcp"));
        assert!(text.contains_line(
            "set interfaces switch switch0 switch-port interface eth2 vlan pvid 40"
        ));
        assert_eq!(text.lines().last().unwrap(), "exit");
    }

    #[test]
    fn test_bad_color_falls_back() {
        let mut ledger = VlanLedger::new();
        let command = access(5).with_param(COLOR, "blue");
        run("Cisco Catalyst 2960", &command, &mut ledger).unwrap();
        assert_eq!(ledger.lookup(5).unwrap().color, Color::NEUTRAL);
        assert_eq!(ledger.lookup(5).unwrap().name, "VLAN0005");
    }

    #[test]
    fn test_enable_vlan() {
        let mut ledger = VlanLedger::new();
        let command = Command::new(MethodId::EnableVlan)
            .with_param(VLAN_ID, "100")
            .with_param(VLAN_NAME, "VOICE");
        let text = run("Cisco Catalyst 2960", &command, &mut ledger).unwrap();
        assert_eq!(
            text.lines(),
            ["configure terminal", "vlan 100", " name VOICE", "end"]
        );
        assert!(ledger.contains_name("VOICE"));
    }

    #[test]
    fn test_access_vlan_ports_in_order() {
        let mut ledger = VlanLedger::new();
        let command = access(10)
            .with_port("Fa1/0/3")
            .with_param(VLAN_NAME, "SALES");
        let text = run("Cisco Catalyst 2960", &command, &mut ledger).unwrap();
        let first = text.position("interface Fa1/0/1").unwrap();
        let second = text.position("interface Fa1/0/3").unwrap();
        assert!(first < second);
        assert!(text.contains_line(" switchport access vlan 10"));
        assert!(text.contains_line(" description SALES"));
    }

    #[test]
    fn test_trunk_requires_known_vlans() {
        let mut ledger = VlanLedger::new();
        let trunk = Command::new(MethodId::SetTrunkVlan)
            .with_port("Gi1/0/1")
            .with_param(ALLOWED_VLANS, "10,20");
        assert_eq!(
            reason("Cisco Catalyst 2960", &trunk, &mut ledger),
            "VLAN 10 in Allowed VLANs has not been created"
        );

        run("Cisco Catalyst 2960", &access(10), &mut ledger).unwrap();
        run("Cisco Catalyst 2960", &access(20), &mut ledger).unwrap();
        let text = run("Cisco Catalyst 2960", &trunk, &mut ledger).unwrap();
        assert!(text.contains_line(" switchport trunk allowed vlan 10,20"));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_trunk_accepts_default_vlan() {
        let mut ledger = VlanLedger::new();
        run("Cisco Catalyst 2960", &access(10), &mut ledger).unwrap();
        let trunk = Command::new(MethodId::SetTrunkVlan)
            .with_port("Gi1/0/1")
            .with_param(ALLOWED_VLANS, "1,10");
        let text = run("Cisco Catalyst 2960", &trunk, &mut ledger).unwrap();
        assert!(text.contains_line(" switchport trunk allowed vlan 1,10"));
        assert!(!ledger.contains(1));
    }

    #[test]
    fn test_trunk_check_can_be_disabled() {
        use crate::config::EngineConfig;
        use crate::platform::get_device;
        use crate::template::render;

        let config = EngineConfig::builder()
            .require_known_trunk_vlans(false)
            .build()
            .unwrap();
        let device = get_device("Cisco Catalyst 2960").unwrap();
        let trunk = Command::new(MethodId::SetTrunkVlan)
            .with_port("Gi1/0/1")
            .with_param(ALLOWED_VLANS, "10-12");
        let text = render(&trunk, &device, &mut VlanLedger::new(), &config).unwrap();
        assert!(text.contains_line(" switchport trunk allowed vlan 10-12"));
    }

    #[test]
    fn test_native_vlan_is_allocated_and_allowed() {
        let mut ledger = VlanLedger::new();
        run("Cisco Catalyst 2960", &access(10), &mut ledger).unwrap();
        let native = Command::new(MethodId::SetNativeVlan)
            .with_port("Gi1/0/2")
            .with_param(NATIVE_VLAN_ID, 99)
            .with_param(ALLOWED_VLANS, "10");
        let text = run("Cisco Catalyst 2960", &native, &mut ledger).unwrap();
        assert!(text.contains_line(" switchport trunk native vlan 99"));
        assert!(text.contains_line(" switchport trunk allowed vlan 10,99"));
        assert_eq!(ledger.lookup(99).unwrap().name, "VLAN0099");
    }

    #[test]
    fn test_copy_vlan_settings() {
        let mut ledger = VlanLedger::new();
        let copy = Command::new(MethodId::CopyVlanSettings)
            .with_port("Fa1/0/5")
            .with_param(VLAN_ID, 10);
        assert_eq!(
            reason("Cisco Catalyst 2960", &copy, &mut ledger),
            "VLAN 10 has not been created"
        );

        run(
            "Cisco Catalyst 2960",
            &access(10).with_param(VLAN_NAME, "SALES"),
            &mut ledger,
        )
        .unwrap();
        let text = run("Cisco Catalyst 2960", &copy, &mut ledger).unwrap();
        assert!(text.contains_line("interface Fa1/0/5"));
        assert!(text.contains_line(" switchport access vlan 10"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_vlan_max_from_config() {
        use crate::config::EngineConfig;
        use crate::platform::get_device;
        use crate::template::render;

        let config = EngineConfig::builder().vlan_max(1024).build().unwrap();
        let device = get_device("Cisco Catalyst 2960").unwrap();
        let err = render(&access(2000), &device, &mut VlanLedger::new(), &config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: VLAN ID must be between 1 and 1024"
        );
    }
}
