//! Pool-based NAT overload.

use ipnetwork::Ipv4Network;

use super::TemplateContext;
use super::plan::{AclKind, NatPlan, NatRole};
use super::validate;
use crate::error::{Result, ValidationError};
use crate::platform::fields::*;
use crate::transcript::ConfigText;

const ROLES: [&str; 2] = ["Inside", "Outside"];

pub(super) fn nat(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let params = cx.params;
    let role = match params.choice(INTERFACE_ROLE, &ROLES)? {
        "Inside" => NatRole::Inside,
        _ => NatRole::Outside,
    };
    let pool_name = validate::name(POOL_NAME, &params.text(POOL_NAME)?)?;
    let pool_start = validate::unicast(POOL_START, params.ipv4(POOL_START)?)?;
    let pool_end = validate::unicast(POOL_END, params.ipv4(POOL_END)?)?;
    let netmask = params
        .opt_netmask(NETMASK)?
        .unwrap_or(cx.config.default_nat_netmask);

    if pool_start > pool_end {
        return Err(ValidationError::new(format!(
            "{POOL_START} must not be greater than {POOL_END}"
        ))
        .into());
    }
    let subnet = Ipv4Network::with_netmask(pool_start, netmask)
        .map_err(|_| ValidationError::new(format!("{NETMASK} must be a valid subnet mask")))?;
    if !subnet.contains(pool_end) {
        return Err(ValidationError::new(format!(
            "{POOL_START} and {POOL_END} must be in the same {netmask} subnet"
        ))
        .into());
    }

    let access_list = params.int(ACCESS_LIST, 1..=2699)? as u16;
    let acl_kind = AclKind::of(access_list).ok_or_else(|| {
        ValidationError::new(format!(
            "{ACCESS_LIST} must be a standard (1-99, 1300-1999) or extended (100-199, 2000-2699) list"
        ))
    })?;

    let plan = NatPlan {
        role,
        pool_name,
        pool_start,
        pool_end,
        netmask,
        access_list,
        acl_kind,
    };

    let dialect = cx.dialect();
    let mut out = cx.open();
    dialect.nat(&mut out, &plan)?;
    for port in cx.ports {
        dialect.nat_port(&mut out, port, &plan)?;
    }
    Ok(cx.close(out))
}

#[cfg(test)]
mod tests {
    use super::super::Command;
    use super::super::testing::{reason, run};
    use crate::ledger::VlanLedger;
    use crate::platform::MethodId;
    use crate::platform::fields::*;

    fn nat(role: &str, acl: i64) -> Command {
        Command::new(MethodId::ApplyNat)
            .with_param(INTERFACE_ROLE, role)
            .with_param(POOL_NAME, "PUBLIC")
            .with_param(POOL_START, "203.0.113.10")
            .with_param(POOL_END, "203.0.113.20")
            .with_param(ACCESS_LIST, acl)
    }

    #[test]
    fn test_nat_statement_order() {
        let mut ledger = VlanLedger::new();
        let command = nat("inside", 1).with_ports(["Fa0/0", "Fa0/1"]);
        let text = run("Cisco 1841", &command, &mut ledger).unwrap();
        assert_eq!(
            text.lines(),
            [
                "configure terminal",
                "access-list 1 permit any",
                "ip nat pool PUBLIC 203.0.113.10 203.0.113.20 netmask 255.255.255.0",
                "ip nat inside source list 1 pool PUBLIC overload",
                "interface Fa0/0",
                " ip nat inside",
                "interface Fa0/1",
                " ip nat inside",
                "end",
            ]
        );
    }

    #[test]
    fn test_extended_acl_and_custom_netmask() {
        let mut ledger = VlanLedger::new();
        let command = nat("Outside", 101)
            .with_port("Gi0/1")
            .with_param(NETMASK, "255.255.255.224");
        let text = run("Cisco ISR 4321", &command, &mut ledger).unwrap();
        assert!(text.contains_line("access-list 101 permit ip any any"));
        assert!(text.contains_line(
            "ip nat pool PUBLIC 203.0.113.10 203.0.113.20 netmask 255.255.255.224"
        ));
        assert!(text.contains_line(" ip nat outside"));
    }

    #[test]
    fn test_nat_validation() {
        let mut ledger = VlanLedger::new();
        assert_eq!(
            reason("Cisco 1841", &nat("Sideways", 1), &mut ledger),
            "Interface Role must be one of: Inside, Outside"
        );
        assert!(reason("Cisco 1841", &nat("Inside", 250), &mut ledger).contains("standard"));
        assert_eq!(
            reason("Cisco 1841", &nat("Inside", 3000), &mut ledger),
            "Access List must be between 1 and 2699"
        );

        let reversed = nat("Inside", 1)
            .with_param(POOL_START, "203.0.113.30")
            .with_param(POOL_END, "203.0.113.20");
        assert_eq!(
            reason("Cisco 1841", &reversed, &mut ledger),
            "Pool Start IP must not be greater than Pool End IP"
        );

        let spread = nat("Inside", 1).with_param(POOL_END, "203.0.114.20");
        assert!(reason("Cisco 1841", &spread, &mut ledger).contains("same"));
    }

    #[test]
    fn test_nat_ports_optional() {
        let mut ledger = VlanLedger::new();
        let text = run("Cisco 1841", &nat("Inside", 1), &mut ledger).unwrap();
        assert_eq!(text.len(), 5);
    }
}
