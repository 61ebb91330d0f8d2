//! DHCP server pools.

use super::TemplateContext;
use super::plan::DhcpPool;
use super::validate;
use crate::error::{Result, ValidationError};
use crate::platform::fields::*;
use crate::transcript::ConfigText;

pub(super) fn dhcp_server(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let params = cx.params;
    let name = validate::name(POOL_NAME, &params.text(POOL_NAME)?)?;
    let network = validate::network(NETWORK, params.ipv4(NETWORK)?, params.netmask(SUBNET_MASK)?)?;
    let default_router = params.ipv4(DEFAULT_ROUTER)?;
    if !network.contains(default_router)
        || default_router == network.network()
        || default_router == network.broadcast()
    {
        return Err(ValidationError::new(format!(
            "{DEFAULT_ROUTER} {default_router} must be a host in {network}"
        ))
        .into());
    }
    let dns_server = params
        .opt_ipv4(DNS_SERVER)?
        .map(|dns| validate::unicast(DNS_SERVER, dns))
        .transpose()?;
    let lease_days = params.opt_int(LEASE_TIME, 1..=365)?.map(|d| d as u32);

    let pool = DhcpPool {
        name,
        network,
        default_router,
        dns_server,
        lease_days,
        range: None,
        vlan_id: None,
    };

    let dialect = cx.dialect();
    let mut out = cx.open();
    dialect.dhcp_pool(&mut out, &pool)?;
    let tag = format!("DHCP pool {}", pool.name);
    for port in cx.ports {
        dialect.port_description(&mut out, port, &tag, false)?;
    }
    Ok(cx.close(out))
}
