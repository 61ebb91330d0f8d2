//! Static and dynamic routing templates.

use log::debug;

use super::TemplateContext;
use super::plan::{RoutingProcess, RoutingProtocol, StaticRoute};
use super::validate;
use crate::error::Result;
use crate::platform::fields::*;
use crate::transcript::ConfigText;

const PROTOCOLS: [&str; 2] = ["OSPF", "EIGRP"];

fn ignore_ports(cx: &TemplateContext<'_>) {
    if !cx.ports.is_empty() {
        debug!("{} ignores {} selected port(s)", cx.method, cx.ports.len());
    }
}

pub(super) fn static_routing(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let params = cx.params;
    let destination = validate::network(
        DESTINATION_NETWORK,
        params.ipv4(DESTINATION_NETWORK)?,
        params.netmask(SUBNET_MASK)?,
    )?;
    let next_hop = validate::unicast(NEXT_HOP, params.ipv4(NEXT_HOP)?)?;
    ignore_ports(cx);

    let mut out = cx.open();
    cx.dialect().static_route(
        &mut out,
        &StaticRoute {
            destination,
            next_hop,
        },
    )?;
    Ok(cx.close(out))
}

pub(super) fn dynamic_routing(cx: &TemplateContext<'_>) -> Result<ConfigText> {
    let params = cx.params;
    let protocol = match params.choice(ROUTING_PROTOCOL, &PROTOCOLS)? {
        "OSPF" => RoutingProtocol::Ospf,
        _ => RoutingProtocol::Eigrp,
    };
    let process_id = params.int(PROCESS_ID, 1..=65535)? as u16;
    let area = match protocol {
        RoutingProtocol::Ospf => Some(params.int(AREA_ID, 0..=i64::from(u32::MAX))? as u32),
        RoutingProtocol::Eigrp => None,
    };
    let networks = validate::parse_networks(NETWORKS, &params.text(NETWORKS)?)?;
    ignore_ports(cx);

    let mut out = cx.open();
    cx.dialect().routing_process(
        &mut out,
        &RoutingProcess {
            protocol,
            process_id,
            area,
            networks,
        },
    )?;
    Ok(cx.close(out))
}
