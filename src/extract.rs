use std::net::IpAddr;

use ipnet::{IpNet, Ipv4Net, Ipv6Net};

use crate::error::WhoisError;
use crate::rpsl::Record;

/// Fields of a route object that carry an originated block.
const ROUTE_FIELDS: [&str; 2] = ["route", "route6"];

/// Networks collected by one resolution run, split by address family.
///
/// Order follows ASN input order, then record/value order within each
/// response. Duplicates are kept; merging is the caller's business (see
/// [`aggregate`](Self::aggregate)).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    pub ipv4: Vec<Ipv4Net>,
    pub ipv6: Vec<Ipv6Net>,
}

impl ResolutionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ipv4.is_empty() && self.ipv6.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ipv4.len() + self.ipv6.len()
    }

    /// Append all networks of `other`, keeping order.
    pub fn extend(&mut self, other: ResolutionResult) {
        self.ipv4.extend(other.ipv4);
        self.ipv6.extend(other.ipv6);
    }

    /// Merge each family into its minimal covering CIDR set.
    pub fn aggregate(&self) -> ResolutionResult {
        ResolutionResult {
            ipv4: Ipv4Net::aggregate(&self.ipv4),
            ipv6: Ipv6Net::aggregate(&self.ipv6),
        }
    }
}

/// Pull every `route`/`route6` value out of `records` as typed networks.
///
/// Values parse leniently: host bits beyond the prefix are truncated (a
/// `10.0.0.1/8` route yields `10.0.0.0/8`) and a bare address becomes a host
/// network. A value that is no network literal at all fails the whole
/// extraction; leniency ends at syntactic validity.
pub fn extract(records: &[Record]) -> Result<ResolutionResult, WhoisError> {
    let mut result = ResolutionResult::new();

    for record in records {
        for field in ROUTE_FIELDS {
            for value in record.values(field) {
                let net = parse_network(value).map_err(|source| WhoisError::MalformedRoute {
                    object: record.summary(),
                    value: value.to_string(),
                    source,
                })?;
                match net {
                    IpNet::V4(net) => result.ipv4.push(net),
                    IpNet::V6(net) => result.ipv6.push(net),
                }
            }
        }
    }

    Ok(result)
}

/// Non-strict CIDR parse: `addr/len` with host bits tolerated, or a bare
/// address as a /32 resp. /128 host network.
pub fn parse_network(value: &str) -> Result<IpNet, ipnet::AddrParseError> {
    match value.parse::<IpNet>() {
        Ok(net) => Ok(net.trunc()),
        Err(err) => value.parse::<IpAddr>().map(IpNet::from).map_err(|_| err),
    }
}

/// Merge a list of address/CIDR literals into its minimal covering set.
/// Families aggregate independently; the result lists IPv4 before IPv6.
pub fn aggregate_literals<S: AsRef<str>>(items: &[S]) -> Result<Vec<IpNet>, ipnet::AddrParseError> {
    let nets = items
        .iter()
        .map(|item| parse_network(item.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(IpNet::aggregate(&nets))
}
