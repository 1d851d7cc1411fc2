use std::io;

use thiserror::Error;

/// Failures surfaced by an ASN resolution run.
///
/// Nothing is retried or swallowed internally: the first error aborts the
/// batch. A caller that wants best-effort behavior across many ASNs or
/// registries catches per call and continues explicitly.
#[derive(Debug, Error)]
pub enum WhoisError {
    /// The requested registry name is not in the directory.
    #[error("unknown registry {0:?}")]
    UnknownRegistry(String),

    /// Transport-level failure while querying a registry for one ASN.
    #[error("ASN origin WHOIS lookup for {asn} via {registry} failed")]
    Lookup {
        asn: String,
        registry: String,
        #[source]
        source: io::Error,
    },

    /// A route/route6 value that is not a valid network literal.
    #[error("object {object:?} carries malformed network literal {value:?}")]
    MalformedRoute {
        /// First field line of the offending record.
        object: String,
        value: String,
        #[source]
        source: ipnet::AddrParseError,
    },
}
