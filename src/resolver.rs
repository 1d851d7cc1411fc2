use tracing::debug;

use crate::error::WhoisError;
use crate::extract::{extract, ResolutionResult};
use crate::registry::{RegistryDirectory, RegistryEndpoint};
use crate::rpsl;
use crate::transport;

/// Resolves ASNs to the networks they originate, one registry at a time.
///
/// Queries run strictly sequentially: one TCP connection, one ASN, one
/// registry. The resolver holds no mutable state, so callers wanting
/// parallelism across disjoint ASNs or registries can share it freely;
/// per-registry connection-rate limits are then on them.
#[derive(Debug, Clone)]
pub struct Resolver {
    directory: RegistryDirectory,
}

impl Resolver {
    pub fn new(directory: RegistryDirectory) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &RegistryDirectory {
        &self.directory
    }

    /// Resolve every ASN in `asn_list` against the named registry.
    ///
    /// Results concatenate in input order. The first failing lookup or
    /// malformed route aborts the whole batch; best-effort across ASNs is a
    /// caller decision.
    pub fn resolve<S: AsRef<str>>(
        &self,
        asn_list: &[S],
        registry: &str,
    ) -> Result<ResolutionResult, WhoisError> {
        let endpoint = self
            .directory
            .get(registry)
            .ok_or_else(|| WhoisError::UnknownRegistry(registry.to_string()))?;

        let mut result = ResolutionResult::new();
        for asn in asn_list {
            result.extend(self.resolve_one(asn.as_ref(), registry, endpoint)?);
        }
        Ok(result)
    }

    /// Inverse origin lookup of a single ASN.
    fn resolve_one(
        &self,
        asn: &str,
        registry: &str,
        endpoint: &RegistryEndpoint,
    ) -> Result<ResolutionResult, WhoisError> {
        let asn = normalize_asn(asn);
        debug!("resolving {} via {}", asn, registry);

        let raw =
            transport::query(endpoint, &origin_query(&asn)).map_err(|source| WhoisError::Lookup {
                asn: asn.clone(),
                registry: registry.to_string(),
                source,
            })?;

        let records = rpsl::parse(&raw, &endpoint.empty_marker);
        extract(&records)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(RegistryDirectory::builtin())
    }
}

/// Prepend the `AS` marker unless the identifier already carries it.
pub fn normalize_asn(asn: &str) -> String {
    if asn.starts_with("AS") {
        asn.to_string()
    } else {
        format!("AS{asn}")
    }
}

/// The inverse-lookup query line for an origin ASN (without line terminator).
pub fn origin_query(asn: &str) -> String {
    format!(" -i origin {asn}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::thread::JoinHandle;

    #[test]
    fn test_normalize_asn() {
        assert_eq!(normalize_asn("41947"), "AS41947");
        assert_eq!(normalize_asn("AS41947"), "AS41947");
    }

    #[test]
    fn test_origin_query_format() {
        assert_eq!(origin_query("AS41947"), " -i origin AS41947");
    }

    #[test]
    fn test_unknown_registry() {
        let resolver = Resolver::default();
        let err = resolver.resolve(&["AS1"], "NOSUCH").unwrap_err();
        assert!(matches!(err, WhoisError::UnknownRegistry(name) if name == "NOSUCH"));
    }

    /// Serve one canned reply per expected connection, recording the query
    /// lines as they come in.
    fn fake_registry(replies: Vec<&'static str>) -> (RegistryDirectory, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let mut queries = Vec::new();
            for reply in replies {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                queries.push(line);

                let mut stream = stream;
                stream.write_all(reply.as_bytes()).unwrap();
            }
            queries
        });

        let mut directory = RegistryDirectory::new();
        directory.insert(
            "FAKE",
            RegistryEndpoint::new(addr.ip().to_string(), addr.port()),
        );
        (directory, server)
    }

    #[test]
    fn test_resolve_single_asn() {
        let (directory, server) = fake_registry(vec![
            "route: 192.0.2.0/24\norigin: AS65536\n\nroute6: 2001:db8::/32\norigin: AS65536\n\n",
        ]);

        let result = Resolver::new(directory).resolve(&["65536"], "FAKE").unwrap();
        assert_eq!(result.ipv4, vec!["192.0.2.0/24".parse().unwrap()]);
        assert_eq!(result.ipv6, vec!["2001:db8::/32".parse().unwrap()]);

        let queries = server.join().unwrap();
        assert_eq!(queries, vec![" -i origin AS65536\r\n".to_string()]);
    }

    #[test]
    fn test_resolve_preserves_asn_order() {
        let (directory, server) = fake_registry(vec![
            "route: 10.0.0.0/8\norigin: AS1\n\n",
            "route: 172.16.0.0/12\norigin: AS2\n\n",
        ]);

        let result = Resolver::new(directory)
            .resolve(&["AS1", "AS2"], "fake")
            .unwrap();
        assert_eq!(
            result.ipv4,
            vec!["10.0.0.0/8".parse().unwrap(), "172.16.0.0/12".parse().unwrap()]
        );

        let queries = server.join().unwrap();
        assert_eq!(queries[0], " -i origin AS1\r\n");
        assert_eq!(queries[1], " -i origin AS2\r\n");
    }

    #[test]
    fn test_resolve_empty_reply() {
        let (directory, server) =
            fake_registry(vec!["%  No entries found for the selected source(s).\n"]);

        let result = Resolver::new(directory).resolve(&["AS1"], "FAKE").unwrap();
        assert!(result.is_empty());
        server.join().unwrap();
    }

    #[test]
    fn test_lookup_failure_carries_context() {
        // a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut directory = RegistryDirectory::new();
        directory.insert(
            "RADB",
            RegistryEndpoint::new(addr.ip().to_string(), addr.port()),
        );

        let err = Resolver::new(directory).resolve(&["AS1"], "RADB").unwrap_err();
        match err {
            WhoisError::Lookup { asn, registry, .. } => {
                assert_eq!(asn, "AS1");
                assert_eq!(registry, "RADB");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_route_aborts_batch() {
        let (directory, server) = fake_registry(vec!["route: bogus/99\norigin: AS1\n\n"]);

        let err = Resolver::new(directory).resolve(&["AS1"], "FAKE").unwrap_err();
        assert!(matches!(err, WhoisError::MalformedRoute { .. }));
        server.join().unwrap();
    }
}
