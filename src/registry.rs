use std::time::Duration;

// List of Routing Registries: https://www.irr.net/docs/list.html
pub const DEFAULT_WHOIS_PORT: u16 = 43;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_EMPTY_MARKER: &str = "no entries found";

/// Connection parameters of one routing-registry WHOIS server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEndpoint {
    pub host: String,
    pub port: u16,
    /// Bounds connect and every read/write of a single query.
    pub timeout: Duration,
    /// Comment text the registry emits when a query matches nothing.
    pub empty_marker: String,
}

impl RegistryEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            empty_marker: DEFAULT_EMPTY_MARKER.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Ordered name -> endpoint table of known routing registries.
///
/// Read-only once handed to a [`Resolver`](crate::Resolver); tests insert an
/// endpoint that points at an in-process listener instead of patching
/// globals.
#[derive(Debug, Clone, Default)]
pub struct RegistryDirectory {
    entries: Vec<(String, RegistryEndpoint)>,
}

impl RegistryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The IRR servers this tool knows out of the box.
    pub fn builtin() -> Self {
        let mut dir = Self::new();
        for (name, host) in [
            ("AFRINIC", "whois.afrinic.net"),
            ("ALTDB", "whois.altdb.net"),
            ("APNIC", "whois.apnic.net"),
            ("ARIN", "rr.arin.net"),
            ("BELL", "whois.in.bell.ca"),
            ("BBOI", "irr.bboi.net"),
            ("IDNIC", "irr.idnic.net"),
            ("JPIRR", "jpirr.nic.ad.jp"),
            ("LACNIC", "irr.lacnic.net"),
            ("NTTCOM", "rr.ntt.net"),
            ("NESTEGG", "whois.nestegg.net"),
            ("LEVEL3", "rr.Level3.net"),
            ("PANIX", "rrdb.access.net"),
            ("RADB", "whois.radb.net"),
            ("REACH", "rr.telstraglobal.net"),
            ("RIPE", "whois.ripe.net"),
            ("TC", "whois.bgp.net.br"),
        ] {
            dir.insert(name, RegistryEndpoint::new(host, DEFAULT_WHOIS_PORT));
        }
        // CANARIE runs its IRR on a non-standard port
        dir.insert("CANARIE", RegistryEndpoint::new("whois.canarie.ca", 43003));
        dir
    }

    /// Add or replace an endpoint under `name`.
    pub fn insert(&mut self, name: impl Into<String>, endpoint: RegistryEndpoint) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some((_, existing)) => *existing = endpoint,
            None => self.entries.push((name, endpoint)),
        }
    }

    /// Look up an endpoint by registry name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&RegistryEndpoint> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, endpoint)| endpoint)
    }

    /// Registry names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
