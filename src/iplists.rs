use std::io::{self, BufRead};

use once_cell::sync::Lazy;
use regex::Regex;

// Address patterns adapted from
// https://gist.github.com/dfee/6ed3a4b05cfe7a6faf40a2102408d5d8

const IPV4_SEG: &str = r"(?:25[0-5]|(?:2[0-4]|1{0,1}[0-9]){0,1}[0-9])";
const IPV6_SEG: &str = r"(?:[0-9a-fA-F]{1,4})";

fn ipv4_addr() -> String {
    format!(r"(?:(?:{IPV4_SEG}\.){{3}}{IPV4_SEG})")
}

/// Every textual IPv6 form: full, abbreviated, link-local with zone id,
/// IPv4-mapped and IPv4-embedded. The alternation is assembled in reverse
/// so the composite forms are tried before the plain ones they contain.
fn ipv6_addr() -> String {
    let seg = IPV6_SEG;
    let v4 = ipv4_addr();
    let groups = [
        format!("(?:{seg}:){{7}}{seg}"),
        format!("(?:{seg}:){{1,7}}:"),
        format!("(?:{seg}:){{1,6}}:{seg}"),
        format!("(?:{seg}:){{1,5}}(?::{seg}){{1,2}}"),
        format!("(?:{seg}:){{1,4}}(?::{seg}){{1,3}}"),
        format!("(?:{seg}:){{1,3}}(?::{seg}){{1,4}}"),
        format!("(?:{seg}:){{1,2}}(?::{seg}){{1,5}}"),
        format!("{seg}:(?:(?::{seg}){{1,6}})"),
        format!(":(?:(?::{seg}){{1,7}}|:)"),
        format!("fe80:(?::{seg}){{0,4}}%[0-9a-zA-Z]+"),
        format!(r"::(?i:ffff(?::0{{1,4}})?:)?{v4}"),
        format!(r"(?:{seg}:){{1,6}}:?{v4}"),
    ];
    groups
        .iter()
        .rev()
        .map(|g| format!("(?:{g})"))
        .collect::<Vec<_>>()
        .join("|")
}

static IPV4_NET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{}(?:/\d{{1,3}})?", ipv4_addr())).expect("IPv4 pattern")
});

static IPV6_NET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:{})(?:/\d{{1,3}})?", ipv6_addr())).expect("IPv6 pattern")
});

/// Filter options for scraping IP literals out of text streams.
#[derive(Debug, Clone)]
pub struct IpListOptions {
    /// Smallest IPv4 prefix length to keep. A scraped block with a shorter
    /// prefix (a larger network) is dropped; bare addresses always pass.
    pub ipv4_min_prefix: u8,
    /// Smallest IPv6 prefix length to keep.
    pub ipv6_min_prefix: u8,
    /// When set, only the first stretch of a line matching this expression
    /// is scanned; lines without a match are ignored entirely.
    pub substring: Option<Regex>,
    /// Skip link-local addresses carrying a zone id (`fe80::7:8%eth0`).
    pub ignore_zone_id: bool,
    /// Drop duplicate literals within one line.
    pub unique: bool,
}

impl Default for IpListOptions {
    fn default() -> Self {
        Self {
            ipv4_min_prefix: 32,
            ipv6_min_prefix: 128,
            substring: None,
            ignore_zone_id: true,
            unique: true,
        }
    }
}

/// Scrape IP address and CIDR literals out of one line of text.
///
/// Returned literals keep their source spelling (`ip` or `ip/len`), IPv4
/// matches first, in match order.
pub fn scan_line(opts: &IpListOptions, line: &str) -> Vec<String> {
    let line = match &opts.substring {
        Some(re) => match re.find(line) {
            Some(m) => m.as_str(),
            None => return Vec::new(),
        },
        None => line,
    };

    let mut found = Vec::new();
    scan_family(&IPV4_NET_RE, line, opts.ipv4_min_prefix, opts, &mut found);
    scan_family(&IPV6_NET_RE, line, opts.ipv6_min_prefix, opts, &mut found);
    found
}

fn scan_family(re: &Regex, line: &str, min_prefix: u8, opts: &IpListOptions, out: &mut Vec<String>) {
    for m in re.find_iter(line) {
        let literal = m.as_str();
        let (ip, prefix) = match literal.split_once('/') {
            Some((ip, prefix)) => (ip, Some(prefix)),
            None => (literal, None),
        };

        if opts.ignore_zone_id && ip.contains('%') {
            continue;
        }
        if let Some(prefix) = prefix {
            match prefix.parse::<u8>() {
                Ok(len) if len >= min_prefix => {}
                _ => continue,
            }
        }
        if opts.unique && out.iter().any(|seen| seen == literal) {
            continue;
        }
        out.push(literal.to_string());
    }
}

/// Scrape a whole stream line by line.
pub fn scan_reader<R: BufRead>(opts: &IpListOptions, reader: R) -> io::Result<Vec<String>> {
    let mut found = Vec::new();
    for line in reader.lines() {
        found.extend(scan_line(opts, &line?));
    }
    Ok(found)
}
