use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "Resolve ASN origin CIDR blocks from IRR WHOIS registries"
)]
pub struct Cli {
    /// Display verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// ASN origin lookups (CIDR)
    ///
    /// Example: asncidr asn-cidr AS41947 AS40193 35718 38337
    AsnCidr {
        /// ASNs to resolve, bare ("41947") or prefixed ("AS41947")
        #[arg(required = true)]
        asn: Vec<String>,

        /// Query a single registry instead of every known one
        #[arg(short, long)]
        registry: Option<String>,
    },

    /// Spamhaus ASN-DROP list (CIDR)
    ///
    /// Writes IPv4 networks to ipv4_spamhaus_ASN-DROP.lst and IPv6 networks
    /// to ipv6_spamhaus_ASN-DROP.lst
    AsnDrop {
        /// Keep the raw block list instead of merging to a minimal CIDR set
        #[arg(long)]
        no_merge: bool,
    },

    /// Filter IP addresses and subnets out of text streams (files)
    IpFilter {
        /// Input files; stdin when none given
        files: Vec<PathBuf>,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum IPv4 prefix (max. subnet)
        #[arg(long, default_value_t = 32)]
        ipv4_min_pref: u8,

        /// Minimum IPv6 prefix (max. subnet)
        #[arg(long, default_value_t = 48)]
        ipv6_min_pref: u8,

        /// Scan only the part of each line matching this regular expression
        #[arg(long)]
        re_substring: Option<String>,

        /// Keep link-local IPv6 addresses with zone ID
        #[arg(long)]
        keep_zone_id: bool,

        /// Keep the raw literal list instead of merging to a minimal CIDR set
        #[arg(long)]
        no_merge: bool,
    },
}
