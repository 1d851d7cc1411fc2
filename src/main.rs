use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use regex::Regex;
use tracing_subscriber::EnvFilter;

use asncidr::cli::{Cli, Command};
use asncidr::extract::aggregate_literals;
use asncidr::feeds;
use asncidr::iplists::{self, IpListOptions};
use asncidr::{ResolutionResult, Resolver};

const IPV4_DROP_FILE: &str = "ipv4_spamhaus_ASN-DROP.lst";
const IPV6_DROP_FILE: &str = "ipv6_spamhaus_ASN-DROP.lst";

fn main() {
    let args = Cli::parse();

    let default_filter = if args.verbose { "asncidr=debug" } else { "asncidr=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(args.command) {
        eprintln!("{}: {:#}", "Error".bright_red(), err);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::AsnCidr { asn, registry } => asn_cidr(&asn, registry.as_deref()),
        Command::AsnDrop { no_merge } => asn_drop(no_merge),
        Command::IpFilter {
            files,
            output,
            ipv4_min_pref,
            ipv6_min_pref,
            re_substring,
            keep_zone_id,
            no_merge,
        } => {
            let substring = re_substring
                .as_deref()
                .map(Regex::new)
                .transpose()
                .context("invalid --re-substring expression")?;
            let opts = IpListOptions {
                ipv4_min_prefix: ipv4_min_pref,
                ipv6_min_prefix: ipv6_min_pref,
                substring,
                ignore_zone_id: !keep_zone_id,
                unique: true,
            };
            ip_filter(&opts, &files, output.as_deref(), no_merge)
        }
    }
}

/// Resolve the given ASNs against one registry, or sweep all of them.
///
/// On a sweep, a registry that cannot be reached is reported and skipped;
/// with an explicit `--registry` the failure is fatal.
fn asn_cidr(asn_list: &[String], registry: Option<&str>) -> Result<()> {
    let resolver = Resolver::default();

    if let Some(name) = registry {
        let result = resolver.resolve(asn_list, name)?;
        print_networks(&result);
        return Ok(());
    }

    let names: Vec<String> = resolver.directory().names().map(str::to_string).collect();
    for name in names {
        println!("# {} ..", name);
        match resolver.resolve(asn_list, &name) {
            Ok(result) => print_networks(&result),
            Err(err) => eprintln!(
                "{}: {:#}",
                format!("{name} skipped").bright_red(),
                anyhow::Error::from(err)
            ),
        }
    }
    Ok(())
}

fn print_networks(result: &ResolutionResult) {
    for net in &result.ipv4 {
        println!("{net}");
    }
    for net in &result.ipv6 {
        println!("{net}");
    }
}

fn asn_drop(no_merge: bool) -> Result<()> {
    let asn_list = feeds::fetch_asn_drop()?;
    let result = Resolver::default().resolve(&asn_list, "RADB")?;
    let result = if no_merge { result } else { result.aggregate() };

    println!("write IPv4 networks to {IPV4_DROP_FILE}");
    write_lines(Path::new(IPV4_DROP_FILE), result.ipv4.iter())?;

    println!("write IPv6 networks to {IPV6_DROP_FILE}");
    write_lines(Path::new(IPV6_DROP_FILE), result.ipv6.iter())?;
    Ok(())
}

fn write_lines<T: std::fmt::Display>(
    path: &Path,
    items: impl Iterator<Item = T>,
) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for item in items {
        writeln!(out, "{item}")?;
    }
    Ok(())
}

fn ip_filter(
    opts: &IpListOptions,
    files: &[PathBuf],
    output: Option<&Path>,
    no_merge: bool,
) -> Result<()> {
    let mut literals = Vec::new();
    if files.is_empty() {
        literals.extend(iplists::scan_reader(opts, io::stdin().lock())?);
    } else {
        for path in files {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            literals.extend(iplists::scan_reader(opts, BufReader::new(file))?);
        }
    }

    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    if no_merge {
        for literal in &literals {
            writeln!(out, "{literal}")?;
        }
    } else {
        for net in aggregate_literals(&literals).context("merging scraped networks")? {
            writeln!(out, "{net}")?;
        }
    }
    Ok(())
}
