use tracing::{info, warn};

/// One RPSL object: an ordered multimap of field name to values.
///
/// Registries repeat field names freely (a route object set carries one
/// `route:` line per block), so a field maps to a list of values in the
/// order they appeared. Field order is preserved as well.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Vec<String>)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` under `field`, creating the field on first use.
    pub fn push_value(&mut self, field: &str, value: impl Into<String>) {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, values)) => values.push(value.into()),
            None => self.fields.push((field.to_string(), vec![value.into()])),
        }
    }

    /// All values recorded under `field`, in insertion order.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
    }

    /// Like [`get`](Self::get) but yields an empty iterator for an absent field.
    pub fn values<'a>(&'a self, field: &str) -> impl Iterator<Item = &'a str> {
        self.get(field)
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First field line of the object, e.g. `route: 192.0.2.0/24`. Used to
    /// identify a record in error messages.
    pub fn summary(&self) -> String {
        match self.fields.first() {
            Some((name, values)) => {
                format!("{}: {}", name, values.first().map_or("", String::as_str))
            }
            None => String::from("<empty record>"),
        }
    }
}

/// Parse a raw WHOIS reply into its records.
///
/// Records are separated by blank lines. `%` comment lines are skipped,
/// except that a comment containing `empty_marker` (case-insensitive) means
/// the registry found nothing: parsing stops there and the record under
/// construction is discarded. A line starting with space or tab continues
/// the previously written field; anything else is a `field: value` line,
/// split at the first colon with both sides trimmed.
pub fn parse(raw: &str, empty_marker: &str) -> Vec<Record> {
    let marker = empty_marker.to_ascii_lowercase();

    let mut records = Vec::new();
    let mut current = Record::new();
    let mut last_field: Option<String> = None;

    for line in raw.lines() {
        if line.is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            last_field = None;
            continue;
        }

        if line.starts_with('%') {
            if line.to_ascii_lowercase().contains(&marker) {
                info!("registry reported no entries: {}", line.trim());
                current = Record::new();
                break;
            }
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            match &last_field {
                Some(field) => current.push_value(field, line.trim()),
                // continuation with nothing to continue
                None => warn!("dropping orphan continuation line: {:?}", line),
            }
            continue;
        }

        match line.split_once(':') {
            Some((field, value)) => {
                let field = field.trim();
                current.push_value(field, value.trim());
                last_field = Some(field.to_string());
            }
            None => warn!("dropping line without field separator: {:?}", line),
        }
    }

    if !current.is_empty() {
        records.push(current);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "no entries found";

    #[test]
    fn test_single_record() {
        let records = parse("route: 192.0.2.0/24\n\n", MARKER);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].get("route").unwrap(),
            &["192.0.2.0/24".to_string()]
        );
    }

    #[test]
    fn test_repeated_field_accumulates() {
        let records = parse("route: 10.0.0.0/8\nroute: 10.1.0.0/16\n\n", MARKER);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].get("route").unwrap(),
            &["10.0.0.0/8".to_string(), "10.1.0.0/16".to_string()]
        );
    }

    #[test]
    fn test_blank_lines_separate_records() {
        let raw = "route: 192.0.2.0/24\norigin: AS65536\n\n\nroute: 198.51.100.0/24\norigin: AS65536\n";
        let records = parse(raw, MARKER);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("route").unwrap(), &["192.0.2.0/24".to_string()]);
        assert_eq!(records[1].get("route").unwrap(), &["198.51.100.0/24".to_string()]);
    }

    #[test]
    fn test_final_record_without_trailing_blank() {
        let records = parse("route: 192.0.2.0/24", MARKER);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_continuation_merges_into_last_field() {
        let raw = "descr: first line\n\tsecond line\norigin: AS1\n";
        let records = parse(raw, MARKER);
        assert_eq!(
            records[0].get("descr").unwrap(),
            &["first line".to_string(), "second line".to_string()]
        );
        assert_eq!(records[0].get("origin").unwrap(), &["AS1".to_string()]);
    }

    #[test]
    fn test_continuation_does_not_cross_records() {
        let raw = "descr: a\n\nroute: 192.0.2.0/24\n  leaked\n";
        let records = parse(raw, MARKER);
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[1].get("route").unwrap(),
            &["192.0.2.0/24".to_string(), "leaked".to_string()]
        );
    }

    #[test]
    fn test_orphan_continuation_dropped() {
        let records = parse("  floating\nroute: 192.0.2.0/24\n", MARKER);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields().count(), 1);
    }

    #[test]
    fn test_comment_lines_ignored() {
        let raw = "% This is the RADb whois server.\nroute: 192.0.2.0/24\n";
        let records = parse(raw, MARKER);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_marker_halts_and_discards() {
        let raw = "route: 192.0.2.0/24\n%  No Entries Found\nroute: 198.51.100.0/24\n";
        let records = parse(raw, MARKER);
        assert!(records.is_empty());
    }

    #[test]
    fn test_empty_response_yields_no_records() {
        let raw = "%  No entries found for the selected source(s).\n";
        assert!(parse(raw, MARKER).is_empty());
        assert!(parse("", MARKER).is_empty());
    }

    #[test]
    fn test_marker_only_matches_comment_lines() {
        // the sentinel text inside a field value must not stop the parser
        let raw = "descr: no entries found here\nroute: 192.0.2.0/24\n";
        let records = parse(raw, MARKER);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("route").unwrap(), &["192.0.2.0/24".to_string()]);
    }

    #[test]
    fn test_completed_records_survive_marker() {
        let raw = "route: 192.0.2.0/24\n\n% no entries found\n";
        let records = parse(raw, MARKER);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let raw = "route: 192.0.2.0/24\r\norigin: AS65536\r\n\r\n";
        let records = parse(raw, MARKER);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("origin").unwrap(), &["AS65536".to_string()]);
    }

    #[test]
    fn test_value_keeps_inner_colons() {
        let records = parse("route6: 2001:db8::/32\n", MARKER);
        assert_eq!(
            records[0].get("route6").unwrap(),
            &["2001:db8::/32".to_string()]
        );
    }

    #[test]
    fn test_line_without_colon_dropped() {
        let records = parse("garbage line\nroute: 192.0.2.0/24\n", MARKER);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields().count(), 1);
    }

    #[test]
    fn test_field_order_preserved() {
        let raw = "route: 192.0.2.0/24\ndescr: test\norigin: AS1\n";
        let records = parse(raw, MARKER);
        let names: Vec<_> = records[0].fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["route", "descr", "origin"]);
    }

    #[test]
    fn test_record_summary() {
        let records = parse("route: 192.0.2.0/24\norigin: AS1\n", MARKER);
        assert_eq!(records[0].summary(), "route: 192.0.2.0/24");
    }
}
