//! Re-associates a zone's validation records with domain names at deletion
//! time. No record of which records belong to which certificate is ever
//! stored, so the association is re-derived purely from the structure of the
//! record names.

use itertools::Itertools;

use crate::provider::{DnsRecord, RecordType};

/// Extract the domain encoded in a validation record's name.
///
/// Validation record names have the form `<label>.<domain>.` where the label
/// carries no dot; the domain is everything after the first dot, excluding
/// the trailing dot. Names that don't fit the form yield `None`.
pub fn embedded_domain(record_name: &str) -> Option<&str> {
    let (label, rest) = record_name.split_once('.')?;
    if label.is_empty() {
        return None;
    }
    let domain = rest.strip_suffix('.').unwrap_or(rest);
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

/// Whether a zone record structurally looks like a validation record:
/// a CNAME whose every value points into the issuing service's validation
/// zone
pub fn is_validation_shaped(record: &DnsRecord, suffix: &str) -> bool {
    record.record_type == RecordType::Cname
        && !record.values.is_empty()
        && record.values.iter().all(|v| v.ends_with(suffix))
}

/// Out of a zone's records, select the validation-shaped ones whose embedded
/// domain is one of `domains` (compared case-insensitively, as DNS names
/// are). Records whose name doesn't parse are treated as non-matches.
pub fn match_records<'a>(
    records: &'a [DnsRecord],
    domains: &[String],
    suffix: &str,
) -> Vec<&'a DnsRecord> {
    records
        .iter()
        .filter(|r| is_validation_shaped(r, suffix))
        .filter(|r| match embedded_domain(&r.name) {
            Some(domain) => domains.iter().any(|d| d.eq_ignore_ascii_case(domain)),
            None => false,
        })
        .collect_vec()
}
