use std::fmt::Display;

use log::trace;

use crate::certificate::ValidationRecord;
use crate::provider::{DnsRecord, RecordType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    Create,
    Delete,
}

impl Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeAction::Create => write!(f, "CREATE"),
            ChangeAction::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single record change: one (name, type, value) triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordChange {
    pub name: String,
    pub record_type: RecordType,
    pub value: String,
}

impl Display for RecordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.name, self.record_type, self.value)
    }
}

/// The set of record mutations one reconciliation pass wants applied to a
/// zone. A plan only ever carries a single action: creations and deletions
/// never occur for the same lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub action: ChangeAction,
    pub changes: Vec<RecordChange>,
}

impl Plan {
    /// Plan the creation of every record the issuing service asked for
    pub fn create_records(records: &[ValidationRecord]) -> Plan {
        let changes = records
            .iter()
            .map(|r| RecordChange {
                name: r.name.to_owned(),
                record_type: r.record_type.to_owned(),
                value: r.value.to_owned(),
            })
            .inspect(|c| trace!("New record: {}", c))
            .collect();
        Plan {
            action: ChangeAction::Create,
            changes,
        }
    }

    /// Plan the deletion of previously matched zone records, one change per
    /// record value
    pub fn delete_records(records: &[&DnsRecord]) -> Plan {
        let changes = records
            .iter()
            .flat_map(|r| {
                r.values.iter().map(|v| RecordChange {
                    name: r.name.to_owned(),
                    record_type: r.record_type.to_owned(),
                    value: v.to_owned(),
                })
            })
            .inspect(|c| trace!("Removing existing record {}", c))
            .collect();
        Plan {
            action: ChangeAction::Delete,
            changes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
