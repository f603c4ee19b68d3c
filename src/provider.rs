use std::fmt::Display;

use async_trait::async_trait;
use itertools::Itertools;
use log::{debug, error};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::plan::Plan;

pub use crate::plan::ChangeAction;

pub type Ttl = u32;

/// A provider is the authoritative DNS service hosting the zones we manage
/// validation records in, such as Route53.
/// It implements the two operations the reconciler needs: listing a zone and
/// submitting a change batch.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DnsProvider {
    /// Get all records currently present in the given zone
    async fn records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, ProviderError>;

    /// Submit a single change batch against the given zone.
    /// The service applies the batch atomically: all changes succeed or the
    /// whole batch is rejected.
    async fn change_records(&self, zone_id: &str, batch: ChangeBatch) -> Result<(), ProviderError>;
}

// Generic error returned by a provider action
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
#[error("{msg}")]
pub struct ProviderError {
    msg: String,
}

impl From<String> for ProviderError {
    fn from(s: String) -> Self {
        ProviderError { msg: s }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Ns,
    Soa,
    Txt,
    Other(String),
}

impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
            RecordType::Aaaa => write!(f, "AAAA"),
            RecordType::Cname => write!(f, "CNAME"),
            RecordType::Ns => write!(f, "NS"),
            RecordType::Soa => write!(f, "SOA"),
            RecordType::Txt => write!(f, "TXT"),
            RecordType::Other(t) => write!(f, "{}", t),
        }
    }
}

/// A record set as returned by the provider when listing a zone
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsRecord {
    pub name: String,
    pub record_type: RecordType,
    pub ttl: Ttl,
    pub values: Vec<String>,
}

impl Display for DnsRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.record_type)
    }
}

/// One record set inside a [`ChangeBatch`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRecordSet {
    pub name: String,
    pub record_type: RecordType,
    pub ttl: Ttl,
    pub values: Vec<String>,
}

/// A batch of record changes submitted to the provider as one unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeBatch {
    pub action: ChangeAction,
    pub changes: Vec<ResourceRecordSet>,
}

/// Submit a [`Plan`] to the provider as one change batch against `zone_id`.
///
/// An empty plan is a no-op: no request reaches the provider. Every change
/// carries the fixed `ttl` and a single value. Returns the number of
/// submitted changes. Submission failures are not retried here, the invoking
/// transport owns the redelivery policy.
pub async fn apply_plan(
    provider: &dyn DnsProvider,
    zone_id: &str,
    plan: Plan,
    ttl: Ttl,
) -> Result<usize, ProviderError> {
    if plan.is_empty() {
        debug!("Empty {} plan for zone {}, nothing to submit", plan.action, zone_id);
        return Ok(0);
    }

    let action = plan.action;
    let changes = plan
        .changes
        .into_iter()
        .map(|c| ResourceRecordSet {
            name: c.name,
            record_type: c.record_type,
            ttl,
            values: vec![c.value],
        })
        .collect_vec();
    let count = changes.len();

    match provider
        .change_records(zone_id, ChangeBatch { action, changes })
        .await
    {
        Ok(()) => {
            debug!("Applied {} batch with {} change(s) to zone {}", action, count, zone_id);
            Ok(count)
        }
        Err(e) => {
            error!(
                "Failed to apply {} batch with {} change(s) to zone {}: {}",
                action, count, zone_id, e
            );
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use totems::{assert_err, assert_ok};

    use super::*;
    use crate::plan::RecordChange;

    fn cname_change(name: &str, value: &str) -> RecordChange {
        RecordChange {
            name: name.to_string(),
            record_type: RecordType::Cname,
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn should_skip_provider_for_empty_plan() {
        // No expectations set - any call to the mock panics
        let provider = MockDnsProvider::new();
        let plan = Plan {
            action: ChangeAction::Create,
            changes: vec![],
        };

        let result = apply_plan(&provider, "Z1", plan, 300).await;
        assert_ok!(result, value == 0);
    }

    #[tokio::test]
    async fn should_submit_one_batch_with_all_changes() {
        let mut provider = MockDnsProvider::new();
        provider
            .expect_change_records()
            .withf(|zone_id, batch| {
                zone_id == "Z1"
                    && batch.action == ChangeAction::Create
                    && batch.changes.len() == 3
                    && batch.changes.iter().all(|c| c.ttl == 300)
                    && batch.changes.iter().all(|c| c.values.len() == 1)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let plan = Plan {
            action: ChangeAction::Create,
            changes: vec![
                cname_change("_a.one.test.", "a.acm-validations.aws."),
                cname_change("_b.two.test.", "b.acm-validations.aws."),
                cname_change("_c.three.test.", "c.acm-validations.aws."),
            ],
        };

        let result = apply_plan(&provider, "Z1", plan, 300).await;
        assert_ok!(result, value == 3);
    }

    #[tokio::test]
    async fn should_propagate_batch_rejection() {
        let mut provider = MockDnsProvider::new();
        provider
            .expect_change_records()
            .times(1)
            .returning(|_, _| Err("record set already exists".to_string().into()));

        let plan = Plan {
            action: ChangeAction::Create,
            changes: vec![cname_change("_a.one.test.", "a.acm-validations.aws.")],
        };

        let result = apply_plan(&provider, "Z1", plan, 300).await;
        assert_err!(result);
    }
}
