use std::time::Duration;

use log::debug;
use thiserror::Error;
use tokio::time::sleep;

use crate::certificate::{CertificateSource, SourceError, ValidationRecord};
use crate::config::{Config, DEFAULT_POLL_INTERVAL};

/// Controls how [`validation_records`] polls the certificate source.
///
/// The issuing service populates validation data asynchronously some time
/// after the certificate request is submitted, so the fetcher has to keep
/// asking until the data appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Time to wait between attempts
    pub interval: Duration,
    /// Upper bound on attempts. `None` keeps polling until the surrounding
    /// task is cancelled, e.g. by the invocation deadline.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

impl From<&Config> for RetryPolicy {
    fn from(config: &Config) -> Self {
        RetryPolicy {
            interval: config.poll_interval,
            max_attempts: config.max_poll_attempts,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The lookup itself failed. Never retried here, the invoking transport
    /// owns redelivery.
    #[error("`{0}`")]
    Source(#[from] SourceError),
    /// The attempt ceiling was reached with the validation data still empty
    #[error("validation records for certificate {certificate_arn} still unpopulated after {attempts} attempt(s)")]
    Exhausted {
        certificate_arn: String,
        attempts: u32,
    },
}

/// Poll the certificate source until it reports at least one assigned
/// validation record for the given certificate.
///
/// Entries whose record has not been assigned yet are filtered out before
/// the emptiness check. Only an empty result triggers a retry, a failed
/// lookup propagates immediately.
pub async fn validation_records(
    source: &dyn CertificateSource,
    certificate_arn: &str,
    policy: &RetryPolicy,
) -> Result<Vec<ValidationRecord>, FetchError> {
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        let records: Vec<ValidationRecord> = source
            .domain_validations(certificate_arn)
            .await?
            .into_iter()
            .filter_map(|v| v.resource_record)
            .collect();

        if !records.is_empty() {
            debug!(
                "Certificate {} reported {} validation record(s) after {} attempt(s)",
                certificate_arn,
                records.len(),
                attempts
            );
            return Ok(records);
        }

        if let Some(max) = policy.max_attempts {
            if attempts >= max {
                return Err(FetchError::Exhausted {
                    certificate_arn: certificate_arn.to_string(),
                    attempts,
                });
            }
        }

        debug!(
            "Validation records for certificate {} not yet populated, retrying in {:?}",
            certificate_arn, policy.interval
        );
        sleep(policy.interval).await;
    }
}
