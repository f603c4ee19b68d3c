use futures::future::join_all;
use log::{debug, info};
use thiserror::Error;

use crate::certificate::{zone_id_from_tags, CertificateSource, SourceError, Tag};
use crate::config::Config;
use crate::correlate;
use crate::event::{classify, LifecycleEvent};
use crate::fetch::{self, FetchError, RetryPolicy};
use crate::message::{NotificationEvent, NotificationRecord};
use crate::plan::Plan;
use crate::provider::{apply_plan, DnsProvider, ProviderError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("`{0}`")]
    Source(#[from] SourceError),
    #[error("`{0}`")]
    Fetch(#[from] FetchError),
    #[error("`{0}`")]
    Provider(#[from] ProviderError),
}

/// Terminal non-error outcomes of processing one notification record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Message was not an actionable certificate lifecycle event
    Ignored,
    /// The certificate carries no zone association, nothing to reconcile
    ZoneNotFound,
    /// This many validation record sets were created
    Created(usize),
    /// This many record sets were deleted. Zero means nothing in the zone
    /// matched and no batch was submitted.
    Deleted(usize),
}

/// A reconciler performs the complete set of actions needed to bring a
/// zone's validation records in line with one batch of lifecycle events.
///
/// It holds no state of its own: every fact is either carried by the message
/// or re-fetched from the two collaborating services per invocation.
pub struct Reconciler<'a> {
    source: &'a dyn CertificateSource,
    provider: &'a dyn DnsProvider,
    config: &'a Config,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        source: &'a dyn CertificateSource,
        provider: &'a dyn DnsProvider,
        config: &'a Config,
    ) -> Reconciler<'a> {
        Reconciler {
            source,
            provider,
            config,
        }
    }

    /// Process every record of a notification event concurrently.
    ///
    /// Results are index-aligned with the input records. Records are
    /// independent, a failing record never affects its siblings, so the
    /// caller can report per-record outcomes to the transport.
    pub async fn handle_event(
        &self,
        event: &NotificationEvent,
    ) -> Vec<Result<Outcome, HandlerError>> {
        join_all(
            event
                .records
                .iter()
                .map(|record| self.process_record(record)),
        )
        .await
    }

    /// Run the classify → resolve zone → fetch/correlate → mutate pipeline
    /// for a single notification record
    pub async fn process_record(
        &self,
        record: &NotificationRecord,
    ) -> Result<Outcome, HandlerError> {
        match classify(&record.sns.message) {
            LifecycleEvent::Ignore => {
                debug!("Message is not an actionable certificate event, ignoring");
                Ok(Outcome::Ignored)
            }
            LifecycleEvent::Creation { certificate_arn } => {
                self.create_validation_records(&certificate_arn).await
            }
            LifecycleEvent::Deletion { tags, domains } => {
                self.delete_validation_records(&tags, &domains).await
            }
        }
    }

    /// Creation path: look up the owning zone via the certificate's tags,
    /// wait for the issuing service to hand out validation records, then
    /// create them all in one batch
    async fn create_validation_records(
        &self,
        certificate_arn: &str,
    ) -> Result<Outcome, HandlerError> {
        let tags = self.source.tags(certificate_arn).await?;
        let zone_id = match zone_id_from_tags(&tags, &self.config.zone_tag_key) {
            Some(z) => z,
            None => {
                info!(
                    "Certificate {} carries no {} tag, skipping",
                    certificate_arn, self.config.zone_tag_key
                );
                return Ok(Outcome::ZoneNotFound);
            }
        };

        let policy = RetryPolicy::from(self.config);
        let records = fetch::validation_records(self.source, certificate_arn, &policy).await?;

        let plan = Plan::create_records(&records);
        let count = apply_plan(self.provider, &zone_id, plan, self.config.record_ttl).await?;
        info!(
            "Created {} validation record(s) for certificate {} in zone {}",
            count, certificate_arn, zone_id
        );
        Ok(Outcome::Created(count))
    }

    /// Deletion path: the certificate is already gone, so the zone is the
    /// only source of truth. List it, correlate records back to the deleted
    /// certificate's domains by name structure and delete the matches in one
    /// batch.
    async fn delete_validation_records(
        &self,
        tags: &[Tag],
        domains: &[String],
    ) -> Result<Outcome, HandlerError> {
        let zone_id = match zone_id_from_tags(tags, &self.config.zone_tag_key) {
            Some(z) => z,
            None => {
                info!(
                    "Deleted certificate carried no {} tag, skipping",
                    self.config.zone_tag_key
                );
                return Ok(Outcome::ZoneNotFound);
            }
        };

        let zone_records = self.provider.records(&zone_id).await?;
        let matched =
            correlate::match_records(&zone_records, domains, &self.config.validation_suffix);
        if matched.is_empty() {
            info!(
                "No validation records in zone {} match domains {:?}, nothing to delete",
                zone_id, domains
            );
            return Ok(Outcome::Deleted(0));
        }

        let plan = Plan::delete_records(&matched);
        let count = apply_plan(self.provider, &zone_id, plan, self.config.record_ttl).await?;
        info!(
            "Deleted {} validation record(s) from zone {} for domains {:?}",
            count, zone_id, domains
        );
        Ok(Outcome::Deleted(count))
    }
}
