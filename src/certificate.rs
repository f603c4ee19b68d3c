use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use thiserror::Error;

use crate::provider::RecordType;

/// A key/value pair attached to a certificate, either fetched live from the
/// issuing service or carried in a deletion message's resource properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Validation state of a single domain covered by a certificate.
/// `resource_record` stays empty until the issuing service has generated the
/// proof-of-ownership record for the domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainValidation {
    pub domain_name: String,
    pub resource_record: Option<ValidationRecord>,
}

/// A DNS record the issuing service requires to exist before it will issue
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidationRecord {
    pub name: String,
    pub record_type: RecordType,
    pub value: String,
}

// Generic error returned by a certificate source action
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
#[error("{msg}")]
pub struct SourceError {
    msg: String,
}

impl From<String> for SourceError {
    fn from(s: String) -> Self {
        SourceError { msg: s }
    }
}

/// A `CertificateSource` is the service that issues certificates (ACM) and
/// knows which DNS records it wants as proof of domain ownership.
///
/// Nothing about a certificate is cached across invocations, every fact is
/// re-fetched through this trait when a lifecycle message arrives.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CertificateSource {
    /// Tags currently attached to the given certificate
    async fn tags(&self, certificate_arn: &str) -> Result<Vec<Tag>, SourceError>;

    /// Per-domain validation state of the given certificate.
    /// Entries may lack their resource record while issuance is still being
    /// set up, see [`crate::fetch::validation_records`].
    async fn domain_validations(
        &self,
        certificate_arn: &str,
    ) -> Result<Vec<DomainValidation>, SourceError>;
}

/// Look up the owning zone in a tag list. The first tag with the given key
/// wins. `None` is a legitimate outcome: the certificate was never associated
/// with a managed zone and reconciliation stops there.
pub fn zone_id_from_tags(tags: &[Tag], key: &str) -> Option<String> {
    tags.iter().find(|t| t.key == key).map(|t| t.value.clone())
}
