use std::time::Duration;

/// Tag key that associates a certificate with the hosted zone its validation
/// records should live in.
pub const ZONE_TAG_KEY: &str = "HostedZoneId";

/// Zone that ACM validation CNAME targets point into. Used to structurally
/// recognize validation records when listing a hosted zone.
pub const VALIDATION_SUFFIX: &str = ".acm-validations.aws.";

/// TTL applied to newly created validation records, in seconds
pub const DEFAULT_RECORD_TTL: u32 = 300;

/// Time to wait between polls for not-yet-populated validation data
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Runtime configuration for a [`Reconciler`](crate::handler::Reconciler).
///
/// All fields have defaults matching the ACM/Route53 contract; deployments
/// normally only ever touch `max_poll_attempts` to bound the validation-data
/// wait below their invocation deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Time to wait between polls of the certificate source
    pub poll_interval: Duration,
    /// Upper bound on poll attempts. `None` polls until the invocation
    /// deadline cancels the task, matching the original deployment behavior.
    pub max_poll_attempts: Option<u32>,
    /// TTL for created validation records, in seconds
    pub record_ttl: u32,
    /// Suffix that every value of a validation-shaped record must end with
    pub validation_suffix: String,
    /// Tag key designating the owning hosted zone
    pub zone_tag_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: None,
            record_ttl: DEFAULT_RECORD_TTL,
            validation_suffix: VALIDATION_SUFFIX.to_string(),
            zone_tag_key: ZONE_TAG_KEY.to_string(),
        }
    }
}
