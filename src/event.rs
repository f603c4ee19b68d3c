use std::collections::HashMap;

use log::debug;

use crate::certificate::Tag;
use crate::message::{self, ResourceProperties};

/// `ResourceType` value marking a certificate resource
pub const CERTIFICATE_RESOURCE_TYPE: &str = "AWS::CertificateManager::Certificate";
/// Status emitted while a certificate resource is being created
pub const STATUS_CREATE_IN_PROGRESS: &str = "CREATE_IN_PROGRESS";
/// Status emitted once a certificate resource has been torn down
pub const STATUS_DELETE_COMPLETE: &str = "DELETE_COMPLETE";

const FIELD_RESOURCE_TYPE: &str = "ResourceType";
const FIELD_RESOURCE_STATUS: &str = "ResourceStatus";
const FIELD_PHYSICAL_RESOURCE_ID: &str = "PhysicalResourceId";
const FIELD_RESOURCE_PROPERTIES: &str = "ResourceProperties";

/// A lifecycle message reduced to the one decision downstream code needs.
/// Produced exactly once per message by [`classify`], so nothing after the
/// classifier ever inspects raw message fields again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Message is not an actionable certificate lifecycle event
    Ignore,
    /// A certificate request was submitted and needs its validation records
    /// created
    Creation { certificate_arn: String },
    /// A certificate resource was torn down and its validation records are
    /// now orphaned. Carries everything the message recorded about the
    /// original resource.
    Deletion { tags: Vec<Tag>, domains: Vec<String> },
}

/// Parse and classify a raw lifecycle message.
///
/// Evaluated in order: wrong resource type, then creation-in-progress with a
/// present physical resource id, then deletion-complete. Every other status
/// (updates, rollbacks, creation-complete) needs no record changes and is
/// ignored, as is any message with missing or malformed required fields.
pub fn classify(raw_message: &str) -> LifecycleEvent {
    let fields = message::parse_fields(raw_message);
    classify_fields(&fields)
}

/// Classify an already-parsed field map, see [`classify`]
pub fn classify_fields(fields: &HashMap<String, String>) -> LifecycleEvent {
    if fields.get(FIELD_RESOURCE_TYPE).map(String::as_str) != Some(CERTIFICATE_RESOURCE_TYPE) {
        return LifecycleEvent::Ignore;
    }

    match fields.get(FIELD_RESOURCE_STATUS).map(String::as_str) {
        Some(STATUS_CREATE_IN_PROGRESS) => match fields.get(FIELD_PHYSICAL_RESOURCE_ID) {
            Some(arn) if !arn.is_empty() => LifecycleEvent::Creation {
                certificate_arn: arn.to_owned(),
            },
            // The first CREATE_IN_PROGRESS message arrives before the
            // certificate has an identifier, a later one repeats the status
            // with the id filled in
            _ => LifecycleEvent::Ignore,
        },
        Some(STATUS_DELETE_COMPLETE) => match fields.get(FIELD_RESOURCE_PROPERTIES) {
            Some(raw) => match ResourceProperties::from_json(raw) {
                Some(props) => LifecycleEvent::Deletion {
                    domains: props.domains(),
                    tags: props.tags,
                },
                None => {
                    debug!("Unparseable resource properties on deletion message, ignoring");
                    LifecycleEvent::Ignore
                }
            },
            None => LifecycleEvent::Ignore,
        },
        _ => LifecycleEvent::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creation_message(resource_type: &str, status: &str, physical_id: &str) -> String {
        format!(
            "ResourceType='{}'\nResourceStatus='{}'\nPhysicalResourceId='{}'\n",
            resource_type, status, physical_id
        )
    }

    #[test]
    fn should_classify_creation() {
        let message = creation_message(
            CERTIFICATE_RESOURCE_TYPE,
            STATUS_CREATE_IN_PROGRESS,
            "arn:cert:123",
        );
        assert_eq!(
            classify(&message),
            LifecycleEvent::Creation {
                certificate_arn: "arn:cert:123".to_string()
            }
        );
    }

    #[test]
    fn should_ignore_other_resource_types() {
        let message = creation_message(
            "AWS::S3::Bucket",
            STATUS_CREATE_IN_PROGRESS,
            "my-bucket",
        );
        assert_eq!(classify(&message), LifecycleEvent::Ignore);
    }

    #[test]
    fn should_ignore_creation_without_physical_id() {
        let message = format!(
            "ResourceType='{}'\nResourceStatus='{}'\n",
            CERTIFICATE_RESOURCE_TYPE, STATUS_CREATE_IN_PROGRESS
        );
        assert_eq!(classify(&message), LifecycleEvent::Ignore);

        let message = creation_message(CERTIFICATE_RESOURCE_TYPE, STATUS_CREATE_IN_PROGRESS, "");
        assert_eq!(classify(&message), LifecycleEvent::Ignore);
    }

    #[test]
    fn should_ignore_uninteresting_statuses() {
        for status in [
            "CREATE_COMPLETE",
            "UPDATE_IN_PROGRESS",
            "DELETE_IN_PROGRESS",
            "ROLLBACK_IN_PROGRESS",
        ] {
            let message = creation_message(CERTIFICATE_RESOURCE_TYPE, status, "arn:cert:123");
            assert_eq!(classify(&message), LifecycleEvent::Ignore, "status {}", status);
        }
    }

    #[test]
    fn should_classify_deletion() {
        let message = format!(
            "ResourceType='{}'\nResourceStatus='{}'\nResourceProperties='{}'\n",
            CERTIFICATE_RESOURCE_TYPE,
            STATUS_DELETE_COMPLETE,
            r#"{"DomainName":"example.com","SubjectAlternativeNames":["www.example.com"],"Tags":[{"Key":"HostedZoneId","Value":"Z1"}]}"#,
        );

        match classify(&message) {
            LifecycleEvent::Deletion { tags, domains } => {
                assert_eq!(domains, vec!["example.com", "www.example.com"]);
                assert_eq!(tags.len(), 1);
                assert_eq!(tags[0].value, "Z1");
            }
            other => panic!("expected deletion event, got {:?}", other),
        }
    }

    #[test]
    fn should_ignore_deletion_with_bad_properties() {
        let message = format!(
            "ResourceType='{}'\nResourceStatus='{}'\nResourceProperties='not json'\n",
            CERTIFICATE_RESOURCE_TYPE, STATUS_DELETE_COMPLETE
        );
        assert_eq!(classify(&message), LifecycleEvent::Ignore);

        let message = format!(
            "ResourceType='{}'\nResourceStatus='{}'\n",
            CERTIFICATE_RESOURCE_TYPE, STATUS_DELETE_COMPLETE
        );
        assert_eq!(classify(&message), LifecycleEvent::Ignore);
    }

    #[test]
    fn should_ignore_unstructured_messages() {
        assert_eq!(classify(""), LifecycleEvent::Ignore);
        assert_eq!(classify("completely free-form text"), LifecycleEvent::Ignore);
    }
}
