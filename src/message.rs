use std::collections::HashMap;
use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;
use serde::Deserialize;

use crate::certificate::Tag;

/// A batch of notification records as delivered by the invocation trigger.
/// Records are independent of each other: delivery order is not guaranteed
/// and the same logical event may arrive more than once.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "Records")]
    pub records: Vec<NotificationRecord>,
}

/// One notification record wrapping a single textual lifecycle message
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRecord {
    #[serde(rename = "Sns")]
    pub sns: SnsEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnsEnvelope {
    #[serde(rename = "Message")]
    pub message: String,
}

fn field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([A-Za-z][A-Za-z0-9]*)='([^']*)'").expect("field pattern is valid")
    })
}

/// Scan a raw lifecycle message for `key='value'` fields.
///
/// This is a best-effort structural extraction from a log-like message
/// format, not a strict grammar: a message with no matches yields an empty
/// map, a duplicated key keeps its last occurrence, and values are trimmed.
/// Missing fields are handled downstream by classifying the message as not
/// applicable.
pub fn parse_fields(message: &str) -> HashMap<String, String> {
    field_pattern()
        .captures_iter(message)
        .map(|c| (c[1].to_string(), c[2].trim().to_string()))
        .collect()
}

/// The nested payload a deletion message carries in its `ResourceProperties`
/// field: the domains the certificate covered and the tags of the original
/// resource. This is all the deletion path ever learns about the certificate,
/// since the certificate itself is already gone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceProperties {
    pub domain_name: Option<String>,
    #[serde(default)]
    pub subject_alternative_names: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl ResourceProperties {
    /// Parse the properties JSON embedded in a message field.
    /// Malformed payloads yield `None`, which classification treats as
    /// not applicable.
    pub fn from_json(raw: &str) -> Option<ResourceProperties> {
        serde_json::from_str(raw).ok()
    }

    /// All domains covered by the certificate: the primary name plus any
    /// alternate names, deduplicated
    pub fn domains(&self) -> Vec<String> {
        self.domain_name
            .iter()
            .chain(self.subject_alternative_names.iter())
            .unique()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_extract_all_fields() {
        let message = "StackName='prod'\nResourceStatus='CREATE_IN_PROGRESS'\nPhysicalResourceId='arn:cert:123'\n";
        let fields = parse_fields(message);

        assert_eq!(fields.len(), 3);
        assert_eq!(fields["StackName"], "prod");
        assert_eq!(fields["ResourceStatus"], "CREATE_IN_PROGRESS");
        assert_eq!(fields["PhysicalResourceId"], "arn:cert:123");
    }

    #[test]
    fn should_keep_last_duplicate_and_trim() {
        let fields = parse_fields("Key='first'\nKey=' second '\n");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["Key"], "second");
    }

    #[test]
    fn should_allow_empty_values() {
        let fields = parse_fields("PhysicalResourceId=''");
        assert_eq!(fields["PhysicalResourceId"], "");
    }

    #[test]
    fn should_return_empty_map_for_garbage() {
        assert!(parse_fields("").is_empty());
        assert!(parse_fields("not a lifecycle message at all").is_empty());
        assert!(parse_fields("Key=\"double quoted\"").is_empty());
    }

    #[test]
    fn should_deserialize_notification_event() {
        let event: NotificationEvent = serde_json::from_value(serde_json::json!({
            "Records": [
                { "Sns": { "Message": "ResourceStatus='DELETE_COMPLETE'" } },
                { "Sns": { "Message": "ResourceStatus='CREATE_COMPLETE'" } }
            ]
        }))
        .unwrap();

        assert_eq!(event.records.len(), 2);
        assert_eq!(event.records[0].sns.message, "ResourceStatus='DELETE_COMPLETE'");
    }

    #[test]
    fn should_parse_resource_properties() {
        let props = ResourceProperties::from_json(
            r#"{"DomainName":"example.com","SubjectAlternativeNames":["www.example.com","example.com"],"Tags":[{"Key":"HostedZoneId","Value":"Z1"}]}"#,
        )
        .unwrap();

        assert_eq!(props.domains(), vec!["example.com", "www.example.com"]);
        assert_eq!(props.tags[0].key, "HostedZoneId");
        assert_eq!(props.tags[0].value, "Z1");
    }

    #[test]
    fn should_default_missing_property_fields() {
        let props = ResourceProperties::from_json(r#"{"DomainName":"example.com"}"#).unwrap();
        assert_eq!(props.domains(), vec!["example.com"]);
        assert!(props.tags.is_empty());

        assert_eq!(ResourceProperties::from_json("not json"), None);
    }
}
