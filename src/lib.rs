//! Main crate for the `certdns-validation-helper` application.
//!
//! Keeps the DNS validation records of ACM certificates in sync with
//! certificate lifecycle notifications: when a certificate is requested, the
//! validation records it asks for are created in its tagged hosted zone;
//! when a certificate resource is torn down, the now-orphaned validation
//! records are removed again. Nothing is persisted between invocations, the
//! zone itself is the only source of truth.
//!
//! The following modules might be of interest if you want to add new functionality:
//! - [`message`] and [`event`] turn raw notification payloads into classified lifecycle events
//! - [`certificate`] is the contract to the issuing service (tags, validation requirements)
//! - [`provider`] is the contract to the authoritative DNS service hosting the zones
//! - [`handler`] ties everything together into the per-record reconciliation pipeline

#![allow(clippy::uninlined_format_args)]

pub mod certificate;
pub mod config;
pub mod correlate;
pub mod event;
pub mod fetch;
pub mod handler;
pub mod message;
pub mod plan;
pub mod provider;
