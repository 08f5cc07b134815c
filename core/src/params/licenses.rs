//! License parameters.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::iso8601;
use crate::payload::{Entry, Payload};

/// Subscription settings that can be changed on an existing license.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LicenseSubscription {
    pub cancel_at_period_end: Option<bool>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub pause_collection: Option<bool>,
}

impl LicenseSubscription {
    fn to_payload(&self) -> Payload {
        Payload::new()
            .with("cancel_at_period_end", self.cancel_at_period_end)
            .with("current_period_end", self.current_period_end.as_ref().map(iso8601))
            .with("pause_collection", self.pause_collection)
    }
}

/// `POST /licenses`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateLicenseParams {
    /// Product (plan) the license grants.
    pub product_id: String,
    pub email: String,
    /// Custom license key; the server generates one when unset.
    pub key: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

impl CreateLicenseParams {
    pub fn new(product_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            email: email.into(),
            key: None,
            metadata: None,
        }
    }

    pub fn build_payload(&self) -> Payload {
        Payload::new()
            .with("plan", self.product_id.as_str())
            .with("email", self.email.as_str())
            .with("key", self.key.clone())
            .with("metadata", self.metadata.clone())
            .normalize()
    }
}

/// `PATCH /licenses/{key}`
///
/// `metadata` replaces the stored metadata object as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateLicenseParams {
    pub email: Option<String>,
    pub key: Option<String>,
    pub unlocked: Option<bool>,
    pub metadata: Option<Map<String, Value>>,
    pub subscription: Option<LicenseSubscription>,
}

impl UpdateLicenseParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_payload(&self) -> Payload {
        Payload::new()
            .with("email", self.email.clone())
            .with("key", self.key.clone())
            .with("unlocked", self.unlocked)
            .with("metadata", self.metadata.clone())
            .with(
                "subscription",
                self.subscription
                    .as_ref()
                    .map_or(Entry::Absent, |s| Entry::Map(s.to_payload())),
            )
            .normalize()
    }
}

/// Query for `GET /licenses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLicensesParams {
    pub page: u32,
    pub limit: u32,
}

impl Default for ListLicensesParams {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

impl ListLicensesParams {
    pub fn query(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ]
    }
}
