//! Checkout link parameters.

use chrono::{DateTime, Utc};

use crate::payload::Payload;

/// `POST /links`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateLinkParams {
    pub product_id: String,
    pub password: Option<String>,
    pub trial_period_days: Option<u32>,
    pub group_buy_guild: Option<String>,
    pub enable_bot_protection: Option<bool>,
    pub max_usages: Option<u32>,
    /// Sent as unix seconds.
    pub start_date: Option<DateTime<Utc>>,
    pub initial_fee_amount: Option<f64>,
}

impl CreateLinkParams {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            password: None,
            trial_period_days: None,
            group_buy_guild: None,
            enable_bot_protection: None,
            max_usages: None,
            start_date: None,
            initial_fee_amount: None,
        }
    }

    pub fn build_payload(&self) -> Payload {
        Payload::new()
            .with("plan", self.product_id.as_str())
            .with("password", self.password.clone())
            .with("trial_period_days", self.trial_period_days)
            .with("group_buy_guild", self.group_buy_guild.clone())
            .with("enable_bot_protection", self.enable_bot_protection)
            .with("max_usages", self.max_usages)
            .with("start_date", self.start_date.map(|at| at.timestamp()))
            .with("initial_fee_amount", self.initial_fee_amount)
            .normalize()
    }
}

/// `PATCH /links/{link}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateLinkParams {
    pub active: bool,
    pub remaining_stock: Option<u32>,
}

impl UpdateLinkParams {
    pub fn new(active: bool) -> Self {
        Self {
            active,
            remaining_stock: None,
        }
    }

    pub fn build_payload(&self) -> Payload {
        Payload::new()
            .with("active", self.active)
            .with("remaining_stock", self.remaining_stock)
            .normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn start_date_is_unix_seconds() {
        let mut params = CreateLinkParams::new("prod_1");
        params.start_date = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        params.enable_bot_protection = Some(true);

        assert_eq!(
            params.build_payload().to_json(),
            json!({"plan": "prod_1", "start_date": 1704067200, "enable_bot_protection": true})
        );
    }

    #[test]
    fn update_always_sends_active() {
        assert_eq!(
            UpdateLinkParams::new(false).build_payload().to_json(),
            json!({"active": false})
        );
    }
}
