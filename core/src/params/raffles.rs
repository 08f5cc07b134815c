//! Raffle parameters.

use chrono::{DateTime, Utc};

use super::iso8601;
use crate::payload::Payload;

/// `POST /raffles`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRaffleParams {
    pub product_id: String,
    /// Number of winners.
    pub spots: u32,
    pub pick_winners_at: DateTime<Utc>,
    pub active: Option<bool>,
    pub trial_period_days: Option<u32>,
    pub initial_fee_amount: Option<u64>,
    pub group_buy_guild: Option<String>,
}

impl CreateRaffleParams {
    pub fn new(product_id: impl Into<String>, spots: u32, pick_winners_at: DateTime<Utc>) -> Self {
        Self {
            product_id: product_id.into(),
            spots,
            pick_winners_at,
            active: None,
            trial_period_days: None,
            initial_fee_amount: None,
            group_buy_guild: None,
        }
    }

    pub fn build_payload(&self) -> Payload {
        Payload::new()
            .with("plan", self.product_id.as_str())
            .with("spots", self.spots)
            .with("pick_winners_at", iso8601(&self.pick_winners_at))
            .with("active", self.active)
            .with("trial_period_days", self.trial_period_days)
            .with("initial_fee_amount", self.initial_fee_amount)
            .with("group_buy_guild", self.group_buy_guild.clone())
            .normalize()
    }
}
