//! Coupon parameters.

use crate::payload::Payload;

wire_enum! {
    /// How long a coupon keeps applying to a subscription.
    CouponDuration, "coupon duration" {
        Forever => "forever",
        Once => "once",
        Repeating => "repeating",
    }
}

/// `POST /coupons`
///
/// Set either `amount_off` (with `currency`) or `percent_off`; the server
/// enforces the combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCouponParams {
    /// Code customers type at checkout.
    pub code: String,
    /// Restricts the coupon to one product.
    pub product_id: Option<String>,
    pub active: Option<bool>,
    pub amount_off: Option<u64>,
    pub percent_off: Option<u32>,
    pub currency: Option<String>,
    pub duration: Option<CouponDuration>,
    pub max_redemptions: Option<u32>,
}

impl CreateCouponParams {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            product_id: None,
            active: None,
            amount_off: None,
            percent_off: None,
            currency: None,
            duration: None,
            max_redemptions: None,
        }
    }

    pub fn build_payload(&self) -> Payload {
        Payload::new()
            .with("name", self.code.as_str())
            .with("product", self.product_id.clone())
            .with("active", self.active)
            .with("amount_off", self.amount_off)
            .with("percent_off", self.percent_off)
            .with("currency", self.currency.clone())
            .with("duration", self.duration)
            .with("max_redemptions", self.max_redemptions)
            .normalize()
    }
}
