//! Parameter objects for the create/update operations.
//!
//! Each struct lists the fields one operation accepts. Required fields are
//! plain values, optional ones are `Option` and are left out of the request
//! when `None`. `build_payload` maps field names to their wire names and
//! returns an already-normalized [`Payload`](crate::payload::Payload).

/// Declares a closed enumeration that travels as a lowercase string.
///
/// Generates `as_str`, `Display`, `FromStr` (rejecting unknown values) and a
/// conversion into a payload entry.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(crate::error::ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl From<$name> for crate::payload::Entry {
            fn from(value: $name) -> Self {
                crate::payload::Entry::Value(serde_json::Value::String(value.as_str().to_string()))
            }
        }
    };
}

pub mod coupons;
pub mod licenses;
pub mod links;
pub mod products;
pub mod raffles;

pub use coupons::{CouponDuration, CreateCouponParams};
pub use licenses::{CreateLicenseParams, LicenseSubscription, ListLicensesParams, UpdateLicenseParams};
pub use links::{CreateLinkParams, UpdateLinkParams};
pub use products::{
    CreateProductParams, DiscordCancelAction, IntegrationDiscord, IntegrationTelegram, ProductIntegrations,
    ProductLink, ProductRecurring, ProductTransfers, ProductType, RecurringInterval, TelegramCancelAction,
    UpdateProductParams,
};
pub use raffles::CreateRaffleParams;

use chrono::{DateTime, SecondsFormat, Utc};

/// ISO-8601 form used for every timestamp the API takes as a string.
///
/// Whole seconds render without a fraction; sub-second values keep their
/// precision in milli, micro or nanosecond steps.
pub(crate) fn iso8601(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
