//! Blocking client SDK for the Hyper API (`https://api.hyper.co/v6`).
//!
//! # Overview
//! Covers licenses, products, checkout links, raffles, waitlist entries,
//! payments and coupons, plus [`HyperClient::authorize`], which binds a
//! license to the local machine's hardware id on first use.
//!
//! # Design
//! - Parameter objects (`params`) describe every field of a create/update
//!   call; unset optional fields become `Entry::Absent` and are stripped by
//!   [`payload::normalize`] before anything is serialized.
//! - [`Core`] is the single chokepoint for outbound calls: it owns the base
//!   URL and bearer headers, executes one request through a [`Transport`]
//!   and maps 404 / error bodies to [`HyperError`].
//! - The client keeps no mutable state and performs no retries, caching or
//!   pagination; share one instance across threads for concurrent calls.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod hwid;
pub mod params;
pub mod payload;
mod resources;
pub mod transport;

pub use client::{Authorization, HyperClient, LicenseBinding};
pub use config::{ConfigError, HyperConfig, DEFAULT_BASE_URL};
pub use error::{HyperError, ParseEnumError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use hwid::HardwareId;
pub use params::{
    CouponDuration, CreateCouponParams, CreateLicenseParams, CreateLinkParams, CreateProductParams,
    CreateRaffleParams, DiscordCancelAction, IntegrationDiscord, IntegrationTelegram, LicenseSubscription,
    ListLicensesParams, ProductIntegrations, ProductLink, ProductRecurring, ProductTransfers, ProductType,
    RecurringInterval, TelegramCancelAction, UpdateLicenseParams, UpdateLinkParams, UpdateProductParams,
};
pub use payload::{normalize, Entry, Payload};
pub use transport::{validate_response, Core};
