//! Public client for the Hyper API.
//!
//! # Design
//! `HyperClient` composes the parameter builders with the per-resource
//! request methods of [`Core`]. It holds only immutable configuration and a
//! transport, so one instance can be cloned or shared between threads; each
//! method is a single blocking round trip (`authorize` makes at most two).
//!
//! Responses are returned as `serde_json::Value` because the API adds fields
//! freely; delete and refund return the raw text body (`"Accepted"`).

use serde_json::{Map, Value};

use crate::config::HyperConfig;
use crate::error::Result;
use crate::http::{Transport, UreqTransport};
use crate::hwid::HardwareId;
use crate::params::{
    CreateCouponParams, CreateLicenseParams, CreateLinkParams, CreateProductParams, CreateRaffleParams,
    ListLicensesParams, UpdateLicenseParams, UpdateLinkParams, UpdateProductParams,
};
use crate::transport::Core;

/// Metadata key holding the bound hardware identifier.
pub const HWID_KEY: &str = "hwid";

/// Binding state of a license, read from its metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum LicenseBinding {
    /// No usable `hwid` in the metadata, or no metadata at all.
    Unbound,
    /// `hwid` holds this value.
    Bound(Value),
}

impl LicenseBinding {
    /// Read the binding from a license object as returned by the API.
    pub fn of(license: &Value) -> Self {
        match license.get("metadata").and_then(|metadata| metadata.get(HWID_KEY)) {
            Some(hwid) if is_set(hwid) => LicenseBinding::Bound(hwid.clone()),
            _ => LicenseBinding::Unbound,
        }
    }
}

/// `null`, `false`, `0`, `""` and empty collections count as unset.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Outcome of [`HyperClient::authorize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    /// The license was unbound and is now bound to this machine.
    Bound,
    /// The license was already bound to this machine.
    Verified,
    /// The license is bound to another machine.
    Rejected,
}

impl Authorization {
    pub fn is_authorized(self) -> bool {
        !matches!(self, Authorization::Rejected)
    }
}

/// Blocking client for the Hyper API.
///
/// ```no_run
/// use hyperco::{CreateLicenseParams, HyperClient};
///
/// # fn main() -> hyperco::Result<()> {
/// let client = HyperClient::new("sk_live_...");
/// let license = client.create_license(&CreateLicenseParams::new("prod_1", "a@b.com"))?;
/// let key = license["key"].as_str().unwrap_or_default();
/// if client.authorize(key)? {
///     println!("licensed");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HyperClient<T = UreqTransport> {
    core: Core<T>,
}

impl HyperClient<UreqTransport> {
    /// Client for the production API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(HyperConfig::new(api_key))
    }

    pub fn from_config(config: HyperConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Client configured from `HYPER_API_KEY` / `HYPER_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(HyperConfig::from_env()?))
    }
}

impl<T: Transport> HyperClient<T> {
    pub fn with_transport(config: HyperConfig, transport: T) -> Self {
        Self {
            core: Core::new(&config, transport),
        }
    }

    /// The underlying transport core, for endpoints not wrapped here.
    pub fn core(&self) -> &Core<T> {
        &self.core
    }

    // -- licenses ------------------------------------------------------------

    pub fn create_license(&self, params: &CreateLicenseParams) -> Result<Value> {
        self.core.create_license_request(&params.build_payload().to_json())
    }

    pub fn retrieve_license(&self, license_key: &str) -> Result<Value> {
        self.core.retrieve_license_request(license_key)
    }

    pub fn update_license(&self, license_key: &str, params: &UpdateLicenseParams) -> Result<Value> {
        self.core
            .update_license_request(license_key, &params.build_payload().to_json())
    }

    /// Replace a license's metadata via the dedicated metadata endpoint.
    pub fn update_license_metadata(&self, license_key: &str, metadata: &Map<String, Value>) -> Result<Value> {
        self.core
            .update_license_metadata_request(license_key, &Value::Object(metadata.clone()))
    }

    /// Returns the raw body, `"Accepted"` on success.
    pub fn delete_license(&self, license_key: &str) -> Result<String> {
        self.core.delete_license_request(license_key)
    }

    pub fn list_licenses(&self, params: ListLicensesParams) -> Result<Value> {
        self.core.list_licenses_request(&params.query())
    }

    // -- products ------------------------------------------------------------

    pub fn create_product(&self, params: &CreateProductParams) -> Result<Value> {
        self.core.create_product_request(&params.build_payload().to_json())
    }

    pub fn retrieve_product(&self, product_id: &str) -> Result<Value> {
        self.core.retrieve_product_request(product_id)
    }

    pub fn update_product(&self, product_id: &str, params: &UpdateProductParams) -> Result<Value> {
        self.core
            .update_product_request(product_id, &params.build_payload().to_json())
    }

    pub fn list_products(&self) -> Result<Value> {
        self.core.list_products_request()
    }

    // -- links ---------------------------------------------------------------

    pub fn create_link(&self, params: &CreateLinkParams) -> Result<Value> {
        self.core.create_link_request(&params.build_payload().to_json())
    }

    pub fn retrieve_link(&self, link: &str) -> Result<Value> {
        self.core.retrieve_link_request(link)
    }

    pub fn update_link(&self, link: &str, params: &UpdateLinkParams) -> Result<Value> {
        self.core.update_link_request(link, &params.build_payload().to_json())
    }

    pub fn list_links(&self) -> Result<Value> {
        self.core.list_links_request()
    }

    // -- raffles -------------------------------------------------------------

    pub fn create_raffle(&self, params: &CreateRaffleParams) -> Result<Value> {
        self.core.create_raffle_request(&params.build_payload().to_json())
    }

    pub fn retrieve_raffle(&self, raffle_id: &str) -> Result<Value> {
        self.core.retrieve_raffle_request(raffle_id)
    }

    pub fn list_raffles(&self, active: bool) -> Result<Value> {
        self.core.list_raffles_request(active)
    }

    // -- waitlist ------------------------------------------------------------

    pub fn retrieve_waitlist_entry(&self, entry_id: &str) -> Result<Value> {
        self.core.retrieve_waitlist_entry_request(entry_id)
    }

    pub fn list_waitlist_entries(&self) -> Result<Value> {
        self.core.list_waitlist_entries_request()
    }

    // -- payments ------------------------------------------------------------

    pub fn retrieve_payment(&self, payment_id: &str) -> Result<Value> {
        self.core.retrieve_payment_request(payment_id)
    }

    /// Returns the raw body, `"Accepted"` on success.
    pub fn refund_payment(&self, payment_id: &str) -> Result<String> {
        self.core.refund_payment_request(payment_id)
    }

    pub fn list_payments(&self) -> Result<Value> {
        self.core.list_payments_request()
    }

    // -- coupons -------------------------------------------------------------

    pub fn create_coupon(&self, params: &CreateCouponParams) -> Result<Value> {
        self.core.create_coupon_request(&params.build_payload().to_json())
    }

    pub fn retrieve_coupon(&self, coupon_id: &str) -> Result<Value> {
        self.core.retrieve_coupon_request(coupon_id)
    }

    pub fn list_coupons(&self, active: bool) -> Result<Value> {
        self.core.list_coupons_request(active)
    }

    // -- authorization -------------------------------------------------------

    /// Bind `license_key` to this machine on first use, afterwards check that
    /// it is still used on the same machine.
    pub fn authorize(&self, license_key: &str) -> Result<bool> {
        let license = self.retrieve_license(license_key)?;
        let hwid = HardwareId::local()?;
        Ok(self.settle(license_key, &license, &hwid)?.is_authorized())
    }

    /// [`authorize`](Self::authorize) against an explicit hardware id.
    pub fn authorize_with(&self, license_key: &str, hwid: &HardwareId) -> Result<Authorization> {
        let license = self.retrieve_license(license_key)?;
        self.settle(license_key, &license, hwid)
    }

    fn settle(&self, license_key: &str, license: &Value, hwid: &HardwareId) -> Result<Authorization> {
        match LicenseBinding::of(license) {
            LicenseBinding::Unbound => {
                // First bind replaces the whole metadata object.
                let mut metadata = Map::new();
                metadata.insert(HWID_KEY.to_string(), Value::String(hwid.to_string()));
                let params = UpdateLicenseParams {
                    metadata: Some(metadata),
                    ..Default::default()
                };
                self.update_license(license_key, &params)?;
                tracing::info!(hwid = %hwid, "license bound to hardware id");
                Ok(Authorization::Bound)
            }
            LicenseBinding::Bound(stored) if stored.as_str() == Some(hwid.as_str()) => {
                Ok(Authorization::Verified)
            }
            LicenseBinding::Bound(_) => {
                tracing::warn!(hwid = %hwid, "license is bound to another hardware id");
                Ok(Authorization::Rejected)
            }
        }
    }
}
