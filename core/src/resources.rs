//! Per-resource request methods.
//!
//! Each method fixes the verb and path template of one endpoint and decides
//! how the body is read back: parsed JSON for everything except license
//! deletion and payment refunds, which answer with plain text. Identifiers
//! are percent-encoded into a single path segment and otherwise not checked.
//!
//! | Method | Path |
//! |--------|------|
//! | POST / GET / PATCH / DELETE | `/licenses`, `/licenses/{key}`, `/licenses/{key}/metadata` |
//! | POST / GET / PATCH | `/products`, `/products/{id}` |
//! | POST / GET / PATCH | `/links`, `/links/{link}` |
//! | POST / GET | `/raffles`, `/raffles/{id}` |
//! | GET | `/waitlist/entries`, `/waitlist/entries/{id}` |
//! | GET / POST | `/payments`, `/payments/{id}`, `/payments/{id}/refund` |
//! | POST / GET | `/coupons`, `/coupons/{id}` |

use serde_json::Value;

use urlencoding::encode;

use crate::error::Result;
use crate::http::{HttpMethod, Transport};
use crate::transport::Core;

fn active_query(active: bool) -> Vec<(String, String)> {
    vec![("active".to_string(), active.to_string())]
}

impl<T: Transport> Core<T> {
    fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.call(HttpMethod::Get, path, query, None)?.json()
    }

    fn send_json(&self, method: HttpMethod, path: &str, body: &Value) -> Result<Value> {
        self.call(method, path, &[], Some(body))?.json()
    }

    // -- licenses ------------------------------------------------------------

    pub fn create_license_request(&self, payload: &Value) -> Result<Value> {
        self.send_json(HttpMethod::Post, "/licenses", payload)
    }

    pub fn retrieve_license_request(&self, license_key: &str) -> Result<Value> {
        self.get_json(&format!("/licenses/{}", encode(license_key)), &[])
    }

    pub fn update_license_request(&self, license_key: &str, payload: &Value) -> Result<Value> {
        self.send_json(HttpMethod::Patch, &format!("/licenses/{}", encode(license_key)), payload)
    }

    pub fn update_license_metadata_request(&self, license_key: &str, metadata: &Value) -> Result<Value> {
        self.send_json(HttpMethod::Patch, &format!("/licenses/{}/metadata", encode(license_key)), metadata)
    }

    pub fn delete_license_request(&self, license_key: &str) -> Result<String> {
        Ok(self
            .call(HttpMethod::Delete, &format!("/licenses/{}", encode(license_key)), &[], None)?
            .text())
    }

    pub fn list_licenses_request(&self, query: &[(String, String)]) -> Result<Value> {
        self.get_json("/licenses", query)
    }

    // -- products ------------------------------------------------------------

    pub fn create_product_request(&self, payload: &Value) -> Result<Value> {
        self.send_json(HttpMethod::Post, "/products", payload)
    }

    pub fn retrieve_product_request(&self, product_id: &str) -> Result<Value> {
        self.get_json(&format!("/products/{}", encode(product_id)), &[])
    }

    pub fn update_product_request(&self, product_id: &str, payload: &Value) -> Result<Value> {
        self.send_json(HttpMethod::Patch, &format!("/products/{}", encode(product_id)), payload)
    }

    pub fn list_products_request(&self) -> Result<Value> {
        self.get_json("/products", &[])
    }

    // -- links ---------------------------------------------------------------

    pub fn create_link_request(&self, payload: &Value) -> Result<Value> {
        self.send_json(HttpMethod::Post, "/links", payload)
    }

    pub fn retrieve_link_request(&self, link: &str) -> Result<Value> {
        self.get_json(&format!("/links/{}", encode(link)), &[])
    }

    pub fn update_link_request(&self, link: &str, payload: &Value) -> Result<Value> {
        self.send_json(HttpMethod::Patch, &format!("/links/{}", encode(link)), payload)
    }

    pub fn list_links_request(&self) -> Result<Value> {
        self.get_json("/links", &[])
    }

    // -- raffles -------------------------------------------------------------

    pub fn create_raffle_request(&self, payload: &Value) -> Result<Value> {
        self.send_json(HttpMethod::Post, "/raffles", payload)
    }

    pub fn retrieve_raffle_request(&self, raffle_id: &str) -> Result<Value> {
        self.get_json(&format!("/raffles/{}", encode(raffle_id)), &[])
    }

    pub fn list_raffles_request(&self, active: bool) -> Result<Value> {
        self.get_json("/raffles", &active_query(active))
    }

    // -- waitlist ------------------------------------------------------------

    pub fn retrieve_waitlist_entry_request(&self, entry_id: &str) -> Result<Value> {
        self.get_json(&format!("/waitlist/entries/{}", encode(entry_id)), &[])
    }

    pub fn list_waitlist_entries_request(&self) -> Result<Value> {
        self.get_json("/waitlist/entries", &[])
    }

    // -- payments ------------------------------------------------------------

    pub fn retrieve_payment_request(&self, payment_id: &str) -> Result<Value> {
        self.get_json(&format!("/payments/{}", encode(payment_id)), &[])
    }

    pub fn refund_payment_request(&self, payment_id: &str) -> Result<String> {
        Ok(self
            .call(HttpMethod::Post, &format!("/payments/{}/refund", encode(payment_id)), &[], None)?
            .text())
    }

    pub fn list_payments_request(&self) -> Result<Value> {
        self.get_json("/payments", &[])
    }

    // -- coupons -------------------------------------------------------------

    pub fn create_coupon_request(&self, payload: &Value) -> Result<Value> {
        self.send_json(HttpMethod::Post, "/coupons", payload)
    }

    pub fn retrieve_coupon_request(&self, coupon_id: &str) -> Result<Value> {
        self.get_json(&format!("/coupons/{}", encode(coupon_id)), &[])
    }

    pub fn list_coupons_request(&self, active: bool) -> Result<Value> {
        self.get_json("/coupons", &active_query(active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HyperConfig;
    use crate::transport::testing::RecordingTransport;
    use serde_json::json;

    fn core(transport: RecordingTransport) -> Core<RecordingTransport> {
        Core::new(&HyperConfig::new("sk_test"), transport)
    }

    fn sent(core: &Core<RecordingTransport>) -> (HttpMethod, String, Vec<(String, String)>) {
        let req = core.transport().requests().pop().unwrap();
        let path = req.url.trim_start_matches(core.base_url()).to_string();
        (req.method, path, req.query)
    }

    #[test]
    fn license_endpoints_use_expected_verbs_and_paths() {
        let core = core(
            RecordingTransport::new()
                .respond(200, "{}")
                .respond(200, "{}")
                .respond(200, "{}")
                .respond(202, "Accepted"),
        );

        core.retrieve_license_request("ABCD").unwrap();
        assert_eq!(sent(&core), (HttpMethod::Get, "/licenses/ABCD".to_string(), vec![]));

        core.update_license_request("ABCD", &json!({"unlocked": true})).unwrap();
        assert_eq!(sent(&core).0, HttpMethod::Patch);

        core.update_license_metadata_request("ABCD", &json!({"seat": 2})).unwrap();
        assert_eq!(sent(&core).1, "/licenses/ABCD/metadata");

        assert_eq!(core.delete_license_request("ABCD").unwrap(), "Accepted");
        assert_eq!(sent(&core), (HttpMethod::Delete, "/licenses/ABCD".to_string(), vec![]));
    }

    #[test]
    fn identifiers_are_encoded_as_one_segment() {
        let core = core(
            RecordingTransport::new()
                .respond(200, "{}")
                .respond(200, "{}")
                .respond(202, "Accepted"),
        );

        core.retrieve_license_request("LIC 1").unwrap();
        assert_eq!(sent(&core).1, "/licenses/LIC%201");

        core.update_license_metadata_request("a/b?c", &json!({})).unwrap();
        assert_eq!(sent(&core).1, "/licenses/a%2Fb%3Fc/metadata");

        core.refund_payment_request("pay 1").unwrap();
        assert_eq!(sent(&core).1, "/payments/pay%201/refund");
    }

    #[test]
    fn list_raffles_sends_active_flag() {
        let core = core(RecordingTransport::new().respond(200, r#"{"data":[]}"#));
        core.list_raffles_request(false).unwrap();
        assert_eq!(
            sent(&core),
            (
                HttpMethod::Get,
                "/raffles".to_string(),
                vec![("active".to_string(), "false".to_string())]
            )
        );
    }

    #[test]
    fn list_coupons_sends_active_flag() {
        let core = core(RecordingTransport::new().respond(200, r#"{"data":[]}"#));
        core.list_coupons_request(true).unwrap();
        assert_eq!(sent(&core).2, vec![("active".to_string(), "true".to_string())]);
    }

    #[test]
    fn refund_returns_text_body() {
        let core = core(RecordingTransport::new().respond(202, "Accepted"));
        assert_eq!(core.refund_payment_request("pay_1").unwrap(), "Accepted");
        assert_eq!(sent(&core), (HttpMethod::Post, "/payments/pay_1/refund".to_string(), vec![]));
        assert!(core.transport().requests()[0].body.is_none());
    }

    #[test]
    fn waitlist_paths_are_nested() {
        let core = core(RecordingTransport::new().respond(200, "{}").respond(200, "{}"));
        core.retrieve_waitlist_entry_request("wle_1").unwrap();
        assert_eq!(sent(&core).1, "/waitlist/entries/wle_1");
        core.list_waitlist_entries_request().unwrap();
        assert_eq!(sent(&core).1, "/waitlist/entries");
    }

    #[test]
    fn json_endpoints_reject_text_bodies() {
        let core = core(RecordingTransport::new().respond(200, "Accepted"));
        assert!(core.list_products_request().is_err());
    }
}
