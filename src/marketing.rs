use serde::Serialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::http::{RemoteRequest, Transport};
use crate::store::OptionStore;

pub const MARKETING_API_URL: &str = "https://api.sendgrid.com/v3/marketing";

/// Contact payload for the marketing contacts upsert. Name fields are
/// serialized only when non-empty.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
}

/// Thin client for the SendGrid Marketing Campaigns API.
/// https://docs.sendgrid.com/api-reference/contacts/add-or-update-a-contact
pub struct MarketingClient<'a> {
    store: &'a dyn OptionStore,
    transport: &'a dyn Transport,
}

impl<'a> MarketingClient<'a> {
    pub fn new(store: &'a dyn OptionStore, transport: &'a dyn Transport) -> Self {
        Self { store, transport }
    }

    /// Authorization header for marketing calls. The marketing key is used
    /// only when the operator has stored "false" for the use-transactional
    /// flag; every other state falls back to the transactional API key.
    pub fn auth_header_value(&self) -> Option<String> {
        let cfg = Config::new(self.store);

        if cfg.mc_use_transactional() == "false" {
            let mc_api_key = cfg.mc_api_key();
            if !mc_api_key.is_empty() {
                return Some(format!("Bearer {}", mc_api_key));
            }
        }

        let api_key = cfg.api_key();
        if api_key.is_empty() {
            return None;
        }
        Some(format!("Bearer {}", api_key))
    }

    /// Fetch the account's contact lists. Whatever the vendor put under
    /// `result` comes back verbatim.
    pub fn all_lists(&self) -> Option<Vec<Value>> {
        let auth = self.auth_header_value()?;
        let cfg = Config::new(self.store);

        let url = format!("{}/lists", MARKETING_API_URL);
        let req = RemoteRequest::get(&url, cfg.request_timeout()).header("Authorization", &auth);

        let response = match self.transport.request(&req) {
            Some(r) => r,
            None => {
                log::warn!("[marketing] list fetch failed: no response");
                return None;
            }
        };
        let body = match response.body {
            Some(b) => b,
            None => {
                log::warn!(
                    "[marketing] list fetch returned {} with no body",
                    response.status
                );
                return None;
            }
        };

        let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        match parsed.get("result").and_then(|r| r.as_array()) {
            Some(lists) => Some(lists.clone()),
            None => {
                log::warn!("[marketing] list response has no result field");
                None
            }
        }
    }

    /// Upsert one contact into the configured list. Returns the vendor's
    /// import job id; the job itself is never polled.
    pub fn add_recipient(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Option<String> {
        let auth = match self.auth_header_value() {
            Some(a) => a,
            None => {
                log::warn!("[marketing] contact upsert skipped: no usable API key");
                return None;
            }
        };
        let cfg = Config::new(self.store);
        let list_id = cfg.mc_list_id();
        if list_id.is_empty() {
            log::warn!("[marketing] contact upsert skipped: no list configured");
            return None;
        }

        let contact = Contact {
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        let payload = json!({
            "list_id": [list_id],
            "contacts": [contact],
        });

        let url = format!("{}/contacts", MARKETING_API_URL);
        let req = RemoteRequest::put(&url, cfg.request_timeout())
            .header("Authorization", &auth)
            .header("content-type", "application/json")
            .body(payload.to_string());

        let response = match self.transport.request(&req) {
            Some(r) => r,
            None => {
                log::warn!("[marketing] contact upsert failed: no response");
                return None;
            }
        };
        let body = match response.body {
            Some(b) => b,
            None => {
                log::warn!(
                    "[marketing] contact upsert returned {} with no body",
                    response.status
                );
                return None;
            }
        };

        let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

        if let Some(count) = parsed.get("error_count") {
            if count.as_u64() != Some(0) {
                log::warn!("[marketing] contact upsert reported errors: {}", count);
                return None;
            }
        }

        match parsed.get("job_id") {
            Some(job) => Some(
                job.as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| job.to_string()),
            ),
            None => {
                log::warn!("[marketing] contact upsert response has no job_id");
                None
            }
        }
    }

    /// Upsert a contact and report plain success or failure.
    pub fn create_and_add_recipient_to_list(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> bool {
        self.add_recipient(email, first_name, last_name).is_some()
    }
}
