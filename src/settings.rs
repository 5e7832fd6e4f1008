use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::http::{RemoteRequest, Transport};
use crate::mailer::{HostMailer, OutboundEmail};
use crate::store::OptionStore;

pub const PROFILE_CHECK_URL: &str = "https://sendgrid.com/api/profile.get.json";

/// Outcome of the profile-endpoint credential probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    Valid,
    Invalid,
    Unreachable,
}

/// Probe the legacy profile endpoint with the stored username/password.
/// A body whose JSON carries an `error` key means the vendor rejected the
/// pair; any body without one counts as valid, non-JSON included.
pub fn check_credentials(
    transport: &dyn Transport,
    timeout: Duration,
    username: &str,
    password: &str,
) -> CredentialCheck {
    let url = format!(
        "{}?api_user={}&api_key={}",
        PROFILE_CHECK_URL, username, password
    );
    let req = RemoteRequest::get(&url, timeout);

    let response = match transport.request(&req) {
        Some(r) => r,
        None => {
            log::warn!("[settings] credential check failed: no response");
            return CredentialCheck::Unreachable;
        }
    };
    let body = match response.body {
        Some(b) => b,
        None => {
            log::warn!(
                "[settings] credential check returned {} with no body",
                response.status
            );
            return CredentialCheck::Unreachable;
        }
    };

    let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    if parsed.get("error").is_some() {
        CredentialCheck::Invalid
    } else {
        CredentialCheck::Valid
    }
}

/// Boolean facade over `check_credentials`: true only when the vendor
/// accepted the pair.
pub fn validate_credentials(
    transport: &dyn Transport,
    timeout: Duration,
    username: &str,
    password: &str,
) -> bool {
    check_credentials(transport, timeout, username, password) == CredentialCheck::Valid
}

/// Everything the settings form submits, persisted verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsForm {
    pub username: String,
    pub password: String,
    pub api_key: String,
    pub send_method: String,
    pub from_name: String,
    pub from_email: String,
    pub reply_to: String,
    pub mc_use_transactional: String,
    pub mc_api_key: String,
    pub mc_list_id: String,
    pub request_timeout: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestEmailForm {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub headers: String,
}

/// One settings-page request, already parsed out of the host's request
/// state by the embedding route handler.
#[derive(Debug, Clone)]
pub enum SettingsRequest {
    View,
    Save(SettingsForm),
    SendTest(TestEmailForm),
}

/// Banner status strings the host keys its page styling on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    SendSuccess,
    SendFailed,
    SaveSuccess,
    SaveError,
    Error,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::SendSuccess => "send_success",
            PageStatus::SendFailed => "send_failed",
            PageStatus::SaveSuccess => "save_success",
            PageStatus::SaveError => "save_error",
            PageStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBanner {
    pub status: PageStatus,
    pub message: String,
}

impl StatusBanner {
    fn new(status: PageStatus, message: &str) -> Self {
        StatusBanner {
            status,
            message: message.to_string(),
        }
    }
}

/// Template context for the settings page: current option values plus the
/// banner, recomputed on every request.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    pub username: String,
    pub password: String,
    pub api_key: String,
    pub send_method: String,
    pub from_name: String,
    pub from_email: String,
    pub reply_to: String,
    pub mc_use_transactional: String,
    pub mc_api_key: String,
    pub mc_list_id: String,
    pub request_timeout: String,
    pub banner: Option<StatusBanner>,
}

/// Settings page controller. Saves options, dispatches test emails, and
/// renders the page view; credential problems overwrite whatever banner
/// the request itself produced.
pub struct SettingsPage<'a> {
    store: &'a dyn OptionStore,
    mailer: &'a dyn HostMailer,
    transport: &'a dyn Transport,
}

impl<'a> SettingsPage<'a> {
    pub fn new(
        store: &'a dyn OptionStore,
        mailer: &'a dyn HostMailer,
        transport: &'a dyn Transport,
    ) -> Self {
        Self {
            store,
            mailer,
            transport,
        }
    }

    pub fn show(&self, request: SettingsRequest) -> SettingsView {
        let banner = match request {
            SettingsRequest::View => None,
            SettingsRequest::Save(form) => Some(self.save(&form)),
            SettingsRequest::SendTest(form) => Some(self.send_test(&form)),
        };
        self.render(banner)
    }

    fn save(&self, form: &SettingsForm) -> StatusBanner {
        let mut banner = StatusBanner::new(PageStatus::SaveSuccess, "Options saved.");

        let mut method = form.send_method.clone();
        if method == "smtp" && !self.mailer.smtp_available() {
            banner = StatusBanner::new(
                PageStatus::SaveError,
                "SMTP send method requires the host's SMTP mailer plugin to be installed and activated",
            );
            method = "api".to_string();
        }

        let mut options = HashMap::new();
        options.insert("sendgrid_user".to_string(), form.username.clone());
        options.insert("sendgrid_pwd".to_string(), form.password.clone());
        options.insert("sendgrid_api_key".to_string(), form.api_key.clone());
        options.insert("sendgrid_api".to_string(), method);
        options.insert("sendgrid_from_name".to_string(), form.from_name.clone());
        options.insert("sendgrid_from_email".to_string(), form.from_email.clone());
        options.insert("sendgrid_reply_to".to_string(), form.reply_to.clone());
        options.insert(
            "sendgrid_mc_opt_use_transactional".to_string(),
            form.mc_use_transactional.clone(),
        );
        options.insert("sendgrid_mc_api_key".to_string(), form.mc_api_key.clone());
        options.insert("sendgrid_mc_list_id".to_string(), form.mc_list_id.clone());
        options.insert(
            "sendgrid_request_timeout".to_string(),
            form.request_timeout.clone(),
        );
        let _ = self.store.set_many(&options);

        banner
    }

    fn send_test(&self, form: &TestEmailForm) -> StatusBanner {
        let email = OutboundEmail {
            to: form.to.clone(),
            subject: form.subject.clone(),
            body: form.body.clone(),
            headers: form.headers.clone(),
        };

        let cfg = Config::new(self.store);
        let outcome = self.mailer.send(&email).normalize(cfg.send_method());

        if outcome.is_success() {
            StatusBanner::new(PageStatus::SendSuccess, "Email sent.")
        } else if outcome.detail.is_empty() {
            StatusBanner::new(PageStatus::SendFailed, "Email not sent.")
        } else {
            StatusBanner {
                status: PageStatus::SendFailed,
                message: format!("Email not sent. {}", outcome.detail),
            }
        }
    }

    fn render(&self, banner: Option<StatusBanner>) -> SettingsView {
        let cfg = Config::new(self.store);
        let mut banner = banner;

        let username = cfg.username();
        let password = cfg.password();

        if !username.is_empty() && !password.is_empty() {
            match check_credentials(self.transport, cfg.request_timeout(), &username, &password) {
                CredentialCheck::Valid => {}
                CredentialCheck::Invalid => {
                    banner = Some(StatusBanner::new(
                        PageStatus::Error,
                        "Invalid username/password",
                    ));
                }
                CredentialCheck::Unreachable => {
                    banner = Some(StatusBanner::new(
                        PageStatus::Error,
                        "Could not reach SendGrid to verify credentials",
                    ));
                }
            }
        }

        SettingsView {
            username,
            password,
            api_key: cfg.api_key(),
            send_method: cfg.send_method().as_str().to_string(),
            from_name: cfg.from_name(),
            from_email: cfg.from_email(),
            reply_to: cfg.reply_to(),
            mc_use_transactional: cfg.mc_use_transactional(),
            mc_api_key: cfg.mc_api_key(),
            mc_list_id: cfg.mc_list_id(),
            request_timeout: self.store.get_or("sendgrid_request_timeout", "30"),
            banner,
        }
    }
}
