//! SendGrid settings panel and marketing contacts client for CMS hosts.
//!
//! The embedding CMS supplies the option store, the mail facility, and the
//! route layer; this crate supplies the settings-page controller, the
//! credential check against the profile endpoint, and a thin client for
//! the Marketing Campaigns contacts API.

pub mod config;
pub mod http;
pub mod mailer;
pub mod marketing;
pub mod settings;
pub mod store;


pub use config::{seed_defaults, Config, SendMethod};
pub use http::{HttpTransport, RemoteRequest, RemoteResponse, Transport};
pub use mailer::{HostMailer, MailReturn, OutboundEmail, OutcomeKind, SendOutcome};
pub use marketing::{Contact, MarketingClient};
pub use settings::{
    check_credentials, validate_credentials, CredentialCheck, PageStatus, SettingsForm,
    SettingsPage, SettingsRequest, SettingsView, StatusBanner, TestEmailForm,
};
pub use store::sqlite::SqliteStore;
pub use store::{MemoryStore, OptionStore};
