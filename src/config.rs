use std::time::Duration;

use crate::store::OptionStore;

/// How outbound mail leaves the host: through the SendGrid web API or
/// through the host's SMTP mailer plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMethod {
    Api,
    Smtp,
}

impl SendMethod {
    pub fn parse(value: &str) -> SendMethod {
        match value {
            "smtp" => SendMethod::Smtp,
            _ => SendMethod::Api,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SendMethod::Api => "api",
            SendMethod::Smtp => "smtp",
        }
    }
}

/// Typed reads over the stored `sendgrid_*` options. Option keys keep the
/// names an existing installation already has in its options table.
pub struct Config<'a> {
    store: &'a dyn OptionStore,
}

impl<'a> Config<'a> {
    pub fn new(store: &'a dyn OptionStore) -> Self {
        Self { store }
    }

    pub fn username(&self) -> String {
        self.store.get_or("sendgrid_user", "")
    }

    pub fn password(&self) -> String {
        self.store.get_or("sendgrid_pwd", "")
    }

    /// Transactional API key, used as the fallback bearer credential.
    pub fn api_key(&self) -> String {
        self.store.get_or("sendgrid_api_key", "")
    }

    pub fn send_method(&self) -> SendMethod {
        SendMethod::parse(&self.store.get_or("sendgrid_api", "api"))
    }

    pub fn from_name(&self) -> String {
        self.store.get_or("sendgrid_from_name", "")
    }

    pub fn from_email(&self) -> String {
        self.store.get_or("sendgrid_from_email", "")
    }

    pub fn reply_to(&self) -> String {
        self.store.get_or("sendgrid_reply_to", "")
    }

    /// Raw use-transactional flag. Callers compare against the literal
    /// string "false"; any other value (including absent) means the
    /// transactional credentials are used for marketing calls too.
    pub fn mc_use_transactional(&self) -> String {
        self.store.get_or("sendgrid_mc_opt_use_transactional", "")
    }

    pub fn mc_api_key(&self) -> String {
        self.store.get_or("sendgrid_mc_api_key", "")
    }

    pub fn mc_list_id(&self) -> String {
        self.store.get_or("sendgrid_mc_list_id", "")
    }

    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .store
            .get("sendgrid_request_timeout")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(30);
        Duration::from_secs(secs)
    }
}

/// Seed missing options with their defaults. Never overwrites a value an
/// operator has already saved.
pub fn seed_defaults(store: &dyn OptionStore) -> Result<(), String> {
    let defaults = [
        ("sendgrid_user", ""),
        ("sendgrid_pwd", ""),
        ("sendgrid_api_key", ""),
        ("sendgrid_api", "api"),
        ("sendgrid_from_name", ""),
        ("sendgrid_from_email", ""),
        ("sendgrid_reply_to", ""),
        ("sendgrid_mc_opt_use_transactional", "true"),
        ("sendgrid_mc_api_key", ""),
        ("sendgrid_mc_list_id", ""),
        ("sendgrid_request_timeout", "30"),
    ];

    for (key, value) in defaults {
        if store.get(key).is_none() {
            store.set(key, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn send_method_parse() {
        assert_eq!(SendMethod::parse("api"), SendMethod::Api);
        assert_eq!(SendMethod::parse("smtp"), SendMethod::Smtp);
        assert_eq!(SendMethod::parse("garbage"), SendMethod::Api);
        assert_eq!(SendMethod::Smtp.as_str(), "smtp");
    }

    #[test]
    fn typed_accessors() {
        let store = MemoryStore::new();
        store.set("sendgrid_user", "operator").unwrap();
        store.set("sendgrid_pwd", "secret").unwrap();
        store.set("sendgrid_api", "smtp").unwrap();

        let cfg = Config::new(&store);
        assert_eq!(cfg.username(), "operator");
        assert_eq!(cfg.password(), "secret");
        assert_eq!(cfg.send_method(), SendMethod::Smtp);
        assert_eq!(cfg.from_name(), "");
        assert_eq!(cfg.api_key(), "");
    }

    #[test]
    fn request_timeout_fallback() {
        let store = MemoryStore::new();
        let cfg = Config::new(&store);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));

        store.set("sendgrid_request_timeout", "10").unwrap();
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));

        store.set("sendgrid_request_timeout", "0").unwrap();
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));

        store.set("sendgrid_request_timeout", "abc").unwrap();
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn seed_defaults_never_overwrites() {
        let store = MemoryStore::new();
        store.set("sendgrid_api", "smtp").unwrap();

        seed_defaults(&store).unwrap();
        assert_eq!(store.get("sendgrid_api"), Some("smtp".to_string()));
        assert_eq!(store.get("sendgrid_request_timeout"), Some("30".to_string()));
        assert_eq!(
            store.get("sendgrid_mc_opt_use_transactional"),
            Some("true".to_string())
        );

        // Running again changes nothing
        store.set("sendgrid_request_timeout", "5").unwrap();
        seed_defaults(&store).unwrap();
        assert_eq!(store.get("sendgrid_request_timeout"), Some("5".to_string()));
    }
}
