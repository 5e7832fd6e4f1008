use serde_json::Value;

use crate::config::SendMethod;

/// One message handed to the host's mail facility. `headers` is the raw
/// header block the operator typed, passed through untouched.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub headers: String,
}

/// What the host's mail facility hands back. Two legacy shapes survive in
/// the field: API-mode installs return the vendor's JSON report, SMTP-mode
/// installs return a plain boolean.
#[derive(Debug, Clone)]
pub enum MailReturn {
    Report(Value),
    Flag(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Failure,
}

/// Normalized send result: one tag plus failure detail for the banner.
#[derive(Debug, Clone, PartialEq)]
pub struct SendOutcome {
    pub kind: OutcomeKind,
    pub detail: String,
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }

    fn success() -> Self {
        SendOutcome {
            kind: OutcomeKind::Success,
            detail: String::new(),
        }
    }

    fn failure(detail: String) -> Self {
        SendOutcome {
            kind: OutcomeKind::Failure,
            detail,
        }
    }
}

impl MailReturn {
    /// Collapse either legacy shape into a `SendOutcome`, interpreted under
    /// the configured send method. A report counts as success only when its
    /// `message` field equals "success"; failure detail is `errors[0]` when
    /// present, otherwise the whole report. A shape belonging to the other
    /// mode means the host is misconfigured and counts as failure.
    pub fn normalize(&self, method: SendMethod) -> SendOutcome {
        match (method, self) {
            (SendMethod::Api, MailReturn::Report(report)) => {
                if report.get("message").and_then(|m| m.as_str()) == Some("success") {
                    return SendOutcome::success();
                }
                let detail = match report.get("errors").and_then(|e| e.get(0)) {
                    Some(first) => {
                        let s = first
                            .as_str()
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| first.to_string());
                        if s.is_empty() {
                            report.to_string()
                        } else {
                            s
                        }
                    }
                    None => report.to_string(),
                };
                SendOutcome::failure(detail)
            }
            (SendMethod::Smtp, MailReturn::Flag(ok)) => {
                if *ok {
                    SendOutcome::success()
                } else {
                    SendOutcome::failure(String::new())
                }
            }
            (SendMethod::Api, MailReturn::Flag(_)) => SendOutcome::failure(String::new()),
            (SendMethod::Smtp, MailReturn::Report(report)) => {
                SendOutcome::failure(report.to_string())
            }
        }
    }
}

/// Host mail-dispatch seam. `smtp_available` reports whether the host's
/// SMTP mailer plugin is installed and active; SMTP send mode cannot be
/// saved without it.
pub trait HostMailer: Send + Sync {
    fn send(&self, email: &OutboundEmail) -> MailReturn;
    fn smtp_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn smtp_flag_shapes() {
        let ok = MailReturn::Flag(true).normalize(SendMethod::Smtp);
        assert!(ok.is_success());
        assert_eq!(ok.detail, "");

        let failed = MailReturn::Flag(false).normalize(SendMethod::Smtp);
        assert_eq!(failed.kind, OutcomeKind::Failure);
        assert_eq!(failed.detail, "");
    }

    #[test]
    fn api_report_success() {
        let out = MailReturn::Report(json!({"message": "success"})).normalize(SendMethod::Api);
        assert!(out.is_success());
    }

    #[test]
    fn api_report_failure_uses_first_error() {
        let out = MailReturn::Report(json!({
            "message": "error",
            "errors": ["Bad username / password"]
        }))
        .normalize(SendMethod::Api);
        assert_eq!(out.kind, OutcomeKind::Failure);
        assert_eq!(out.detail, "Bad username / password");
    }

    #[test]
    fn api_report_failure_without_errors_dumps_report() {
        let out = MailReturn::Report(json!({"message": "error"})).normalize(SendMethod::Api);
        assert_eq!(out.kind, OutcomeKind::Failure);
        assert!(out.detail.contains("error"));
    }

    #[test]
    fn api_report_failure_with_non_string_error() {
        let out = MailReturn::Report(json!({
            "message": "error",
            "errors": [{"field": "to", "message": "missing"}]
        }))
        .normalize(SendMethod::Api);
        assert_eq!(out.kind, OutcomeKind::Failure);
        assert!(out.detail.contains("missing"));
    }

    #[test]
    fn api_report_without_message_is_failure() {
        let out = MailReturn::Report(json!({"ok": true})).normalize(SendMethod::Api);
        assert_eq!(out.kind, OutcomeKind::Failure);
    }

    #[test]
    fn mismatched_shapes_fail() {
        let out = MailReturn::Flag(true).normalize(SendMethod::Api);
        assert_eq!(out.kind, OutcomeKind::Failure);

        let out = MailReturn::Report(json!({"message": "success"})).normalize(SendMethod::Smtp);
        assert_eq!(out.kind, OutcomeKind::Failure);
        assert!(out.detail.contains("success"));
    }
}
