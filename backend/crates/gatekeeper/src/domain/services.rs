//! Domain Services
//!
//! Pattern-based request inspection. Stateless; the inspector is built once
//! at startup and shared.

use regex::Regex;

use crate::domain::value_objects::{RejectReason, SecurityDecision};

/// Fixed attack signatures checked against URLs and mutating bodies.
///
/// Script injection, script-scheme URIs, inline event handlers, and the
/// classic SQL keyword sequences.
const ATTACK_SIGNATURES: &[&str] = &[
    r"(?is)<script[^>]*>.*?</script>",
    r"(?i)javascript:",
    r"(?i)vbscript:",
    r"(?i)on\w+\s*=",
    r"(?i)union.*select",
    r"(?i)insert.*into",
    r"(?i)drop.*table",
    r"(?i)delete.*from",
];

/// Compiled signature set plus the identity denylist.
#[derive(Debug)]
pub struct RequestInspector {
    signatures: Vec<Regex>,
    denied_user_agents: Vec<String>,
}

impl RequestInspector {
    /// Compile the fixed signature set; denylist entries are matched as
    /// lowercase substrings.
    pub fn new(denied_user_agents: &[String]) -> Self {
        let signatures = ATTACK_SIGNATURES
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();
        let denied_user_agents = denied_user_agents
            .iter()
            .map(|ua| ua.to_lowercase())
            .collect();
        Self {
            signatures,
            denied_user_agents,
        }
    }

    /// Whether any attack signature matches `content`. Never fails.
    pub fn is_suspicious(&self, content: &str) -> bool {
        self.signatures.iter().any(|re| re.is_match(content))
    }

    /// Pre-check one request before it reaches the limiter and handler.
    ///
    /// Exempt paths skip the denylist but not the signature check.
    pub fn inspect_request(
        &self,
        full_url: &str,
        user_agent: Option<&str>,
        exempt: bool,
    ) -> SecurityDecision {
        if !exempt {
            let ua = user_agent.unwrap_or("").to_lowercase();
            if self
                .denied_user_agents
                .iter()
                .any(|denied| ua.contains(denied))
            {
                return SecurityDecision::Reject(RejectReason::DeniedUserAgent);
            }
        }

        if self.is_suspicious(full_url) {
            return SecurityDecision::Reject(RejectReason::SuspiciousUrl);
        }

        SecurityDecision::Allow
    }

    /// Check a buffered request body. Empty content always passes.
    pub fn inspect_body(&self, body: &str) -> SecurityDecision {
        if !body.is_empty() && self.is_suspicious(body) {
            return SecurityDecision::Reject(RejectReason::SuspiciousBody);
        }
        SecurityDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspector() -> RequestInspector {
        RequestInspector::new(&[
            "curl".to_string(),
            "bot".to_string(),
            "spider".to_string(),
        ])
    }

    #[test]
    fn test_script_tag_detected() {
        let inspector = inspector();
        assert!(inspector.is_suspicious("<script>alert(1)</script>"));
        assert!(inspector.is_suspicious("<SCRIPT src=x>\nevil()\n</SCRIPT>"));
        assert!(!inspector.is_suspicious("plain text"));
    }

    #[test]
    fn test_script_uris_detected() {
        let inspector = inspector();
        assert!(inspector.is_suspicious("/page?next=javascript:alert(1)"));
        assert!(inspector.is_suspicious("/page?next=VBSCRIPT:msgbox"));
    }

    #[test]
    fn test_event_handler_detected() {
        let inspector = inspector();
        assert!(inspector.is_suspicious("<img src=x onerror=alert(1)>"));
        assert!(inspector.is_suspicious("onload = steal()"));
    }

    #[test]
    fn test_sql_sequences_detected() {
        let inspector = inspector();
        assert!(inspector.is_suspicious("/search?q=1 UNION ALL SELECT password"));
        assert!(inspector.is_suspicious("insert fake into users"));
        assert!(inspector.is_suspicious("DROP my TABLE"));
        assert!(inspector.is_suspicious("delete rows from accounts"));
        assert!(!inspector.is_suspicious("/reports?status=pending"));
    }

    #[test]
    fn test_denylist_case_insensitive() {
        let inspector = inspector();
        let decision = inspector.inspect_request("/api/reports", Some("Curl/8.0"), false);
        assert_eq!(
            decision,
            SecurityDecision::Reject(RejectReason::DeniedUserAgent)
        );
    }

    #[test]
    fn test_denylist_skipped_for_exempt_paths() {
        let inspector = inspector();
        let decision = inspector.inspect_request("/health", Some("curl/8.0"), true);
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_signature_check_applies_to_exempt_paths() {
        let inspector = inspector();
        let decision = inspector.inspect_request(
            "/health?probe=<script>alert(1)</script>",
            Some("kube-probe/1.29"),
            true,
        );
        assert_eq!(
            decision,
            SecurityDecision::Reject(RejectReason::SuspiciousUrl)
        );
    }

    #[test]
    fn test_missing_user_agent_allowed() {
        let inspector = inspector();
        assert!(inspector.inspect_request("/api/reports", None, false).is_allowed());
    }

    #[test]
    fn test_body_inspection() {
        let inspector = inspector();
        assert_eq!(
            inspector.inspect_body("<script>alert(1)</script>"),
            SecurityDecision::Reject(RejectReason::SuspiciousBody)
        );
        assert!(inspector.inspect_body("").is_allowed());
        assert!(inspector.inspect_body(r#"{"title":"Q3 report"}"#).is_allowed());
    }
}
