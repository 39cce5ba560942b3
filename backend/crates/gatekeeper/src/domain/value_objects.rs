//! Domain Value Objects

/// Why the security filter turned a request away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Client-declared identity matched the denylist
    DeniedUserAgent,
    /// Attack signature in the URL or query string
    SuspiciousUrl,
    /// Attack signature in a mutating request body
    SuspiciousBody,
}

/// Pure evaluation of one request; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityDecision {
    Allow,
    Reject(RejectReason),
}

impl SecurityDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, SecurityDecision::Allow)
    }
}
