//! Probe endpoint matching logic.
//!
//! # Responsibilities
//! - Recognize the self-test path (`/jobpulse/test`)
//! - Recognize the token-guarded info path (`/jobpulse/<token>/info`)
//! - Classify everything else as pass-through
//!
//! # Design Decisions
//! - Path matching is case-sensitive and exact (no prefix or fuzzy matching)
//! - A single trailing slash is tolerated; anything beyond that does not match
//! - A missing or empty token makes the info endpoint unreachable
//! - No regex, no allocation in the hot path

/// Path prefix under which both probe endpoints live.
pub const DIAGNOSTIC_PREFIX: &str = "/jobpulse";

/// Classification of an incoming request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `/jobpulse/test`: human-readable self-test.
    SelfTest,
    /// `/jobpulse/<token>/info`: machine-readable job count.
    Info,
    /// Anything else: hand the request to the application untouched.
    PassThrough,
}

/// Classify a URI path against the two probe endpoints.
///
/// Only the path component participates; callers strip the query string
/// before calling. The token must match exactly, byte for byte.
pub fn classify(path: &str, token: Option<&str>) -> Endpoint {
    // Tolerate exactly one trailing slash.
    let path = path.strip_suffix('/').unwrap_or(path);

    let Some(rest) = path.strip_prefix(DIAGNOSTIC_PREFIX) else {
        return Endpoint::PassThrough;
    };

    if rest == "/test" {
        return Endpoint::SelfTest;
    }

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        let matched = rest
            .strip_prefix('/')
            .and_then(|r| r.strip_suffix("/info"))
            .is_some_and(|candidate| candidate == token);
        if matched {
            return Endpoint::Info;
        }
    }

    Endpoint::PassThrough
}
