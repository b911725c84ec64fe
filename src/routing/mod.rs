//! Request classification subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (URI path)
//!     → matcher.rs (compare against the two probe endpoints)
//!     → Return: SelfTest | Info | PassThrough
//! ```
//!
//! # Design Decisions
//! - Classification is a pure function of (path, token); no I/O
//! - Case-sensitive exact matching, at most one trailing slash tolerated
//! - The access token is folded into the info path: no token, no match
//! - Query strings never participate in classification

pub mod matcher;

pub use matcher::{classify, Endpoint, DIAGNOSTIC_PREFIX};
