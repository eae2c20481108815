//! # Channels
//!
//! Channel naming and the allow-list of inbound subscription patterns.
//!
//! ## Naming
//!
//! `UPPER(wrapper)` or `UPPER(wrapper) ":" UPPER(sub_type)`. The sub-type lets
//! a consumer subscribe to one purpose only (e.g. `OTPREQUESTCREATEDEVENT:VERIFY_EMAIL`).
//!
//! ## Registry
//!
//! The registry is fail-closed: a message delivered under a pattern that is
//! not registered is rejected before its payload is read. Pattern membership
//! is an exact string test; [`ChannelRegistry::accepts`] checks a concrete
//! channel against the registered globs.

use std::collections::BTreeSet;

/// Subscription pattern for OTP validation outcomes from the verifier.
pub const OTP_VALIDATED: &str = "OTPVALIDATEDEVENT*";

/// Build a channel name from a wrapper type name and optional sub-type.
#[must_use]
pub fn channel_name(wrapper: &str, sub_type: Option<&str>) -> String {
    match sub_type {
        Some(sub) if !sub.is_empty() => {
            format!("{}:{}", wrapper.to_uppercase(), sub.to_uppercase())
        }
        _ => wrapper.to_uppercase(),
    }
}

/// Glob match used by transports: a trailing `*` matches any suffix,
/// otherwise the channel must equal the pattern.
#[must_use]
pub fn pattern_matches(pattern: &str, channel: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => channel.starts_with(prefix),
        None => pattern == channel,
    }
}

/// The wrapper part of a concrete channel name (`WRAPPER` in `WRAPPER:SUB`).
#[must_use]
pub fn wrapper_of(channel: &str) -> &str {
    channel.split_once(':').map_or(channel, |(wrapper, _)| wrapper)
}

/// Allow-list of inbound subscription patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRegistry {
    accepted: BTreeSet<String>,
}

impl ChannelRegistry {
    /// An empty registry. Rejects everything.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            accepted: BTreeSet::new(),
        }
    }

    /// Register a pattern.
    #[must_use]
    pub fn with(mut self, pattern: impl Into<String>) -> Self {
        self.accepted.insert(pattern.into());
        self
    }

    /// Exact membership test.
    #[must_use]
    pub fn is_accepted_channel(&self, name: &str) -> bool {
        self.accepted.contains(name)
    }

    /// Whether some registered pattern covers the concrete `channel`.
    #[must_use]
    pub fn accepts(&self, channel: &str) -> bool {
        self.accepted
            .iter()
            .any(|pattern| pattern_matches(pattern, channel))
    }

    /// Registered patterns in sorted order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.accepted.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

impl Default for ChannelRegistry {
    /// The service's production registry.
    fn default() -> Self {
        Self::empty().with(OTP_VALIDATED)
    }
}
