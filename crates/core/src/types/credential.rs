//! Stored account password.
//!
//! Registered accounts keep their password as plain text on the device.
//! This is a known weakness of the storage model, kept so that existing
//! stores keep working; a salted hash comparison belongs behind
//! [`PlainPassword::verify`] if that changes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A password as typed at registration, stored verbatim.
///
/// `Debug` is redacted so the value never lands in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlainPassword(String);

impl PlainPassword {
    /// Wrap a password, trimming surrounding whitespace.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_owned())
    }

    /// Length in characters after trimming.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Compare against a login attempt.
    ///
    /// Both sides are trimmed; the comparison is case-sensitive.
    #[must_use]
    pub fn verify(&self, attempt: &str) -> bool {
        self.0.trim() == attempt.trim()
    }

    /// Expose the stored value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword([REDACTED])")
    }
}
