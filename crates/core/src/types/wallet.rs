//! Stellar wallet address type.
//!
//! Stores receive payment to a Stellar account, identified by a public key
//! in its canonical "G..." strkey encoding. A store row must never be
//! written with a malformed address, so parsing happens up front.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Length of a Stellar public key in strkey encoding.
const STRKEY_LENGTH: usize = 56;

/// Errors that can occur when parsing a [`StellarAddress`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletAddressError {
    /// The input string is empty.
    #[error("wallet address cannot be empty")]
    Empty,
    /// The input has the wrong length.
    #[error("wallet address must be exactly {STRKEY_LENGTH} characters (got {0})")]
    WrongLength(usize),
    /// The input does not start with the public-key version byte prefix.
    #[error("wallet address must start with 'G'")]
    MissingPrefix,
    /// The input contains a character outside A-Z / 0-9.
    #[error("wallet address contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A Stellar wallet address (public key, strkey-encoded).
///
/// Accepted addresses match `G` followed by 55 characters drawn from
/// `A-Z0-9`. This deliberately does not verify the strkey checksum; the
/// payment path validates that when funds actually move.
///
/// ## Examples
///
/// ```
/// use stellar_market_core::StellarAddress;
///
/// let addr = format!("G{}", "A".repeat(55));
/// assert!(StellarAddress::parse(&addr).is_ok());
///
/// assert!(StellarAddress::parse("GSHORT").is_err());
/// assert!(StellarAddress::parse(&format!("X{}", "A".repeat(55))).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct StellarAddress(String);

impl StellarAddress {
    /// Parse a `StellarAddress` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`WalletAddressError`] if the input is empty, has the wrong
    /// length, lacks the `G` prefix, or contains a character outside
    /// `A-Z0-9`.
    pub fn parse(s: &str) -> Result<Self, WalletAddressError> {
        if s.is_empty() {
            return Err(WalletAddressError::Empty);
        }

        if s.len() != STRKEY_LENGTH {
            return Err(WalletAddressError::WrongLength(s.len()));
        }

        if !s.starts_with('G') {
            return Err(WalletAddressError::MissingPrefix);
        }

        if let Some(bad) = s
            .chars()
            .find(|c| !c.is_ascii_uppercase() && !c.is_ascii_digit())
        {
            return Err(WalletAddressError::InvalidCharacter(bad));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the address and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StellarAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for StellarAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid() -> String {
        format!("G{}", "A".repeat(55))
    }

    #[test]
    fn accepts_canonical_address() {
        let addr = StellarAddress::parse(&valid()).unwrap();
        assert_eq!(addr.as_str().len(), 56);
    }

    #[test]
    fn accepts_digits() {
        let addr = format!("G{}{}", "7".repeat(30), "Z".repeat(25));
        assert!(StellarAddress::parse(&addr).is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(StellarAddress::parse(""), Err(WalletAddressError::Empty));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            StellarAddress::parse("GABC"),
            Err(WalletAddressError::WrongLength(4))
        );
        let long = format!("G{}", "A".repeat(56));
        assert_eq!(
            StellarAddress::parse(&long),
            Err(WalletAddressError::WrongLength(57))
        );
    }

    #[test]
    fn rejects_wrong_prefix() {
        let addr = format!("S{}", "A".repeat(55));
        assert_eq!(
            StellarAddress::parse(&addr),
            Err(WalletAddressError::MissingPrefix)
        );
    }

    #[test]
    fn rejects_lowercase() {
        let addr = format!("G{}a", "A".repeat(54));
        assert_eq!(
            StellarAddress::parse(&addr),
            Err(WalletAddressError::InvalidCharacter('a'))
        );
    }
}
