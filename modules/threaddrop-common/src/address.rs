use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;

use crate::matcher::ADDRESS_LEN;
use crate::types::CanonicalAddress;

/// Why a candidate was not accepted as an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingPrefix,
    WrongLength,
    NonHex,
    BadChecksum,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rejection::MissingPrefix => "missing 0x prefix",
            Rejection::WrongLength => "wrong length",
            Rejection::NonHex => "non-hex character",
            Rejection::BadChecksum => "checksum mismatch",
        };
        f.write_str(s)
    }
}

/// Outcome of validating one candidate. Rejection is an expected result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(CanonicalAddress),
    Invalid { observed: String, reason: Rejection },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// The canonical form when valid, the input unchanged otherwise.
    pub fn value(&self) -> &str {
        match self {
            Validation::Valid(addr) => addr.as_str(),
            Validation::Invalid { observed, .. } => observed,
        }
    }

    pub fn into_canonical(self) -> Option<CanonicalAddress> {
        match self {
            Validation::Valid(addr) => Some(addr),
            Validation::Invalid { .. } => None,
        }
    }
}

/// Validate a `0x`-prefixed hex address and return its EIP-55 checksummed form.
///
/// All-lowercase and all-uppercase input carries no checksum and is accepted.
/// Mixed-case input must already match the checksum.
pub fn validate_address(candidate: &str) -> Validation {
    let invalid = |reason| Validation::Invalid {
        observed: candidate.to_string(),
        reason,
    };

    let Some(hex_part) = candidate.strip_prefix("0x") else {
        return invalid(Rejection::MissingPrefix);
    };
    if candidate.len() != ADDRESS_LEN {
        return invalid(Rejection::WrongLength);
    }
    if !hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return invalid(Rejection::NonHex);
    }

    let Ok(address) = Address::from_str(candidate) else {
        return invalid(Rejection::NonHex);
    };
    let checksummed = address.to_checksum(None);

    let has_lower = hex_part.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex_part.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && checksummed != candidate {
        return invalid(Rejection::BadChecksum);
    }

    Validation::Valid(CanonicalAddress::new_unchecked(checksummed))
}
