use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of rejection codes returned by registry operations.
///
/// Codes are a flat namespace. Callers match on the variant (or the exact
/// number from [`RejectCode::code`]), never on ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum RejectCode {
    #[error("caller is not authorized")]
    NotAuthorized,
    #[error("a property with this document hash already exists")]
    PropertyExists,
    #[error("document hash must be exactly 32 bytes")]
    InvalidHash,
    #[error("legal description must be 1-512 characters")]
    InvalidDescription,
    #[error("address must be 1-256 characters")]
    InvalidAddress,
    #[error("registration authority has not been configured")]
    AuthorityNotVerified,
    #[error("principal cannot hold the authority")]
    InvalidOwner,
    #[error("property not found")]
    PropertyNotFound,
    #[error("invalid update parameter")]
    InvalidUpdateParam,
    #[error("maximum number of properties reached")]
    MaxPropertiesExceeded,
    #[error("location must be 1-128 characters")]
    InvalidLocation,
    #[error("currency must be one of STX, USD, BTC")]
    InvalidCurrency,
    #[error("size must be greater than zero")]
    InvalidSize,
    #[error("zoning must be one of residential, commercial, industrial")]
    InvalidZoning,
    #[error("tax id must be 1-100 characters")]
    InvalidTaxId,
    #[error("assessment value must be greater than zero")]
    InvalidAssessment,
    #[error("lien amount must not be negative")]
    InvalidLien,
    #[error("mortgage amount must not be negative")]
    InvalidMortgage,
}

impl RejectCode {
    /// Every code, in ascending numeric order.
    pub const ALL: [RejectCode; 18] = [
        Self::NotAuthorized,
        Self::PropertyExists,
        Self::InvalidHash,
        Self::InvalidDescription,
        Self::InvalidAddress,
        Self::AuthorityNotVerified,
        Self::InvalidOwner,
        Self::PropertyNotFound,
        Self::InvalidUpdateParam,
        Self::MaxPropertiesExceeded,
        Self::InvalidLocation,
        Self::InvalidCurrency,
        Self::InvalidSize,
        Self::InvalidZoning,
        Self::InvalidTaxId,
        Self::InvalidAssessment,
        Self::InvalidLien,
        Self::InvalidMortgage,
    ];

    /// The numeric wire code.
    pub const fn code(self) -> u32 {
        match self {
            Self::NotAuthorized => 100,
            Self::PropertyExists => 101,
            Self::InvalidHash => 102,
            Self::InvalidDescription => 104,
            Self::InvalidAddress => 105,
            Self::AuthorityNotVerified => 107,
            Self::InvalidOwner => 108,
            Self::PropertyNotFound => 109,
            Self::InvalidUpdateParam => 110,
            Self::MaxPropertiesExceeded => 111,
            Self::InvalidLocation => 113,
            Self::InvalidCurrency => 114,
            Self::InvalidSize => 115,
            Self::InvalidZoning => 116,
            Self::InvalidTaxId => 117,
            Self::InvalidAssessment => 118,
            Self::InvalidLien => 119,
            Self::InvalidMortgage => 120,
        }
    }

    /// Look up a code by number.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Upper-snake name, e.g. `PROPERTY_EXISTS`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::PropertyExists => "PROPERTY_EXISTS",
            Self::InvalidHash => "INVALID_HASH",
            Self::InvalidDescription => "INVALID_DESCRIPTION",
            Self::InvalidAddress => "INVALID_ADDRESS",
            Self::AuthorityNotVerified => "AUTHORITY_NOT_VERIFIED",
            Self::InvalidOwner => "INVALID_OWNER",
            Self::PropertyNotFound => "PROPERTY_NOT_FOUND",
            Self::InvalidUpdateParam => "INVALID_UPDATE_PARAM",
            Self::MaxPropertiesExceeded => "MAX_PROPERTIES_EXCEEDED",
            Self::InvalidLocation => "INVALID_LOCATION",
            Self::InvalidCurrency => "INVALID_CURRENCY",
            Self::InvalidSize => "INVALID_SIZE",
            Self::InvalidZoning => "INVALID_ZONING",
            Self::InvalidTaxId => "INVALID_TAX_ID",
            Self::InvalidAssessment => "INVALID_ASSESSMENT",
            Self::InvalidLien => "INVALID_LIEN",
            Self::InvalidMortgage => "INVALID_MORTGAGE",
        }
    }
}

/// `u<code> NAME` form used in logs and CLI output.
pub struct Labelled(pub RejectCode);

impl fmt::Display for Labelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{} {}", self.0.code(), self.0.name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn codes_are_unique_and_in_range() {
        let codes: HashSet<u32> = RejectCode::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes.len(), RejectCode::ALL.len());
        assert!(codes.iter().all(|c| (100..=120).contains(c)));
    }

    #[test]
    fn all_is_sorted() {
        let codes: Vec<u32> = RejectCode::ALL.iter().map(|c| c.code()).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn from_code_roundtrip() {
        for code in RejectCode::ALL {
            assert_eq!(RejectCode::from_code(code.code()), Some(code));
        }
        assert_eq!(RejectCode::from_code(103), None);
        assert_eq!(RejectCode::from_code(121), None);
    }

    #[test]
    fn well_known_values() {
        assert_eq!(RejectCode::PropertyExists.code(), 101);
        assert_eq!(RejectCode::AuthorityNotVerified.code(), 107);
        assert_eq!(RejectCode::MaxPropertiesExceeded.code(), 111);
    }

    #[test]
    fn labelled_display() {
        assert_eq!(
            Labelled(RejectCode::PropertyExists).to_string(),
            "u101 PROPERTY_EXISTS"
        );
    }
}
