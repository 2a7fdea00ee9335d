use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identity of a caller, owner, or authority.
///
/// Principals are opaque address strings (`ST1...`, `SP...`). Two principals
/// are the same identity exactly when their strings are equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Address that can never hold the registry authority.
    pub const BURN: &'static str = "SP000000000000000000002Q6VF78";

    /// Create a principal, rejecting blank input.
    pub fn new(address: impl Into<String>) -> Result<Self, TypeError> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(TypeError::EmptyPrincipal);
        }
        Ok(Self(address))
    }

    /// The burn principal.
    pub fn burn() -> Self {
        Self(Self::BURN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Principal {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for Principal {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Principal> for String {
    fn from(p: Principal) -> Self {
        p.0
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", self.0)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_principal_rejected() {
        assert_eq!(Principal::new(""), Err(TypeError::EmptyPrincipal));
        assert_eq!(Principal::new("   "), Err(TypeError::EmptyPrincipal));
    }

    #[test]
    fn parse_trims_whitespace() {
        let p: Principal = " ST1TEST ".parse().unwrap();
        assert_eq!(p.as_str(), "ST1TEST");
    }

    #[test]
    fn burn_matches_constant() {
        assert_eq!(Principal::burn().as_str(), Principal::BURN);
    }

    #[test]
    fn serde_is_a_bare_string() {
        let p = Principal::new("ST2TEST").unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"ST2TEST\"");
        let parsed: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, p);
    }

    #[test]
    fn serde_rejects_blank() {
        assert!(serde_json::from_str::<Principal>("\"\"").is_err());
    }
}
