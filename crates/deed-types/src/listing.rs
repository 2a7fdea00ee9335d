use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Currency a property's values are denominated in.
///
/// Parsing is exact and case-sensitive: `"usd"` is not a currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "STX")]
    Stx,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "BTC")]
    Btc,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Self::Stx, Self::Usd, Self::Btc];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stx => "STX",
            Self::Usd => "USD",
            Self::Btc => "BTC",
        }
    }
}

impl FromStr for Currency {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TypeError::UnknownCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Land-use zoning of a property. Mutable through owner updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoningType {
    Residential,
    Commercial,
    Industrial,
}

impl ZoningType {
    pub const ALL: [ZoningType; 3] = [Self::Residential, Self::Commercial, Self::Industrial];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
        }
    }
}

impl FromStr for ZoningType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|z| z.as_str() == s)
            .ok_or_else(|| TypeError::UnknownZoning(s.to_string()))
    }
}

impl fmt::Display for ZoningType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
