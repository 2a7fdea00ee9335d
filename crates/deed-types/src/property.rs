use serde::{Deserialize, Serialize};

use crate::hash::DocumentHash;
use crate::listing::{Currency, ZoningType};
use crate::principal::Principal;
use crate::temporal::BlockHeight;

/// Sequential property identifier, starting at 0.
pub type PropertyId = u64;

/// A registered property.
///
/// `owner`, `document_hash`, `location`, `currency`, `tax_id`,
/// `assessment_value`, and the encumbrance amounts never change after
/// registration. The lien and mortgage flags are derived from their amounts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub owner: Principal,
    pub legal_description: String,
    pub document_hash: DocumentHash,
    pub address: String,
    /// Height of creation, refreshed on every successful update.
    pub registered_at: BlockHeight,
    pub location: String,
    pub currency: Currency,
    pub status: bool,
    pub size_sqft: u64,
    pub zoning_type: ZoningType,
    pub tax_id: String,
    pub assessment_value: u64,
    pub lien_amount: u64,
    pub mortgage_amount: u64,
}

impl Property {
    pub fn has_lien(&self) -> bool {
        self.lien_amount > 0
    }

    pub fn has_mortgage(&self) -> bool {
        self.mortgage_amount > 0
    }
}

/// The most recent amendment made to a property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyUpdate {
    pub update_description: String,
    pub update_address: String,
    pub update_timestamp: BlockHeight,
    pub updater: Principal,
    pub update_size_sqft: u64,
    pub update_zoning_type: ZoningType,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(lien: u64, mortgage: u64) -> Property {
        Property {
            owner: Principal::new("ST1TEST").unwrap(),
            legal_description: "Lot 7".into(),
            document_hash: DocumentHash::new([1; 32]),
            address: "123 Main St".into(),
            registered_at: BlockHeight::zero(),
            location: "City".into(),
            currency: Currency::Stx,
            status: true,
            size_sqft: 2000,
            zoning_type: ZoningType::Residential,
            tax_id: "TAX123".into(),
            assessment_value: 100_000,
            lien_amount: lien,
            mortgage_amount: mortgage,
        }
    }

    #[test]
    fn encumbrance_flags_follow_amounts() {
        let p = property(0, 50_000);
        assert!(!p.has_lien());
        assert!(p.has_mortgage());

        let p = property(10_000, 0);
        assert!(p.has_lien());
        assert!(!p.has_mortgage());
    }

    #[test]
    fn serde_roundtrip() {
        let p = property(1, 2);
        let json = serde_json::to_string(&p).unwrap();
        let parsed: Property = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, p);
    }
}
