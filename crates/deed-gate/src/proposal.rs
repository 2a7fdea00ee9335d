use serde::{Deserialize, Serialize};

use deed_types::limits::{
    text_within, MAX_ADDRESS_LEN, MAX_DESCRIPTION_LEN, MAX_LOCATION_LEN, MAX_TAX_ID_LEN,
};
use deed_types::{
    BlockHeight, Currency, DocumentHash, Principal, Property, PropertyId, RejectCode, ZoningType,
};

// ---------------------------------------------------------------------------
// FieldViolation
// ---------------------------------------------------------------------------

/// The first field check a proposal failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldViolation {
    pub code: RejectCode,
    pub field: &'static str,
    pub reason: String,
}

impl FieldViolation {
    fn new(code: RejectCode, field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            code,
            field,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RegistrationProposal
// ---------------------------------------------------------------------------

/// Raw, untrusted input to a property registration.
///
/// Numeric fields are signed and the enumerations are plain text so that
/// every malformed value can be rejected with its own code instead of failing
/// earlier at a type boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationProposal {
    pub legal_description: String,
    pub document_hash: Vec<u8>,
    pub address: String,
    pub location: String,
    pub currency: String,
    pub size_sqft: i64,
    pub zoning_type: String,
    pub tax_id: String,
    pub assessment_value: i64,
    pub lien_amount: i64,
    pub mortgage_amount: i64,
}

/// Registration fields after every check has passed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub legal_description: String,
    pub document_hash: DocumentHash,
    pub address: String,
    pub location: String,
    pub currency: Currency,
    pub size_sqft: u64,
    pub zoning_type: ZoningType,
    pub tax_id: String,
    pub assessment_value: u64,
    pub lien_amount: u64,
    pub mortgage_amount: u64,
}

impl RegistrationProposal {
    /// Run the field checks in registration order and return typed fields.
    ///
    /// Order: description, hash, address, location, currency, size, zoning,
    /// tax id, assessment, lien, mortgage. The first failure is returned and
    /// later fields are not looked at.
    pub fn validate_fields(&self) -> Result<ValidatedRegistration, FieldViolation> {
        if !text_within(&self.legal_description, MAX_DESCRIPTION_LEN) {
            return Err(FieldViolation::new(
                RejectCode::InvalidDescription,
                "legal_description",
                format!("must be 1-{MAX_DESCRIPTION_LEN} characters"),
            ));
        }

        let document_hash = DocumentHash::from_slice(&self.document_hash).map_err(|e| {
            FieldViolation::new(RejectCode::InvalidHash, "document_hash", e.to_string())
        })?;

        if !text_within(&self.address, MAX_ADDRESS_LEN) {
            return Err(FieldViolation::new(
                RejectCode::InvalidAddress,
                "address",
                format!("must be 1-{MAX_ADDRESS_LEN} characters"),
            ));
        }

        if !text_within(&self.location, MAX_LOCATION_LEN) {
            return Err(FieldViolation::new(
                RejectCode::InvalidLocation,
                "location",
                format!("must be 1-{MAX_LOCATION_LEN} characters"),
            ));
        }

        let currency: Currency = self.currency.parse().map_err(|e: deed_types::TypeError| {
            FieldViolation::new(RejectCode::InvalidCurrency, "currency", e.to_string())
        })?;

        let size_sqft = positive(self.size_sqft)
            .ok_or_else(|| FieldViolation::new(RejectCode::InvalidSize, "size_sqft", "must be > 0"))?;

        let zoning_type = parse_zoning(&self.zoning_type, RejectCode::InvalidZoning)?;

        if !text_within(&self.tax_id, MAX_TAX_ID_LEN) {
            return Err(FieldViolation::new(
                RejectCode::InvalidTaxId,
                "tax_id",
                format!("must be 1-{MAX_TAX_ID_LEN} characters"),
            ));
        }

        let assessment_value = positive(self.assessment_value).ok_or_else(|| {
            FieldViolation::new(RejectCode::InvalidAssessment, "assessment_value", "must be > 0")
        })?;

        let lien_amount = u64::try_from(self.lien_amount).map_err(|_| {
            FieldViolation::new(RejectCode::InvalidLien, "lien_amount", "must be >= 0")
        })?;

        let mortgage_amount = u64::try_from(self.mortgage_amount).map_err(|_| {
            FieldViolation::new(RejectCode::InvalidMortgage, "mortgage_amount", "must be >= 0")
        })?;

        Ok(ValidatedRegistration {
            legal_description: self.legal_description.clone(),
            document_hash,
            address: self.address.clone(),
            location: self.location.clone(),
            currency,
            size_sqft,
            zoning_type,
            tax_id: self.tax_id.clone(),
            assessment_value,
            lien_amount,
            mortgage_amount,
        })
    }
}

impl ValidatedRegistration {
    /// Build the stored record for a freshly registered property.
    pub fn into_property(self, owner: Principal, registered_at: BlockHeight) -> Property {
        Property {
            owner,
            legal_description: self.legal_description,
            document_hash: self.document_hash,
            address: self.address,
            registered_at,
            location: self.location,
            currency: self.currency,
            status: true,
            size_sqft: self.size_sqft,
            zoning_type: self.zoning_type,
            tax_id: self.tax_id,
            assessment_value: self.assessment_value,
            lien_amount: self.lien_amount,
            mortgage_amount: self.mortgage_amount,
        }
    }
}

// ---------------------------------------------------------------------------
// UpdateProposal
// ---------------------------------------------------------------------------

/// Raw input to an owner update of a property's mutable fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProposal {
    pub id: PropertyId,
    pub legal_description: String,
    pub address: String,
    pub size_sqft: i64,
    pub zoning_type: String,
}

/// Update fields after every check has passed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedUpdate {
    pub legal_description: String,
    pub address: String,
    pub size_sqft: u64,
    pub zoning_type: ZoningType,
}

impl UpdateProposal {
    /// Run the registration constraints on the mutable fields.
    ///
    /// Every failure carries [`RejectCode::InvalidUpdateParam`]; the field is
    /// named in the violation.
    pub fn validate_fields(&self) -> Result<ValidatedUpdate, FieldViolation> {
        let code = RejectCode::InvalidUpdateParam;

        if !text_within(&self.legal_description, MAX_DESCRIPTION_LEN) {
            return Err(FieldViolation::new(
                code,
                "legal_description",
                format!("must be 1-{MAX_DESCRIPTION_LEN} characters"),
            ));
        }
        if !text_within(&self.address, MAX_ADDRESS_LEN) {
            return Err(FieldViolation::new(
                code,
                "address",
                format!("must be 1-{MAX_ADDRESS_LEN} characters"),
            ));
        }
        let size_sqft = positive(self.size_sqft)
            .ok_or_else(|| FieldViolation::new(code, "size_sqft", "must be > 0"))?;
        let zoning_type = parse_zoning(&self.zoning_type, code)?;

        Ok(ValidatedUpdate {
            legal_description: self.legal_description.clone(),
            address: self.address.clone(),
            size_sqft,
            zoning_type,
        })
    }
}

fn positive(value: i64) -> Option<u64> {
    u64::try_from(value).ok().filter(|v| *v > 0)
}

fn parse_zoning(value: &str, code: RejectCode) -> Result<ZoningType, FieldViolation> {
    value
        .parse()
        .map_err(|e: deed_types::TypeError| FieldViolation::new(code, "zoning_type", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RegistrationProposal {
        RegistrationProposal {
            legal_description: "Legal Desc".into(),
            document_hash: vec![1; 32],
            address: "123 Main St".into(),
            location: "City".into(),
            currency: "STX".into(),
            size_sqft: 2000,
            zoning_type: "residential".into(),
            tax_id: "TAX123".into(),
            assessment_value: 100_000,
            lien_amount: 0,
            mortgage_amount: 50_000,
        }
    }

    fn code_of(p: &RegistrationProposal) -> Option<RejectCode> {
        p.validate_fields().err().map(|v| v.code)
    }

    #[test]
    fn valid_proposal_yields_typed_fields() {
        let fields = valid().validate_fields().unwrap();
        assert_eq!(fields.document_hash, DocumentHash::new([1; 32]));
        assert_eq!(fields.currency, Currency::Stx);
        assert_eq!(fields.zoning_type, ZoningType::Residential);
        assert_eq!(fields.mortgage_amount, 50_000);
    }

    fn expect_code(mutate: impl FnOnce(&mut RegistrationProposal), expected: RejectCode) {
        let mut p = valid();
        mutate(&mut p);
        assert_eq!(code_of(&p), Some(expected));
    }

    #[test]
    fn each_field_has_its_own_code() {
        expect_code(|p| p.legal_description = "a".repeat(513), RejectCode::InvalidDescription);
        expect_code(|p| p.document_hash = vec![1; 31], RejectCode::InvalidHash);
        expect_code(|p| p.address = String::new(), RejectCode::InvalidAddress);
        expect_code(|p| p.location = "x".repeat(129), RejectCode::InvalidLocation);
        expect_code(|p| p.currency = "EUR".into(), RejectCode::InvalidCurrency);
        expect_code(|p| p.size_sqft = 0, RejectCode::InvalidSize);
        expect_code(|p| p.zoning_type = "agricultural".into(), RejectCode::InvalidZoning);
        expect_code(|p| p.tax_id = "t".repeat(101), RejectCode::InvalidTaxId);
        expect_code(|p| p.assessment_value = -1, RejectCode::InvalidAssessment);
        expect_code(|p| p.lien_amount = -1, RejectCode::InvalidLien);
        expect_code(|p| p.mortgage_amount = -5, RejectCode::InvalidMortgage);
    }

    #[test]
    fn text_fields_at_their_limit_are_accepted() {
        let mut p = valid();
        p.legal_description = "d".repeat(MAX_DESCRIPTION_LEN);
        p.address = "a".repeat(MAX_ADDRESS_LEN);
        p.location = "l".repeat(MAX_LOCATION_LEN);
        p.tax_id = "t".repeat(MAX_TAX_ID_LEN);
        let fields = p.validate_fields().unwrap();
        assert_eq!(fields.address.chars().count(), 256);
        assert_eq!(fields.location.chars().count(), 128);
        assert_eq!(fields.tax_id.chars().count(), 100);

        // Multi-byte characters count once each.
        p.address = "é".repeat(MAX_ADDRESS_LEN);
        assert!(p.validate_fields().is_ok());
        p.address.push('é');
        assert_eq!(code_of(&p), Some(RejectCode::InvalidAddress));
    }

    #[test]
    fn earliest_failing_field_wins() {
        let mut p = valid();
        p.address = String::new();
        p.currency = "EUR".into();
        p.mortgage_amount = -1;
        assert_eq!(code_of(&p), Some(RejectCode::InvalidAddress));

        p.legal_description = String::new();
        assert_eq!(code_of(&p), Some(RejectCode::InvalidDescription));
    }

    #[test]
    fn zero_encumbrances_are_allowed() {
        let mut p = valid();
        p.lien_amount = 0;
        p.mortgage_amount = 0;
        assert!(p.validate_fields().is_ok());
    }

    #[test]
    fn into_property_sets_owner_status_and_height() {
        let owner = Principal::new("ST1TEST").unwrap();
        let property = valid()
            .validate_fields()
            .unwrap()
            .into_property(owner.clone(), BlockHeight(7));
        assert_eq!(property.owner, owner);
        assert!(property.status);
        assert_eq!(property.registered_at, BlockHeight(7));
        assert!(property.has_mortgage());
        assert!(!property.has_lien());
    }

    #[test]
    fn update_failures_share_one_code() {
        let base = UpdateProposal {
            id: 0,
            legal_description: "New Desc".into(),
            address: "New Address".into(),
            size_sqft: 2500,
            zoning_type: "commercial".into(),
        };
        assert!(base.validate_fields().is_ok());

        let mut p = base.clone();
        p.size_sqft = 0;
        let v = p.validate_fields().unwrap_err();
        assert_eq!(v.code, RejectCode::InvalidUpdateParam);
        assert_eq!(v.field, "size_sqft");

        let mut p = base.clone();
        p.zoning_type = "mixed".into();
        assert_eq!(p.validate_fields().unwrap_err().field, "zoning_type");

        let mut p = base;
        p.address = "a".repeat(257);
        assert_eq!(p.validate_fields().unwrap_err().field, "address");
    }
}
