use deed_gate::{RegistrationProposal, UpdateProposal};
use deed_types::{BlockHeight, DocumentHash, Principal, Property, PropertyId, PropertyUpdate};

use crate::error::Result;
use crate::state::FeeTransfer;

/// Who is making a registry call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
}

impl CallContext {
    pub fn new(caller: Principal) -> Self {
        Self { caller }
    }
}

/// Write boundary for registry mutations.
///
/// Every method is all-or-nothing: on `Err` the registry is unchanged.
pub trait RegistryWriter: Send + Sync {
    /// Set the single-assignment fee authority.
    fn set_authority(&self, ctx: &CallContext, authority: Principal) -> Result<()>;

    /// Replace the registration fee. Requires a configured authority.
    fn set_registration_fee(&self, ctx: &CallContext, fee: u64) -> Result<()>;

    /// Register a property owned by the caller and return its id.
    fn register_property(
        &self,
        ctx: &CallContext,
        proposal: &RegistrationProposal,
    ) -> Result<PropertyId>;

    /// Amend the mutable fields of a property the caller owns.
    fn update_property(&self, ctx: &CallContext, proposal: &UpdateProposal) -> Result<()>;
}

/// Read boundary for registry queries. Queries never mutate.
pub trait RegistryReader: Send + Sync {
    fn get_property(&self, id: PropertyId) -> Result<Option<Property>>;

    fn get_property_update(&self, id: PropertyId) -> Result<Option<PropertyUpdate>>;

    /// Total number of successful registrations.
    fn get_property_count(&self) -> Result<u64>;

    fn check_property_existence(&self, hash: &DocumentHash) -> Result<bool>;

    fn property_id_by_hash(&self, hash: &DocumentHash) -> Result<Option<PropertyId>>;

    fn registration_fee(&self) -> Result<u64>;

    fn authority(&self) -> Result<Option<Principal>>;

    fn max_properties(&self) -> Result<u64>;

    fn block_height(&self) -> Result<BlockHeight>;

    /// Fee transfers in the order they happened.
    fn transfers(&self) -> Result<Vec<FeeTransfer>>;
}
