use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use deed_gate::{RegistryView, ValidatedRegistration, ValidatedUpdate};
use deed_types::{BlockHeight, DocumentHash, Principal, Property, PropertyId, PropertyUpdate};

use crate::config::RegistryConfig;

/// A registration fee moved from a registrant to the authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTransfer {
    pub amount: u64,
    pub from: Principal,
    pub to: Principal,
}

/// Complete registry state.
///
/// Plain data: it holds no locks and performs no checks of its own beyond
/// [`RegistryState::check_invariants`]. [`crate::InMemoryRegistry`] gates
/// every mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    pub next_property_id: PropertyId,
    pub max_properties: u64,
    pub registration_fee: u64,
    pub authority: Option<Principal>,
    /// Principal that can never become the authority.
    pub burn_principal: Principal,
    /// Only the authority may change the fee.
    pub restrict_fee_to_authority: bool,
    pub block_height: BlockHeight,
    pub properties: BTreeMap<PropertyId, Property>,
    pub property_updates: BTreeMap<PropertyId, PropertyUpdate>,
    pub properties_by_hash: BTreeMap<DocumentHash, PropertyId>,
    pub transfers: Vec<FeeTransfer>,
}

impl RegistryState {
    /// Fresh, empty state for the given configuration.
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            next_property_id: 0,
            max_properties: config.max_properties,
            registration_fee: config.registration_fee,
            authority: None,
            burn_principal: config.burn_principal.clone(),
            restrict_fee_to_authority: config.restrict_fee_to_authority,
            block_height: config.initial_block_height,
            properties: BTreeMap::new(),
            property_updates: BTreeMap::new(),
            properties_by_hash: BTreeMap::new(),
            transfers: Vec::new(),
        }
    }

    /// Insert a property that has passed the registration gate.
    ///
    /// Charges the fee to `owner`, stores the record under the next id, and
    /// indexes its hash. The caller must have confirmed an authority exists.
    pub(crate) fn insert_property(
        &mut self,
        fields: ValidatedRegistration,
        owner: Principal,
        authority: Principal,
    ) -> PropertyId {
        self.transfers.push(FeeTransfer {
            amount: self.registration_fee,
            from: owner.clone(),
            to: authority,
        });

        let id = self.next_property_id;
        let property = fields.into_property(owner, self.block_height);
        self.properties_by_hash.insert(property.document_hash, id);
        self.properties.insert(id, property);
        self.next_property_id += 1;
        id
    }

    /// Apply an update that has passed the update gate. Returns `false` if
    /// the property vanished, which the gate rules out.
    pub(crate) fn apply_update(
        &mut self,
        id: PropertyId,
        fields: ValidatedUpdate,
        updater: Principal,
    ) -> bool {
        let at = self.block_height;
        let Some(property) = self.properties.get_mut(&id) else {
            return false;
        };

        property.legal_description = fields.legal_description.clone();
        property.address = fields.address.clone();
        property.size_sqft = fields.size_sqft;
        property.zoning_type = fields.zoning_type;
        property.registered_at = at;

        self.property_updates.insert(
            id,
            PropertyUpdate {
                update_description: fields.legal_description,
                update_address: fields.address,
                update_timestamp: at,
                updater,
                update_size_sqft: fields.size_sqft,
                update_zoning_type: fields.zoning_type,
            },
        );
        true
    }

    /// Check the structural invariants between the stores.
    ///
    /// Used when state comes from outside the process (snapshots).
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.properties.len() as u64 != self.next_property_id {
            return Err(format!(
                "{} properties stored but next id is {}",
                self.properties.len(),
                self.next_property_id
            ));
        }
        // With the length check above, this pins the ids to 0..next_property_id.
        if let Some(id) = self
            .properties
            .keys()
            .find(|id| **id >= self.next_property_id)
        {
            return Err(format!(
                "property id {id} is not below next id {}",
                self.next_property_id
            ));
        }
        if self.properties_by_hash.len() != self.properties.len() {
            return Err(format!(
                "hash index has {} entries for {} properties",
                self.properties_by_hash.len(),
                self.properties.len()
            ));
        }
        for (hash, id) in &self.properties_by_hash {
            match self.properties.get(id) {
                Some(p) if p.document_hash == *hash => {}
                Some(_) => return Err(format!("hash index entry for id {id} has the wrong hash")),
                None => return Err(format!("hash index points at missing id {id}")),
            }
        }
        if let Some(id) = self
            .property_updates
            .keys()
            .find(|id| !self.properties.contains_key(id))
        {
            return Err(format!("update recorded for missing id {id}"));
        }
        if self.authority.as_ref() == Some(&self.burn_principal) {
            return Err("the burn principal holds the authority".into());
        }
        if !self.transfers.is_empty() && self.authority.is_none() {
            return Err("fee transfers recorded without an authority".into());
        }
        Ok(())
    }
}

impl RegistryView for RegistryState {
    fn property_count(&self) -> u64 {
        self.next_property_id
    }

    fn max_properties(&self) -> u64 {
        self.max_properties
    }

    fn contains_hash(&self, hash: &DocumentHash) -> bool {
        self.properties_by_hash.contains_key(hash)
    }

    fn authority(&self) -> Option<&Principal> {
        self.authority.as_ref()
    }

    fn owner_of(&self, id: PropertyId) -> Option<&Principal> {
        self.properties.get(&id).map(|p| &p.owner)
    }
}
