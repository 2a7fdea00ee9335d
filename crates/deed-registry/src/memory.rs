use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use deed_gate::{Gate, RegistrationGate, RegistrationProposal, UpdateGate, UpdateProposal};
use deed_types::code::Labelled;
use deed_types::{
    BlockHeight, DocumentHash, Principal, Property, PropertyId, PropertyUpdate, RejectCode,
};
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::state::{FeeTransfer, RegistryState};
use crate::traits::{CallContext, RegistryReader, RegistryWriter};

/// In-memory registry for tests, the CLI, and embedding.
///
/// All state sits behind one `RwLock`. Each mutating call holds the write
/// lock for its whole duration, so the gate and the mutation see the same
/// state and no call observes another's partial effects.
pub struct InMemoryRegistry {
    registration_gate: RegistrationGate,
    update_gate: UpdateGate,
    inner: RwLock<RegistryState>,
}

impl InMemoryRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_state(RegistryState::new(&config))
    }

    /// Resume from previously saved state. The saved state carries its own
    /// limits and fee policy, so no configuration is consulted.
    pub fn from_state(state: RegistryState) -> Result<Self> {
        state.check_invariants().map_err(RegistryError::Snapshot)?;
        Ok(Self::with_state(state))
    }

    fn with_state(state: RegistryState) -> Self {
        Self {
            registration_gate: Gate::registration(),
            update_gate: Gate::update(),
            inner: RwLock::new(state),
        }
    }

    /// Copy of the full current state.
    pub fn snapshot(&self) -> Result<RegistryState> {
        Ok(self.read()?.clone())
    }

    /// Move the clock forward by `blocks` and return the new height.
    pub fn advance_block(&self, blocks: u64) -> Result<BlockHeight> {
        let mut state = self.write()?;
        state.block_height = state.block_height.advanced(blocks);
        Ok(state.block_height)
    }

    /// Set the clock to an explicit height.
    pub fn set_block_height(&self, height: BlockHeight) -> Result<()> {
        self.write()?.block_height = height;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryState>> {
        self.inner.read().map_err(|_| RegistryError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState>> {
        self.inner.write().map_err(|_| RegistryError::LockPoisoned)
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

fn reject(code: RejectCode, op: &str) -> RegistryError {
    debug!(op, code = %Labelled(code), "call rejected");
    RegistryError::Rejected(code)
}

impl RegistryWriter for InMemoryRegistry {
    fn set_authority(&self, ctx: &CallContext, authority: Principal) -> Result<()> {
        let mut state = self.write()?;

        if authority == state.burn_principal {
            return Err(reject(RejectCode::InvalidOwner, "set-authority"));
        }
        if state.authority.is_some() {
            return Err(reject(RejectCode::NotAuthorized, "set-authority"));
        }

        info!(caller = %ctx.caller, %authority, "registration authority set");
        state.authority = Some(authority);
        Ok(())
    }

    fn set_registration_fee(&self, ctx: &CallContext, fee: u64) -> Result<()> {
        let mut state = self.write()?;

        let Some(authority) = state.authority.as_ref() else {
            return Err(reject(RejectCode::AuthorityNotVerified, "set-fee"));
        };
        if state.restrict_fee_to_authority && *authority != ctx.caller {
            return Err(reject(RejectCode::NotAuthorized, "set-fee"));
        }

        info!(caller = %ctx.caller, old = state.registration_fee, new = fee, "registration fee changed");
        state.registration_fee = fee;
        Ok(())
    }

    fn register_property(
        &self,
        ctx: &CallContext,
        proposal: &RegistrationProposal,
    ) -> Result<PropertyId> {
        let mut state = self.write()?;

        self.registration_gate
            .evaluate(proposal, &ctx.caller, &*state)?
            .into_result()
            .map_err(|code| reject(code, "register"))?;

        let fields = proposal
            .validate_fields()
            .map_err(|v| reject(v.code, "register"))?;
        let authority = state
            .authority
            .clone()
            .ok_or_else(|| reject(RejectCode::AuthorityNotVerified, "register"))?;

        let fee = state.registration_fee;
        let hash = fields.document_hash;
        let id = state.insert_property(fields, ctx.caller.clone(), authority);

        info!(
            id,
            owner = %ctx.caller,
            document = %hash.short_hex(),
            fee,
            "property registered"
        );
        Ok(id)
    }

    fn update_property(&self, ctx: &CallContext, proposal: &UpdateProposal) -> Result<()> {
        let mut state = self.write()?;

        self.update_gate
            .evaluate(proposal, &ctx.caller, &*state)?
            .into_result()
            .map_err(|code| reject(code, "update"))?;

        let fields = proposal
            .validate_fields()
            .map_err(|v| reject(v.code, "update"))?;
        if !state.apply_update(proposal.id, fields, ctx.caller.clone()) {
            return Err(reject(RejectCode::PropertyNotFound, "update"));
        }

        info!(id = proposal.id, updater = %ctx.caller, "property updated");
        Ok(())
    }
}

impl RegistryReader for InMemoryRegistry {
    fn get_property(&self, id: PropertyId) -> Result<Option<Property>> {
        Ok(self.read()?.properties.get(&id).cloned())
    }

    fn get_property_update(&self, id: PropertyId) -> Result<Option<PropertyUpdate>> {
        Ok(self.read()?.property_updates.get(&id).cloned())
    }

    fn get_property_count(&self) -> Result<u64> {
        Ok(self.read()?.next_property_id)
    }

    fn check_property_existence(&self, hash: &DocumentHash) -> Result<bool> {
        Ok(self.read()?.properties_by_hash.contains_key(hash))
    }

    fn property_id_by_hash(&self, hash: &DocumentHash) -> Result<Option<PropertyId>> {
        Ok(self.read()?.properties_by_hash.get(hash).copied())
    }

    fn registration_fee(&self) -> Result<u64> {
        Ok(self.read()?.registration_fee)
    }

    fn authority(&self) -> Result<Option<Principal>> {
        Ok(self.read()?.authority.clone())
    }

    fn max_properties(&self) -> Result<u64> {
        Ok(self.read()?.max_properties)
    }

    fn block_height(&self) -> Result<BlockHeight> {
        Ok(self.read()?.block_height)
    }

    fn transfers(&self) -> Result<Vec<FeeTransfer>> {
        Ok(self.read()?.transfers.clone())
    }
}
