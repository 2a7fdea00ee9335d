use deed_types::RejectCode;

use crate::error::GateError;
use crate::proposal::UpdateProposal;
use crate::stage::{GateContext, GateStage, StageDecision};

/// The property being updated must exist.
pub struct ExistenceStage;

impl GateStage<UpdateProposal> for ExistenceStage {
    fn name(&self) -> &str {
        "existence"
    }

    fn evaluate(
        &self,
        proposal: &UpdateProposal,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        if context.view.owner_of(proposal.id).is_none() {
            return Ok(StageDecision::fail(
                RejectCode::PropertyNotFound,
                format!("no property with id {}", proposal.id),
            ));
        }
        Ok(StageDecision::Pass)
    }
}

/// Only the registered owner may update a property.
pub struct OwnershipStage;

impl GateStage<UpdateProposal> for OwnershipStage {
    fn name(&self) -> &str {
        "ownership"
    }

    fn evaluate(
        &self,
        proposal: &UpdateProposal,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        match context.view.owner_of(proposal.id) {
            Some(owner) if owner == context.caller => Ok(StageDecision::Pass),
            Some(owner) => Ok(StageDecision::fail(
                RejectCode::NotAuthorized,
                format!("{} is not the owner ({owner})", context.caller),
            )),
            None => Ok(StageDecision::fail(
                RejectCode::PropertyNotFound,
                format!("no property with id {}", proposal.id),
            )),
        }
    }
}
