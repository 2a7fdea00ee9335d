use deed_types::RejectCode;

use crate::error::GateError;
use crate::proposal::RegistrationProposal;
use crate::stage::{GateContext, GateStage, StageDecision};

/// Registrations are refused until an authority has been configured.
pub struct AuthorityStage;

impl GateStage<RegistrationProposal> for AuthorityStage {
    fn name(&self) -> &str {
        "authority"
    }

    fn evaluate(
        &self,
        _proposal: &RegistrationProposal,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        if context.view.authority().is_none() {
            return Ok(StageDecision::fail(
                RejectCode::AuthorityNotVerified,
                "no registration authority configured",
            ));
        }
        Ok(StageDecision::Pass)
    }
}
