use crate::error::GateError;
use crate::proposal::{RegistrationProposal, UpdateProposal};
use crate::stage::{GateContext, GateStage, StageDecision};

/// Structural validation of every registration field.
///
/// Delegates to [`RegistrationProposal::validate_fields`] so the registry and
/// the gate can never disagree about what a valid field is.
pub struct RegistrationFieldsStage;

impl GateStage<RegistrationProposal> for RegistrationFieldsStage {
    fn name(&self) -> &str {
        "fields"
    }

    fn evaluate(
        &self,
        proposal: &RegistrationProposal,
        _context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        Ok(match proposal.validate_fields() {
            Ok(_) => StageDecision::Pass,
            Err(v) => StageDecision::fail(v.code, format!("{}: {}", v.field, v.reason)),
        })
    }
}

/// Structural validation of the mutable fields in an update.
pub struct UpdateFieldsStage;

impl GateStage<UpdateProposal> for UpdateFieldsStage {
    fn name(&self) -> &str {
        "fields"
    }

    fn evaluate(
        &self,
        proposal: &UpdateProposal,
        _context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        Ok(match proposal.validate_fields() {
            Ok(_) => StageDecision::Pass,
            Err(v) => StageDecision::fail(v.code, format!("{}: {}", v.field, v.reason)),
        })
    }
}
