use deed_types::RejectCode;

use crate::error::GateError;
use crate::proposal::RegistrationProposal;
use crate::stage::{GateContext, GateStage, StageDecision};

/// Rejects registrations once the registry holds its maximum number of
/// properties.
pub struct CapacityStage;

impl GateStage<RegistrationProposal> for CapacityStage {
    fn name(&self) -> &str {
        "capacity"
    }

    fn evaluate(
        &self,
        _proposal: &RegistrationProposal,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        let count = context.view.property_count();
        let max = context.view.max_properties();
        if count >= max {
            return Ok(StageDecision::fail(
                RejectCode::MaxPropertiesExceeded,
                format!("registry holds {count} of {max} properties"),
            ));
        }
        Ok(StageDecision::Pass)
    }
}
