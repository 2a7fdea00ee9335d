use deed_types::{DocumentHash, RejectCode};

use crate::error::GateError;
use crate::proposal::RegistrationProposal;
use crate::stage::{GateContext, GateStage, StageDecision};

/// Rejects a registration whose document hash is already indexed.
pub struct UniquenessStage;

impl GateStage<RegistrationProposal> for UniquenessStage {
    fn name(&self) -> &str {
        "uniqueness"
    }

    fn evaluate(
        &self,
        proposal: &RegistrationProposal,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        // The fields stage normally runs first; this only matters for custom
        // pipelines that skip it.
        let hash = match DocumentHash::from_slice(&proposal.document_hash) {
            Ok(hash) => hash,
            Err(e) => return Ok(StageDecision::fail(RejectCode::InvalidHash, e.to_string())),
        };

        if context.view.contains_hash(&hash) {
            return Ok(StageDecision::fail(
                RejectCode::PropertyExists,
                format!("document {} is already registered", hash.short_hex()),
            ));
        }
        Ok(StageDecision::Pass)
    }
}
